//! Gateway-side OAuth 2.0 client-credentials token cache: one shared access token per
//! process, refreshed ahead of expiry behind a single-flight guard, and injected as a bearer
//! credential into every outbound request.
//!
//! The crate is split the same way the request path is:
//!
//! - [`cache::TokenCache`] owns the token state and performs the token-endpoint exchange.
//! - [`intercept::BearerInterceptor`] asks the cache for a token and attaches it to outbound
//!   requests before handing them to the real transport.
//!
//! ```no_run
//! # #[cfg(feature = "reqwest")]
//! # async fn demo() -> gateway_bearer::Result<()> {
//! use std::sync::Arc;
//!
//! use gateway_bearer::{
//! 	cache::TokenCache, intercept::BearerInterceptor, provider::ClientCredentials,
//! };
//!
//! let credentials = ClientCredentials::from_env()?;
//! let cache = Arc::new(TokenCache::new(credentials)?);
//! let client = gateway_bearer::intercept::downstream_client(
//! 	reqwest::Client::default(),
//! 	BearerInterceptor::new(cache),
//! );
//! let _response = client.get("https://students.internal/api/students").send().await;
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
pub mod clock;
pub mod error;
pub mod http;
pub mod intercept;
pub mod oauth;
pub mod obs;
pub mod provider;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use error::{Error, Result};
#[cfg(feature = "reqwest")] pub use reqwest;
#[cfg(feature = "reqwest")] pub use reqwest_middleware;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
