//! Token secrets, the cached token state, and the token-endpoint response shape.

pub mod response;
pub mod secret;
pub mod state;
