//! Authenticated HTTP client
//!
//! Wraps outbound requests with bearer-token injection and a
//! single-retry-on-auth-failure refresh protocol, coordinating with the
//! credential store and the session-invalidation registry.

mod client;

pub use client::{
    AuthClient, ClientConfig, ClientConfigBuilder, RequestConfig, DEFAULT_REFRESH_PATH,
};

#[cfg(test)]
mod tests;
