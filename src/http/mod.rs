//! HTTP module containing HTTP client functionality.
//!
//! Every task of an [`Engine`](crate::engine::Engine) shares one client built
//! by [`create_http_client`]. The client traces each request through
//! `reqwest-tracing` and enforces the connect/read timeout that turns a
//! stalled peer into a task error.
//!
//! # Examples
//!
//! ```rust
//! use fetchpool::http::{create_http_client, HttpClientConfig};
//! use reqwest::header::{HeaderMap, USER_AGENT};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut headers = HeaderMap::new();
//! headers.insert(USER_AGENT, "MyApp/1.0".parse()?);
//!
//! let config = HttpClientConfig {
//!     timeout: Duration::from_secs(30),
//!     proxy: None,
//!     headers: Some(headers),
//! };
//!
//! let client = create_http_client(config)?;
//! # Ok(())
//! # }
//! ```

pub mod client;

pub use client::{create_http_client, HttpClientConfig, DEFAULT_TIMEOUT};
