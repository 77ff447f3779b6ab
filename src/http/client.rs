//! HTTP client setup and middleware configuration.

use reqwest::{header::HeaderMap, Proxy};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use std::time::Duration;

/// Connect and read timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Configuration for HTTP client setup.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Bound on establishing a connection and on every single read.
    ///
    /// This is not a deadline for the whole transfer: a slow but steady
    /// body never trips it.
    pub timeout: Duration,
    /// Optional proxy configuration.
    pub proxy: Option<Proxy>,
    /// Default headers to include with all requests.
    pub headers: Option<HeaderMap>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            proxy: None,
            headers: None,
        }
    }
}

/// Creates an HTTP client with middleware configuration.
///
/// The inner reqwest client carries the timeouts, proxy and default headers;
/// the middleware stack only adds request tracing. Failed requests are not
/// retried.
pub fn create_http_client(
    config: HttpClientConfig,
) -> Result<ClientWithMiddleware, reqwest::Error> {
    let mut inner_client_builder = reqwest::Client::builder()
        .connect_timeout(config.timeout)
        .read_timeout(config.timeout);

    if let Some(proxy) = config.proxy {
        inner_client_builder = inner_client_builder.proxy(proxy);
    }

    if let Some(headers) = config.headers {
        inner_client_builder = inner_client_builder.default_headers(headers);
    }

    let inner_client = inner_client_builder.build()?;

    let client = ClientBuilder::new(inner_client)
        // Trace HTTP requests. See the tracing crate to make use of these traces.
        .with(TracingMiddleware::default())
        .build();

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

    #[test]
    fn test_default_config() {
        let config = HttpClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert!(config.proxy.is_none());
        assert!(config.headers.is_none());
    }

    #[test]
    fn test_create_http_client_default() {
        let client = create_http_client(HttpClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_create_http_client_with_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("test-agent"));

        let config = HttpClientConfig {
            timeout: Duration::from_secs(2),
            proxy: None,
            headers: Some(headers),
        };

        assert!(create_http_client(config).is_ok());
    }
}
