//! Network layer: the [`Transport`] seam, the reqwest-backed [`HttpClient`],
//! and URL quoting.
//!
//! Everything above this module talks to the site through [`Transport`], a
//! single "fetch bytes from URL with headers" operation. [`HttpClient`] is the
//! production implementation; tests drive the crate with an in-memory stub.
//!
//! # Examples
//!
//! ```rust,no_run
//! use hitomi::net::{HttpClient, Transport};
//! use reqwest::header::HeaderMap;
//!
//! # async fn example() -> hitomi::Result<()> {
//! let client = HttpClient::new().with_timeout(60);
//! let body = client
//!     .fetch("https://ltn.hitomi.la/index-all.nozomi", &HeaderMap::new())
//!     .await?;
//! println!("{} bytes", body.len());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use once_cell::sync::Lazy;
use reqwest::{
    Client, StatusCode,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};

pub mod json;

/// User-Agent sent by the default client.
pub const USER_AGENT: &str = concat!("hitomi/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client used unless a timeout or user agent is overridden.
///
/// This client is configured with:
/// - 30-second timeout
/// - Connection pooling (16 idle connections per host, one per default worker)
/// - Compression support (gzip, brotli)
static CLIENT: Lazy<Client> = Lazy::new(|| {
    build_client(Duration::from_secs(30), USER_AGENT).unwrap_or_else(|_| Client::new())
});

fn build_client(timeout: Duration, user_agent: &str) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .pool_max_idle_per_host(16)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches raw bytes for a URL.
///
/// Implementations map a 404 to [`Error::NotFound`] and any other failure
/// status to [`Error::Http`]; callers rely on that mapping to tell "no such
/// gallery/tag" apart from transport trouble.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a GET request for `url` with the given extra headers.
    async fn fetch(&self, url: &str, headers: &HeaderMap) -> Result<Bytes>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn fetch(&self, url: &str, headers: &HeaderMap) -> Result<Bytes> {
        (**self).fetch(url, headers).await
    }
}

/// reqwest-backed [`Transport`].
///
/// There is no rate limiting and no retry: a failed request surfaces its
/// error to the caller immediately.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    headers: HeaderMap,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a client that shares the global connection pool.
    pub fn new() -> Self {
        Self {
            client: CLIENT.clone(),
            headers: HeaderMap::new(),
        }
    }

    /// Replaces the request timeout, in seconds.
    ///
    /// This builds a dedicated connection pool; the default user agent is kept.
    pub fn with_timeout(self, secs: u64) -> Self {
        self.rebuild(Duration::from_secs(secs), USER_AGENT)
    }

    /// Replaces the User-Agent header, keeping the default 30-second timeout.
    pub fn with_user_agent(self, user_agent: &str) -> Self {
        self.rebuild(Duration::from_secs(30), user_agent)
    }

    fn rebuild(mut self, timeout: Duration, user_agent: &str) -> Self {
        match build_client(timeout, user_agent) {
            Ok(client) => self.client = client,
            Err(e) => debug!(error = %e, "keeping shared client"),
        }
        self
    }

    /// Adds a header sent with every request made by this client.
    ///
    /// Invalid header names or values are ignored.
    ///
    /// ```rust
    /// use hitomi::net::HttpClient;
    ///
    /// let client = HttpClient::new().with_header("Accept-Language", "ja");
    /// ```
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            name.parse::<HeaderName>(),
            value.parse::<HeaderValue>(),
        ) {
            self.headers.insert(name, value);
        }
        self
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn fetch(&self, url: &str, headers: &HeaderMap) -> Result<Bytes> {
        let quoted = quote_url(url);
        let parsed = url::Url::parse(&quoted)
            .map_err(|e| Error::Other(format!("invalid URL {}: {}", quoted, e)))?;

        let mut request_headers = self.headers.clone();
        request_headers.extend(headers.clone());

        debug!(url = %parsed, "GET");
        let response = self
            .client
            .get(parsed)
            .headers(request_headers)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.bytes().await?),
            StatusCode::NOT_FOUND => Err(Error::not_found(url)),
            status => Err(Error::http(status.as_u16(), url)),
        }
    }
}

/// Percent-encodes a URL, leaving `:` and `/` as well as unreserved
/// characters literal.
///
/// ```rust
/// use hitomi::net::quote_url;
///
/// assert_eq!(
///     quote_url("https://ltn.hitomi.la/tag/female:big breasts-all.nozomi"),
///     "https://ltn.hitomi.la/tag/female:big%20breasts-all.nozomi"
/// );
/// ```
pub fn quote_url(url: &str) -> String {
    url.split('/')
        .map(|segment| {
            segment
                .split(':')
                .map(|part| urlencoding::encode(part).into_owned())
                .collect::<Vec<_>>()
                .join(":")
        })
        .collect::<Vec<_>>()
        .join("/")
}
