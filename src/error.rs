//! Error types and result handling for hitomi operations.
//!
//! Every fallible operation in this crate returns [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`.
//!
//! # Error Categories
//!
//! - **Not Found**: the site answered 404 (unknown gallery, tag, or category value)
//! - **Malformed Response**: a `.nozomi` payload that is not a whole number of ids
//! - **Invalid Response**: gallery metadata that cannot be parsed
//! - **Invalid Hash**: an image hash whose shard digits are not hexadecimal
//! - **Invalid Query**: a search that cannot be planned
//! - **Transport**: HTTP status failures and connection errors
//! - **IO / Join**: wrapped errors from the standard library and tokio
//!
//! # Examples
//!
//! ```rust,no_run
//! use hitomi::prelude::*;
//! use hitomi::error::{Error, Result};
//!
//! # async fn example() -> Result<()> {
//! let client = Hitomi::new();
//! let params = SearchParamsBuilder::default()
//!     .tags(vec!["female:glasses".to_string()])
//!     .build()
//!     .unwrap();
//!
//! match client.search(&params).await {
//!     Ok(ids) => println!("Found {} galleries", ids.len()),
//!     Err(Error::NotFound(what)) => println!("no items found: {}", what),
//!     Err(e) => println!("search failed: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

/// Type alias for Results with hitomi errors.
///
/// ```rust
/// use hitomi::{Error, Result};
///
/// fn plan() -> Result<()> {
///     Err(Error::invalid_query("category given without a value"))
/// }
///
/// assert!(plan().is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all hitomi operations.
///
/// # Variants
///
/// * [`NotFound`](Error::NotFound) - The remote resource does not exist
/// * [`MalformedResponse`](Error::MalformedResponse) - Structurally invalid binary payload
/// * [`InvalidResponse`](Error::InvalidResponse) - Unparseable gallery metadata
/// * [`InvalidHash`](Error::InvalidHash) - Non-hex shard digits in an image hash
/// * [`InvalidQuery`](Error::InvalidQuery) - A search request that cannot be planned
/// * [`Http`](Error::Http) - Any non-404 HTTP failure status
/// * [`Network`](Error::Network) - Connection and transport errors
/// * [`Io`](Error::Io) - File system errors
/// * [`Join`](Error::Join) - A download worker panicked or was cancelled
/// * [`Other`](Error::Other) - Generic error messages
#[derive(Error, Debug)]
pub enum Error {
    /// The site answered 404.
    ///
    /// Raised for unknown gallery ids and for tag, category, or art type
    /// combinations that have no `.nozomi` list. Callers of a search usually
    /// present this as "no items found".
    #[error("Not found: {0}")]
    NotFound(String),

    /// A binary payload that does not have the expected shape.
    ///
    /// `.nozomi` bodies are packed big-endian `u32` values, so any body whose
    /// length is not a multiple of four ends up here.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Gallery metadata that cannot be understood.
    ///
    /// Covers a missing `=` assignment marker, invalid JSON, and JSON that
    /// lacks one of the required fields.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// An image hash whose two shard digits are not hexadecimal.
    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    /// A search request that cannot be executed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hitomi::{Error, intersect};
    ///
    /// let err = intersect(Vec::new()).unwrap_err();
    /// assert!(matches!(err, Error::InvalidQuery(_)));
    /// ```
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A non-success, non-404 HTTP status.
    #[error("HTTP {status} for {url}")]
    Http { status: u16, url: String },

    /// Network-related errors from the HTTP client (reqwest).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// File system errors while creating directories or writing images.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A download worker that could not be joined.
    #[error("Join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Generic error messages.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates a not found error describing the missing resource.
    ///
    /// ```rust
    /// use hitomi::Error;
    ///
    /// let error = Error::not_found("gallery 123");
    /// assert_eq!(error.to_string(), "Not found: gallery 123");
    /// ```
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Creates a malformed response error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedResponse(msg.into())
    }

    /// Creates an invalid response error.
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Error::InvalidResponse(msg.into())
    }

    /// Creates an invalid hash error.
    pub fn invalid_hash(msg: impl Into<String>) -> Self {
        Error::InvalidHash(msg.into())
    }

    /// Creates an invalid query error.
    ///
    /// ```rust
    /// use hitomi::Error;
    ///
    /// let error = Error::invalid_query("empty category value");
    /// assert!(matches!(error, Error::InvalidQuery(_)));
    /// ```
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Error::InvalidQuery(msg.into())
    }

    /// Creates an HTTP status error for the given request URL.
    pub fn http(status: u16, url: impl Into<String>) -> Self {
        Error::Http {
            status,
            url: url.into(),
        }
    }

    /// Returns `true` for [`Error::NotFound`].
    ///
    /// The search command uses this to decide whether to print
    /// "no items found." instead of the raw error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
