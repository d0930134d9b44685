//! Parsing of JavaScript-assignment-wrapped JSON.
//!
//! The gallery endpoint serves a script rather than plain JSON:
//!
//! ```text
//! var galleryinfo = {"id":"123","title":"...","files":[...]};
//! ```
//!
//! [`strip_assignment`] cuts the prefix through the first `=`, and
//! [`parse_assignment`] deserializes what is left.
//!
//! # Examples
//!
//! ```rust
//! use hitomi::net::json;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Info {
//!     title: String,
//! }
//!
//! let info: Info = json::parse_assignment(r#"var galleryinfo = {"title":"Hello"};"#).unwrap();
//! assert_eq!(info.title, "Hello");
//! ```

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Returns the right-hand side of the first `=` in `script`, without the
/// trailing `;` and surrounding whitespace.
///
/// # Errors
///
/// * [`Error::InvalidResponse`] - If `script` contains no `=`
///
/// ```rust
/// use hitomi::net::json::strip_assignment;
///
/// assert_eq!(strip_assignment("var x = [1, 2];\n").unwrap(), "[1, 2]");
/// assert!(strip_assignment("[1, 2]").is_err());
/// ```
pub fn strip_assignment(script: &str) -> Result<&str> {
    let pos = script
        .find('=')
        .ok_or_else(|| Error::invalid_response("no assignment marker '=' in script"))?;

    let value = script[pos + 1..].trim();
    Ok(value.strip_suffix(';').unwrap_or(value).trim_end())
}

/// Strips the assignment prefix and deserializes the JSON value.
///
/// # Errors
///
/// * [`Error::InvalidResponse`] - If there is no `=`, the JSON is invalid,
///   or a required field is missing
pub fn parse_assignment<T>(script: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let value = strip_assignment(script)?;
    serde_json::from_str(value).map_err(|e| Error::invalid_response(format!("bad JSON: {}", e)))
}
