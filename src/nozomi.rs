//! `.nozomi` id lists.
//!
//! Every tag, category value, and art type has a binary list of gallery ids at
//! `https://ltn.hitomi.la/{path}.nozomi`. The body is a packed array of
//! big-endian `u32`s.
//!
//! ```rust
//! use hitomi::nozomi::decode_ids;
//!
//! let ids = decode_ids(&[0, 0, 0, 1, 0, 0, 1, 0]).unwrap();
//! assert_eq!(ids, vec![1, 256]);
//! ```

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::debug;

use crate::error::{Error, Result};
use crate::net::Transport;
use crate::types::{GalleryId, SearchFilter, SortedIdList};

/// Host serving `.nozomi` lists and gallery metadata.
pub const LTN_BASE: &str = "https://ltn.hitomi.la";

const ID_WIDTH: usize = std::mem::size_of::<GalleryId>();

/// Full URL of the `.nozomi` resource at `path`.
pub fn nozomi_url(path: &str) -> String {
    format!("{}/{}.nozomi", LTN_BASE, path)
}

/// Decodes a `.nozomi` body into ids, in the order they were received.
///
/// # Errors
///
/// * [`Error::MalformedResponse`] - If the length is not a multiple of 4
pub fn decode_ids(body: &[u8]) -> Result<Vec<GalleryId>> {
    if body.len() % ID_WIDTH != 0 {
        return Err(Error::malformed(format!(
            "nozomi body of {} bytes is not a multiple of {}",
            body.len(),
            ID_WIDTH
        )));
    }

    Ok(body
        .chunks_exact(ID_WIDTH)
        .map(|chunk| GalleryId::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// Fetches the id list at `path` (e.g. `tag/female:glasses-all`).
///
/// # Errors
///
/// * [`Error::NotFound`] - If the list does not exist on the site
/// * [`Error::MalformedResponse`] - If the body is not a whole number of ids
/// * Transport errors from [`Transport::fetch`]
pub async fn fetch_ids<T>(transport: &T, path: &str) -> Result<SortedIdList>
where
    T: Transport + ?Sized,
{
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );

    let body = transport.fetch(&nozomi_url(path), &headers).await?;
    let ids = decode_ids(&body)?;
    debug!(path, count = ids.len(), "fetched nozomi list");

    Ok(SortedIdList::from_unsorted(ids))
}

/// Fetches the id list selected by `filter` for `language`.
pub async fn fetch_filter<T>(
    transport: &T,
    filter: &SearchFilter,
    language: &str,
) -> Result<SortedIdList>
where
    T: Transport + ?Sized,
{
    fetch_ids(transport, &filter.path(language)).await
}
