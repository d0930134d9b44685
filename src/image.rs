//! Image URL resolution.
//!
//! Images are spread over a handful of `*b.hitomi.la` frontends. The frontend
//! is picked from two hex digits of the content hash, so the URL of an image
//! depends only on `(galleryid, hash, name)`.
//!
//! ```rust
//! use hitomi::image::resolve_image;
//!
//! let (url, filename) = resolve_image(1, "4ac9f3e2b15c1", "001.webp").unwrap();
//! assert_eq!(url, "https://cb.hitomi.la/images/1/5c/4ac9f3e2b15c1.webp");
//! assert_eq!(filename, "001.webp");
//! ```

use crate::error::{Error, Result};
use crate::types::GalleryId;

/// Below this value the site serves from two frontends instead of three.
const THREE_FRONTEND_THRESHOLD: u8 = 0x30;

/// Values below this are pinned to frontend number 1 by the site.
const LEGACY_PIN_THRESHOLD: u8 = 0x09;

/// Resolves the download URL and local file name of one image.
///
/// # Errors
///
/// * [`Error::InvalidHash`] - If the two characters before the last one in
///   `hash` are not hexadecimal digits, or the hash is too short to have them
pub fn resolve_image(galleryid: GalleryId, hash: &str, name: &str) -> Result<(String, String)> {
    let chars: Vec<char> = hash.chars().collect();
    if chars.len() < 3 {
        return Err(Error::invalid_hash(format!(
            "gallery {}: hash too short: {:?}",
            galleryid, hash
        )));
    }
    let hash_a = chars[chars.len() - 1];
    let hash_b: String = chars[chars.len() - 3..chars.len() - 1].iter().collect();

    if !hash_b.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::invalid_hash(format!(
            "gallery {}: {:?} in {:?} is not a hex number",
            galleryid, hash_b, hash
        )));
    }
    let hash_num = u8::from_str_radix(&hash_b, 16)
        .map_err(|e| Error::invalid_hash(format!("gallery {}: {:?}: {}", galleryid, hash_b, e)))?;

    let frontend = subdomain(hash_num);
    let ext = name.find('.').map(|pos| &name[pos..]).unwrap_or("");

    let url = format!(
        "https://{}.hitomi.la/images/{}/{}/{}{}",
        frontend, hash_a, hash_b, hash, ext
    );
    Ok((url, name.to_string()))
}

/// Frontend subdomain for the shard number taken from a hash.
fn subdomain(hash_num: u8) -> String {
    let frontends = if hash_num < THREE_FRONTEND_THRESHOLD { 2 } else { 3 };
    let hash_num = if hash_num < LEGACY_PIN_THRESHOLD { 1 } else { hash_num };

    let letter = char::from(b'a' + hash_num % frontends);
    format!("{}b", letter)
}

/// `Referer` the image frontends require for a gallery's images.
pub fn referer(galleryid: GalleryId) -> String {
    format!("https://hitomi.la/reader/{}.html", galleryid)
}
