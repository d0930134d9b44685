//! Gallery metadata from `galleries/{id}.js`.

use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    error::{Error, Result},
    net::{Transport, json},
    nozomi::LTN_BASE,
    types::{Gallery, GalleryId, Image},
};

/// galleryinfo document
#[derive(Debug, Deserialize)]
struct GalleryInfo {
    title: String,
    japanese_title: Option<String>,
    language: String,
    #[serde(rename = "type")]
    art_type: String,
    #[serde(default)]
    tags: Option<Vec<GalleryTag>>,
    files: Vec<GalleryFile>,
}

/// galleryinfo tag entry
#[derive(Debug, Deserialize)]
struct GalleryTag {
    tag: String,
    #[serde(default)]
    male: Option<Value>,
    #[serde(default)]
    female: Option<Value>,
}

impl GalleryTag {
    fn into_name(self) -> String {
        if is_flag_set(self.male.as_ref()) {
            format!("male:{}", self.tag)
        } else if is_flag_set(self.female.as_ref()) {
            format!("female:{}", self.tag)
        } else {
            self.tag
        }
    }
}

/// galleryinfo file entry
#[derive(Debug, Deserialize)]
struct GalleryFile {
    name: String,
    hash: String,
}

/// The site writes these flags as `"1"`, `1`, or `""` depending on the gallery.
fn is_flag_set(flag: Option<&Value>) -> bool {
    match flag {
        Some(Value::String(s)) => s == "1",
        Some(Value::Number(n)) => n.as_u64() == Some(1),
        Some(Value::Bool(b)) => *b,
        _ => false,
    }
}

/// URL of the metadata script of a gallery.
pub fn gallery_url(galleryid: GalleryId) -> String {
    format!("{}/galleries/{}.js", LTN_BASE, galleryid)
}

/// Fetches and parses the metadata of one gallery.
///
/// # Errors
///
/// * [`Error::NotFound`] - If the gallery does not exist (likely a wrong id)
/// * [`Error::InvalidResponse`] - If the script cannot be parsed
/// * [`Error::InvalidHash`] - If an image hash is unusable
pub async fn resolve<T>(transport: &T, galleryid: GalleryId) -> Result<Gallery>
where
    T: Transport + ?Sized,
{
    let body = transport
        .fetch(&gallery_url(galleryid), &HeaderMap::new())
        .await
        .map_err(|e| match e {
            Error::NotFound(_) => Error::not_found(format!(
                "gallery {} (likely an invalid gallery id)",
                galleryid
            )),
            other => other,
        })?;

    let script = std::str::from_utf8(&body)
        .map_err(|e| Error::invalid_response(format!("gallery {} is not UTF-8: {}", galleryid, e)))?;

    parse_gallery_info(galleryid, script)
}

/// Parses a `var galleryinfo = {...};` script into a [`Gallery`].
///
/// ```rust
/// use hitomi::gallery::parse_gallery_info;
///
/// let script = r#"var galleryinfo = {
///     "title": "Example", "japanese_title": null, "language": "english",
///     "type": "manga", "tags": [{"tag": "glasses", "female": "1"}],
///     "files": [{"name": "01.jpg", "hash": "0000000000000000000000000000000000000000000000000000000000000a1c"}]
/// };"#;
///
/// let gallery = parse_gallery_info(42, script).unwrap();
/// assert_eq!(gallery.tags, vec!["female:glasses".to_string()]);
/// assert_eq!(gallery.images[0].image_url.as_str(), "https://cb.hitomi.la/images/c/a1/0000000000000000000000000000000000000000000000000000000000000a1c.jpg");
/// ```
pub fn parse_gallery_info(galleryid: GalleryId, script: &str) -> Result<Gallery> {
    let info: GalleryInfo = json::parse_assignment(script)?;

    let tags = info
        .tags
        .unwrap_or_default()
        .into_iter()
        .map(GalleryTag::into_name)
        .collect();

    let images = info
        .files
        .into_iter()
        .map(|file| Image::new(galleryid, file.hash, file.name))
        .collect::<Result<Vec<_>>>()?;

    debug!(galleryid, images = images.len(), "parsed gallery info");

    Ok(Gallery {
        galleryid,
        title: info.title,
        japanese_title: info.japanese_title,
        language: info.language,
        art_type: info.art_type,
        tags,
        images,
    })
}
