//! Core data types for galleries, images, search filters, and options.
//!
//! - [`SortedIdList`] - Ascending, duplicate-free gallery ids from a `.nozomi` list
//! - [`Category`] / [`ArtType`] / [`SearchFilter`] - The search dimensions
//! - [`SearchParams`] - A complete search request
//! - [`Gallery`] / [`Image`] - Resolved gallery metadata
//! - [`DownloadOptions`] - Where and how wide to download
//!
//! # Examples
//!
//! ```rust
//! use hitomi::types::{ArtType, SearchParamsBuilder};
//!
//! let params = SearchParamsBuilder::default()
//!     .artist("foo")
//!     .art_type(ArtType::Doujinshi)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(params.tags, vec!["index".to_string()]);
//! assert_eq!(params.language, "all");
//! ```

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::image;

/// Numeric identifier of a gallery.
pub type GalleryId = u32;

/// Default tag used when a search names no tags: the site-wide index.
pub const INDEX_TAG: &str = "index";

/// Default search language.
pub const ALL_LANGUAGES: &str = "all";

/// An ascending, duplicate-free list of gallery ids.
///
/// Every list handed to [`intersect`](crate::intersect) is one of these, so
/// binary search over it is always valid. Construction normalises whatever
/// order the site served.
///
/// ```rust
/// use hitomi::SortedIdList;
///
/// let ids = SortedIdList::from_unsorted(vec![9, 3, 5, 3]);
/// assert_eq!(ids.as_slice(), &[3, 5, 9]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SortedIdList(Vec<GalleryId>);

impl SortedIdList {
    /// Builds a list from ids in any order, sorting and removing duplicates.
    pub fn from_unsorted(mut ids: Vec<GalleryId>) -> Self {
        if !ids.is_sorted() {
            ids.sort_unstable();
        }
        ids.dedup();
        Self(ids)
    }

    pub fn as_slice(&self) -> &[GalleryId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: GalleryId) -> bool {
        self.0.binary_search(&id).is_ok()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GalleryId> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<GalleryId> {
        self.0
    }

    /// Wraps ids that the caller already knows are ascending and unique.
    pub(crate) fn from_sorted_unchecked(ids: Vec<GalleryId>) -> Self {
        debug_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        Self(ids)
    }
}

impl From<Vec<GalleryId>> for SortedIdList {
    fn from(ids: Vec<GalleryId>) -> Self {
        Self::from_unsorted(ids)
    }
}

impl IntoIterator for SortedIdList {
    type Item = GalleryId;
    type IntoIter = std::vec::IntoIter<GalleryId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SortedIdList {
    type Item = &'a GalleryId;
    type IntoIter = std::slice::Iter<'a, GalleryId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Category dimensions a search can be narrowed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Artist,
    Series,
    Character,
}

impl Category {
    /// Wire name used in `.nozomi` paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Artist => "artist",
            Category::Series => "series",
            Category::Character => "character",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "artist" => Ok(Category::Artist),
            "series" => Ok(Category::Series),
            "character" => Ok(Category::Character),
            other => Err(Error::invalid_query(format!("unknown category: {}", other))),
        }
    }
}

/// Kind of work a gallery holds.
///
/// ```rust
/// use hitomi::ArtType;
///
/// let kind: ArtType = "gamecg".parse().unwrap();
/// assert_eq!(kind, ArtType::GameCg);
/// assert_eq!(kind.as_str(), "gamecg");
/// assert!("novel".parse::<ArtType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ArtType {
    #[cfg_attr(feature = "cli", value(name = "doujinshi"))]
    Doujinshi,
    #[cfg_attr(feature = "cli", value(name = "artistcg"))]
    ArtistCg,
    #[cfg_attr(feature = "cli", value(name = "gamecg"))]
    GameCg,
    #[cfg_attr(feature = "cli", value(name = "manga"))]
    Manga,
}

impl ArtType {
    /// Wire name used in `type/{name}-{lang}.nozomi` paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtType::Doujinshi => "doujinshi",
            ArtType::ArtistCg => "artistcg",
            ArtType::GameCg => "gamecg",
            ArtType::Manga => "manga",
        }
    }
}

impl fmt::Display for ArtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "doujinshi" => Ok(ArtType::Doujinshi),
            "artistcg" => Ok(ArtType::ArtistCg),
            "gamecg" => Ok(ArtType::GameCg),
            "manga" => Ok(ArtType::Manga),
            other => Err(Error::invalid_query(format!("invalid worktype: {}", other))),
        }
    }
}

/// One dimension of a search, turned into a single `.nozomi` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
    /// A tag; [`INDEX_TAG`] selects every gallery.
    Tag(String),
    Category(Category, String),
    ArtType(ArtType),
}

impl SearchFilter {
    /// Resource path of this filter for `language`, without the `.nozomi` suffix.
    ///
    /// ```rust
    /// use hitomi::{ArtType, Category, SearchFilter};
    ///
    /// assert_eq!(SearchFilter::Tag("index".into()).path("all"), "index-all");
    /// assert_eq!(SearchFilter::Tag("female:glasses".into()).path("all"), "tag/female:glasses-all");
    /// assert_eq!(
    ///     SearchFilter::Category(Category::Artist, "foo".into()).path("english"),
    ///     "artist/foo-english"
    /// );
    /// assert_eq!(SearchFilter::ArtType(ArtType::Manga).path("all"), "type/manga-all");
    /// ```
    pub fn path(&self, language: &str) -> String {
        match self {
            SearchFilter::Tag(tag) if tag == INDEX_TAG => format!("{}-{}", tag, language),
            SearchFilter::Tag(tag) => format!("tag/{}-{}", tag, language),
            SearchFilter::Category(category, value) => {
                format!("{}/{}-{}", category.as_str(), value, language)
            }
            SearchFilter::ArtType(art_type) => format!("type/{}-{}", art_type.as_str(), language),
        }
    }
}

/// A complete search request.
///
/// When none of `artist`, `series`, and `character` is set the search runs
/// over the tags (and art type) alone; otherwise every given category is
/// searched with the same tags and the results are intersected.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct SearchParams {
    #[builder(default, setter(into, strip_option))]
    pub artist: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub series: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub character: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub art_type: Option<ArtType>,
    #[builder(default = "vec![INDEX_TAG.to_string()]")]
    pub tags: Vec<String>,
    #[builder(default = "ALL_LANGUAGES.to_string()")]
    pub language: String,
}

impl SearchParams {
    /// The category constraints present in this request, in
    /// artist, series, character order.
    pub fn categories(&self) -> Vec<(Category, &str)> {
        [
            (Category::Artist, self.artist.as_deref()),
            (Category::Series, self.series.as_deref()),
            (Category::Character, self.character.as_deref()),
        ]
        .into_iter()
        .filter_map(|(category, value)| value.map(|v| (category, v)))
        .collect()
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            artist: None,
            series: None,
            character: None,
            art_type: None,
            tags: vec![INDEX_TAG.to_string()],
            language: ALL_LANGUAGES.to_string(),
        }
    }
}

/// One image of a gallery with its resolved download URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    /// File name on the site, reused as the local file name
    pub name: String,

    /// Content hash (hex)
    pub hash: String,

    /// Fully resolved download URL
    pub image_url: String,

    /// Gallery this image belongs to
    pub galleryid: GalleryId,
}

impl Image {
    /// Builds an image record, resolving its download URL.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidHash`] - If the hash's shard digits are not hexadecimal
    pub fn new(galleryid: GalleryId, hash: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let hash = hash.into();
        let name = name.into();
        let (image_url, _) = image::resolve_image(galleryid, &hash, &name)?;
        Ok(Self {
            name,
            hash,
            image_url,
            galleryid,
        })
    }

    /// Value of the `Referer` header the image server expects.
    pub fn referer(&self) -> String {
        image::referer(self.galleryid)
    }
}

/// A gallery with its metadata and ordered images.
#[derive(Debug, Clone, Serialize)]
pub struct Gallery {
    pub galleryid: GalleryId,

    pub title: String,

    pub japanese_title: Option<String>,

    pub language: String,

    /// Wire `type` of the gallery, e.g. `doujinshi`
    pub art_type: String,

    /// Tags, prefixed with `male:` or `female:` where the site flags them
    pub tags: Vec<String>,

    /// Images in reading order
    pub images: Vec<Image>,
}

impl Gallery {
    /// Title used for the save directory.
    ///
    /// The Japanese title is preferred; a gallery without any usable title
    /// falls back to `unknown {galleryid}`.
    ///
    /// ```rust
    /// use hitomi::Gallery;
    ///
    /// let mut gallery = Gallery {
    ///     galleryid: 7,
    ///     title: "Title".into(),
    ///     japanese_title: Some("タイトル".into()),
    ///     language: "japanese".into(),
    ///     art_type: "manga".into(),
    ///     tags: vec![],
    ///     images: vec![],
    /// };
    /// assert_eq!(gallery.display_title(), "タイトル");
    ///
    /// gallery.japanese_title = None;
    /// assert_eq!(gallery.display_title(), "Title");
    ///
    /// gallery.title.clear();
    /// assert_eq!(gallery.display_title(), "unknown 7");
    /// ```
    pub fn display_title(&self) -> String {
        self.japanese_title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| Some(self.title.as_str()).filter(|t| !t.trim().is_empty()))
            .map(str::to_string)
            .unwrap_or_else(|| format!("unknown {}", self.galleryid))
    }
}

/// Options for a gallery download.
///
/// ```rust
/// use hitomi::types::DownloadOptionsBuilder;
///
/// let options = DownloadOptionsBuilder::default().threads(4usize).build().unwrap();
/// assert_eq!(options.threads, 4);
/// assert_eq!(options.savedir, std::path::PathBuf::from("hitomi_downloads"));
/// ```
#[derive(Debug, Clone, Builder, Deserialize)]
#[builder(setter(into))]
pub struct DownloadOptions {
    /// Parent directory of the per-gallery directories
    #[builder(default = "PathBuf::from(DEFAULT_SAVEDIR)")]
    pub savedir: PathBuf,

    /// Number of download worker threads
    #[builder(default = "DEFAULT_THREADS")]
    pub threads: usize,
}

/// Default parent directory for downloads.
pub const DEFAULT_SAVEDIR: &str = "hitomi_downloads";

/// Default number of download workers.
pub const DEFAULT_THREADS: usize = 16;

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            savedir: PathBuf::from(DEFAULT_SAVEDIR),
            threads: DEFAULT_THREADS,
        }
    }
}
