//! # hitomi - Search and parallel downloads for hitomi.la galleries
//!
//! `hitomi` resolves searches into gallery ids, fetches gallery metadata, and
//! downloads gallery images with a fixed pool of worker threads.
//!
//! ## Features
//!
//! - **Id-list search**: tags, artist/series/character, art type, and language
//!   are each one binary `.nozomi` list; a search is their intersection
//! - **Fast intersection**: the shortest list drives, the others are probed
//!   with windowed binary search
//! - **Parallel downloads**: worker threads claim images from a shared cursor,
//!   so each image is fetched exactly once
//! - **Pluggable transport**: everything goes through the [`Transport`] trait,
//!   with a reqwest client as the default
//!
//! ## Quick Start
//!
//! ### Searching
//!
//! ```rust,no_run
//! use hitomi::prelude::*;
//! use hitomi::error::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Hitomi::new();
//!
//!     let ids = client
//!         .query()
//!         .series("touhou project")
//!         .tag("female:maid")
//!         .language("japanese")
//!         .execute()
//!         .await?;
//!
//!     println!("Found {} galleries", ids.len());
//!     Ok(())
//! }
//! ```
//!
//! ### Downloading
//!
//! ```rust,no_run
//! use hitomi::prelude::*;
//! use hitomi::error::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Hitomi::new();
//!     let options = DownloadOptionsBuilder::default()
//!         .savedir("./downloads")
//!         .threads(8usize)
//!         .build()
//!         .unwrap();
//!
//!     let report = client.download_id(1_234_567, &options).await?;
//!     println!("Saved {} images to {}", report.saved.len(), report.dir.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`client`]: the [`Hitomi`] client tying the pieces together
//! - [`search`]: search planning and the fluent [`SearchBuilder`]
//! - [`intersect`](mod@intersect): sorted id list intersection
//! - [`nozomi`]: fetching and decoding `.nozomi` id lists
//! - [`gallery`]: gallery metadata
//! - [`image`]: image URL resolution
//! - [`download`]: the parallel downloader
//! - [`net`]: the [`Transport`] trait and HTTP client
//! - [`types`]: data types and builders
//! - [`error`]: error handling

pub mod client;
pub mod download;
pub mod error;
pub mod gallery;
pub mod image;
pub mod intersect;
pub mod net;
pub mod nozomi;
pub mod search;
pub mod types;

/// Prelude module for convenient imports.
///
/// ```rust
/// use hitomi::prelude::*;
///
/// // Hitomi, Transport, HttpClient, SearchBuilder, SearchParams(Builder),
/// // DownloadOptions(Builder), Gallery, Image, ArtType, Category, ...
/// ```
pub mod prelude {
    pub use crate::{
        client::Hitomi,
        download::{DownloadReport, sanitize_filename},
        intersect::intersect,
        net::{HttpClient, Transport},
        search::SearchBuilder,
        types::{
            ArtType, Category, DownloadOptions, DownloadOptionsBuilder, Gallery, GalleryId, Image,
            SearchFilter, SearchParams, SearchParamsBuilder, SortedIdList,
        },
    };
}

// Re-export main types at crate root for direct access
pub use client::Hitomi;
pub use error::{Error, Result};
pub use intersect::intersect;
pub use net::{HttpClient, Transport};
pub use search::SearchBuilder;
pub use types::{
    ArtType, Category, DownloadOptions, Gallery, GalleryId, Image, SearchFilter, SearchParams,
    SortedIdList,
};
