//! The [`Hitomi`] client: one transport, every operation.
//!
//! # Examples
//!
//! ```rust,no_run
//! use hitomi::prelude::*;
//! use hitomi::error::Result;
//!
//! # async fn example() -> Result<()> {
//! let client = Hitomi::new();
//!
//! let ids = client.query().artist("foo").execute().await?;
//! if let Some(&id) = ids.as_slice().first() {
//!     let gallery = client.gallery(id).await?;
//!     let report = client.download(&gallery, &DownloadOptions::default()).await?;
//!     println!("{} images in {}", report.saved.len(), report.dir.display());
//! }
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    download::{self, DownloadReport},
    error::Result,
    gallery,
    net::{HttpClient, Transport},
    search::{self, SearchBuilder},
    types::{DownloadOptions, Gallery, GalleryId, SearchParams, SortedIdList},
};

/// Client for search, gallery metadata, and downloads.
///
/// Generic over the [`Transport`] so it can run against a stub; the default
/// is the reqwest-backed [`HttpClient`]. Cloning is cheap.
pub struct Hitomi<T: Transport + ?Sized = HttpClient> {
    transport: Arc<T>,
}

impl<T: Transport + ?Sized> Clone for Hitomi<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl Hitomi<HttpClient> {
    /// Creates a client over the shared default [`HttpClient`].
    pub fn new() -> Self {
        Self::with_transport(HttpClient::new())
    }
}

impl Default for Hitomi<HttpClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> Hitomi<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }
}

impl<T: Transport + ?Sized + 'static> Hitomi<T> {
    /// Creates a client over an already shared transport.
    pub fn from_arc(transport: Arc<T>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Starts a fluent search.
    pub fn query(&self) -> SearchBuilder<'_, T> {
        SearchBuilder::new(self.transport.as_ref())
    }

    /// Runs a search described by `params`.
    pub async fn search(&self, params: &SearchParams) -> Result<SortedIdList> {
        search::search(self.transport.as_ref(), params).await
    }

    /// Fetches the metadata of one gallery.
    pub async fn gallery(&self, galleryid: GalleryId) -> Result<Gallery> {
        gallery::resolve(self.transport.as_ref(), galleryid).await
    }

    /// Downloads all images of `gallery` as configured by `options`.
    pub async fn download(
        &self,
        gallery: &Gallery,
        options: &DownloadOptions,
    ) -> Result<DownloadReport> {
        download::download(
            Arc::clone(&self.transport),
            gallery,
            &options.savedir,
            options.threads,
        )
        .await
    }

    /// Downloads all images of `gallery`, sending each saved path to
    /// `progress` as soon as it is written.
    pub async fn download_with_progress(
        &self,
        gallery: &Gallery,
        options: &DownloadOptions,
        progress: UnboundedSender<PathBuf>,
    ) -> Result<DownloadReport> {
        download::download_with_progress(
            Arc::clone(&self.transport),
            gallery,
            &options.savedir,
            options.threads,
            Some(progress),
        )
        .await
    }

    /// Resolves and downloads a gallery in one step.
    pub async fn download_id(
        &self,
        galleryid: GalleryId,
        options: &DownloadOptions,
    ) -> Result<DownloadReport> {
        let gallery = self.gallery(galleryid).await?;
        self.download(&gallery, options).await
    }
}
