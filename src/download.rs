//! Parallel gallery downloads.
//!
//! A download creates a fresh directory named after the gallery and starts a
//! fixed number of worker threads. Workers share one [`DownloadQueue`]: the
//! gallery's images plus a cursor behind a mutex. Claiming an image reads the
//! cursor and advances it in one critical section, so every image is fetched
//! by exactly one worker; the network fetch and the file write happen outside
//! the lock.
//!
//! There is no retry. A worker whose fetch or write fails stops, and its error
//! is recorded in the [`DownloadReport`]; the other workers keep draining the
//! queue. The image that failed is not handed to anyone else.
//!
//! Downloads never resume: running the same gallery again creates a new
//! `title_` directory and fetches every image again.

use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::net::Transport;
use crate::types::{Gallery, Image};

/// Images of one gallery with the shared claim cursor.
///
/// ```rust
/// use hitomi::download::DownloadQueue;
/// use hitomi::Image;
///
/// let images = vec![
///     Image::new(1, "aaa0a1", "1.jpg").unwrap(),
///     Image::new(1, "aaa0b2", "2.jpg").unwrap(),
/// ];
/// let queue = DownloadQueue::new(images);
///
/// assert_eq!(queue.claim().map(|(i, image)| (i, image.name.clone())), Some((0, "1.jpg".to_string())));
/// assert_eq!(queue.claim().map(|(i, _)| i), Some(1));
/// assert!(queue.claim().is_none());
/// assert_eq!(queue.claimed(), 2);
/// ```
#[derive(Debug)]
pub struct DownloadQueue {
    images: Vec<Image>,
    cursor: Mutex<usize>,
}

impl DownloadQueue {
    pub fn new(images: Vec<Image>) -> Self {
        Self {
            images,
            cursor: Mutex::new(0),
        }
    }

    /// Claims the next unclaimed image, or `None` once all are taken.
    pub fn claim(&self) -> Option<(usize, &Image)> {
        let mut cursor = self.cursor.lock();
        if *cursor >= self.images.len() {
            return None;
        }
        let index = *cursor;
        *cursor += 1;
        Some((index, &self.images[index]))
    }

    /// Number of images claimed so far.
    pub fn claimed(&self) -> usize {
        *self.cursor.lock()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// One worker that stopped early.
#[derive(Debug)]
pub struct DownloadFailure {
    /// Image being fetched when the worker failed; `None` if the worker
    /// thread itself could not be joined
    pub name: Option<String>,
    pub error: Error,
}

/// Outcome of a gallery download.
#[derive(Debug)]
pub struct DownloadReport {
    /// Directory the images were written to
    pub dir: PathBuf,

    /// Paths written, grouped by worker
    pub saved: Vec<PathBuf>,

    /// Workers that stopped on an error
    pub failures: Vec<DownloadFailure>,
}

impl DownloadReport {
    /// `true` if no worker failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Downloads every image of `gallery` into a new directory under `savedir`.
///
/// Spawns exactly `threads` worker threads (at least one) and returns once
/// all of them have finished.
///
/// # Errors
///
/// * [`Error::Io`] - If the save directory cannot be created
///
/// Per-image failures do not fail the call; they are listed in
/// [`DownloadReport::failures`].
pub async fn download<T>(
    transport: Arc<T>,
    gallery: &Gallery,
    savedir: &Path,
    threads: usize,
) -> Result<DownloadReport>
where
    T: Transport + ?Sized + 'static,
{
    download_with_progress(transport, gallery, savedir, threads, None).await
}

/// Like [`download`], additionally sending each saved path to `progress` as
/// soon as its image is written.
///
/// The channel closes when the last worker finishes. A dropped receiver is
/// ignored.
///
/// ```rust,no_run
/// use hitomi::download::download_with_progress;
/// use hitomi::prelude::*;
/// use std::sync::Arc;
/// use tokio::sync::mpsc;
///
/// # async fn example(gallery: Gallery) -> hitomi::Result<()> {
/// let (tx, mut rx) = mpsc::unbounded_channel::<std::path::PathBuf>();
/// let printer = async {
///     while let Some(path) = rx.recv().await {
///         println!("{}", path.display());
///     }
/// };
///
/// let transport = Arc::new(HttpClient::new());
/// let (report, ()) = tokio::join!(
///     download_with_progress(transport, &gallery, "downloads".as_ref(), 8, Some(tx)),
///     printer,
/// );
/// report?;
/// # Ok(())
/// # }
/// ```
pub async fn download_with_progress<T>(
    transport: Arc<T>,
    gallery: &Gallery,
    savedir: &Path,
    threads: usize,
    progress: Option<UnboundedSender<PathBuf>>,
) -> Result<DownloadReport>
where
    T: Transport + ?Sized + 'static,
{
    let dir = create_save_dir(savedir, &gallery.display_title()).await?;
    let threads = threads.max(1);
    info!(
        galleryid = gallery.galleryid,
        dir = %dir.display(),
        images = gallery.images.len(),
        threads,
        "downloading gallery"
    );

    let queue = Arc::new(DownloadQueue::new(gallery.images.clone()));
    let handle = Handle::current();

    let workers: Vec<_> = (0..threads)
        .map(|worker| {
            let transport = Arc::clone(&transport);
            let queue = Arc::clone(&queue);
            let handle = handle.clone();
            let dir = dir.clone();
            let progress = progress.clone();
            tokio::task::spawn_blocking(move || {
                run_worker(worker, &handle, transport.as_ref(), &queue, &dir, progress.as_ref())
            })
        })
        .collect();
    drop(progress);

    let mut report = DownloadReport {
        dir,
        saved: Vec::new(),
        failures: Vec::new(),
    };

    for worker in workers {
        match worker.await {
            Ok(outcome) => {
                report.saved.extend(outcome.saved);
                report.failures.extend(outcome.failure);
            }
            Err(e) => report.failures.push(DownloadFailure {
                name: None,
                error: e.into(),
            }),
        }
    }

    Ok(report)
}

struct WorkerOutcome {
    saved: Vec<PathBuf>,
    failure: Option<DownloadFailure>,
}

fn run_worker<T>(
    worker: usize,
    handle: &Handle,
    transport: &T,
    queue: &DownloadQueue,
    dir: &Path,
    progress: Option<&UnboundedSender<PathBuf>>,
) -> WorkerOutcome
where
    T: Transport + ?Sized,
{
    let mut saved = Vec::new();

    while let Some((index, image)) = queue.claim() {
        match save_image(handle, transport, image, dir) {
            Ok(path) => {
                info!(worker, index, path = %path.display(), "saved");
                if let Some(progress) = progress {
                    let _ = progress.send(path.clone());
                }
                saved.push(path);
            }
            Err(error) => {
                warn!(worker, index, name = %image.name, %error, "worker stopped");
                return WorkerOutcome {
                    saved,
                    failure: Some(DownloadFailure {
                        name: Some(image.name.clone()),
                        error,
                    }),
                };
            }
        }
    }

    WorkerOutcome {
        saved,
        failure: None,
    }
}

fn save_image<T>(handle: &Handle, transport: &T, image: &Image, dir: &Path) -> Result<PathBuf>
where
    T: Transport + ?Sized,
{
    let mut headers = HeaderMap::new();
    let referer = HeaderValue::from_str(&image.referer())
        .map_err(|e| Error::Other(format!("invalid referer: {}", e)))?;
    headers.insert(REFERER, referer);

    let bytes = handle.block_on(transport.fetch(&image.image_url, &headers))?;

    let path = dir.join(sanitize_filename(&image.name));
    std::fs::write(&path, &bytes)?;
    Ok(path)
}

/// Creates `savedir/<title>`, appending `_` until the name is unused.
///
/// An existing directory is never reused, so earlier downloads are left
/// untouched.
pub async fn create_save_dir(savedir: &Path, title: &str) -> Result<PathBuf> {
    tokio::fs::create_dir_all(savedir).await?;

    let mut dir = savedir.join(sanitize_filename(title));
    loop {
        match tokio::fs::create_dir(&dir).await {
            Ok(()) => return Ok(dir),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let mut name = dir.into_os_string();
                name.push("_");
                dir = PathBuf::from(name);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Longest sanitized name, in UTF-8 bytes.
///
/// File systems cap a name at 255 bytes; the rest is headroom for the `_`
/// suffixes added by [`create_save_dir`].
const MAX_NAME_BYTES: usize = 200;

/// Sanitizes a filename by replacing invalid characters.
///
/// Path separators and characters rejected by common filesystems become `_`;
/// the result is trimmed and cut to at most 200 bytes on a `char` boundary.
///
/// ```rust
/// use hitomi::download::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Fate/Grand Order: Memo"), "Fate_Grand Order_ Memo");
/// assert_eq!(sanitize_filename("   "), "untitled");
/// assert_eq!(sanitize_filename(&"東".repeat(100)).len(), 198);
/// ```
pub fn sanitize_filename(name: &str) -> String {
    const INVALID: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

    let mut sanitized = String::with_capacity(name.len().min(MAX_NAME_BYTES));
    for c in name.trim().chars() {
        let c = if INVALID.contains(&c) || c.is_control() { '_' } else { c };
        if sanitized.len() + c.len_utf8() > MAX_NAME_BYTES {
            break;
        }
        sanitized.push(c);
    }

    match sanitized.as_str() {
        "" | "." | ".." => "untitled".to_string(),
        _ => sanitized,
    }
}
