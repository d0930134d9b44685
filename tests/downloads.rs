//! Download tests
//!
//! Covers the claim cursor, save directory naming, and whole gallery
//! downloads against the stub transport.

use hitomi::download::{DownloadQueue, create_save_dir};
use hitomi::prelude::*;
use reqwest::header::REFERER;
use std::collections::HashSet;
use std::sync::Arc;

mod common;
use common::{StubTransport, hash_ending};

fn sample_gallery(galleryid: GalleryId, pages: usize) -> Gallery {
    let images = (0..pages)
        .map(|i| {
            let hash = hash_ending(&format!("{:02x}{}", 0x40 + i, i % 10));
            Image::new(galleryid, hash, format!("{:03}.webp", i)).unwrap()
        })
        .collect();

    Gallery {
        galleryid,
        title: "Sample Title".to_string(),
        japanese_title: None,
        language: "english".to_string(),
        art_type: "manga".to_string(),
        tags: vec![],
        images,
    }
}

fn serving(gallery: &Gallery) -> StubTransport {
    gallery.images.iter().fold(StubTransport::new(), |stub, image| {
        stub.with_body(image.image_url.clone(), format!("bytes of {}", image.name))
    })
}

#[cfg(test)]
mod download_tests {
    use super::*;

    #[test]
    fn test_each_image_claimed_once() {
        let gallery = sample_gallery(1, 23);
        let n = gallery.images.len();

        for threads in [1, 4, n + 5] {
            let queue = DownloadQueue::new(gallery.images.clone());
            let shared = &queue;

            let claimed: Vec<usize> = std::thread::scope(|scope| {
                let workers: Vec<_> = (0..threads)
                    .map(|_| {
                        scope.spawn(move || {
                            let mut mine = Vec::new();
                            while let Some((index, _)) = shared.claim() {
                                mine.push(index);
                            }
                            mine
                        })
                    })
                    .collect();
                workers
                    .into_iter()
                    .flat_map(|w| w.join().unwrap())
                    .collect()
            });

            assert_eq!(claimed.len(), n, "threads = {}", threads);
            let unique: HashSet<usize> = claimed.iter().copied().collect();
            assert_eq!(unique.len(), n);
            assert!(claimed.iter().all(|&i| i < n));
            assert_eq!(queue.claimed(), n);
            assert!(queue.claim().is_none());
        }
    }

    #[tokio::test]
    async fn test_directory_collision() {
        let root = tempfile::tempdir().unwrap();
        let first = root.path().join("title");
        std::fs::create_dir(&first).unwrap();
        std::fs::write(first.join("001.jpg"), b"old").unwrap();

        let second = create_save_dir(root.path(), "title").await.unwrap();
        assert_eq!(second, root.path().join("title_"));

        let third = create_save_dir(root.path(), "title").await.unwrap();
        assert_eq!(third, root.path().join("title__"));

        assert_eq!(std::fs::read(first.join("001.jpg")).unwrap(), b"old");
        assert!(std::fs::read_dir(&second).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_save_dir_creates_parents() {
        let root = tempfile::tempdir().unwrap();
        let savedir = root.path().join("nested").join("downloads");

        let dir = create_save_dir(&savedir, "a/b").await.unwrap();
        assert_eq!(dir, savedir.join("a_b"));
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_long_japanese_title() {
        let root = tempfile::tempdir().unwrap();
        let title = "東".repeat(100);

        let dir = create_save_dir(root.path(), &title).await.unwrap();
        let name = dir.file_name().unwrap().to_str().unwrap();
        assert!(name.len() <= 200, "{} bytes", name.len());
        assert!(title.starts_with(name));

        // collisions still fit under the file system limit
        let mut last = dir;
        for _ in 0..5 {
            last = create_save_dir(root.path(), &title).await.unwrap();
        }
        assert!(last.file_name().unwrap().len() < 255);
        assert!(last.to_str().unwrap().ends_with("_____"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_long_title_gallery_downloads() {
        let root = tempfile::tempdir().unwrap();
        let mut gallery = sample_gallery(12, 2);
        gallery.japanese_title = Some("長".repeat(120));
        let client = Hitomi::with_transport(serving(&gallery));

        let options = DownloadOptions {
            savedir: root.path().to_path_buf(),
            threads: 2,
        };
        let report = client.download(&gallery, &options).await.unwrap();
        assert!(report.is_complete());
        assert_eq!(report.saved.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_progress_reports_each_saved_path() {
        let root = tempfile::tempdir().unwrap();
        let gallery = sample_gallery(40, 7);
        let client = Hitomi::with_transport(serving(&gallery));

        let options = DownloadOptions {
            savedir: root.path().to_path_buf(),
            threads: 3,
        };
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let collect = async {
            let mut seen = Vec::new();
            while let Some(path) = rx.recv().await {
                seen.push(path);
            }
            seen
        };

        let (report, mut seen) =
            tokio::join!(client.download_with_progress(&gallery, &options, tx), collect);
        let mut saved = report.unwrap().saved;

        seen.sort();
        saved.sort();
        assert_eq!(seen, saved);
        assert_eq!(seen.len(), 7);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_download_gallery() {
        let root = tempfile::tempdir().unwrap();
        let gallery = sample_gallery(77, 12);
        let client = Hitomi::with_transport(serving(&gallery));

        let options = DownloadOptionsBuilder::default()
            .savedir(root.path())
            .threads(4usize)
            .build()
            .unwrap();
        let report = client.download(&gallery, &options).await.unwrap();

        assert!(report.is_complete());
        assert_eq!(report.dir, root.path().join("Sample Title"));
        assert_eq!(report.saved.len(), 12);
        for image in &gallery.images {
            let written = std::fs::read_to_string(report.dir.join(&image.name)).unwrap();
            assert_eq!(written, format!("bytes of {}", image.name));

            let headers = client.transport().headers_for(&image.image_url).unwrap();
            assert_eq!(headers[REFERER], "https://hitomi.la/reader/77.html");
        }
        assert_eq!(client.transport().requested_urls().len(), 12);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_more_threads_than_images() {
        let root = tempfile::tempdir().unwrap();
        let gallery = sample_gallery(5, 3);
        let client = Hitomi::with_transport(serving(&gallery));

        let options = DownloadOptions {
            savedir: root.path().to_path_buf(),
            threads: 16,
        };
        let report = client.download(&gallery, &options).await.unwrap();

        assert!(report.is_complete());
        assert_eq!(report.saved.len(), 3);
        assert_eq!(client.transport().requested_urls().len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_failed_image_stops_only_its_worker() {
        let root = tempfile::tempdir().unwrap();
        let gallery = sample_gallery(9, 6);
        let broken = gallery.images[2].clone();
        let transport = serving(&gallery).with_failure(broken.image_url.clone());
        let client = Hitomi::with_transport(transport);

        let options = DownloadOptions {
            savedir: root.path().to_path_buf(),
            threads: 3,
        };
        let report = client.download(&gallery, &options).await.unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name.as_deref(), Some(broken.name.as_str()));
        assert!(matches!(report.failures[0].error, hitomi::Error::Http { status: 500, .. }));

        assert_eq!(report.saved.len(), 5);
        assert!(!report.dir.join(&broken.name).exists());
        let requests = client.transport().requested_urls();
        assert_eq!(requests.len(), 6, "the failed image is not retried");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_untitled_gallery_directory() {
        let root = tempfile::tempdir().unwrap();
        let mut gallery = sample_gallery(31337, 1);
        gallery.title.clear();
        let client = Hitomi::with_transport(serving(&gallery));

        let options = DownloadOptions {
            savedir: root.path().to_path_buf(),
            threads: 1,
        };
        let report = client.download(&gallery, &options).await.unwrap();
        assert_eq!(report.dir, root.path().join("unknown 31337"));

        let again = client.download(&gallery, &options).await.unwrap();
        assert_eq!(again.dir, root.path().join("unknown 31337_"));
        assert_eq!(again.saved.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_download_by_id() {
        let root = tempfile::tempdir().unwrap();
        let script = common::gallery_script(
            "By Id",
            Some("番号"),
            &[("1.jpg", hash_ending("5c1").as_str())],
        );
        let image = Image::new(common::SAMPLE_GALLERY_ID, hash_ending("5c1"), "1.jpg").unwrap();
        let transport = Arc::new(
            StubTransport::new()
                .with_body(hitomi::gallery::gallery_url(common::SAMPLE_GALLERY_ID), script)
                .with_body(image.image_url.clone(), "jpeg"),
        );
        let client = Hitomi::from_arc(Arc::clone(&transport));

        let options = DownloadOptions {
            savedir: root.path().to_path_buf(),
            threads: 2,
        };
        let report = client.download_id(common::SAMPLE_GALLERY_ID, &options).await.unwrap();

        assert_eq!(report.dir, root.path().join("番号"));
        assert_eq!(std::fs::read(report.dir.join("1.jpg")).unwrap(), b"jpeg");
        assert_eq!(transport.requested_urls().len(), 2);
    }
}
