//! Common test utilities
//!
//! An in-memory [`Transport`] that serves canned bodies by URL and records
//! every request it sees.

use async_trait::async_trait;
use bytes::Bytes;
use hitomi::net::Transport;
use hitomi::nozomi::nozomi_url;
use hitomi::{Error, GalleryId, Result};
use parking_lot::Mutex;
use reqwest::header::HeaderMap;
use std::collections::{HashMap, HashSet};

#[allow(dead_code)]
pub const SAMPLE_GALLERY_ID: GalleryId = 1_920_106;

/// Canned responses keyed by full URL; unknown URLs answer 404.
#[allow(dead_code)]
#[derive(Default)]
pub struct StubTransport {
    bodies: HashMap<String, Bytes>,
    failing: HashSet<String>,
    pub requests: Mutex<Vec<(String, HeaderMap)>>,
}

#[allow(dead_code)]
impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        self.bodies.insert(url.into(), body.into());
        self
    }

    /// Serves `ids` as the `.nozomi` list at `path`.
    pub fn with_ids(self, path: &str, ids: &[GalleryId]) -> Self {
        let body: Vec<u8> = ids.iter().flat_map(|id| id.to_be_bytes()).collect();
        self.with_body(nozomi_url(path), body)
    }

    /// Makes `url` answer HTTP 500.
    pub fn with_failure(mut self, url: impl Into<String>) -> Self {
        self.failing.insert(url.into());
        self
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests.lock().iter().map(|(url, _)| url.clone()).collect()
    }

    pub fn headers_for(&self, url: &str) -> Option<HeaderMap> {
        self.requests
            .lock()
            .iter()
            .find(|(u, _)| u == url)
            .map(|(_, h)| h.clone())
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn fetch(&self, url: &str, headers: &HeaderMap) -> Result<Bytes> {
        self.requests.lock().push((url.to_string(), headers.clone()));

        if self.failing.contains(url) {
            return Err(Error::http(500, url));
        }
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| Error::not_found(url))
    }
}

/// A `galleryinfo` script with one file per `(name, hash)` pair.
#[allow(dead_code)]
pub fn gallery_script(title: &str, japanese_title: Option<&str>, files: &[(&str, &str)]) -> String {
    let files: Vec<serde_json::Value> = files
        .iter()
        .map(|(name, hash)| serde_json::json!({ "name": name, "hash": hash, "width": 1280, "height": 1810 }))
        .collect();

    let info = serde_json::json!({
        "id": SAMPLE_GALLERY_ID.to_string(),
        "title": title,
        "japanese_title": japanese_title,
        "language": "japanese",
        "type": "doujinshi",
        "tags": [
            { "tag": "glasses", "female": "1", "male": "" },
            { "tag": "shota", "male": 1 },
            { "tag": "full color" }
        ],
        "files": files,
    });

    format!("var galleryinfo = {};", info)
}

/// A 64-character hex hash ending in `tail`.
#[allow(dead_code)]
pub fn hash_ending(tail: &str) -> String {
    format!("{}{}", "0".repeat(64 - tail.len()), tail)
}
