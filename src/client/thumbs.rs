//! Thumbnail retrieval with a bounded cache.
//!
//! The producer names thumbnails by content digest, so a name seen once
//! never changes its bytes. The cache therefore only stores the fetched
//! size; a repeated identifier is answered without touching the network.

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::metrics::Metrics;

pub struct ThumbStore {
    client: reqwest::Client,
    base_url: String,
    cache: LruCache<String, u64>,
    metrics: Metrics,
}

impl ThumbStore {
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        capacity: usize,
        metrics: Metrics,
    ) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self { client, base_url, cache: LruCache::new(capacity), metrics }
    }

    /// Fetches the image for `fname` and returns its byte size, answering
    /// from the cache when possible. Failures are logged and swallowed; a
    /// missing image never degrades the session.
    pub async fn fetch(&mut self, fname: &str) -> Option<u64> {
        if let Some(len) = self.cache.get(fname) {
            tracing::debug!(fname, "thumbnail cache hit");
            return Some(*len);
        }

        let url = self.thumb_url(fname)?;
        match self.client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => match resp.bytes().await {
                Ok(body) => {
                    let len = body.len() as u64;
                    self.cache.put(fname.to_string(), len);
                    self.metrics.inc_thumbnails_fetched();
                    tracing::debug!(fname, len, "thumbnail fetched");
                    Some(len)
                }
                Err(e) => {
                    tracing::warn!(fname, "thumbnail body failed: {}", e);
                    None
                }
            },
            Ok(resp) => {
                tracing::warn!(fname, status = %resp.status(), "thumbnail request rejected");
                None
            }
            Err(e) => {
                tracing::warn!(fname, "thumbnail request failed: {}", e);
                None
            }
        }
    }

    /// Builds the image URL with `fname` percent-encoded as one path
    /// segment.
    fn thumb_url(&self, fname: &str) -> Option<reqwest::Url> {
        let mut url = match reqwest::Url::parse(&self.base_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("invalid base url '{}': {}", self.base_url, e);
                return None;
            }
        };
        url.path_segments_mut().ok()?.push("thumb").push(fname);
        Some(url)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
