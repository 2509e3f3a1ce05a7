// SPDX-License-Identifier: MPL-2.0
//! Poster images and their cache.
//!
//! A poster (the `thumbnail` option) drives the initial geometry before the
//! media source knows its natural size, and is painted whenever geometry is
//! recomputed. Decoded posters are cached per URL by the factory that builds
//! sessions, so a second session with the same thumbnail sizes itself
//! immediately while a session with a different thumbnail can never pick up
//! a stale image.

use std::num::NonZeroUsize;
use std::rc::Rc;

use lru::LruCache;

use crate::config::{MAX_POSTER_CACHE_CAPACITY, MIN_POSTER_CACHE_CAPACITY};
use crate::domain::geometry::SourceSize;
use crate::error::Result;

/// A decoded poster image.
#[derive(Debug, Clone)]
pub struct PosterImage {
    url: String,
    size: SourceSize,
    pixels: Option<image_rs::RgbaImage>,
}

impl PosterImage {
    /// Describes a poster the host decoded itself.
    #[must_use]
    pub fn new(url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            url: url.into(),
            size: SourceSize::new(width, height),
            pixels: None,
        }
    }

    /// Decodes a poster from encoded bytes (PNG, JPEG, GIF, WebP).
    pub fn decode(url: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let rgba = image_rs::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            url: url.into(),
            size: SourceSize::new(width, height),
            pixels: Some(rgba),
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn size(&self) -> SourceSize {
        self.size
    }

    /// Decoded RGBA pixels, when decoded by [`PosterImage::decode`].
    #[must_use]
    pub fn pixels(&self) -> Option<&image_rs::RgbaImage> {
        self.pixels.as_ref()
    }
}

/// LRU cache of decoded posters keyed by URL.
#[derive(Debug)]
pub struct PosterCache {
    entries: LruCache<String, Rc<PosterImage>>,
    current: Option<String>,
}

impl Default for PosterCache {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_POSTER_CACHE_CAPACITY)
    }
}

impl PosterCache {
    /// Creates a cache holding up to `capacity` posters (clamped to 1–64).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(MIN_POSTER_CACHE_CAPACITY, MAX_POSTER_CACHE_CAPACITY);
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            current: None,
        }
    }

    /// Switches to the thumbnail of a session being created and returns the
    /// cached poster for it, if any.
    pub fn select(&mut self, url: Option<&str>) -> Option<Rc<PosterImage>> {
        if self.current.as_deref() != url {
            tracing::debug!(previous = ?self.current, next = ?url, "poster thumbnail changed");
            self.current = url.map(str::to_owned);
        }
        url.and_then(|url| self.get(url))
    }

    /// Thumbnail URL of the most recently created session.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn get(&mut self, url: &str) -> Option<Rc<PosterImage>> {
        self.entries.get(url).cloned()
    }

    /// Stores a decoded poster and returns the shared handle sessions receive.
    pub fn insert(&mut self, poster: PosterImage) -> Rc<PosterImage> {
        let poster = Rc::new(poster);
        if let Some((evicted, _)) = self
            .entries
            .push(poster.url().to_owned(), Rc::clone(&poster))
            .filter(|(url, _)| url != poster.url())
        {
            tracing::trace!(url = %evicted, "evicted poster");
        }
        poster
    }

    /// Drops the poster cached for `url`. Returns true if one was cached.
    pub fn invalidate(&mut self, url: &str) -> bool {
        self.entries.pop(url).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.current = None;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image_rs::RgbaImage::new(width, height);
        let mut bytes = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut bytes, image_rs::ImageFormat::Png)
            .expect("encode png");
        bytes.into_inner()
    }

    #[test]
    fn decode_reads_dimensions() {
        let poster = PosterImage::decode("poster.png", &png_bytes(32, 18)).expect("decode");
        assert_eq!(poster.size(), SourceSize::new(32, 18));
        assert_eq!(poster.url(), "poster.png");
        assert!(poster.pixels().is_some());
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(PosterImage::decode("broken.png", b"not an image").is_err());
    }

    #[test]
    fn cache_is_keyed_by_url() {
        let mut cache = PosterCache::default();
        cache.insert(PosterImage::new("a.jpg", 640, 360));

        assert_eq!(cache.select(Some("a.jpg")).unwrap().size(), SourceSize::new(640, 360));
        assert!(cache.select(Some("b.jpg")).is_none());
        assert_eq!(cache.current(), Some("b.jpg"));
    }

    #[test]
    fn least_recently_used_poster_is_evicted() {
        let mut cache = PosterCache::new(2);
        cache.insert(PosterImage::new("a.jpg", 1, 1));
        cache.insert(PosterImage::new("b.jpg", 1, 1));
        cache.get("a.jpg");
        cache.insert(PosterImage::new("c.jpg", 1, 1));

        assert!(cache.get("b.jpg").is_none());
        assert!(cache.get("a.jpg").is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn reinserting_same_url_replaces_entry() {
        let mut cache = PosterCache::new(2);
        cache.insert(PosterImage::new("a.jpg", 1, 1));
        cache.insert(PosterImage::new("a.jpg", 2, 2));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a.jpg").unwrap().size(), SourceSize::new(2, 2));
    }

    #[test]
    fn invalidate_and_clear() {
        let mut cache = PosterCache::default();
        cache.insert(PosterImage::new("a.jpg", 1, 1));
        assert!(cache.invalidate("a.jpg"));
        assert!(!cache.invalidate("a.jpg"));

        cache.insert(PosterImage::new("b.jpg", 1, 1));
        cache.select(Some("b.jpg"));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.current(), None);
    }

    #[test]
    fn capacity_is_clamped() {
        let mut cache = PosterCache::new(0);
        cache.insert(PosterImage::new("a.jpg", 1, 1));
        cache.insert(PosterImage::new("b.jpg", 1, 1));
        assert_eq!(cache.len(), 1);
    }
}
