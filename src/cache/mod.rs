//! Rendered-output cache.
//!
//! # Data Flow
//! ```text
//! dispatcher (template source, RenderProperties)
//!     → CacheKey (template hash + properties)
//!     → get: hit → bytes, miss → render → put
//!
//! sweeper.rs (background task):
//!     every TTL → clear_expired
//!     on stop   → clear
//! ```
//!
//! # Design Decisions
//! - Expiry is checked on every lookup, so the sweeper only bounds memory
//! - Entries are replaced whole; readers get an immutable `Bytes` snapshot
//! - The TTL stays below one second because templates can embed the current
//!   unix time with one-second granularity

pub mod sweeper;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use dashmap::DashMap;
use tokio::time::Instant;

use crate::render::RenderProperties;

pub use sweeper::CacheSweeper;

/// Lifetime of a rendered page in the cache.
pub const CACHE_TTL: Duration = Duration::from_millis(900);

/// Identity of one rendered output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    template: u64,
    props: RenderProperties,
}

impl CacheKey {
    fn new(template: &str, props: &RenderProperties) -> Self {
        Self {
            template: template_hash(template),
            props: props.clone(),
        }
    }
}

fn template_hash(template: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    template.hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug, Clone)]
struct CacheEntry {
    content: Bytes,
    expires_at: Instant,
}

/// Thread-safe cache of rendered pages with a fixed per-entry TTL.
///
/// Cloning is cheap and every clone shares the same storage.
#[derive(Debug, Clone)]
pub struct RenderedCache {
    entries: Arc<DashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl RenderedCache {
    /// Create an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up the rendered output for `template` and `props`.
    ///
    /// Never returns an entry whose expiry has passed, even if the sweeper
    /// has not removed it yet.
    pub fn get(&self, template: &str, props: &RenderProperties) -> Option<Bytes> {
        self.get_at(template, props, Instant::now())
    }

    fn get_at(&self, template: &str, props: &RenderProperties, now: Instant) -> Option<Bytes> {
        let key = CacheKey::new(template, props);

        match self.entries.get(&key) {
            Some(entry) if entry.expires_at > now => return Some(entry.content.clone()),
            Some(_) => {}
            None => return None,
        }

        // Only drop the entry if it is still the expired one; a concurrent
        // put may have replaced it in the meantime.
        self.entries.remove_if(&key, |_, entry| entry.expires_at <= now);
        None
    }

    /// Store rendered output, replacing any previous entry for the same key.
    pub fn put(&self, template: &str, props: &RenderProperties, content: impl Into<Bytes>) {
        self.put_at(template, props, content.into(), Instant::now());
    }

    fn put_at(&self, template: &str, props: &RenderProperties, content: Bytes, now: Instant) {
        self.entries.insert(
            CacheKey::new(template, props),
            CacheEntry {
                content,
                expires_at: now + self.ttl,
            },
        );
    }

    /// Remove every expired entry. Returns the number of entries removed.
    pub fn clear_expired(&self) -> usize {
        self.clear_expired_at(Instant::now())
    }

    fn clear_expired_at(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RenderedCache {
    fn default() -> Self {
        Self::new(CACHE_TTL)
    }
}
