//! File-based cache for remotely classified words.
//!
//! Only successful classifications are cached. Cache is stored in
//! ~/.cache/namestat/tags/ (platform equivalent) unless a directory is given.

use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::Tag;

/// In-memory + file-based cache of word tags.
pub struct TagCache {
    /// In-memory cache for current session
    memory: RwLock<HashMap<String, CacheEntry>>,
    /// Path to cache directory, if any
    cache_dir: Option<PathBuf>,
    /// TTL in hours
    ttl_hours: u32,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheEntry {
    tag: Tag,
    timestamp: u64, // Unix timestamp in seconds
}

impl TagCache {
    /// Create a cache in the user cache directory with the given TTL.
    pub fn new(ttl_hours: u32) -> Self {
        let cache_dir =
            ProjectDirs::from("", "", "namestat").map(|dirs| dirs.cache_dir().join("tags"));
        Self::in_dir(cache_dir, ttl_hours)
    }

    /// Create a cache backed by `dir`, or memory only when `None`.
    pub fn in_dir(cache_dir: Option<PathBuf>, ttl_hours: u32) -> Self {
        // Try to create cache directory
        if let Some(ref dir) = cache_dir {
            let _ = fs::create_dir_all(dir);
        }

        Self {
            memory: RwLock::new(HashMap::new()),
            cache_dir,
            ttl_hours,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Get a cached tag if it exists and is not expired.
    pub fn get(&self, word: &str) -> Option<Tag> {
        let found = self.lookup(word);
        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    fn lookup(&self, word: &str) -> Option<Tag> {
        let now = current_timestamp();
        let ttl_secs = (self.ttl_hours as u64) * 3600;

        // Check in-memory cache first
        {
            let cache = self.memory.read().ok()?;
            if let Some(entry) = cache.get(word) {
                if now.saturating_sub(entry.timestamp) < ttl_secs {
                    return Some(entry.tag);
                }
            }
        }

        // Check file cache
        let entry = self.read_file_cache(word)?;
        if now.saturating_sub(entry.timestamp) >= ttl_secs {
            return None;
        }
        // Promote to memory cache
        if let Ok(mut cache) = self.memory.write() {
            cache.insert(word.to_string(), entry.clone());
        }
        Some(entry.tag)
    }

    /// Store a tag in the cache.
    pub fn set(&self, word: &str, tag: Tag) {
        let entry = CacheEntry {
            tag,
            timestamp: current_timestamp(),
        };

        if let Ok(mut cache) = self.memory.write() {
            cache.insert(word.to_string(), entry.clone());
        }

        self.write_file_cache(word, &entry);
    }

    /// Return (hits, misses) since creation.
    pub fn stats(&self) -> (usize, usize) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }

    fn read_file_cache(&self, word: &str) -> Option<CacheEntry> {
        let path = self.cache_file_path(word)?;
        let content = fs::read_to_string(path).ok()?;
        parse_cache_entry(&content)
    }

    fn write_file_cache(&self, word: &str, entry: &CacheEntry) {
        if let Some(path) = self.cache_file_path(word) {
            let _ = fs::write(path, format_cache_entry(entry));
        }
    }

    /// Get the file path for a word.
    fn cache_file_path(&self, word: &str) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.cache", cache_file_stem(word))))
    }
}

/// Hex-encode the word so any identifier segment maps to a safe file name.
fn cache_file_stem(word: &str) -> String {
    word.bytes().map(|b| format!("{:02x}", b)).collect()
}

/// Get current Unix timestamp in seconds.
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}

/// Format a cache entry for file storage.
fn format_cache_entry(entry: &CacheEntry) -> String {
    format!("{}:{}", entry.tag, entry.timestamp)
}

/// Parse a cache entry from file content.
fn parse_cache_entry(content: &str) -> Option<CacheEntry> {
    let (tag, timestamp) = content.trim().rsplit_once(':')?;
    Some(CacheEntry {
        tag: Tag::parse(tag)?,
        timestamp: timestamp.parse().ok()?,
    })
}
