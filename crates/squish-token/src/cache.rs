//! Memoizing wrapper around any [`Tokenizer`].

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::{Result, Tokenizer};

/// Caches token counts per string on top of an inner oracle.
///
/// Model construction asks for the count of every identifier under every
/// applicable shortcut substitution, so the same strings come up many times.
/// Counts are pure, which makes a plain map cache sound. The map is guarded
/// by a `Mutex` so one cache can serve concurrent compressions.
pub struct CachedTokenizer<T> {
    inner: T,
    counts: Mutex<HashMap<String, usize>>,
}

impl<T: Tokenizer> CachedTokenizer<T> {
    /// Wraps `inner` with an empty cache.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            counts: Mutex::new(HashMap::new()),
        }
    }

    /// Number of distinct strings cached so far.
    pub fn len(&self) -> usize {
        self.counts.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Tokenizer> Tokenizer for CachedTokenizer<T> {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        if let Ok(map) = self.counts.lock() {
            if let Some(&n) = map.get(text) {
                return Ok(n);
            }
        }
        let n = self.inner.count_tokens(text)?;
        if let Ok(mut map) = self.counts.lock() {
            map.insert(text.to_string(), n);
        } else {
            debug!("token cache mutex poisoned, serving uncached counts");
        }
        Ok(n)
    }

    fn model(&self) -> &str {
        self.inner.model()
    }
}
