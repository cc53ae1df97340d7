// Compiled-pattern cache
// A small process-wide pool keyed by (pattern, options): hits move to
// the front, the least recently used entry falls off the end

use std::sync::{Arc, Mutex, OnceLock};

use crate::error::ParseError;
use crate::matcher::Regex;
use crate::options;

const CACHE_SIZE: usize = 20;

static CACHE: OnceLock<Mutex<Vec<Arc<Regex>>>> = OnceLock::new();

/// Compile-or-fetch: returns the cached compilation of
/// `(pattern, option_letters)` or compiles and caches a new one.
pub fn cached(pattern: &str, option_letters: &str) -> Result<Arc<Regex>, ParseError> {
    let opts = options::parse_options(option_letters)?;
    let cache = CACHE.get_or_init(|| Mutex::new(Vec::with_capacity(CACHE_SIZE)));

    {
        let mut entries = cache.lock().unwrap();
        if let Some(at) = entries
            .iter()
            .position(|r| r.pattern() == pattern && r.flags() == opts)
        {
            let hit = entries.remove(at);
            entries.insert(0, hit.clone());
            return Ok(hit);
        }
    }

    // Compiled outside the lock; two racing callers compile twice and
    // the cache keeps whichever lands last.
    let fresh = Arc::new(Regex::with_flags(pattern, opts)?);
    log::debug!("caching compiled pattern ({} chars)", pattern.len());
    let mut entries = cache.lock().unwrap();
    entries.insert(0, fresh.clone());
    entries.truncate(CACHE_SIZE);
    Ok(fresh)
}
