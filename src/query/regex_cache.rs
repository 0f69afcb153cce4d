use lru::LruCache;
use regex::Regex;
use std::num::NonZeroUsize;
use std::sync::{Mutex, OnceLock};

const REGEX_CACHE_CAPACITY: usize = 64;

static REGEX_CACHE: OnceLock<Mutex<LruCache<String, Regex>>> = OnceLock::new();

fn cache() -> &'static Mutex<LruCache<String, Regex>> {
    REGEX_CACHE.get_or_init(|| {
        let capacity = NonZeroUsize::new(REGEX_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Mutex::new(LruCache::new(capacity))
    })
}

/// Returns a compiled regex for `/pattern/flags`, reusing earlier compilations.
/// Supported flags: `i` (case-insensitive), `m` (multi-line), `s` (dot matches
/// newline), `x` (ignore whitespace).
pub fn get_or_compile_regex(pattern: &str, flags: &str) -> Result<Regex, regex::Error> {
    let cache_key = format!("{pattern}\0{flags}");

    if let Ok(mut cache) = cache().try_lock()
        && let Some(regex) = cache.get(&cache_key)
    {
        return Ok(regex.clone());
    }

    let regex = regex::RegexBuilder::new(pattern)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .ignore_whitespace(flags.contains('x'))
        .build()?;

    if let Ok(mut cache) = cache().try_lock() {
        cache.put(cache_key, regex.clone());
    }

    Ok(regex)
}
