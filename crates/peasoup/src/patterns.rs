// ABOUTME: Per-tag-name cache of compiled open-tag and close-tag regular expressions.
// ABOUTME: Patterns are built lazily on first use and reused for the lifetime of the cache.

//! Tag pattern caching.
//!
//! Building the open-tag expression for a name is far more expensive than
//! running it, and the set of names a caller queries is small. A
//! [`TagPatternCache`] compiles both expressions for a name together, once,
//! and hands out shared references afterwards.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static SHARED_CACHE: Lazy<Arc<TagPatternCache>> = Lazy::new(|| Arc::new(TagPatternCache::new()));

/// Compiled matchers for one tag name.
#[derive(Debug)]
pub struct TagPatterns {
    name: String,
    open: Regex,
    close: Regex,
}

impl TagPatterns {
    /// Compiles the open-tag and close-tag expressions for `name`.
    ///
    /// The name is matched literally and case-insensitively.
    pub fn compile(name: &str) -> Result<Self, regex::Error> {
        let escaped = regex::escape(name);
        let open = Regex::new(&format!(
            r#"(?is)<(?P<tagname>{escaped})\s*(?P<attrs>(?:\s*\w+\s*=\s*(?:".*?"|'.*?'|\S+?))*)\s*(?P<no_endtag>/?)>"#
        ))?;
        let close = Regex::new(&format!(r"(?is)</\s*{escaped}\s*>"))?;
        Ok(Self {
            name: name.to_string(),
            open,
            close,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Matcher for `<name attr=value ... [/]>`.
    pub fn open(&self) -> &Regex {
        &self.open
    }

    /// Matcher for `</name>`.
    pub fn close(&self) -> &Regex {
        &self.close
    }
}

/// Attribute text captured by an open-tag match.
pub fn attr_text<'t>(caps: &Captures<'t>) -> &'t str {
    caps.name("attrs").map_or("", |m| m.as_str())
}

/// True if an open-tag match ended in `/>`.
pub fn is_self_closing(caps: &Captures<'_>) -> bool {
    caps.name("no_endtag").is_some_and(|m| !m.as_str().is_empty())
}

/// Thread-safe cache of compiled tag patterns keyed by tag name.
///
/// Keys are the exact strings callers pass in; `"P"` and `"p"` get separate
/// entries that behave identically.
#[derive(Debug, Default)]
pub struct TagPatternCache {
    entries: RwLock<HashMap<String, Arc<TagPatterns>>>,
}

impl TagPatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used when callers opt into sharing.
    pub fn shared() -> Arc<TagPatternCache> {
        Arc::clone(&SHARED_CACHE)
    }

    /// Gets or compiles the patterns for `name`.
    pub fn get(&self, name: &str) -> Result<Arc<TagPatterns>, regex::Error> {
        // Fast path: read lock
        {
            let entries = self.entries.read().unwrap();
            if let Some(cached) = entries.get(name) {
                return Ok(Arc::clone(cached));
            }
        }

        let compiled = Arc::new(TagPatterns::compile(name)?);
        let mut entries = self.entries.write().unwrap();
        // Another thread may have inserted while we compiled
        if let Some(cached) = entries.get(name) {
            return Ok(Arc::clone(cached));
        }
        tracing::trace!(tag = name, "compiled tag patterns");
        entries.insert(name.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Open-tag matcher for `name`.
    pub fn open_pattern(&self, name: &str) -> Result<Regex, regex::Error> {
        self.get(name).map(|p| p.open.clone())
    }

    /// Close-tag matcher for `name`.
    pub fn close_pattern(&self, name: &str) -> Result<Regex, regex::Error> {
        self.get(name).map(|p| p.close.clone())
    }

    /// Compiles patterns for a batch of names up front.
    pub fn precompile<I, S>(&self, names: I) -> Result<(), regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.get(name.as_ref())?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
