// ABOUTME: Attribute extraction from open-tag text and predicate matching against the result.
// ABOUTME: Predicates map attribute names to literal values or regex patterns and are AND-combined.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

static ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)\s*(\w+)\s*=\s*(".*?"|'.*?'|\S*)"#).unwrap());

/// Attribute name to value mapping parsed from one open tag.
pub type Attributes = HashMap<String, String>;

/// Parses `name=value` pairs out of an open tag's attribute text.
///
/// Later duplicates overwrite earlier ones. One pair of matching quotes is
/// stripped from each value; everything else is kept verbatim.
pub fn parse_attributes(text: &str) -> Attributes {
    let mut attrs = Attributes::new();
    for caps in ATTR_RE.captures_iter(text) {
        let name = &caps[1];
        let value = unquote(&caps[2]);
        attrs.insert(name.to_string(), value.to_string());
    }
    attrs
}

fn unquote(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if value.starts_with(quote) && value.ends_with(quote) {
            // A lone quote character strips to nothing
            return value.get(1..value.len() - 1).unwrap_or("");
        }
    }
    value
}

/// A required attribute value.
#[derive(Debug, Clone)]
pub enum AttrValue {
    /// Requires exact string equality.
    Literal(String),
    /// Requires the pattern to match somewhere inside the value.
    Pattern(Regex),
}

impl AttrValue {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            AttrValue::Literal(expected) => expected == value,
            AttrValue::Pattern(re) => re.is_match(value),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Literal(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Literal(s)
    }
}

impl From<Regex> for AttrValue {
    fn from(re: Regex) -> Self {
        AttrValue::Pattern(re)
    }
}

/// A set of attribute requirements, all of which must hold.
#[derive(Debug, Clone, Default)]
pub struct Predicate {
    required: HashMap<String, AttrValue>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a requirement, replacing any previous one for the same name.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.required.insert(name.into(), value.into());
    }

    /// Merges a positional mapping with named overrides. Overrides win.
    pub fn merge(positional: &Predicate, named: &Predicate) -> Predicate {
        let mut merged = positional.clone();
        for (name, value) in &named.required {
            merged.required.insert(name.clone(), value.clone());
        }
        merged
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.required.get(name)
    }

    pub fn len(&self) -> usize {
        self.required.len()
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }

    /// Returns true if every requirement holds for `attrs`.
    pub fn matches(&self, attrs: &Attributes) -> bool {
        self.required.iter().all(|(name, expected)| {
            attrs
                .get(name)
                .is_some_and(|actual| expected.matches(actual))
        })
    }
}

impl<K, V> FromIterator<(K, V)> for Predicate
where
    K: Into<String>,
    V: Into<AttrValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut predicate = Predicate::new();
        for (name, value) in iter {
            predicate.insert(name, value);
        }
        predicate
    }
}
