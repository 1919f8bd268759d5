use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Current schema version written to storage
pub const SCHEMA_VERSION: u32 = 2;

/// Name used whenever we need a collection and have none
pub const DEFAULT_COLLECTION: &str = "My Collection";

/// A single publication - the star of the show
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub citations: u64,
}

impl Article {
    pub fn new(title: impl Into<String>, citations: u64) -> Self {
        Self {
            title: title.into(),
            citations,
        }
    }

    /// Coerce whatever came out of storage into a valid article
    ///
    /// Non-objects become an empty article, a missing title becomes "", and
    /// citations go through [`coerce_citations`].
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let title = match obj.get("title") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        Self {
            title,
            citations: obj.get("citations").map(coerce_citations).unwrap_or(0),
        }
    }
}

/// Turn a stored citation value into a non-negative integer
///
/// Numbers are truncated and clamped at zero, numeric strings are parsed,
/// booleans count as 1/0. Anything else is 0.
pub fn coerce_citations(value: &Value) -> u64 {
    match value {
        Value::Bool(b) => u64::from(*b),
        Value::Number(n) => match n.as_u64() {
            Some(v) => v,
            None => n.as_f64().map(clamp_float).unwrap_or(0),
        },
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return 0;
            }
            trimmed.parse::<f64>().map(clamp_float).unwrap_or(0)
        }
        _ => 0,
    }
}

fn clamp_float(v: f64) -> u64 {
    if v.is_finite() && v > 0.0 {
        v.trunc() as u64
    } else {
        0
    }
}

/// Parse what the user typed into a citations field
///
/// Reads an optional sign and the leading digits, ignoring whatever follows
/// ("12abc" is 12). No digits at all, or a negative number, gives 0.
pub fn parse_citations_input(raw: &str) -> u64 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: u64 = 0;
    let mut seen_digit = false;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(u64::from(b - b'0'));
    }

    if !seen_digit || negative {
        0
    } else {
        value
    }
}

/// A named, ordered list of articles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub name: String,
    pub articles: Vec<Article>,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            articles: Vec::new(),
        }
    }

    pub fn with_articles(name: impl Into<String>, articles: Vec<Article>) -> Self {
        Self {
            name: name.into(),
            articles,
        }
    }

    pub fn citations(&self) -> Vec<u64> {
        self.articles.iter().map(|a| a.citations).collect()
    }
}

/// Everything we persist: every collection plus which one is active
///
/// `current` always names one of `collections`, and `collections` is never
/// empty. Every constructor and mutator below keeps it that way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationState {
    version: u32,
    current: String,
    collections: Vec<Collection>,
}

impl Default for ApplicationState {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            current: DEFAULT_COLLECTION.to_string(),
            collections: vec![Collection::new(DEFAULT_COLLECTION)],
        }
    }
}

impl ApplicationState {
    /// Build a state from loose parts, repairing the invariant
    ///
    /// Empty names and duplicate names are dropped (first one wins). An empty
    /// map gets the default collection back, and a dangling `current` moves to
    /// the first collection.
    pub fn from_parts(current: impl Into<String>, collections: Vec<Collection>) -> Self {
        let mut kept: Vec<Collection> = Vec::with_capacity(collections.len());
        for collection in collections {
            if collection.name.is_empty() || kept.iter().any(|c| c.name == collection.name) {
                continue;
            }
            kept.push(collection);
        }

        if kept.is_empty() {
            kept.push(Collection::new(DEFAULT_COLLECTION));
        }

        let mut current = current.into();
        if !kept.iter().any(|c| c.name == current) {
            current = kept[0].name.clone();
        }

        Self {
            version: SCHEMA_VERSION,
            current,
            collections: kept,
        }
    }

    /// Wrap a v1 article list into the default collection
    pub fn from_legacy(entries: &[Value]) -> Self {
        let articles = entries.iter().map(Article::from_value).collect();
        Self::from_parts(
            DEFAULT_COLLECTION,
            vec![Collection::with_articles(DEFAULT_COLLECTION, articles)],
        )
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn names(&self) -> Vec<&str> {
        self.collections.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn active_index(&self) -> usize {
        self.collections
            .iter()
            .position(|c| c.name == self.current)
            .unwrap_or(0)
    }

    pub fn active(&self) -> &Collection {
        &self.collections[self.active_index()]
    }

    pub fn active_mut(&mut self) -> &mut Collection {
        let idx = self.active_index();
        &mut self.collections[idx]
    }

    /// Point `current` at an existing collection. Unknown names are ignored.
    pub(crate) fn set_current(&mut self, name: &str) -> bool {
        if self.contains(name) {
            self.current = name.to_string();
            true
        } else {
            false
        }
    }

    /// Append an empty collection. Caller checks for duplicates.
    pub(crate) fn push_collection(&mut self, name: &str) {
        self.collections.push(Collection::new(name));
    }

    /// Remove a collection, then repair the invariant
    pub(crate) fn remove_collection(&mut self, name: &str) -> Option<Collection> {
        let idx = self.collections.iter().position(|c| c.name == name)?;
        let removed = self.collections.remove(idx);

        if self.collections.is_empty() {
            self.collections.push(Collection::new(DEFAULT_COLLECTION));
            self.current = DEFAULT_COLLECTION.to_string();
        } else if self.current == name {
            self.current = self.collections[0].name.clone();
        }

        Some(removed)
    }

    /// Move a collection's articles under a new name
    ///
    /// The renamed collection goes to the end of the order, like a freshly
    /// inserted key.
    pub(crate) fn rename_collection(&mut self, old: &str, new: &str) -> bool {
        let Some(idx) = self.collections.iter().position(|c| c.name == old) else {
            return false;
        };
        let mut collection = self.collections.remove(idx);
        collection.name = new.to_string();
        self.collections.push(collection);
        if self.current == old {
            self.current = new.to_string();
        }
        true
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Serialize for ApplicationState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ApplicationState", 3)?;
        state.serialize_field("version", &self.version)?;
        state.serialize_field("current", &self.current)?;
        state.serialize_field("collections", &CollectionMap(&self.collections))?;
        state.end()
    }
}

/// Collections go out as a JSON object keyed by name, in order
struct CollectionMap<'a>(&'a [Collection]);

impl Serialize for CollectionMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for collection in self.0 {
            map.serialize_entry(&collection.name, &collection.articles)?;
        }
        map.end()
    }
}
