// State store: owns the application state and its storage slot
use crate::models::{ApplicationState, Article, Collection};
use crate::Result;
use hindex_cache::{CacheError, SlotStore};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Where the current document lives
pub const STORAGE_KEY: &str = "hindex_articles_v2";

/// Where v1 kept its bare article list
pub const LEGACY_STORAGE_KEY: &str = "hindex_articles_v1";

/// Why a stored document couldn't be used
///
/// Never leaves [`StateStore::load`], which swaps any of these for a fresh
/// default state. Exposed so the policy stays visible and testable.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("storage read failed: {0}")]
    Storage(#[from] CacheError),

    #[error("stored document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stored document has an unexpected shape: {0}")]
    Shape(String),
}

/// Which row the UI should put the cursor on after the next render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    FirstTitle,
    LastTitle,
}

/// Ask the UI to rebuild its view from the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderRequest {
    pub focus: Option<Focus>,
}

/// Owner of the application state
///
/// Built once at startup and handed to whatever front-end is running. Every
/// mutation goes through here, and every mutation ends in [`StateStore::persist`].
pub struct StateStore {
    slots: Box<dyn SlotStore>,
    state: ApplicationState,
    ui_ready: bool,
    pending_focus: Option<Focus>,
    pending_render: Option<RenderRequest>,
}

impl StateStore {
    /// Load state from `slots` and seed example articles if the active collection is empty
    pub fn open(slots: Box<dyn SlotStore>) -> Result<Self> {
        let state = Self::load(slots.as_ref());
        let mut store = Self {
            slots,
            state,
            ui_ready: false,
            pending_focus: None,
            pending_render: None,
        };

        // First-time users get something to look at
        if store.state.active().articles.is_empty() {
            store.state.active_mut().articles.extend(seed_articles());
            store.persist()?;
            info!("Seeded example articles into {:?}", store.state.current());
        }

        Ok(store)
    }

    /// Read the stored state, falling back to a fresh one on any problem
    ///
    /// Bad data is never surfaced to the user: a corrupt or oddly shaped
    /// document means starting over with the default collection.
    pub fn load(slots: &dyn SlotStore) -> ApplicationState {
        match Self::try_load(slots) {
            Ok(state) => state,
            Err(e) => {
                warn!("Ignoring stored state: {}", e);
                ApplicationState::default()
            }
        }
    }

    /// Read the stored state, reporting why it couldn't be used
    pub fn try_load(slots: &dyn SlotStore) -> std::result::Result<ApplicationState, LoadError> {
        let Some(raw) = non_blank(slots.get(STORAGE_KEY)?) else {
            if let Some(legacy_raw) = non_blank(slots.get(LEGACY_STORAGE_KEY)?) {
                let legacy: Value = serde_json::from_str(&legacy_raw)?;
                if let Value::Array(entries) = &legacy {
                    info!("Migrating {} articles from the v1 format", entries.len());
                    return Ok(ApplicationState::from_legacy(entries));
                }
            }
            debug!("No stored state, starting fresh");
            return Ok(ApplicationState::default());
        };

        let parsed: Value = serde_json::from_str(&raw)?;
        Self::from_document(&parsed)
    }

    /// Turn a parsed document into a valid state
    ///
    /// A bare list under the current key is treated like v1 data. Nothing
    /// writes one there today, but an in-place schema change would.
    pub fn from_document(parsed: &Value) -> std::result::Result<ApplicationState, LoadError> {
        let obj = match parsed {
            Value::Array(entries) => return Ok(ApplicationState::from_legacy(entries)),
            Value::Object(obj) => obj,
            other => {
                return Err(LoadError::Shape(format!(
                    "expected an object or a list, got {}",
                    json_kind(other)
                )))
            }
        };

        let Some(Value::Object(raw_collections)) = obj.get("collections") else {
            return Err(LoadError::Shape("missing `collections` object".into()));
        };

        let current = match obj.get("current") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => return Err(LoadError::Shape("missing `current` name".into())),
        };

        let mut collections = Vec::with_capacity(raw_collections.len());
        for (name, entries) in raw_collections {
            let articles = match entries {
                Value::Array(items) => items.iter().map(Article::from_value).collect(),
                // null, false, 0 and "" all read as an empty collection
                other if is_falsy(other) => Vec::new(),
                other => {
                    return Err(LoadError::Shape(format!(
                        "collection {:?} is {}, not a list",
                        name,
                        json_kind(other)
                    )))
                }
            };
            collections.push(Collection::with_articles(name.clone(), articles));
        }

        Ok(ApplicationState::from_parts(current, collections))
    }

    /// Write the whole state back to its slot in one go
    ///
    /// Once the UI is up this also queues a render request.
    pub fn persist(&mut self) -> Result<()> {
        let json = self.state.to_json()?;
        self.slots.set(STORAGE_KEY, &json)?;
        debug!(
            "Persisted {} collections ({} bytes)",
            self.state.collections().len(),
            json.len()
        );

        if self.ui_ready {
            let focus = self.pending_focus.take();
            let previous = self.pending_render.and_then(|r| r.focus);
            self.pending_render = Some(RenderRequest {
                focus: focus.or(previous),
            });
        }

        Ok(())
    }

    /// The UI finished its first draw; from now on persists trigger renders
    pub fn mark_ui_ready(&mut self) {
        self.ui_ready = true;
        self.pending_render = Some(RenderRequest {
            focus: self.pending_focus.take(),
        });
    }

    pub fn is_ui_ready(&self) -> bool {
        self.ui_ready
    }

    /// Hand over the pending render request, if any
    pub fn take_render_request(&mut self) -> Option<RenderRequest> {
        self.pending_render.take()
    }

    pub(crate) fn request_focus(&mut self, focus: Option<Focus>) {
        self.pending_focus = focus;
    }

    pub fn state(&self) -> &ApplicationState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut ApplicationState {
        &mut self.state
    }

    pub fn slots(&self) -> &dyn SlotStore {
        self.slots.as_ref()
    }
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|r| !r.trim().is_empty())
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Example articles for an empty first run
pub fn seed_articles() -> Vec<Article> {
    vec![
        Article::new("Deep Learning Overview", 123),
        Article::new("Graph Algorithms", 47),
        Article::new("Untitled", 5),
    ]
}
