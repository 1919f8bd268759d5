// Core business logic lives here - the brain of the operation
pub mod config;
pub mod error;
pub mod export;
pub mod hindex;
pub mod models;
pub mod mutations;
pub mod prompt;
pub mod store;

pub use config::Config;
pub use error::Error;
pub use export::{ExportFormat, Exporter};
pub use hindex::{compute_h_index, HIndex};
pub use models::{ApplicationState, Article, Collection, DEFAULT_COLLECTION};
pub use mutations::Outcome;
pub use prompt::Prompter;
pub use store::{Focus, LoadError, RenderRequest, StateStore, LEGACY_STORAGE_KEY, STORAGE_KEY};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
