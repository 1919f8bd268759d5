// SQLite-backed key-value slots
// One row per key, written in a single statement so a save is all-or-nothing

pub mod error;
pub mod memory;
pub mod slots;

pub use error::CacheError;
pub use memory::MemorySlots;
pub use slots::{SlotDb, SlotStore};

pub type Result<T> = std::result::Result<T, CacheError>;
