use crate::{Result, SlotStore};
use std::collections::HashMap;

/// Slot store that lives and dies with the process
///
/// Handy for tests and for `--ephemeral` runs where nothing should touch disk.
#[derive(Debug, Clone, Default)]
pub struct MemorySlots {
    slots: HashMap<String, String>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a slot, builder style
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.slots.insert(key.to_string(), value.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl SlotStore for MemorySlots {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.slots.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_slots() {
        let mut slots = MemorySlots::new().with("a", "1");
        assert_eq!(slots.get("a").unwrap().as_deref(), Some("1"));

        slots.set("a", "2").unwrap();
        slots.set("b", "3").unwrap();
        assert_eq!(slots.len(), 2);

        slots.remove("a").unwrap();
        assert_eq!(slots.get("a").unwrap(), None);
        assert!(!slots.is_empty());
    }
}
