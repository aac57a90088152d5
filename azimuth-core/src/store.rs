//! Latest reading per node
//!
//! The store only ever holds the most recent accepted reading for each node.
//! Entries are never removed, so a node that goes quiet keeps competing
//! with its last value.

use heapless::Vec;

use crate::bearing::Reading;
use crate::config::{NodeId, MAX_NODES};

/// Store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// All slots taken by other nodes
    Full,
}

/// Fixed-capacity map from node to its latest reading
#[derive(Debug, Clone, Default)]
pub struct ReadingStore {
    entries: Vec<(NodeId, Reading), MAX_NODES>,
}

impl ReadingStore {
    /// Create an empty store
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Record `reading` as the latest for `node`
    ///
    /// Returns the reading it replaced, if any.
    pub fn update(&mut self, node: &NodeId, reading: Reading) -> Result<Option<Reading>, StoreError> {
        if let Some((_, slot)) = self.entries.iter_mut().find(|(id, _)| id == node) {
            let previous = *slot;
            *slot = reading;
            return Ok(Some(previous));
        }

        self.entries
            .push((node.clone(), reading))
            .map_err(|_| StoreError::Full)?;
        Ok(None)
    }

    /// Latest reading for `node`
    pub fn get(&self, node: &str) -> Option<&Reading> {
        self.entries
            .iter()
            .find(|(id, _)| id.as_str() == node)
            .map(|(_, reading)| reading)
    }

    /// Number of nodes with a reading
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of every `(node, reading)` entry
    pub fn current(&self) -> &[(NodeId, Reading)] {
        &self.entries
    }

    /// Iterate over `(node, reading)` in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Reading)> {
        self.entries.iter().map(|(id, reading)| (id, reading))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        let mut id = NodeId::new();
        id.push_str(s).unwrap();
        id
    }

    fn reading(bearing: f32, amp: f32) -> Reading {
        Reading::new(bearing, amp).unwrap()
    }

    #[test]
    fn test_empty() {
        let store = ReadingStore::new();
        assert!(store.is_empty());
        assert!(store.get("esp1").is_none());
    }

    #[test]
    fn test_update_overwrites() {
        let mut store = ReadingStore::new();
        assert_eq!(store.update(&id("esp1"), reading(100.0, 30.0)), Ok(None));
        assert_eq!(
            store.update(&id("esp1"), reading(120.0, -5.0)),
            Ok(Some(reading(100.0, 30.0)))
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("esp1"), Some(&reading(120.0, -5.0)));
    }

    #[test]
    fn test_nodes_independent() {
        let mut store = ReadingStore::new();
        store.update(&id("esp1"), reading(100.0, 30.0)).unwrap();
        store.update(&id("esp2"), reading(10.0, 20.0)).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("esp2").map(|r| r.bearing_deg()), Some(10.0));

        let order: std::vec::Vec<&str> = store.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(order, ["esp1", "esp2"]);

        let snapshot = store.current();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[1].0.as_str(), "esp2");
        assert_eq!(snapshot[1].1, reading(10.0, 20.0));
    }

    #[test]
    fn test_full() {
        let mut store = ReadingStore::new();
        for name in ["esp1", "esp2", "esp3", "esp4"] {
            store.update(&id(name), reading(0.0, 0.0)).unwrap();
        }
        assert_eq!(store.update(&id("esp5"), reading(0.0, 0.0)), Err(StoreError::Full));
        // Existing nodes still update when full
        assert!(store.update(&id("esp4"), reading(5.0, 1.0)).is_ok());
    }
}
