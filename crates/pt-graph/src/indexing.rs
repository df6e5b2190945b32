//! Stable indexing for graph algorithms.
//!
//! Provides bidirectional mappings between instance IDs and contiguous
//! indices (0..N) in document order.

use std::collections::HashMap;

use pt_core::InstanceId;

use crate::error::{GraphError, GraphResult};

/// Index map providing stable, contiguous indices for instances.
///
/// Ordering, partitioning and naming work on dense arrays and petgraph node
/// indices; this map ties those back to instance IDs in O(1).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexMap {
    /// Contiguous list of instance IDs (index -> InstanceId).
    ids: Vec<InstanceId>,

    /// Reverse lookup: InstanceId -> index.
    lookup: HashMap<InstanceId, usize>,
}

impl IndexMap {
    /// Build an index map from IDs in order; the first occurrence of a repeated ID wins.
    pub fn new(ids: impl IntoIterator<Item = InstanceId>) -> Self {
        let mut map = Self::default();
        for id in ids {
            if !map.lookup.contains_key(&id) {
                map.lookup.insert(id.clone(), map.ids.len());
                map.ids.push(id);
            }
        }
        map
    }

    /// Number of instances in the index.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get(&self, id: &InstanceId) -> Option<usize> {
        self.lookup.get(id).copied()
    }

    /// Get the contiguous index for an instance ID.
    pub fn idx(&self, id: &InstanceId) -> GraphResult<usize> {
        self.get(id)
            .ok_or_else(|| GraphError::UnknownInstance { id: id.clone() })
    }

    /// Get the instance ID for a contiguous index (panics if out of bounds).
    pub fn id(&self, i: usize) -> &InstanceId {
        &self.ids[i]
    }

    /// All instance IDs in index order.
    pub fn ids(&self) -> &[InstanceId] {
        &self.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_map_round_trip() {
        let map = IndexMap::new(["b", "a", "c"].map(InstanceId::from));
        assert_eq!(map.len(), 3);
        for (i, id) in map.ids().iter().enumerate() {
            assert_eq!(map.idx(id).unwrap(), i);
            assert_eq!(map.id(i), id);
        }
    }

    #[test]
    fn index_map_unknown_id() {
        let map = IndexMap::new(["a"].map(InstanceId::from));
        assert!(matches!(
            map.idx(&InstanceId::from("zzz")),
            Err(GraphError::UnknownInstance { .. })
        ));
    }

    #[test]
    fn first_occurrence_wins() {
        let map = IndexMap::new(["a", "b", "a"].map(InstanceId::from));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&InstanceId::from("a")), Some(0));
    }
}
