use crate::types::{NodeId, NodeRecord};
use indexmap::IndexMap;

/// Node records keyed by uid.
///
/// Insertion order is kept so log lines and serialized results come out in
/// the order nodes were classified. Keys are unique; inserting a record for
/// an existing uid replaces it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeCollection {
    nodes: IndexMap<NodeId, NodeRecord>,
}

impl NodeCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list of records. A later duplicate uid overwrites the
    /// earlier record but keeps its position.
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = NodeRecord>,
    {
        records.into_iter().collect()
    }

    pub fn from_uids<I>(uids: I) -> Self
    where
        I: IntoIterator<Item = NodeId>,
    {
        uids.into_iter().map(NodeRecord::new).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, uid: NodeId) -> bool {
        self.nodes.contains_key(&uid)
    }

    pub fn get(&self, uid: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(&uid)
    }

    /// Returns the record previously stored under the same uid, if any.
    pub fn insert(&mut self, record: NodeRecord) -> Option<NodeRecord> {
        self.nodes.insert(record.uid, record)
    }

    pub fn remove(&mut self, uid: NodeId) -> Option<NodeRecord> {
        self.nodes.shift_remove(&uid)
    }

    pub fn uids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    pub fn sorted_uids(&self) -> Vec<NodeId> {
        let mut uids = self.uids();
        uids.sort_unstable();
        uids
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeRecord> {
        self.nodes.values()
    }

    pub fn to_records(&self) -> Vec<NodeRecord> {
        self.nodes.values().cloned().collect()
    }
}

impl FromIterator<NodeRecord> for NodeCollection {
    fn from_iter<I: IntoIterator<Item = NodeRecord>>(iter: I) -> Self {
        let mut collection = NodeCollection::new();
        for record in iter {
            collection.insert(record);
        }
        collection
    }
}

impl IntoIterator for NodeCollection {
    type Item = NodeRecord;
    type IntoIter = indexmap::map::IntoValues<NodeId, NodeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_values()
    }
}

impl<'a> IntoIterator for &'a NodeCollection {
    type Item = &'a NodeRecord;
    type IntoIter = indexmap::map::Values<'a, NodeId, NodeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.values()
    }
}
