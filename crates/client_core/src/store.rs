use std::collections::BTreeSet;

use shared::{domain::MemberId, protocol::Member};

pub trait Record {
    type Id: Copy + Ord;

    fn id(&self) -> Self::Id;
}

impl Record for Member {
    type Id = MemberId;

    fn id(&self) -> MemberId {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct ResourceList<R> {
    records: Vec<R>,
}

impl<R> Default for ResourceList<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: Record + Clone> ResourceList<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: R::Id) -> bool {
        self.records.iter().any(|record| record.id() == id)
    }

    pub fn append(&mut self, record: R) {
        self.records.push(record);
    }

    /// Returns the records whose ids are not in `ids`, keeping relative order.
    /// The list itself is left untouched.
    pub fn remove(&self, ids: &BTreeSet<R::Id>) -> Vec<R> {
        self.records
            .iter()
            .filter(|record| !ids.contains(&record.id()))
            .cloned()
            .collect()
    }

    pub fn replace(&mut self, records: Vec<R>) {
        self.records = records;
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
