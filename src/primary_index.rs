//! `PrimaryIndex` — the unique, uid-keyed map that owns every [`Record`].

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::record::Record;

#[derive(Default)]
pub struct PrimaryIndex {
    records: HashMap<u32, Record>,
}

impl PrimaryIndex {
    pub fn new() -> PrimaryIndex {
        PrimaryIndex {
            records: HashMap::new(),
        }
    }

    pub fn find(&self, uid: u32) -> Option<&Record> {
        self.records.get(&uid)
    }

    pub fn insert(&mut self, record: Record) -> Result<()> {
        if self.records.contains_key(&record.uid) {
            return Err(Error::DuplicateUid(record.uid));
        }
        self.records.insert(record.uid, record);
        Ok(())
    }

    pub fn erase(&mut self, uid: u32) -> Result<Record> {
        self.records.remove(&uid).ok_or(Error::UnknownUid(uid))
    }

    /// Replace the stored record wholesale. Fails with [`Error::UnknownUid`]
    /// if no record exists for `record.uid`.
    pub fn replace(&mut self, record: Record) -> Result<Record> {
        if !self.records.contains_key(&record.uid) {
            return Err(Error::UnknownUid(record.uid));
        }
        Ok(self.records.insert(record.uid, record).unwrap())
    }

    pub fn size(&self) -> usize {
        self.records.len()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
#[path = "primary_index_test.rs"]
mod primary_index_test;
