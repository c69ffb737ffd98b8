//! `UserStore` — the multi-index coordinator. Owns one [`PrimaryIndex`] and
//! one [`RankedIndex`] per registered [`View`], and keeps them consistent
//! (I1-I4 in `SPEC_FULL.md` §3) under insert, update and delete.
//!
//! All state lives behind a single [`RwLock`], per `SPEC_FULL.md` §5: one
//! lock for the whole coordinator, not one per index, so a reader never
//! observes a mutation that updated some indexes but not others.

use std::sync::RwLock;

use log::{info, warn};

use crate::error::{Error, Result};
use crate::primary_index::PrimaryIndex;
use crate::ranked_index::RankedIndex;
use crate::record::{view_registry, Record, View};

struct Inner {
    primary: PrimaryIndex,
    views: Vec<View>,
    ranked: Vec<RankedIndex>,
}

impl Inner {
    fn view_index(&self, name: &str) -> Option<usize> {
        self.views.iter().position(|v| v.name == name)
    }
}

pub struct UserStore {
    inner: RwLock<Inner>,
}

impl UserStore {
    pub fn new() -> UserStore {
        let views = view_registry();
        let ranked = views.iter().map(|_| RankedIndex::new()).collect();
        UserStore {
            inner: RwLock::new(Inner {
                primary: PrimaryIndex::new(),
                views,
                ranked,
            }),
        }
    }

    /// Names of every registered ranked view, in registration order.
    pub fn view_names(&self) -> Vec<&'static str> {
        self.inner.read().unwrap().views.iter().map(|v| v.name).collect()
    }

    pub fn put(&self, record: Record) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        let uid = record.uid;
        if inner.primary.find(uid).is_some() {
            warn!("put: uid {} already present", uid);
            return Err(Error::DuplicateUid(uid));
        }

        // Insert into every ranked view first, rolling back on failure, then
        // commit to the primary index only once every view has succeeded —
        // this keeps I2 (membership parity) intact even on an unexpected
        // mid-way error.
        let mut inserted = Vec::with_capacity(inner.views.len());
        for i in 0..inner.views.len() {
            let score = (inner.views[i].project)(&record);
            match inner.ranked[i].insert(score, uid) {
                Ok(()) => inserted.push((i, score)),
                Err(err) => {
                    for (j, score) in inserted {
                        let _ = inner.ranked[j].erase(score, uid);
                    }
                    warn!("put: uid {} failed on view {}: {}", uid, inner.views[i].name, err);
                    return Err(err);
                }
            }
        }
        inner.primary.insert(record).expect("precheck guarantees this succeeds");
        info!("put: uid {} inserted", uid);
        Ok(())
    }

    pub fn modify(&self, record: Record) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        let uid = record.uid;
        let old = match inner.primary.find(uid) {
            Some(old) => old.clone(),
            None => {
                warn!("modify: uid {} not found", uid);
                return Err(Error::UnknownUid(uid));
            }
        };

        for i in 0..inner.views.len() {
            let old_score = (inner.views[i].project)(&old);
            let new_score = (inner.views[i].project)(&record);
            if old_score != new_score {
                inner.ranked[i]
                    .update(old_score, new_score, uid)
                    .expect("old_score must already be present for this uid");
            }
        }
        inner.primary.replace(record)?;
        info!("modify: uid {} updated", uid);
        Ok(())
    }

    pub fn erase(&self, uid: u32) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        let record = match inner.primary.find(uid) {
            Some(record) => record.clone(),
            None => {
                warn!("erase: uid {} not found", uid);
                return Err(Error::UnknownUid(uid));
            }
        };
        for i in 0..inner.views.len() {
            let score = (inner.views[i].project)(&record);
            inner.ranked[i]
                .erase(score, uid)
                .expect("ranked index must hold an entry for every live record");
        }
        inner.primary.erase(uid)?;
        info!("erase: uid {} removed", uid);
        Ok(())
    }

    pub fn get(&self, uid: u32) -> Result<Record> {
        let inner = self.inner.read().unwrap();
        inner.primary.find(uid).cloned().ok_or(Error::UnknownUid(uid))
    }

    /// Look up the record, project it with the named view, and return its
    /// rank under that view. Fails with [`Error::UnknownUid`] for a missing
    /// uid; an unknown view name is a programmer error (the HTTP routes only
    /// ever pass view names from the fixed registry) and panics.
    pub fn rank(&self, view_name: &str, uid: u32) -> Result<usize> {
        let inner = self.inner.read().unwrap();
        let record = inner.primary.find(uid).ok_or(Error::UnknownUid(uid))?;
        let i = inner
            .view_index(view_name)
            .unwrap_or_else(|| panic!("no such ranked view: {}", view_name));
        let score = (inner.views[i].project)(record);
        Ok(inner.ranked[i].find_rank(score))
    }

    pub fn size(&self) -> usize {
        self.inner.read().unwrap().primary.size()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.primary.clear();
        for ranked in inner.ranked.iter_mut() {
            *ranked = RankedIndex::new();
        }
    }
}

impl Default for UserStore {
    fn default() -> UserStore {
        UserStore::new()
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;
