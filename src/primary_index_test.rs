use super::*;

fn rec(uid: u32) -> Record {
    Record::new(uid, format!("user-{}", uid), 1, 2, 3)
}

#[test]
fn insert_then_find_round_trips() {
    let mut idx = PrimaryIndex::new();
    idx.insert(rec(1)).unwrap();
    assert_eq!(idx.find(1), Some(&rec(1)));
    assert_eq!(idx.size(), 1);
}

#[test]
fn duplicate_insert_fails() {
    let mut idx = PrimaryIndex::new();
    idx.insert(rec(1)).unwrap();
    assert_eq!(idx.insert(rec(1)).unwrap_err(), Error::DuplicateUid(1));
}

#[test]
fn erase_missing_uid_fails() {
    let mut idx = PrimaryIndex::new();
    assert_eq!(idx.erase(42).unwrap_err(), Error::UnknownUid(42));
}

#[test]
fn erase_removes_the_record() {
    let mut idx = PrimaryIndex::new();
    idx.insert(rec(1)).unwrap();
    let erased = idx.erase(1).unwrap();
    assert_eq!(erased, rec(1));
    assert_eq!(idx.find(1), None);
    assert_eq!(idx.size(), 0);
}

#[test]
fn replace_missing_uid_fails() {
    let mut idx = PrimaryIndex::new();
    assert_eq!(idx.replace(rec(1)).unwrap_err(), Error::UnknownUid(1));
}

#[test]
fn replace_swaps_the_whole_record() {
    let mut idx = PrimaryIndex::new();
    idx.insert(rec(1)).unwrap();
    let mut updated = rec(1);
    updated.name = "renamed".into();
    updated.exp_pers = 99;
    let old = idx.replace(updated.clone()).unwrap();
    assert_eq!(old, rec(1));
    assert_eq!(idx.find(1), Some(&updated));
}

#[test]
fn clear_empties_the_index() {
    let mut idx = PrimaryIndex::new();
    idx.insert(rec(1)).unwrap();
    idx.insert(rec(2)).unwrap();
    idx.clear();
    assert_eq!(idx.size(), 0);
}
