use super::*;

fn rec(uid: u32, exp_pers: u32, active: u32, exp_gang: u32) -> Record {
    Record::new(uid, format!("user-{}", uid), exp_pers, active, exp_gang)
}

#[test]
fn put_then_get_round_trips() {
    let store = UserStore::new();
    store.put(rec(1, 100, 50, 10)).unwrap();
    assert_eq!(store.get(1).unwrap(), rec(1, 100, 50, 10));
    assert_eq!(store.size(), 1);
}

#[test]
fn put_duplicate_uid_fails_and_views_stay_consistent() {
    let store = UserStore::new();
    store.put(rec(1, 100, 50, 10)).unwrap();
    assert_eq!(store.put(rec(1, 1, 1, 1)).unwrap_err(), Error::DuplicateUid(1));
    assert_eq!(store.rank("exp_pers", 1).unwrap(), 1);
}

#[test]
fn get_missing_uid_fails() {
    let store = UserStore::new();
    assert_eq!(store.get(99).unwrap_err(), Error::UnknownUid(99));
}

#[test]
fn rank_scenario_matches_spec_example() {
    let store = UserStore::new();
    store.put(rec(1, 100, 0, 0)).unwrap();
    store.put(rec(2, 200, 0, 0)).unwrap();
    store.put(rec(3, 150, 0, 0)).unwrap();

    assert_eq!(store.rank("exp_pers", 1).unwrap(), 3);
    assert_eq!(store.rank("exp_pers", 2).unwrap(), 1);
    assert_eq!(store.rank("exp_pers", 3).unwrap(), 2);
}

#[test]
fn rank_for_missing_uid_fails() {
    let store = UserStore::new();
    assert_eq!(store.rank("exp_pers", 7).unwrap_err(), Error::UnknownUid(7));
}

#[test]
fn modify_moves_rank_across_every_view() {
    let store = UserStore::new();
    store.put(rec(1, 100, 50, 10)).unwrap();
    store.put(rec(2, 200, 60, 20)).unwrap();

    store.modify(rec(1, 300, 90, 30)).unwrap();

    assert_eq!(store.get(1).unwrap(), rec(1, 300, 90, 30));
    assert_eq!(store.rank("exp_pers", 1).unwrap(), 1);
    assert_eq!(store.rank("active", 1).unwrap(), 1);
    assert_eq!(store.rank("exp_gang", 1).unwrap(), 1);
}

#[test]
fn modify_missing_uid_fails() {
    let store = UserStore::new();
    assert_eq!(store.modify(rec(1, 1, 1, 1)).unwrap_err(), Error::UnknownUid(1));
}

#[test]
fn erase_removes_from_every_view() {
    let store = UserStore::new();
    store.put(rec(1, 100, 50, 10)).unwrap();
    store.put(rec(2, 200, 60, 20)).unwrap();

    store.erase(1).unwrap();

    assert_eq!(store.get(1).unwrap_err(), Error::UnknownUid(1));
    assert_eq!(store.rank("exp_pers", 2).unwrap(), 1);
    assert_eq!(store.size(), 1);
}

#[test]
fn erase_missing_uid_fails() {
    let store = UserStore::new();
    assert_eq!(store.erase(1).unwrap_err(), Error::UnknownUid(1));
}

#[test]
fn clear_empties_every_view() {
    let store = UserStore::new();
    store.put(rec(1, 100, 50, 10)).unwrap();
    store.put(rec(2, 200, 60, 20)).unwrap();
    store.clear();
    assert_eq!(store.size(), 0);
    assert_eq!(store.put(rec(1, 1, 1, 1)), Ok(()));
}

#[test]
fn view_names_lists_all_five_in_registration_order() {
    let store = UserStore::new();
    assert_eq!(
        store.view_names(),
        vec!["exp_pers", "active", "exp_gang", "hybrid_a", "hybrid_b"]
    );
}

#[test]
fn hybrid_views_are_reachable_through_rank() {
    let store = UserStore::new();
    store.put(rec(1, 100, 100, 100)).unwrap();
    store.put(rec(2, 0, 0, 0)).unwrap();
    assert_eq!(store.rank("hybrid_a", 1).unwrap(), 1);
    assert_eq!(store.rank("hybrid_b", 1).unwrap(), 1);
}
