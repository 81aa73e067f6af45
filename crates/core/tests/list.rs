mod common;

use common::{FaultyHive, LIST_PATH, Op, ctx, list, path, raw_flag, raw_slots, seed, set_flag, strings};
use harden_core::{Event, ListError, RecordingSink, RemoveOutcome};
use harden_hive::{Hive, MemoryHive, Value};

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items.iter().map(|(i, v)| ((*i).to_owned(), (*v).to_owned())).collect()
}

#[test]
fn insert_into_absent_list_creates_slot_one() {
    let hive = MemoryHive::new();
    let sink = RecordingSink::new();
    let ctx = ctx(&hive, &sink);
    let list = list(99);

    assert!(list.entries(&ctx).unwrap().is_empty());
    assert_eq!(list.insert(&ctx, "cmd.exe").unwrap(), 1);
    assert_eq!(list.insert(&ctx, "powershell.exe").unwrap(), 2);

    assert_eq!(strings(&raw_slots(&hive)), pairs(&[("1", "cmd.exe"), ("2", "powershell.exe")]));
    assert!(matches!(
        sink.events().first(),
        Some(Event::SlotWritten { index: 1, value, .. }) if value == "cmd.exe"
    ));
}

#[test]
fn insert_fills_smallest_free_index() {
    let hive = MemoryHive::new();
    let sink = RecordingSink::new();
    let ctx = ctx(&hive, &sink);

    let key = hive.create(&path(LIST_PATH)).unwrap();
    key.set("1", &Value::from("a.exe")).unwrap();
    key.set("3", &Value::from("c.exe")).unwrap();
    drop(key);

    assert_eq!(list(99).insert(&ctx, "b.exe").unwrap(), 2);
}

#[test]
fn insert_into_full_list_fails_without_writing() {
    let hive = FaultyHive::new();
    let sink = RecordingSink::new();
    let ctx = ctx(&hive, &sink);
    seed(&hive, &["a.exe", "b.exe", "c.exe"]);
    let before = hive.mutations().len();

    let err = list(3).insert(&ctx, "d.exe").unwrap_err();
    assert!(matches!(err, ListError::StoreFull { bound: 3, .. }), "{err}");
    assert_eq!(hive.mutations().len(), before);
    assert_eq!(raw_slots(hive.memory()).len(), 3);
    assert!(sink.events().is_empty());
}

#[test]
fn insert_write_failure_leaves_list_untouched() {
    let hive = FaultyHive::new();
    let sink = RecordingSink::new();
    let ctx = ctx(&hive, &sink);
    seed(&hive, &["a.exe"]);
    hive.fail(Op::Set, "cmd.exe");

    let err = list(99).insert(&ctx, "cmd.exe").unwrap_err();
    assert!(matches!(err, ListError::StoreValue { .. }), "{err}");
    assert_eq!(strings(&raw_slots(hive.memory())), pairs(&[("1", "a.exe")]));
}

#[test]
fn unreadable_location_is_an_access_error() {
    let hive = FaultyHive::new();
    let sink = RecordingSink::new();
    let ctx = ctx(&hive, &sink);
    seed(&hive, &["a.exe"]);
    hive.fail(Op::Open, LIST_PATH);

    let list = list(99);
    assert!(matches!(list.contains(&ctx, "a.exe"), Err(ListError::StoreAccess { .. })));
    assert!(matches!(list.remove_by_value(&ctx, "a.exe"), Err(ListError::StoreAccess { .. })));
}

#[test]
fn remove_keeps_survivor_order_and_closes_gaps() {
    let hive = MemoryHive::new();
    let sink = RecordingSink::new();
    let ctx = ctx(&hive, &sink);
    seed(&hive, &["cmd.exe", "a.exe", "cmd.exe", "b.exe", "cmd.exe", "c.exe"]);
    set_flag(&hive);

    let outcome = list(99).remove_by_value(&ctx, "cmd.exe").unwrap();
    assert_eq!(outcome, RemoveOutcome { removed: 3, remaining: 3 });
    assert_eq!(
        strings(&raw_slots(&hive)),
        pairs(&[("1", "a.exe"), ("2", "b.exe"), ("3", "c.exe")])
    );
    assert_eq!(raw_flag(&hive), Some(Value::Dword(1)));
}

#[test]
fn remove_is_case_sensitive_on_values() {
    let hive = MemoryHive::new();
    let sink = RecordingSink::new();
    let ctx = ctx(&hive, &sink);
    seed(&hive, &["CMD.EXE"]);

    let outcome = list(99).remove_by_value(&ctx, "cmd.exe").unwrap();
    assert_eq!(outcome, RemoveOutcome { removed: 0, remaining: 1 });
    assert!(list(99).contains(&ctx, "CMD.EXE").unwrap());
}

#[test]
fn removing_last_value_deletes_location_and_clears_flag() {
    let hive = MemoryHive::new();
    let sink = RecordingSink::new();
    let ctx = ctx(&hive, &sink);
    seed(&hive, &["cmd.exe", "cmd.exe"]);
    set_flag(&hive);

    let outcome = list(99).remove_by_value(&ctx, "cmd.exe").unwrap();
    assert_eq!(outcome, RemoveOutcome { removed: 2, remaining: 0 });
    assert!(!hive.exists(&path(LIST_PATH)).unwrap());
    assert_eq!(raw_flag(&hive), None);

    let events = sink.events();
    assert!(events.iter().any(|e| matches!(e, Event::ListDeleted { .. })));
    assert!(matches!(events.last(), Some(Event::FlagCleared { .. })));
}

#[test]
fn remove_from_absent_list_is_a_no_op() {
    let hive = FaultyHive::new();
    let sink = RecordingSink::new();
    let ctx = ctx(&hive, &sink);
    set_flag(&hive);
    let before = hive.mutations().len();

    let outcome = list(99).remove_by_value(&ctx, "cmd.exe").unwrap();
    assert_eq!(outcome, RemoveOutcome::default());
    assert_eq!(hive.mutations().len(), before);
    assert_eq!(raw_flag(hive.memory()), Some(Value::Dword(1)));
}

#[test]
fn contains_sees_slots_beyond_the_bound() {
    let hive = MemoryHive::new();
    let sink = RecordingSink::new();
    let ctx = ctx(&hive, &sink);
    hive.create(&path(LIST_PATH)).unwrap().set("150", &Value::from("cmd.exe")).unwrap();

    let list = list(5);
    assert!(list.contains(&ctx, "cmd.exe").unwrap());
    assert_eq!(list.position(&ctx, "cmd.exe").unwrap(), Some(150));
}

#[test]
fn first_delete_failure_keeps_list_untouched() {
    let hive = FaultyHive::new();
    let sink = RecordingSink::new();
    let ctx = ctx(&hive, &sink);
    seed(&hive, &["cmd.exe", "a.exe"]);
    hive.fail(Op::Remove, "1");

    let err = list(99).remove_by_value(&ctx, "cmd.exe").unwrap_err();
    assert!(matches!(err, ListError::StoreValue { .. }), "{err}");
    assert_eq!(strings(&raw_slots(hive.memory())), pairs(&[("1", "cmd.exe"), ("2", "a.exe")]));
}

#[test]
fn rewrite_failure_is_incomplete_and_a_later_remove_heals_the_gap() {
    let hive = FaultyHive::new();
    let sink = RecordingSink::new();
    let ctx = ctx(&hive, &sink);
    seed(&hive, &["cmd.exe", "a.exe", "b.exe"]);
    hive.fail(Op::Set, "a.exe");

    let list = list(99);
    let err = list.remove_by_value(&ctx, "cmd.exe").unwrap_err();
    assert!(matches!(err, ListError::RestoreIncomplete { .. }), "{err}");
    assert!(!list.entries(&ctx).unwrap().is_contiguous());

    hive.clear_faults();
    list.remove_by_value(&ctx, "missing.exe").unwrap();
    assert_eq!(strings(&raw_slots(hive.memory())), pairs(&[("1", "a.exe"), ("2", "b.exe")]));
}

#[test]
fn cleanup_failure_is_incomplete() {
    let hive = FaultyHive::new();
    let sink = RecordingSink::new();
    let ctx = ctx(&hive, &sink);
    seed(&hive, &["cmd.exe"]);
    set_flag(&hive);
    hive.fail(Op::Delete, LIST_PATH);

    let err = list(99).remove_by_value(&ctx, "cmd.exe").unwrap_err();
    assert!(matches!(err, ListError::RestoreIncomplete { .. }), "{err}");
    assert!(raw_slots(hive.memory()).is_empty());
}

#[test]
fn activation_flag_roundtrip() {
    let hive = MemoryHive::new();
    let sink = RecordingSink::new();
    let ctx = ctx(&hive, &sink);
    let list = list(99);

    assert!(!list.is_active(&ctx).unwrap());
    list.set_activation_flag(&ctx, true).unwrap();
    assert!(list.is_active(&ctx).unwrap());
    assert_eq!(raw_flag(&hive), Some(Value::Dword(1)));

    list.set_activation_flag(&ctx, false).unwrap();
    list.set_activation_flag(&ctx, false).unwrap();
    assert!(!list.is_active(&ctx).unwrap());
    assert_eq!(raw_flag(&hive), None);
}
