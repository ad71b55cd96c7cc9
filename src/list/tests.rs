//! Tests for list model module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;

fn list_with(items: &[&'static str]) -> ListModel<&'static str> {
    let mut list = ListModel::new();
    list.append_items(items.iter().copied());
    list.take_changes();
    list
}

/// Footer is unique and last
fn assert_footer_invariant<T>(list: &ListModel<T>) {
    let footers: Vec<usize> = list
        .entries()
        .enumerate()
        .filter(|(_, e)| e.is_footer())
        .map(|(i, _)| i)
        .collect();
    assert!(footers.len() <= 1);
    if let Some(&index) = footers.first() {
        assert_eq!(index, list.item_count() - 1);
    }
}

// ============================================================================
// Items
// ============================================================================

#[test]
fn test_new_list_is_empty() {
    let list: ListModel<u32> = ListModel::new();
    assert!(list.is_empty());
    assert_eq!(list.item_count(), 0);
    assert!(list.item_at(0).is_none());
    assert!(list.footer().is_none());
}

#[test]
fn test_append_items_preserves_order() {
    let mut list = ListModel::new();
    list.append_items(vec![1, 2, 3]);
    list.append_items(vec![4, 5]);

    assert_eq!(list.items(), &[1, 2, 3, 4, 5]);
    assert_eq!(list.item_at(3), Some(ListEntry::Item(&4)));
    assert_eq!(
        list.take_changes(),
        vec![
            ListChange::Inserted { start: 0, count: 3 },
            ListChange::Inserted { start: 3, count: 2 },
        ]
    );
}

#[test]
fn test_append_empty_batch_records_nothing() {
    let mut list: ListModel<u32> = ListModel::new();
    list.append_items(Vec::new());
    assert!(list.take_changes().is_empty());
}

// ============================================================================
// Footer
// ============================================================================

#[test]
fn test_append_footer() {
    let mut list = list_with(&["a", "b"]);
    list.append_footer(FooterState::Loading).unwrap();

    assert_eq!(list.item_count(), 3);
    assert_eq!(list.data_count(), 2);
    assert_eq!(list.item_at(2), Some(ListEntry::Footer(&FooterState::Loading)));
    assert!(list.item_at(3).is_none());
    assert_eq!(
        list.take_changes(),
        vec![ListChange::Inserted { start: 2, count: 1 }]
    );
}

#[test]
fn test_append_second_footer_fails() {
    let mut list = list_with(&["a"]);
    list.append_footer(FooterState::Loading).unwrap();

    let err = list.append_footer(FooterState::retry("oops")).unwrap_err();
    assert!(matches!(err, Error::InvariantViolation { .. }));
    assert_eq!(list.footer(), Some(&FooterState::Loading));
}

#[test]
fn test_items_appended_after_footer_stay_before_it() {
    let mut list = list_with(&["a"]);
    list.append_footer(FooterState::Loading).unwrap();
    list.take_changes();

    list.append_items(["b", "c"]);

    let rows: Vec<_> = list.entries().collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[2], ListEntry::Item(&"c"));
    assert!(rows[3].is_footer());
    assert_footer_invariant(&list);
}

#[test]
fn test_remove_footer() {
    let mut list = list_with(&["a", "b"]);
    list.append_footer(FooterState::Loading).unwrap();
    list.take_changes();

    list.remove_footer();
    assert_eq!(list.item_count(), 2);
    assert_eq!(list.take_changes(), vec![ListChange::Removed { index: 2 }]);

    // No-op when absent
    list.remove_footer();
    assert!(list.take_changes().is_empty());
}

#[test]
fn test_set_footer_state() {
    let mut list = list_with(&["a"]);
    list.append_footer(FooterState::Loading).unwrap();
    list.take_changes();

    list.set_footer_state(FooterState::retry("No internet"))
        .unwrap();
    assert_eq!(list.footer(), Some(&FooterState::retry("No internet")));
    assert!(list.footer().unwrap().is_retry());
    assert_eq!(list.take_changes(), vec![ListChange::Changed { index: 1 }]);

    // Same state is not a change
    list.set_footer_state(FooterState::retry("No internet"))
        .unwrap();
    assert!(list.take_changes().is_empty());
}

#[test]
fn test_set_footer_state_without_footer_fails() {
    let mut list = list_with(&["a"]);
    let err = list.set_footer_state(FooterState::Loading).unwrap_err();
    assert!(matches!(err, Error::InvariantViolation { .. }));
}

#[test]
fn test_clear() {
    let mut list = list_with(&["a", "b"]);
    list.append_footer(FooterState::Loading).unwrap();
    list.take_changes();

    list.clear();
    assert!(list.is_empty());
    assert!(list.footer().is_none());
    assert_eq!(list.take_changes(), vec![ListChange::Cleared { count: 3 }]);
}

#[test]
fn test_footer_invariant_under_mixed_mutations() {
    let mut list = ListModel::new();
    for round in 0..20_u32 {
        list.append_items([round]);
        match round % 4 {
            0 => {
                let _ = list.append_footer(FooterState::Loading);
            }
            1 => {
                let _ = list.set_footer_state(FooterState::retry("again"));
            }
            2 => list.remove_footer(),
            _ => {
                let _ = list.append_footer(FooterState::retry("x"));
            }
        }
        assert_footer_invariant(&list);
    }
}

#[test]
fn test_footer_state_serde() {
    let json = serde_json::to_value(FooterState::retry("Timed out")).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"kind": "retry_prompt", "message": "Timed out"})
    );
}
