// Scheduling conflict detection
//
// Two items conflict when their half-open intervals `[start, end)` overlap.
// Times are compared as fixed-width `HH:MM` strings; spans that cross
// midnight are not wrapped.

use std::collections::HashSet;

use crate::types::ScheduleItem;

/// A pair of conflicting item ids, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub first: String,
    pub second: String,
}

/// Whether `a` and `b` overlap under the half-open rule.
///
/// A zero-length item covers no time and so overlaps nothing.
pub fn overlaps(a: &ScheduleItem, b: &ScheduleItem) -> bool {
    if is_empty_span(a) || is_empty_span(b) {
        return false;
    }
    a.start_time < b.end_time && b.start_time < a.end_time
}

fn is_empty_span(item: &ScheduleItem) -> bool {
    item.start_time == item.end_time
}

/// Every overlapping pair for one day's items.
pub fn conflicting_pairs(items: &[ScheduleItem]) -> Vec<Conflict> {
    let mut pairs = Vec::new();
    for (i, a) in items.iter().enumerate() {
        for b in &items[i + 1..] {
            if overlaps(a, b) {
                pairs.push(Conflict { first: a.id.clone(), second: b.id.clone() });
            }
        }
    }
    pairs
}

/// Ids of items that take part in at least one overlap.
pub fn detect_conflicts(items: &[ScheduleItem]) -> HashSet<String> {
    conflicting_pairs(items)
        .into_iter()
        .flat_map(|pair| [pair.first, pair.second])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActivityCategory;

    fn item(id: &str, start: &str, end: &str) -> ScheduleItem {
        ScheduleItem::new(ActivityCategory::Studying, start, end, id).with_id(id)
    }

    #[test]
    fn test_empty_and_single_have_no_conflicts() {
        assert!(detect_conflicts(&[]).is_empty());
        assert!(detect_conflicts(&[item("a", "08:00", "09:00")]).is_empty());
    }

    #[test]
    fn test_touching_intervals_do_not_conflict() {
        let items = vec![item("a", "08:00", "09:00"), item("b", "09:00", "10:00")];
        assert!(detect_conflicts(&items).is_empty());
    }

    #[test]
    fn test_overlap_flags_both_items() {
        let items = vec![item("a", "08:00", "09:30"), item("b", "09:00", "10:00")];
        let conflicts = detect_conflicts(&items);

        assert_eq!(conflicts.len(), 2);
        assert!(conflicts.contains("a"));
        assert!(conflicts.contains("b"));
    }

    #[test]
    fn test_conflict_is_symmetric() {
        let a = item("a", "10:00", "12:00");
        let b = item("b", "11:00", "11:30");
        assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        assert_eq!(detect_conflicts(&[a.clone(), b.clone()]), detect_conflicts(&[b, a]));
    }

    #[test]
    fn test_zero_length_item_never_conflicts() {
        let items = vec![item("a", "08:00", "10:00"), item("b", "09:00", "09:00")];
        assert!(detect_conflicts(&items).is_empty());
    }

    #[test]
    fn test_only_overlapping_items_reported() {
        let items = vec![
            item("a", "08:00", "09:00"),
            item("b", "08:30", "09:15"),
            item("c", "13:00", "14:00"),
        ];
        let conflicts = detect_conflicts(&items);

        assert!(!conflicts.contains("c"));
        assert_eq!(
            conflicting_pairs(&items),
            vec![Conflict { first: "a".to_string(), second: "b".to_string() }]
        );
    }

    #[test]
    fn test_cross_midnight_item_is_not_wrapped() {
        // 23:00-01:00 compares as ending before it starts, so it overlaps nothing.
        let items = vec![item("late", "23:00", "01:00"), item("early", "00:00", "00:30")];
        assert!(detect_conflicts(&items).is_empty());
    }
}
