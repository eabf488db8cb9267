//! Row validator / deduplicator
//!
//! Two independent filters, applied in this order:
//! 1. Emptiness: rows whose canonical title is absent, blank, or a known
//!    placeholder are dropped, as are rows with no data in any column.
//! 2. Identity duplicates: the first occurrence of an `id` wins; later rows
//!    with the same id are dropped and counted.
//!
//! Semantic (description) duplicates are handled separately in
//! [`crate::describe`], only in repair mode.

use crate::keys;
use cma_common::ActivityItem;

/// Literal values the spreadsheet uses for "unset" titles.
const PLACEHOLDER_TITLES: &[&str] = &["未命名", "N/A", "n/a", "-"];

/// True when the title is absent, blank, or a placeholder.
pub fn is_blank_title(title: &str) -> bool {
    let trimmed = title.trim();
    trimmed.is_empty() || PLACEHOLDER_TITLES.contains(&trimmed)
}

/// Emptiness filter: keep rows with a real title, return dropped ids with
/// the offending title for the summary.
pub fn filter_empty(items: Vec<ActivityItem>) -> (Vec<ActivityItem>, Vec<String>) {
    let mut kept = Vec::with_capacity(items.len());
    let mut dropped = Vec::new();
    for item in items {
        if is_blank_title(&item.title) {
            tracing::warn!(id = %item.id, title = %item.title, "Blank or placeholder title, row dropped");
            dropped.push(item.id);
        } else {
            kept.push(item);
        }
    }
    (kept, dropped)
}

/// Identity duplicate filter: exactly one record per `id`, first occurrence
/// wins, original order preserved. Returns the dropped duplicate ids.
pub fn dedupe_by_id(items: Vec<ActivityItem>) -> (Vec<ActivityItem>, Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    let mut kept = Vec::with_capacity(items.len());
    let mut dropped = Vec::new();
    for item in items {
        if seen.insert(item.id.clone()) {
            kept.push(item);
        } else {
            tracing::warn!(id = %item.id, title = %item.title, "Duplicate id, row dropped");
            dropped.push(item.id);
        }
    }
    (kept, dropped)
}

/// Resolve a deletion target to the ids it names. Two mutually exclusive
/// tiers: an exact `id` match wins outright; only when no id matches is
/// the target read as an activity number (`#002`, `002`, `2`). A bare
/// digit like `2` therefore never removes both the record whose id is
/// literally `"2"` and the unrelated record numbered `#002`.
pub fn select_deletion_targets(items: &[ActivityItem], target: &str) -> Vec<String> {
    let trimmed = target.trim();

    let by_id: Vec<String> = items
        .iter()
        .filter(|i| i.id == trimmed)
        .map(|i| i.id.clone())
        .collect();
    if !by_id.is_empty() {
        return by_id;
    }

    match keys::normalize_number(trimmed) {
        Some(number) => items
            .iter()
            .filter(|i| i.activity_number == number)
            .map(|i| i.id.clone())
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_titles_are_blank() {
        assert!(is_blank_title(""));
        assert!(is_blank_title("   "));
        assert!(is_blank_title("未命名"));
        assert!(is_blank_title(" N/A "));
        assert!(!is_blank_title("晨间瑜伽"));
    }

    #[test]
    fn empty_filter_keeps_titled_rows_once() {
        let items = vec![
            ActivityItem::new("1", "Yoga"),
            ActivityItem::new("2", "未命名"),
            ActivityItem::new("3", ""),
            ActivityItem::new("4", "Hike"),
        ];
        let (kept, dropped) = filter_empty(items);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].id, "1");
        assert_eq!(kept[1].id, "4");
        assert_eq!(dropped, vec!["2", "3"]);
    }

    #[test]
    fn duplicate_ids_converge_to_one_record() {
        let items = vec![
            ActivityItem::new("17693677202621728", "First edit"),
            ActivityItem::new("5", "Other"),
            ActivityItem::new("17693677202621728", "Second edit"),
        ];
        let (kept, dropped) = dedupe_by_id(items);
        assert_eq!(kept.len(), 2);
        // First occurrence wins
        assert_eq!(kept[0].title, "First edit");
        assert_eq!(dropped, vec!["17693677202621728"]);
    }

    fn numbered(id: &str, number: &str) -> ActivityItem {
        let mut item = ActivityItem::new(id, "Yoga");
        item.activity_number = number.to_string();
        item
    }

    #[test]
    fn deletion_targets_match_by_id_or_number() {
        let items = vec![numbered("17693677202621728", "#002")];

        assert_eq!(
            select_deletion_targets(&items, "17693677202621728"),
            vec!["17693677202621728"]
        );
        for target in ["#002", "002", "2"] {
            assert_eq!(
                select_deletion_targets(&items, target),
                vec!["17693677202621728"]
            );
        }
        assert!(select_deletion_targets(&items, "#003").is_empty());
        assert!(select_deletion_targets(&items, "999").is_empty());
    }

    #[test]
    fn exact_id_match_shadows_number_match() {
        // A record whose id is literally "2" and an unrelated record
        // numbered #002: the bare-digit target names only the former
        let items = vec![numbered("2", "#005"), numbered("900", "#002")];

        assert_eq!(select_deletion_targets(&items, "2"), vec!["2"]);
        // The number form still reaches #002 when no id collides
        assert_eq!(select_deletion_targets(&items, "#002"), vec!["900"]);
    }
}
