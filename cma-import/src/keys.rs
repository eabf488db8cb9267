//! Key assigner
//!
//! Two keys per record with very different lifetimes:
//!
//! - `id`: long-lived identity, preserved verbatim from the source so
//!   external references (URLs, bookmarks) stay valid across re-imports. A
//!   row without an id is dropped with a warning rather than given a
//!   fabricated one: a fresh id cannot be merged with any previous run and
//!   would risk duplicate or ghost records.
//! - `activityNumber`: cosmetic `#NNN` display code, recomputed as a pure
//!   fold over the surviving ordered sequence on every run. Never a
//!   business key.

use crate::reader::RawRow;
use crate::schema;
use cma_common::ActivityItem;

/// Identity key carried by a header-mapped row, if any.
pub fn row_id(mapped: &RawRow) -> Option<String> {
    let value = mapped.get("id")?;
    match value {
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Split header-mapped rows into `(id, row)` pairs and the 1-based source
/// row numbers that were skipped for lacking an id.
pub fn require_id(rows: Vec<RawRow>) -> (Vec<(String, RawRow)>, Vec<usize>) {
    let mut kept = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();
    for (index, row) in rows.into_iter().enumerate() {
        // +2: 1-based, after the header row
        let source_row = index + 2;
        match row_id(&row) {
            Some(id) => kept.push((id, row)),
            None => {
                if !row.is_empty() {
                    let title = row
                        .get("title")
                        .and_then(|v| v.as_str())
                        .unwrap_or("(untitled)");
                    tracing::warn!(row = source_row, title, "Row has no id, skipped");
                }
                skipped.push(source_row);
            }
        }
    }
    (kept, skipped)
}

/// `#NNN` display code for a zero-based position.
pub fn format_number(index: usize) -> String {
    format!("#{:03}", index + 1)
}

/// Accepts `#002`, `002` or `2` and yields the canonical `#002` form.
pub fn normalize_number(target: &str) -> Option<String> {
    let digits = target.trim().trim_start_matches('#');
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let n: usize = digits.parse().ok()?;
    if n == 0 {
        return None;
    }
    Some(format_number(n - 1))
}

/// Assign `#001..#00N` over the surviving ordered sequence. A pure fold:
/// numbering is a function of position only, so an unchanged source yields
/// byte-identical assignments on every run.
pub fn assign_numbers(items: Vec<ActivityItem>) -> Vec<ActivityItem> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, mut item)| {
            item.activity_number = format_number(index);
            item
        })
        .collect()
}
