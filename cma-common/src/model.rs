//! Canonical activity record
//!
//! One `ActivityItem` per logical activity. The JSON item store is a flat
//! array of these records; absent optional fields are omitted rather than
//! written as `null` so downstream readers keep simple optional handling.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single activity in the canonical JSON store.
///
/// `id` is the long-lived identity key, preserved verbatim across imports.
/// `activity_number` is the cosmetic `#NNN` display code, recomputed on
/// every run over the surviving record sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub activity_number: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// Discrete day tokens, parsed from the source's delimited string.
    /// Never persisted as a raw comma-separated string.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weekdays: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Display price, e.g. "150泰铢/人"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_booking: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flexible_time: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,

    /// Unmapped source columns pass through unchanged, keeping the store
    /// forward-compatible with ad hoc spreadsheet fields (e.g. `timeInfo`).
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ActivityItem {
    /// New item with only identity and title set.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            activity_number: String::new(),
            title: title.into(),
            category: None,
            location: None,
            time: None,
            weekdays: Vec::new(),
            description: None,
            price: None,
            min_price: None,
            max_price: None,
            duration: None,
            max_participants: None,
            status: None,
            require_booking: None,
            flexible_time: None,
            sort_order: None,
            extra: BTreeMap::new(),
        }
    }

    /// True when the title carries real content (non-blank).
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Category label for statistics, with the source's "uncategorized"
    /// fallback for records lacking one.
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or("未分类")
    }
}
