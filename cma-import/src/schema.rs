//! Schema normalizer
//!
//! Maps heterogeneous historical column headers onto the fixed canonical
//! field set. The spreadsheet has been through several header revisions
//! (`地点` → `地点名称` → `地点名称*`), so the mapping is a pure function from
//! header string to canonical name, maintained to cover every variant that
//! ever shipped. Column position is never consulted: spreadsheet column
//! order is not stable across hand edits.
//!
//! Unmapped headers pass through unchanged rather than being dropped,
//! keeping the pipeline forward-compatible with new ad hoc fields.

use crate::reader::RawRow;
use cma_common::ActivityItem;
use serde_json::Value;

/// Canonical field name for a source column header, or `None` when the
/// header is not a recognized historical variant.
pub fn canonical_field(header: &str) -> Option<&'static str> {
    match header {
        "id" => Some("id"),
        "活动标题" | "活动标题*" | "title" => Some("title"),
        "分类" | "分类*" | "category" => Some("category"),
        "地点" | "地点名称" | "地点名称*" | "location" => Some("location"),
        "时间" | "时间*" | "time" => Some("time"),
        "星期" | "星期*" | "weekdays" => Some("weekdays"),
        "价格" | "价格显示" | "price" => Some("price"),
        "描述" | "活动描述" | "活动描述*" | "description" => Some("description"),
        "状态" | "status" => Some("status"),
        "需要预约" | "requireBooking" => Some("requireBooking"),
        "灵活时间" | "flexibleTime" => Some("flexibleTime"),
        "持续时间" | "duration" => Some("duration"),
        "最低价格" | "minPrice" => Some("minPrice"),
        "最高价格" | "maxPrice" => Some("maxPrice"),
        "最大人数" | "maxParticipants" => Some("maxParticipants"),
        "时间信息" | "timeInfo" => Some("timeInfo"),
        "序号" | "sortOrder" => Some("sortOrder"),
        "活动编号" | "activityNumber" => Some("activityNumber"),
        _ => None,
    }
}

/// Rewrite a raw row's headers to canonical field names. Unrecognized
/// headers are kept verbatim. When two source headers resolve to the same
/// canonical field the first (in header sort order) wins.
pub fn map_headers(raw: &RawRow) -> RawRow {
    let mut mapped = RawRow::new();
    for (header, value) in raw {
        let key = canonical_field(header).unwrap_or(header.as_str());
        mapped.entry(key.to_string()).or_insert_with(|| value.clone());
    }
    mapped
}

/// Split the source's delimited weekday string into discrete day tokens.
/// The spreadsheet uses ASCII and fullwidth commas plus the ideographic
/// enumeration comma interchangeably.
pub fn parse_weekdays(raw: &str) -> Vec<String> {
    raw.split(['，', ',', '、'])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Build a canonical item from a header-mapped row and its identity key.
///
/// Typed fields are coerced from whatever scalar the cell held (CSV sources
/// deliver every value as a string); everything outside the canonical field
/// set passes into `extra`. The source's `activityNumber` column is
/// discarded: display codes are recomputed over the surviving sequence on
/// every run.
pub fn build_item(mapped: &RawRow, id: String) -> ActivityItem {
    let mut item = ActivityItem::new(id, text_field(mapped, "title").unwrap_or_default());

    item.category = text_field(mapped, "category");
    item.location = text_field(mapped, "location");
    item.time = text_field(mapped, "time");
    item.description = text_field(mapped, "description");
    item.price = text_field(mapped, "price");
    item.duration = text_field(mapped, "duration");
    item.status = text_field(mapped, "status");
    item.min_price = number_field(mapped, "minPrice");
    item.max_price = number_field(mapped, "maxPrice");
    item.max_participants = integer_field(mapped, "maxParticipants");
    item.sort_order = integer_field(mapped, "sortOrder");
    item.require_booking = bool_field(mapped, "requireBooking");
    item.flexible_time = bool_field(mapped, "flexibleTime");

    if let Some(raw) = text_field(mapped, "weekdays") {
        item.weekdays = parse_weekdays(&raw);
    }

    const TYPED_FIELDS: &[&str] = &[
        "id",
        "activityNumber",
        "title",
        "category",
        "location",
        "time",
        "weekdays",
        "description",
        "price",
        "duration",
        "status",
        "minPrice",
        "maxPrice",
        "maxParticipants",
        "sortOrder",
        "requireBooking",
        "flexibleTime",
    ];
    for (key, value) in mapped {
        if !TYPED_FIELDS.contains(&key.as_str()) {
            item.extra.insert(key.clone(), value.clone());
        }
    }

    item
}

fn text_field(row: &RawRow, key: &str) -> Option<String> {
    row.get(key).and_then(value_to_text)
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn number_field(row: &RawRow, key: &str) -> Option<f64> {
    match row.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn integer_field(row: &RawRow, key: &str) -> Option<i64> {
    match row.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

fn bool_field(row: &RawRow, key: &str) -> Option<bool> {
    match row.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.trim() {
            "是" | "true" | "TRUE" | "yes" | "y" | "1" => Some(true),
            "否" | "false" | "FALSE" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every header that ever appeared in a shipped spreadsheet revision
    /// must resolve to its canonical field.
    #[test]
    fn every_historical_header_resolves() {
        let cases = [
            ("id", "id"),
            ("活动标题", "title"),
            ("活动标题*", "title"),
            ("分类", "category"),
            ("分类*", "category"),
            ("地点", "location"),
            ("地点名称", "location"),
            ("地点名称*", "location"),
            ("时间", "time"),
            ("时间*", "time"),
            ("星期", "weekdays"),
            ("星期*", "weekdays"),
            ("价格", "price"),
            ("价格显示", "price"),
            ("描述", "description"),
            ("活动描述", "description"),
            ("活动描述*", "description"),
            ("状态", "status"),
            ("需要预约", "requireBooking"),
            ("灵活时间", "flexibleTime"),
            ("持续时间", "duration"),
            ("最低价格", "minPrice"),
            ("最高价格", "maxPrice"),
            ("最大人数", "maxParticipants"),
            ("时间信息", "timeInfo"),
            ("序号", "sortOrder"),
            ("活动编号", "activityNumber"),
        ];
        for (header, expected) in cases {
            assert_eq!(
                canonical_field(header),
                Some(expected),
                "header {header:?} must map to {expected:?}"
            );
        }
    }

    #[test]
    fn unmapped_headers_pass_through() {
        assert_eq!(canonical_field("随便写的列"), None);

        let mut raw = RawRow::new();
        raw.insert("活动标题*".to_string(), "夜市".into());
        raw.insert("随便写的列".to_string(), "保留我".into());
        let mapped = map_headers(&raw);
        assert_eq!(mapped["title"], "夜市");
        assert_eq!(mapped["随便写的列"], "保留我");
    }

    #[test]
    fn weekday_string_splits_on_every_delimiter() {
        assert_eq!(
            parse_weekdays("周一,周三，周五、周日"),
            vec!["周一", "周三", "周五", "周日"]
        );
        assert_eq!(parse_weekdays(" 周六 "), vec!["周六"]);
        assert!(parse_weekdays("").is_empty());
        assert!(parse_weekdays(" , ，").is_empty());
    }

    #[test]
    fn build_item_coerces_typed_fields() {
        let mut mapped = RawRow::new();
        mapped.insert("title".to_string(), "晨间瑜伽".into());
        mapped.insert("weekdays".to_string(), "周一,周三".into());
        mapped.insert("minPrice".to_string(), "150".into());
        mapped.insert("maxPrice".to_string(), serde_json::json!(300.5));
        mapped.insert("maxParticipants".to_string(), serde_json::json!(12));
        mapped.insert("requireBooking".to_string(), "是".into());
        mapped.insert("flexibleTime".to_string(), "否".into());
        mapped.insert("timeInfo".to_string(), "上午".into());
        // Display code from the sheet is recomputed, never copied
        mapped.insert("activityNumber".to_string(), "#099".into());

        let item = build_item(&mapped, "101".to_string());
        assert_eq!(item.id, "101");
        assert_eq!(item.title, "晨间瑜伽");
        assert_eq!(item.weekdays, vec!["周一", "周三"]);
        assert_eq!(item.min_price, Some(150.0));
        assert_eq!(item.max_price, Some(300.5));
        assert_eq!(item.max_participants, Some(12));
        assert_eq!(item.require_booking, Some(true));
        assert_eq!(item.flexible_time, Some(false));
        assert_eq!(item.extra["timeInfo"], "上午");
        assert!(item.activity_number.is_empty());
        assert!(!item.extra.contains_key("activityNumber"));
    }

    #[test]
    fn first_header_wins_on_canonical_collision() {
        let mut raw = RawRow::new();
        raw.insert("地点".to_string(), "老城".into());
        raw.insert("地点名称*".to_string(), "宁曼路".into());
        let mapped = map_headers(&raw);
        // BTreeMap iteration is deterministic, so the outcome is stable
        // across runs regardless of spreadsheet column order
        assert_eq!(mapped["location"], "老城");
    }
}
