//! Source reader
//!
//! Loads the spreadsheet workbook (or a CSV export of it) into an ordered
//! sequence of raw rows: header → scalar maps in original row order. Blank
//! cells are omitted from the map. Reading has no side effects; a missing
//! file or sheet aborts the run before any mutation happens downstream.

use calamine::{open_workbook_auto, Data, Reader};
use cma_common::{Error, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// One source row: column header → scalar value. Ephemeral, exists only
/// during a single pipeline run.
pub type RawRow = BTreeMap<String, Value>;

/// Read all rows from the given source file in original order.
///
/// `.csv` sources are read with the CSV reader (every scalar a string);
/// anything else is opened as a spreadsheet workbook. `sheet` selects a
/// named worksheet, defaulting to the first one.
pub fn read_rows(path: &Path, sheet: Option<&str>) -> Result<Vec<RawRow>> {
    if !path.exists() {
        return Err(Error::SourceNotFound(path.to_path_buf()));
    }

    let is_csv = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let rows = if is_csv {
        read_csv_rows(path)?
    } else {
        read_workbook_rows(path, sheet)?
    };

    tracing::info!(
        path = %path.display(),
        rows = rows.len(),
        "Source read"
    );
    Ok(rows)
}

fn read_workbook_rows(path: &Path, sheet: Option<&str>) -> Result<Vec<RawRow>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| Error::InvalidInput(format!("cannot open workbook {}: {}", path.display(), e)))?;

    let sheet_names = workbook.sheet_names().to_owned();
    let sheet_name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|n| n == name) {
                return Err(Error::SheetNotFound(name.to_string()));
            }
            name.to_string()
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| Error::SheetNotFound("(workbook has no sheets)".to_string()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| Error::InvalidInput(format!("cannot read sheet {}: {}", sheet_name, e)))?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(header_row) => header_row.iter().map(header_text).collect(),
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for source_row in rows_iter {
        let mut row = RawRow::new();
        for (col, cell) in source_row.iter().enumerate() {
            let Some(header) = headers.get(col).filter(|h| !h.is_empty()) else {
                continue;
            };
            if let Some(value) = cell_to_value(cell) {
                row.insert(header.clone(), value);
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

fn read_csv_rows(path: &Path) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| Error::InvalidInput(format!("cannot open CSV {}: {}", path.display(), e)))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::InvalidInput(format!("cannot read CSV header: {}", e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| Error::InvalidInput(format!("cannot read CSV row: {}", e)))?;
        let mut row = RawRow::new();
        for (col, field) in record.iter().enumerate() {
            let Some(header) = headers.get(col).filter(|h| !h.is_empty()) else {
                continue;
            };
            let trimmed = field.trim();
            if !trimmed.is_empty() {
                row.insert(header.clone(), Value::String(trimmed.to_string()));
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// Convert one spreadsheet cell to a JSON scalar; blank cells become `None`
/// so absent data is absent from the row map.
pub(crate) fn cell_to_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(Value::String(trimmed.to_string()))
            }
        }
        // Integral floats come back from spreadsheets for plain numbers;
        // keep them as integers across the full i64 range so 17-digit
        // timestamp ids come out as plain digits, never scientific notation
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 9.2e18 {
                Some(Value::from(*f as i64))
            } else {
                serde_json::Number::from_f64(*f).map(Value::Number)
            }
        }
        Data::Int(i) => Some(Value::from(*i)),
        Data::Bool(b) => Some(Value::Bool(*b)),
        Data::DateTime(dt) => serde_json::Number::from_f64(dt.as_f64()).map(Value::Number),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Value::String(s.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn missing_source_is_fatal() {
        let err = read_rows(Path::new("/nonexistent/activities.xlsx"), None).unwrap_err();
        assert!(matches!(err, Error::SourceNotFound(_)));
    }

    #[test]
    fn csv_rows_keep_order_and_skip_blank_cells() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("activities.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "id,活动标题*,分类*").unwrap();
        writeln!(f, "101,晨间瑜伽,运动").unwrap();
        writeln!(f, "102,徒步,").unwrap();
        writeln!(f, ",,").unwrap();
        drop(f);

        let rows = read_rows(&path, None).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["id"], "101");
        assert_eq!(rows[0]["活动标题*"], "晨间瑜伽");
        // Blank cell omitted from the map
        assert!(!rows[1].contains_key("分类*"));
        // All-blank row read as an empty map, dropped later by the validator
        assert!(rows[2].is_empty());
    }

    #[test]
    fn integral_floats_become_integers() {
        assert_eq!(cell_to_value(&Data::Float(65.0)), Some(Value::from(65)));
        assert_eq!(cell_to_value(&Data::Float(1.5)), Some(Value::from(1.5)));
        assert_eq!(cell_to_value(&Data::Empty), None);
        assert_eq!(cell_to_value(&Data::String("  ".to_string())), None);
    }

    #[test]
    fn long_timestamp_ids_render_as_plain_digits() {
        // Workbook id cells hold 17-digit timestamp ids as plain numbers;
        // they must survive verbatim, never as 1.76936…e+16
        let value = cell_to_value(&Data::Float(17693677202621728.0)).unwrap();
        assert_eq!(value, Value::from(17693677202621728_i64));
        assert_eq!(value.to_string(), "17693677202621728");
    }
}
