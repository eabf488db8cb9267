//! Pipeline orchestration
//!
//! Wires the stages together for the three maintenance operations:
//! full import (spreadsheet → store), single-record deletion, and
//! description repair. Every destructive rewrite snapshots the current
//! store first; a failed backup aborts the mutation entirely.

use crate::{describe, keys, reader, schema, validate};
use cma_common::{store, ActivityItem, Error, Result};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::PathBuf;

/// Inputs for one import run.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Source workbook (`.xlsx`/`.ods`) or CSV export
    pub workbook: PathBuf,
    /// Named sheet; first sheet when `None`
    pub sheet: Option<String>,
    /// Target JSON item store
    pub store: PathBuf,
    /// Where pre-mutation snapshots land
    pub backup_dir: PathBuf,
    /// Also run description repair before writing
    pub repair_descriptions: bool,
}

/// Row-level accounting for one run: input count, drops by reason, and the
/// resulting store content summary. Nothing is silently swallowed.
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub input_rows: usize,
    /// Rows with no data in any column
    pub blank_rows: usize,
    /// Rows dropped for lacking an identity key
    pub missing_id: usize,
    /// Rows dropped for blank/placeholder titles (ids listed in examples)
    pub blank_title: usize,
    /// Rows dropped as identity duplicates
    pub duplicate_id: usize,
    /// Records whose description changed in repair mode
    pub descriptions_repaired: usize,
    /// Records written to the store
    pub written: usize,
    /// Ids present now but not in the previous store
    pub added: Vec<String>,
    /// Ids present in the previous store but not now
    pub removed: Vec<String>,
    /// Per-category record counts
    pub categories: BTreeMap<String, usize>,
    /// Example ids of dropped rows, for the operator
    pub dropped_examples: Vec<String>,
    /// Snapshot taken before the rewrite, if a previous store existed
    pub backup: Option<PathBuf>,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Import summary:")?;
        writeln!(f, "  input rows:       {}", self.input_rows)?;
        writeln!(f, "  blank rows:       {}", self.blank_rows)?;
        writeln!(f, "  missing id:       {}", self.missing_id)?;
        writeln!(f, "  blank title:      {}", self.blank_title)?;
        writeln!(f, "  duplicate id:     {}", self.duplicate_id)?;
        if self.descriptions_repaired > 0 {
            writeln!(f, "  repaired descr.:  {}", self.descriptions_repaired)?;
        }
        writeln!(f, "  written:          {}", self.written)?;
        writeln!(
            f,
            "  changes:          +{} added, -{} removed",
            self.added.len(),
            self.removed.len()
        )?;
        if !self.dropped_examples.is_empty() {
            writeln!(f, "  dropped examples: {}", self.dropped_examples.join(", "))?;
        }
        if let Some(backup) = &self.backup {
            writeln!(f, "  backup:           {}", backup.display())?;
        }
        write!(f, "  categories:")?;
        for (category, count) in &self.categories {
            write!(f, " {category}={count}")?;
        }
        Ok(())
    }
}

/// Run the full normalization pipeline: read, normalize headers, enforce
/// identity keys, filter and deduplicate, number, then back up and
/// atomically replace the store.
pub fn run_import(opts: &ImportOptions) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    let rows = reader::read_rows(&opts.workbook, opts.sheet.as_deref())?;
    summary.input_rows = rows.len();

    let mapped: Vec<reader::RawRow> = rows.iter().map(schema::map_headers).collect();
    let (nonblank, blank): (Vec<_>, Vec<_>) = mapped.into_iter().partition(|row| !row.is_empty());
    summary.blank_rows = blank.len();

    let (keyed, skipped) = keys::require_id(nonblank);
    summary.missing_id = skipped.len();

    let items: Vec<ActivityItem> = keyed
        .into_iter()
        .map(|(id, row)| schema::build_item(&row, id))
        .collect();

    let (items, no_title) = validate::filter_empty(items);
    summary.blank_title = no_title.len();
    summary.dropped_examples.extend(no_title.iter().take(5).cloned());

    let (mut items, dup_ids) = validate::dedupe_by_id(items);
    summary.duplicate_id = dup_ids.len();
    summary.dropped_examples.extend(dup_ids.iter().take(5).cloned());

    if opts.repair_descriptions {
        summary.descriptions_repaired = describe::repair_descriptions(&mut items);
    }

    let items = keys::assign_numbers(items);

    // Change report against the previous store content
    let previous = store::load_items(&opts.store)?;
    let old_ids: HashSet<&str> = previous.iter().map(|i| i.id.as_str()).collect();
    let new_ids: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
    summary.added = items
        .iter()
        .filter(|i| !old_ids.contains(i.id.as_str()))
        .map(|i| i.id.clone())
        .collect();
    summary.removed = previous
        .iter()
        .filter(|i| !new_ids.contains(i.id.as_str()))
        .map(|i| i.id.clone())
        .collect();

    // Snapshot before overwrite; a backup failure blocks the write
    if opts.store.exists() {
        summary.backup = Some(store::backup_file(&opts.store, &opts.backup_dir)?);
    }
    store::write_items(&opts.store, &items)?;

    summary.written = items.len();
    for item in &items {
        *summary
            .categories
            .entry(item.category_label().to_string())
            .or_insert(0) += 1;
    }

    tracing::info!(
        input = summary.input_rows,
        written = summary.written,
        missing_id = summary.missing_id,
        blank_title = summary.blank_title,
        duplicate_id = summary.duplicate_id,
        "Import complete"
    );
    Ok(summary)
}

/// Result of a deletion run.
#[derive(Debug)]
pub struct DeleteOutcome {
    /// `(id, title)` of each removed record
    pub removed: Vec<(String, String)>,
    pub remaining: usize,
    pub backup: PathBuf,
}

/// Delete a record by id or activity number, then renumber and rewrite the
/// whole store (full re-export semantics). An exact id match takes
/// precedence over the number reading of the target. Returns `Ok(None)`
/// and leaves the store untouched when the target does not match anything.
pub fn delete_from_store(
    store_path: &std::path::Path,
    backup_dir: &std::path::Path,
    target: &str,
) -> Result<Option<DeleteOutcome>> {
    if !store_path.exists() {
        return Err(Error::NotFound(format!(
            "item store does not exist: {}",
            store_path.display()
        )));
    }

    let items = store::load_items(store_path)?;
    let target_ids = validate::select_deletion_targets(&items, target);
    let matched: Vec<(String, String)> = items
        .iter()
        .filter(|i| target_ids.contains(&i.id))
        .map(|i| (i.id.clone(), i.title.clone()))
        .collect();

    if matched.is_empty() {
        tracing::warn!(delete_target = %target, "No record matches the deletion target");
        return Ok(None);
    }

    let backup = store::backup_file(store_path, backup_dir)?;

    let survivors: Vec<ActivityItem> = items
        .into_iter()
        .filter(|i| !target_ids.contains(&i.id))
        .collect();
    let survivors = keys::assign_numbers(survivors);
    store::write_items(store_path, &survivors)?;

    for (id, title) in &matched {
        tracing::info!(id = %id, title = %title, "Record deleted");
    }
    Ok(Some(DeleteOutcome {
        removed: matched,
        remaining: survivors.len(),
        backup,
    }))
}

/// Result of a description-repair run.
#[derive(Debug)]
pub struct RepairOutcome {
    pub total: usize,
    pub changed: usize,
    pub backup: PathBuf,
}

/// Repair description duplicates across the existing store in place.
pub fn repair_store_descriptions(
    store_path: &std::path::Path,
    backup_dir: &std::path::Path,
) -> Result<RepairOutcome> {
    if !store_path.exists() {
        return Err(Error::NotFound(format!(
            "item store does not exist: {}",
            store_path.display()
        )));
    }

    let mut items = store::load_items(store_path)?;
    let backup = store::backup_file(store_path, backup_dir)?;

    let changed = describe::repair_descriptions(&mut items);
    store::write_items(store_path, &items)?;

    tracing::info!(total = items.len(), changed, "Description repair complete");
    Ok(RepairOutcome {
        total: items.len(),
        changed,
        backup,
    })
}
