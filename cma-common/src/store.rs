//! JSON item store access
//!
//! The store is a derived, regenerable cache: a flat UTF-8 JSON array of
//! [`ActivityItem`] records, pretty-printed. Mutation follows a
//! snapshot → transform → atomic replace protocol: the previous content is
//! copied to a timestamped backup first, the new content is written to a
//! temporary path, then renamed over the target. A failed backup blocks the
//! rewrite entirely.

use crate::model::ActivityItem;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Read the full item array from the store.
///
/// A missing store file is not an error for readers of a derived cache;
/// callers that require an existing store check separately.
pub fn load_items(path: &Path) -> Result<Vec<ActivityItem>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)?;
    let items: Vec<ActivityItem> = serde_json::from_str(&content)?;
    Ok(items)
}

/// Serialize the ordered item sequence and atomically replace the store.
///
/// Writes to `<path>.tmp` then renames, so from the caller's perspective
/// either the full new content lands at the target path or the previous
/// content remains untouched.
pub fn write_items(path: &Path, items: &[ActivityItem]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Write(format!("{}: {}", parent.display(), e)))?;
        }
    }

    let json = serde_json::to_string_pretty(items)?;

    let tmp_path = tmp_path_for(path);
    std::fs::write(&tmp_path, json.as_bytes())
        .map_err(|e| Error::Write(format!("{}: {}", tmp_path.display(), e)))?;
    std::fs::rename(&tmp_path, path)
        .map_err(|e| Error::Write(format!("{}: {}", path.display(), e)))?;

    tracing::debug!(path = %path.display(), count = items.len(), "Store written");
    Ok(())
}

/// Copy the current target file into the backup directory under a
/// timestamped name, returning the backup path.
///
/// Mandatory before any destructive rewrite; a failure here must abort the
/// mutation. Backups are never auto-deleted.
pub fn backup_file(path: &Path, backup_dir: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(Error::Backup(format!(
            "nothing to back up: {}",
            path.display()
        )));
    }

    std::fs::create_dir_all(backup_dir)
        .map_err(|e| Error::Backup(format!("{}: {}", backup_dir.display(), e)))?;

    let backup_path = backup_path_for(path, backup_dir);
    std::fs::copy(path, &backup_path)
        .map_err(|e| Error::Backup(format!("{}: {}", backup_path.display(), e)))?;

    tracing::info!(
        source = %path.display(),
        backup = %backup_path.display(),
        "Backup created"
    );
    Ok(backup_path)
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

/// `items.json` → `backups/items-20260830-101502.json`, with a numeric
/// suffix when two backups land within the same second.
fn backup_path_for(path: &Path, backup_dir: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "backup".to_string());
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");

    let base = backup_dir.join(format!("{stem}-{timestamp}{ext}"));
    if !base.exists() {
        return base;
    }
    let mut n = 1;
    loop {
        let candidate = backup_dir.join(format!("{stem}-{timestamp}.{n}{ext}"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}
