//! Common error types for the CMA data tools

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for CMA operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the import pipeline and read API
#[derive(Error, Debug)]
pub enum Error {
    /// Source workbook is absent; fatal, aborts before any mutation
    #[error("Source file not found: {0}")]
    SourceNotFound(PathBuf),

    /// Named sheet is absent from the workbook; fatal
    #[error("Sheet not found in workbook: {0}")]
    SheetNotFound(String),

    /// Backup step failed; blocks any destructive rewrite
    #[error("Backup failed: {0}")]
    Backup(String),

    /// Store write failed after backup; the previous content is intact
    /// but the store was not refreshed
    #[error("Store write failed: {0}")]
    Write(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
