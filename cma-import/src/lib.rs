//! cma-import library interface
//!
//! The spreadsheet-to-canonical-store normalization pipeline, staged as:
//! reader → schema normalizer → key assigner → validator/deduplicator →
//! store writer. Each stage is a pure transformation over the ordered row
//! sequence; all file mutation goes through `cma_common::store` with its
//! backup-then-atomic-replace protocol.

pub mod describe;
pub mod keys;
pub mod pipeline;
pub mod reader;
pub mod schema;
pub mod validate;

pub use pipeline::{run_import, ImportOptions, ImportSummary};
pub use reader::RawRow;
