//! Stable DTOs used across the regoscope workspace.
//!
//! This crate is intentionally boring:
//! - the `RegoFile` record produced for every loaded policy source
//! - the opaque `FilePath` identifier
//! - the `Selection` modes used to filter loaded files
//! - the load report envelope and its schema ids

#![forbid(unsafe_code)]

pub mod file;
pub mod path;
pub mod report;
pub mod selection;

pub use file::RegoFile;
pub use path::FilePath;
pub use report::{LoadData, LoadReport, LoadedFile, SCHEMA_LOAD_REPORT_V1, ToolMeta};
pub use selection::Selection;
