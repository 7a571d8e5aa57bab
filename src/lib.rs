//! DriveCopy Library
//!
//! A command-line tool that recursively copies a Google Drive folder
//! (by ID) into another folder, with pagination-aware listing, bounded
//! retry on transient API failures, and a dry-run plan mode.
//!
//! Partial copies are not rolled back: an aborted run leaves the
//! destination tree as far as it was built, and re-running does not
//! reconcile against existing destination contents.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod engine;
pub mod error;
pub mod output;
pub mod ports;

// Re-export commonly used types
pub use domain::model::{CopyReport, CopyRequest, ItemKind, PlannedOp, RemoteItem};
pub use engine::{RetryPolicy, TreeCopier};
pub use error::{CopyError, CopyResult};
pub use ports::DrivePort;
