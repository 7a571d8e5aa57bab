// Domain models - Core types and data structures

use std::fmt;

use crate::error::{CopyError, CopyResult};

/// Kind of a remote item as reported by the listing interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Folder,
    File,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Folder => write!(f, "folder"),
            ItemKind::File => write!(f, "file"),
        }
    }
}

/// One node of the source tree as returned by the remote listing
/// interface. Immutable once listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteItem {
    /// Opaque identifier, unique within the storage system
    pub id: String,
    /// Display name
    pub name: String,
    pub kind: ItemKind,
    /// Parent folder identifier, absent for roots the caller cannot see above
    pub parent: Option<String>,
}

impl RemoteItem {
    pub fn is_folder(&self) -> bool {
        self.kind == ItemKind::Folder
    }
}

/// One page of a child listing
#[derive(Debug, Clone, Default)]
pub struct ItemPage {
    pub items: Vec<RemoteItem>,
    /// Token for the next page, `None` when the listing is exhausted
    pub next_page_token: Option<String>,
}

/// Action kind of a planned operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    CreateFolder,
    CopyFile,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpKind::CreateFolder => write!(f, "create-folder"),
            OpKind::CopyFile => write!(f, "copy-file"),
        }
    }
}

/// One pending create-folder or copy-file action, produced during
/// traversal and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOp {
    pub kind: OpKind,
    /// Source item identifier
    pub source_id: String,
    /// Destination parent identifier. `None` in dry-run mode when the
    /// parent itself is only planned and has no real identifier yet.
    pub target_parent_id: Option<String>,
    /// Resolved target name (root rename already applied)
    pub target_name: String,
    /// Path of the item inside the source tree, for reporting
    pub source_path: String,
    /// Path of the copy inside the destination tree, for reporting
    pub target_path: String,
}

impl fmt::Display for PlannedOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.kind, self.source_path, self.target_path)
    }
}

/// Parameters of one copy run
#[derive(Debug, Clone)]
pub struct CopyRequest {
    /// Source folder identifier
    pub src_id: String,
    /// Destination parent folder identifier
    pub dst_id: String,
    /// Optional rename for the root of the copy only
    pub new_name: Option<String>,
    /// Include trashed items from the source tree
    pub include_trashed: bool,
    /// Plan and print actions without mutating remote state
    pub dry_run: bool,
}

impl CopyRequest {
    /// Create a new copy request, validating the identifiers
    pub fn new(src_id: impl Into<String>, dst_id: impl Into<String>) -> CopyResult<Self> {
        let src_id = src_id.into();
        let dst_id = dst_id.into();
        if src_id.trim().is_empty() {
            return Err(CopyError::BadArgs("source folder id is empty".to_string()));
        }
        if dst_id.trim().is_empty() {
            return Err(CopyError::BadArgs(
                "destination parent id is empty".to_string(),
            ));
        }
        Ok(Self {
            src_id,
            dst_id,
            new_name: None,
            include_trashed: false,
            dry_run: false,
        })
    }

    /// Set the optional rename for the copied root folder
    pub fn with_new_name(mut self, new_name: Option<String>) -> Self {
        self.new_name = new_name;
        self
    }

    /// Include trashed source items in the copy
    pub fn include_trashed(mut self, include: bool) -> Self {
        self.include_trashed = include;
        self
    }

    /// Enable or disable dry-run mode
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Outcome of a copy run: the ordered plan plus counters
#[derive(Debug, Clone, Default)]
pub struct CopyReport {
    /// Every planned operation, in traversal order. In live mode each
    /// entry was executed; in dry-run mode none were.
    pub ops: Vec<PlannedOp>,
    /// Identifier of the created root folder, `None` in dry-run mode
    pub root_id: Option<String>,
    /// Folder creates planned (and executed, unless dry-run)
    pub folders_created: usize,
    /// File copies planned (and executed, unless dry-run)
    pub files_copied: usize,
}

#[cfg(test)]
mod tests;
