//! Domain layer - core data model for the folder tree copy

pub mod model;

pub use model::{CopyReport, CopyRequest, ItemKind, ItemPage, OpKind, PlannedOp, RemoteItem};
