//! CLI module for DriveCopy
//!
//! This module handles command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

/// DriveCopy - recursive Google Drive folder copier
///
/// Copies a source folder (by ID) and its entire subtree into a
/// destination parent folder (by ID), optionally renaming the root of
/// the copy. With --dry-run the planned operations are printed and no
/// remote state is mutated.
#[derive(Parser, Debug)]
#[command(name = "drivecopy")]
#[command(about = "Copy a Google Drive folder (and its contents) to another location")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Source folder ID to copy
    #[arg(long)]
    pub src_id: String,

    /// Destination parent folder ID where the copy will be created
    #[arg(long)]
    pub dst_id: String,

    /// Optional new name for the copied root folder
    #[arg(long)]
    pub new_name: Option<String>,

    /// Plan and print actions without creating anything
    #[arg(long)]
    pub dry_run: bool,

    /// Include items in Trash from the source folder
    #[arg(long)]
    pub include_trashed: bool,

    /// Path to OAuth client secrets JSON
    #[arg(long, default_value = "credentials.json")]
    pub credentials: PathBuf,

    /// Path to token cache JSON
    #[arg(long, default_value = "token.json")]
    pub token: PathBuf,

    /// Logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}
