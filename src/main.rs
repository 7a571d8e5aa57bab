//! DriveCopy CLI
//!
//! Recursively copies a Google Drive folder (by ID) into another folder,
//! reproducing the whole subtree under the destination parent.
//!
//! # Usage
//!
//! ```bash
//! drivecopy --src-id <FOLDER_ID> --dst-id <PARENT_ID>
//! drivecopy --src-id <FOLDER_ID> --dst-id <PARENT_ID> --new-name "Backup 2026"
//! drivecopy --src-id <FOLDER_ID> --dst-id <PARENT_ID> --dry-run
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use drivecopy::adapters::{Authenticator, DriveHttpAdapter};
use drivecopy::cli::Cli;
use drivecopy::domain::model::CopyRequest;
use drivecopy::engine::TreeCopier;
use drivecopy::output;
use drivecopy::ports::DrivePort;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --log-level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let request = CopyRequest::new(cli.src_id, cli.dst_id)?
        .with_new_name(cli.new_name)
        .include_trashed(cli.include_trashed)
        .dry_run(cli.dry_run);

    let auth = Authenticator::new(cli.credentials, cli.token);
    let token = auth
        .access_token()
        .await
        .context("Failed to obtain an access token")?;
    let port: Arc<dyn DrivePort> = Arc::new(DriveHttpAdapter::new(token)?);

    info!(
        src_id = %request.src_id,
        dst_id = %request.dst_id,
        dry_run = request.dry_run,
        "starting folder copy"
    );

    let report = TreeCopier::new(port, request.clone())
        .run()
        .await
        .context("Copy aborted")?;

    if request.dry_run {
        output::print_plan(&report);
    } else {
        output::print_summary(&report);
    }
    Ok(())
}
