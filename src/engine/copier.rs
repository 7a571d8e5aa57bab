//! Recursive folder tree copier
//!
//! Walks the source tree depth-first in pre-order, creating destination
//! folders before descending into them so that every child can resolve
//! its new parent through the identifier mapping. Dry-run records the
//! same ordered plan as a live run but issues no mutating calls.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::model::{
    CopyReport, CopyRequest, ItemKind, ItemPage, OpKind, PlannedOp, RemoteItem,
};
use crate::engine::retry::{self, RetryPolicy};
use crate::error::{CopyError, CopyResult};
use crate::ports::DrivePort;

/// Mapping placeholder for folders that exist only in the plan
const PLANNED_ID: &str = "(planned)";

/// Copies one source folder subtree under a destination parent.
///
/// Consumed by [`TreeCopier::run`]; the identifier mapping and the plan
/// live only for the duration of the run.
pub struct TreeCopier {
    port: Arc<dyn DrivePort>,
    request: CopyRequest,
    policy: RetryPolicy,
    /// Source folder id -> destination folder id. Every folder is
    /// inserted here before any of its children are processed.
    id_map: HashMap<String, String>,
    report: CopyReport,
}

impl TreeCopier {
    pub fn new(port: Arc<dyn DrivePort>, request: CopyRequest) -> Self {
        Self {
            port,
            request,
            policy: RetryPolicy::default(),
            id_map: HashMap::new(),
            report: CopyReport::default(),
        }
    }

    /// Override the per-call retry budget
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Execute (or, in dry-run mode, plan) the full subtree copy.
    pub async fn run(mut self) -> CopyResult<CopyReport> {
        let src = self.get_metadata(&self.request.src_id).await?;
        if !src.is_folder() {
            return Err(CopyError::NotAFolder { id: src.id });
        }
        let dst_parent = self.get_metadata(&self.request.dst_id).await?;
        if !dst_parent.is_folder() {
            return Err(CopyError::NotAFolder { id: dst_parent.id });
        }

        let root_name = self
            .request
            .new_name
            .clone()
            .unwrap_or_else(|| src.name.clone());
        let src_root_path = format!("/{}", src.name);
        let dst_root_path = format!("/{}/{}", dst_parent.name, root_name);

        let op = PlannedOp {
            kind: OpKind::CreateFolder,
            source_id: src.id.clone(),
            target_parent_id: Some(dst_parent.id.clone()),
            target_name: root_name.clone(),
            source_path: src_root_path.clone(),
            target_path: dst_root_path.clone(),
        };
        self.record(op.clone());
        if self.request.dry_run {
            self.id_map.insert(src.id.clone(), PLANNED_ID.to_string());
        } else {
            let new_id = self
                .create_folder(&root_name, &dst_parent.id)
                .await
                .map_err(|e| annotate(e, &src_root_path, &dst_root_path))?;
            info!("{op}");
            self.id_map.insert(src.id.clone(), new_id.clone());
            self.report.root_id = Some(new_id);
        }

        self.copy_children(src.id.clone(), src_root_path, dst_root_path)
            .await?;
        Ok(self.report)
    }

    /// Copy the direct children of a mapped source folder, paging through
    /// the listing until the page token is exhausted and recursing into
    /// subfolders as they are created.
    fn copy_children(
        &mut self,
        src_folder_id: String,
        src_path: String,
        dst_path: String,
    ) -> Pin<Box<dyn Future<Output = CopyResult<()>> + Send + '_>> {
        Box::pin(async move {
            let mut page_token: Option<String> = None;
            loop {
                let page = self
                    .list_page(&src_folder_id, page_token.as_deref())
                    .await
                    .map_err(|e| annotate(e, &src_path, &dst_path))?;
                debug!(
                    folder = %src_folder_id,
                    children = page.items.len(),
                    "listed children page"
                );

                for item in page.items {
                    let child_src_path = join(&src_path, &item.name);
                    let child_dst_path = join(&dst_path, &item.name);
                    match item.kind {
                        ItemKind::Folder => {
                            let parent_dst = self.mapped_parent(&src_folder_id)?;
                            let op = PlannedOp {
                                kind: OpKind::CreateFolder,
                                source_id: item.id.clone(),
                                target_parent_id: parent_dst.clone(),
                                target_name: item.name.clone(),
                                source_path: child_src_path.clone(),
                                target_path: child_dst_path.clone(),
                            };
                            self.record(op.clone());
                            if self.request.dry_run {
                                self.id_map.insert(item.id.clone(), PLANNED_ID.to_string());
                            } else {
                                let parent_id = parent_dst.ok_or_else(|| {
                                    CopyError::Internal(format!(
                                        "no destination mapping for parent of '{child_src_path}'"
                                    ))
                                })?;
                                let new_id = self
                                    .create_folder(&item.name, &parent_id)
                                    .await
                                    .map_err(|e| {
                                        annotate(e, &child_src_path, &child_dst_path)
                                    })?;
                                info!("{op}");
                                self.id_map.insert(item.id.clone(), new_id);
                            }
                            self.copy_children(item.id, child_src_path, child_dst_path)
                                .await?;
                        }
                        ItemKind::File => {
                            let parent_dst = self.mapped_parent(&src_folder_id)?;
                            let op = PlannedOp {
                                kind: OpKind::CopyFile,
                                source_id: item.id.clone(),
                                target_parent_id: parent_dst.clone(),
                                target_name: item.name.clone(),
                                source_path: child_src_path.clone(),
                                target_path: child_dst_path.clone(),
                            };
                            self.record(op.clone());
                            if !self.request.dry_run {
                                let parent_id = parent_dst.ok_or_else(|| {
                                    CopyError::Internal(format!(
                                        "no destination mapping for parent of '{child_src_path}'"
                                    ))
                                })?;
                                self.copy_file(&item.id, &item.name, &parent_id)
                                    .await
                                    .map_err(|e| {
                                        annotate(e, &child_src_path, &child_dst_path)
                                    })?;
                                info!("{op}");
                            }
                        }
                    }
                }

                page_token = page.next_page_token;
                if page_token.is_none() {
                    break;
                }
            }
            Ok(())
        })
    }

    /// Resolve the destination folder mapped to a source folder.
    ///
    /// Returns `None` when the destination exists only in the plan.
    fn mapped_parent(&self, src_folder_id: &str) -> CopyResult<Option<String>> {
        match self.id_map.get(src_folder_id) {
            Some(id) if id == PLANNED_ID => Ok(None),
            Some(id) => Ok(Some(id.clone())),
            None => Err(CopyError::Internal(format!(
                "folder '{src_folder_id}' listed before its parent mapping was recorded"
            ))),
        }
    }

    fn record(&mut self, op: PlannedOp) {
        match op.kind {
            OpKind::CreateFolder => self.report.folders_created += 1,
            OpKind::CopyFile => self.report.files_copied += 1,
        }
        self.report.ops.push(op);
    }

    // Retry-wrapped port calls

    async fn get_metadata(&self, id: &str) -> CopyResult<RemoteItem> {
        let port = Arc::clone(&self.port);
        let id = id.to_string();
        retry::with_retry(&self.policy, || {
            let port = Arc::clone(&port);
            let id = id.clone();
            async move { port.get_metadata(&id).await }
        })
        .await
    }

    async fn list_page(
        &self,
        folder_id: &str,
        page_token: Option<&str>,
    ) -> CopyResult<ItemPage> {
        let port = Arc::clone(&self.port);
        let folder_id = folder_id.to_string();
        let page_token = page_token.map(str::to_string);
        let include_trashed = self.request.include_trashed;
        retry::with_retry(&self.policy, || {
            let port = Arc::clone(&port);
            let folder_id = folder_id.clone();
            let page_token = page_token.clone();
            async move {
                port.list_children(&folder_id, page_token.as_deref(), include_trashed)
                    .await
            }
        })
        .await
    }

    async fn create_folder(&self, name: &str, parent_id: &str) -> CopyResult<String> {
        let port = Arc::clone(&self.port);
        let name = name.to_string();
        let parent_id = parent_id.to_string();
        retry::with_retry(&self.policy, || {
            let port = Arc::clone(&port);
            let name = name.clone();
            let parent_id = parent_id.clone();
            async move { port.create_folder(&name, &parent_id).await }
        })
        .await
    }

    async fn copy_file(&self, file_id: &str, name: &str, parent_id: &str) -> CopyResult<String> {
        let port = Arc::clone(&self.port);
        let file_id = file_id.to_string();
        let name = name.to_string();
        let parent_id = parent_id.to_string();
        retry::with_retry(&self.policy, || {
            let port = Arc::clone(&port);
            let file_id = file_id.clone();
            let name = name.clone();
            let parent_id = parent_id.clone();
            async move { port.copy_file(&file_id, &name, &parent_id).await }
        })
        .await
    }
}

/// Keep the innermost path annotation; do not re-wrap an already
/// annotated failure on the way up the recursion.
fn annotate(err: CopyError, src_path: &str, dst_path: &str) -> CopyError {
    match err {
        e @ CopyError::Aborted { .. } => e,
        e => CopyError::at(src_path, dst_path, e),
    }
}

fn join(base: &str, name: &str) -> String {
    format!("{base}/{name}")
}
