// Ports - Interface definitions (contracts)

use async_trait::async_trait;

use crate::domain::model::{ItemPage, RemoteItem};
use crate::error::CopyResult;

/// Port for the remote storage listing/mutation interface.
///
/// The copier consumes exactly these four operations; authentication and
/// token lifecycle are owned by the adapter behind the port.
#[async_trait]
pub trait DrivePort: Send + Sync {
    /// Resolve one item's metadata by identifier
    async fn get_metadata(&self, id: &str) -> CopyResult<RemoteItem>;

    /// List one page of a folder's direct children.
    ///
    /// Pass the token from the previous page to continue; `None` starts
    /// from the beginning. Trashed items are excluded unless
    /// `include_trashed` is set.
    async fn list_children(
        &self,
        folder_id: &str,
        page_token: Option<&str>,
        include_trashed: bool,
    ) -> CopyResult<ItemPage>;

    /// Create a folder under the given parent, returning its new identifier
    async fn create_folder(&self, name: &str, parent_id: &str) -> CopyResult<String>;

    /// Copy a file into the given parent, returning the copy's identifier
    async fn copy_file(&self, file_id: &str, name: &str, parent_id: &str) -> CopyResult<String>;
}
