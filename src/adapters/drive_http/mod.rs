//! Google Drive v3 adapter
//!
//! Implements [`DrivePort`] over the Drive REST API with a bearer token
//! supplied by the auth collaborator. Shared-drive items are visible
//! (`supportsAllDrives`), matching what the stock Drive UI shows.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::domain::model::{ItemKind, ItemPage, RemoteItem};
use crate::error::{CopyError, CopyResult};
use crate::ports::DrivePort;

const DRIVE_API: &str = "https://www.googleapis.com/drive/v3";

/// MIME type Drive uses to mark folders
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

const METADATA_FIELDS: &str = "id, name, mimeType, parents";
const LIST_FIELDS: &str = "nextPageToken, files(id, name, mimeType, parents)";

/// File resource as returned by the Drive API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    mime_type: String,
    #[serde(default)]
    parents: Vec<String>,
}

impl From<DriveFile> for RemoteItem {
    fn from(file: DriveFile) -> Self {
        let kind = if file.mime_type == FOLDER_MIME_TYPE {
            ItemKind::Folder
        } else {
            ItemKind::File
        };
        RemoteItem {
            id: file.id,
            name: file.name,
            kind,
            parent: file.parents.into_iter().next(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedFile {
    id: String,
}

pub struct DriveHttpAdapter {
    http: Client,
    token: String,
}

impl DriveHttpAdapter {
    /// Create an adapter that authenticates with the given access token
    pub fn new(access_token: String) -> CopyResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("drivecopy/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            token: access_token,
        })
    }
}

/// Transport failures are retryable by definition
fn transient(err: reqwest::Error) -> CopyError {
    CopyError::Transient {
        message: err.to_string(),
    }
}

/// Drive signals per-user rate limiting with a 403 whose body carries
/// one of these reasons, not with a 429.
fn is_rate_limited(body: &str) -> bool {
    body.contains("rateLimitExceeded") || body.contains("userRateLimitExceeded")
}

/// Map a non-success Drive response onto the error taxonomy
async fn check(resp: Response, id: &str) -> CopyResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::NOT_FOUND => CopyError::NotFound { id: id.to_string() },
        StatusCode::UNAUTHORIZED => CopyError::PermissionDenied {
            id: id.to_string(),
            message: "access token rejected".to_string(),
        },
        StatusCode::FORBIDDEN if is_rate_limited(&body) => CopyError::Transient {
            message: format!("rate limited: {body}"),
        },
        StatusCode::FORBIDDEN => CopyError::PermissionDenied {
            id: id.to_string(),
            message: body,
        },
        StatusCode::TOO_MANY_REQUESTS => CopyError::Transient {
            message: format!("too many requests: {body}"),
        },
        s if s.is_server_error() => CopyError::Transient {
            message: format!("server error {s}: {body}"),
        },
        s => CopyError::Api {
            status: s.as_u16(),
            body,
        },
    })
}

#[async_trait]
impl DrivePort for DriveHttpAdapter {
    async fn get_metadata(&self, id: &str) -> CopyResult<RemoteItem> {
        let resp = self
            .http
            .get(format!("{DRIVE_API}/files/{id}"))
            .bearer_auth(&self.token)
            .query(&[("fields", METADATA_FIELDS), ("supportsAllDrives", "true")])
            .send()
            .await
            .map_err(transient)?;
        let file: DriveFile = check(resp, id).await?.json().await.map_err(transient)?;
        Ok(file.into())
    }

    async fn list_children(
        &self,
        folder_id: &str,
        page_token: Option<&str>,
        include_trashed: bool,
    ) -> CopyResult<ItemPage> {
        let mut query = format!("'{folder_id}' in parents");
        if !include_trashed {
            query.push_str(" and trashed=false");
        }
        let mut params = vec![
            ("q", query),
            ("spaces", "drive".to_string()),
            ("fields", LIST_FIELDS.to_string()),
            ("supportsAllDrives", "true".to_string()),
            ("includeItemsFromAllDrives", "true".to_string()),
            ("corpora", "user".to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        let resp = self
            .http
            .get(format!("{DRIVE_API}/files"))
            .bearer_auth(&self.token)
            .query(&params)
            .send()
            .await
            .map_err(transient)?;
        let list: FileList = check(resp, folder_id)
            .await?
            .json()
            .await
            .map_err(transient)?;
        Ok(ItemPage {
            items: list.files.into_iter().map(RemoteItem::from).collect(),
            next_page_token: list.next_page_token,
        })
    }

    async fn create_folder(&self, name: &str, parent_id: &str) -> CopyResult<String> {
        let body = json!({
            "name": name,
            "mimeType": FOLDER_MIME_TYPE,
            "parents": [parent_id],
        });
        let resp = self
            .http
            .post(format!("{DRIVE_API}/files"))
            .bearer_auth(&self.token)
            .query(&[("fields", "id"), ("supportsAllDrives", "true")])
            .json(&body)
            .send()
            .await
            .map_err(transient)?;
        let created: CreatedFile = check(resp, parent_id)
            .await?
            .json()
            .await
            .map_err(transient)?;
        Ok(created.id)
    }

    async fn copy_file(&self, file_id: &str, name: &str, parent_id: &str) -> CopyResult<String> {
        let body = json!({
            "name": name,
            "parents": [parent_id],
        });
        let resp = self
            .http
            .post(format!("{DRIVE_API}/files/{file_id}/copy"))
            .bearer_auth(&self.token)
            .query(&[("fields", "id"), ("supportsAllDrives", "true")])
            .json(&body)
            .send()
            .await
            .map_err(transient)?;
        let created: CreatedFile = check(resp, file_id)
            .await?
            .json()
            .await
            .map_err(transient)?;
        Ok(created.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drive_file_kind_mapping() {
        let folder = DriveFile {
            id: "a".to_string(),
            name: "A".to_string(),
            mime_type: FOLDER_MIME_TYPE.to_string(),
            parents: vec!["root".to_string()],
        };
        let item: RemoteItem = folder.into();
        assert_eq!(item.kind, ItemKind::Folder);
        assert_eq!(item.parent.as_deref(), Some("root"));

        let doc = DriveFile {
            id: "b".to_string(),
            name: "b.txt".to_string(),
            mime_type: "text/plain".to_string(),
            parents: vec![],
        };
        let item: RemoteItem = doc.into();
        assert_eq!(item.kind, ItemKind::File);
        assert!(item.parent.is_none());
    }

    #[test]
    fn test_rate_limit_detection() {
        assert!(is_rate_limited(r#"{"reason": "userRateLimitExceeded"}"#));
        assert!(is_rate_limited(r#"{"reason": "rateLimitExceeded"}"#));
        assert!(!is_rate_limited(r#"{"reason": "insufficientPermissions"}"#));
    }

    #[test]
    fn test_file_list_parsing() {
        let raw = r#"{
            "nextPageToken": "tok-2",
            "files": [
                {"id": "f1", "name": "notes.txt", "mimeType": "text/plain"}
            ]
        }"#;
        let list: FileList = serde_json::from_str(raw).unwrap();
        assert_eq!(list.files.len(), 1);
        assert_eq!(list.next_page_token.as_deref(), Some("tok-2"));
    }
}
