//! In-memory Drive adapter
//!
//! HashMap-backed implementation of [`DrivePort`] over a seeded tree,
//! with call/mutation counters and single-shot fault injection. Used by
//! the engine tests; never wired into the production path.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::model::{ItemKind, ItemPage, RemoteItem};
use crate::error::{CopyError, CopyResult};
use crate::ports::DrivePort;

/// Error kind produced by an injected fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Transient,
    PermissionDenied,
    NotFound,
}

impl FaultKind {
    fn to_error(self) -> CopyError {
        match self {
            FaultKind::Transient => CopyError::Transient {
                message: "injected rate limit".to_string(),
            },
            FaultKind::PermissionDenied => CopyError::PermissionDenied {
                id: "injected".to_string(),
                message: "injected permission failure".to_string(),
            },
            FaultKind::NotFound => CopyError::NotFound {
                id: "injected".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone)]
struct Fault {
    at_call: u64,
    kind: FaultKind,
    /// Remaining number of calls the fault will fail
    times: u32,
}

#[derive(Debug, Clone)]
struct Node {
    item: RemoteItem,
    trashed: bool,
}

#[derive(Default)]
struct State {
    nodes: HashMap<String, Node>,
    /// Child ids per folder, in insertion order
    children: HashMap<String, Vec<String>>,
    next_id: u64,
    calls: u64,
    mutations: u64,
    /// Children per listing page; 0 means everything in one page
    page_size: usize,
    fault: Option<Fault>,
}

pub struct MemoryDriveAdapter {
    state: Mutex<State>,
}

impl MemoryDriveAdapter {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Split child listings into pages of `page_size` items
    pub fn set_page_size(&self, page_size: usize) {
        self.lock().page_size = page_size;
    }

    /// Fail `times` port calls starting at call number `at_call` (1-based)
    pub fn fail_call(&self, at_call: u64, kind: FaultKind, times: u32) {
        self.lock().fault = Some(Fault {
            at_call,
            kind,
            times,
        });
    }

    /// Seed a folder; `parent` of `None` makes it a root
    pub fn add_folder(&self, name: &str, parent: Option<&str>) -> String {
        self.add_node(name, ItemKind::Folder, parent)
    }

    /// Seed a file under an existing folder
    pub fn add_file(&self, name: &str, parent: &str) -> String {
        self.add_node(name, ItemKind::File, Some(parent))
    }

    /// Mark a seeded item as trashed
    pub fn set_trashed(&self, id: &str) {
        if let Some(node) = self.lock().nodes.get_mut(id) {
            node.trashed = true;
        }
    }

    pub fn call_count(&self) -> u64 {
        self.lock().calls
    }

    /// Number of create/copy calls that reached the store
    pub fn mutation_count(&self) -> u64 {
        self.lock().mutations
    }

    /// Look up a child of `parent_id` by name, for test assertions
    pub fn find_child(&self, parent_id: &str, name: &str) -> Option<RemoteItem> {
        let state = self.lock();
        let ids = state.children.get(parent_id)?;
        ids.iter()
            .filter_map(|id| state.nodes.get(id))
            .find(|node| node.item.name == name)
            .map(|node| node.item.clone())
    }

    /// All children of a folder in insertion order, trashed included
    pub fn children_of(&self, parent_id: &str) -> Vec<RemoteItem> {
        let state = self.lock();
        state
            .children
            .get(parent_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.nodes.get(id))
                    .map(|node| node.item.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn add_node(&self, name: &str, kind: ItemKind, parent: Option<&str>) -> String {
        let mut state = self.lock();
        state.next_id += 1;
        let id = format!("id-{}", state.next_id);
        state.nodes.insert(
            id.clone(),
            Node {
                item: RemoteItem {
                    id: id.clone(),
                    name: name.to_string(),
                    kind,
                    parent: parent.map(str::to_string),
                },
                trashed: false,
            },
        );
        if kind == ItemKind::Folder {
            state.children.entry(id.clone()).or_default();
        }
        if let Some(parent) = parent {
            state
                .children
                .entry(parent.to_string())
                .or_default()
                .push(id.clone());
        }
        id
    }

    /// Count the call and fire the injected fault if it is due
    fn tick(state: &mut State) -> CopyResult<()> {
        state.calls += 1;
        if let Some(fault) = state.fault.as_mut() {
            if state.calls >= fault.at_call && fault.times > 0 {
                fault.times -= 1;
                return Err(fault.kind.to_error());
            }
        }
        Ok(())
    }
}

impl Default for MemoryDriveAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DrivePort for MemoryDriveAdapter {
    async fn get_metadata(&self, id: &str) -> CopyResult<RemoteItem> {
        let mut state = self.lock();
        Self::tick(&mut state)?;
        state
            .nodes
            .get(id)
            .map(|node| node.item.clone())
            .ok_or_else(|| CopyError::NotFound { id: id.to_string() })
    }

    async fn list_children(
        &self,
        folder_id: &str,
        page_token: Option<&str>,
        include_trashed: bool,
    ) -> CopyResult<ItemPage> {
        let mut state = self.lock();
        Self::tick(&mut state)?;
        let folder = state
            .nodes
            .get(folder_id)
            .ok_or_else(|| CopyError::NotFound {
                id: folder_id.to_string(),
            })?;
        if !folder.item.is_folder() {
            return Err(CopyError::NotAFolder {
                id: folder_id.to_string(),
            });
        }

        let visible: Vec<RemoteItem> = state
            .children
            .get(folder_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.nodes.get(id))
                    .filter(|node| include_trashed || !node.trashed)
                    .map(|node| node.item.clone())
                    .collect()
            })
            .unwrap_or_default();

        let offset = match page_token {
            Some(token) => token.parse::<usize>().map_err(|_| {
                CopyError::BadArgs(format!("invalid page token '{token}'"))
            })?,
            None => 0,
        };
        let (items, next_page_token) = if state.page_size == 0 {
            (visible, None)
        } else {
            let end = (offset + state.page_size).min(visible.len());
            let next = (end < visible.len()).then(|| end.to_string());
            (visible[offset..end].to_vec(), next)
        };
        Ok(ItemPage {
            items,
            next_page_token,
        })
    }

    async fn create_folder(&self, name: &str, parent_id: &str) -> CopyResult<String> {
        {
            let mut state = self.lock();
            Self::tick(&mut state)?;
            let parent = state
                .nodes
                .get(parent_id)
                .ok_or_else(|| CopyError::NotFound {
                    id: parent_id.to_string(),
                })?;
            if !parent.item.is_folder() {
                return Err(CopyError::NotAFolder {
                    id: parent_id.to_string(),
                });
            }
            state.mutations += 1;
        }
        Ok(self.add_node(name, ItemKind::Folder, Some(parent_id)))
    }

    async fn copy_file(&self, file_id: &str, name: &str, parent_id: &str) -> CopyResult<String> {
        {
            let mut state = self.lock();
            Self::tick(&mut state)?;
            let file = state.nodes.get(file_id).ok_or_else(|| CopyError::NotFound {
                id: file_id.to_string(),
            })?;
            if file.item.is_folder() {
                return Err(CopyError::BadArgs(format!(
                    "cannot copy-file a folder: {file_id}"
                )));
            }
            if !state.nodes.contains_key(parent_id) {
                return Err(CopyError::NotFound {
                    id: parent_id.to_string(),
                });
            }
            state.mutations += 1;
        }
        Ok(self.add_node(name, ItemKind::File, Some(parent_id)))
    }
}
