//! Client-local storage: a key/value directory plus a snapshot-on-write
//! tool store built on top of it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;

use super::traits::ToolStore;
use crate::domain::{Tool, ToolData};
use crate::error::{Result, ToolTrackError};

/// Storage key holding the serialized tool collection
pub const TOOLS_KEY: &str = "tools";

/// Storage key holding the selected language
pub const LANGUAGE_KEY: &str = "language";

/// Key/value string storage backed by one file per key.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Open (and create if needed) storage rooted at `base_path`.
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }

    /// Read the value stored under `key`, if any.
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Writes a sibling temp file and renames it over the target so a
    /// crash never leaves a half-written snapshot.
    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        let tmp = self.base_path.join(format!(".{}.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Tool store persisting the whole collection under `TOOLS_KEY` on every write.
pub struct LocalToolStore {
    storage: LocalStorage,
    tools: RwLock<Vec<Tool>>,
}

impl LocalToolStore {
    /// Open the store, loading the current snapshot.
    ///
    /// A missing, unreadable or unparsable snapshot yields an empty
    /// collection; the problem is logged.
    pub fn open(storage: LocalStorage) -> Self {
        let tools = load_snapshot(&storage);
        tracing::debug!(count = tools.len(), "Loaded local tool snapshot");
        Self {
            storage,
            tools: RwLock::new(tools),
        }
    }

    /// Apply `change` to a copy of the collection, persist it, then publish it.
    fn mutate<T>(&self, change: impl FnOnce(&mut Vec<Tool>) -> Result<T>) -> Result<T> {
        let mut tools = self.tools.write().map_err(|e| ToolTrackError::Storage(e.to_string()))?;
        let mut next = tools.clone();
        let out = change(&mut next)?;
        self.storage.set_item(TOOLS_KEY, &serde_json::to_string(&next)?)?;
        *tools = next;
        Ok(out)
    }
}

fn load_snapshot(storage: &LocalStorage) -> Vec<Tool> {
    match storage.get_item(TOOLS_KEY) {
        Ok(Some(text)) => match serde_json::from_str(&text) {
            Ok(tools) => tools,
            Err(e) => {
                log::error!("Could not parse tools from local storage: {}", e);
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            log::error!("Could not read tools from local storage: {}", e);
            Vec::new()
        }
    }
}

#[async_trait]
impl ToolStore for LocalToolStore {
    async fn list(&self) -> Result<Vec<Tool>> {
        let tools = self.tools.read().map_err(|e| ToolTrackError::Storage(e.to_string()))?;
        Ok(tools.clone())
    }

    async fn create(&self, data: ToolData) -> Result<Tool> {
        let tool = Tool::from_data(data.normalized()?);
        self.mutate(|tools| {
            tools.insert(0, tool.clone());
            Ok(())
        })?;
        Ok(tool)
    }

    async fn update(&self, tool: &Tool) -> Result<Tool> {
        let tool = tool.clone().normalized()?;
        self.mutate(|tools| {
            let slot = tools
                .iter_mut()
                .find(|t| t.id == tool.id)
                .ok_or_else(|| ToolTrackError::ToolNotFound(tool.id.clone()))?;
            *slot = tool.clone();
            Ok(())
        })?;
        Ok(tool)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.mutate(|tools| {
            let original_len = tools.len();
            tools.retain(|t| t.id != id);
            if tools.len() == original_len {
                return Err(ToolTrackError::ToolNotFound(id.to_string()));
            }
            Ok(())
        })
    }
}
