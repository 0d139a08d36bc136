use crate::cli::Args;
use async_trait::async_trait;
use log::info;
use std::collections::HashMap;
use std::error::Error;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable key-value storage local to one user profile.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces any previous value.
    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key under `root`.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.root.join(name)
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        // invalid UTF-8 is returned lossily so callers see a parse failure, not an I/O one
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.path_for(key);
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

pub fn create_store(args: &Args) -> Result<Arc<dyn KeyValueStore>, Box<dyn Error + Send + Sync>> {
    match args.store_type.to_lowercase().as_str() {
        "file" => Ok(Arc::new(FileStore::new(&args.store_path))),
        "memory" => Ok(Arc::new(MemoryStore::new())),
        _ =>
            Err(
                Box::new(
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("Unsupported store type: {}", args.store_type)
                    )
                )
            ),
    }
}

pub fn initialize_store(args: &Args) -> Result<Arc<dyn KeyValueStore>, Box<dyn Error + Send + Sync>> {
    info!("Conversation state will be stored in: {} at {}", args.store_type, args.store_path);
    create_store(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_store_reads_back_last_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state"));

        assert!(store.read("agoraConversationId").await.unwrap().is_none());

        store.write("agoraConversationId", "first").await.unwrap();
        store.write("agoraConversationId", "second").await.unwrap();
        assert_eq!(store.read("agoraConversationId").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn file_store_keeps_keys_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.write("../escape", "x").await.unwrap();
        assert!(dir.path().join("___escape").exists());
    }

    #[tokio::test]
    async fn file_store_reads_non_utf8_content_lossily() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("agoraChatHistory"), [0xff, 0xfe, 0x00]).await.unwrap();
        let store = FileStore::new(dir.path());

        let value = store.read("agoraChatHistory").await.unwrap().unwrap();
        assert!(value.contains('\u{FFFD}'));
    }

    #[tokio::test]
    async fn memory_store_overwrites() {
        let store = MemoryStore::new();
        store.write("k", "v1").await.unwrap();
        store.write("k", "v2").await.unwrap();
        assert_eq!(store.read("k").await.unwrap().as_deref(), Some("v2"));
        assert!(store.read("missing").await.unwrap().is_none());
    }

    #[test]
    fn rejects_unknown_store_type() {
        use clap::Parser;
        let args = Args::try_parse_from(["polyedi", "--store-type", "redis"]).unwrap();
        assert!(create_store(&args).is_err());
    }
}
