//! Filesystem-backed image storage, served by `tower_http::services::ServeDir`.

use std::path::PathBuf;

use async_trait::async_trait;

use super::{check_key, ImageStorage, StorageError};

pub struct LocalImageStorage {
    root: PathBuf,
    public_path: String,
}

impl LocalImageStorage {
    /// `public_path` is the URL prefix the directory is mounted under, e.g. `/uploads`.
    pub fn new(root: impl Into<PathBuf>, public_path: &str) -> Self {
        Self {
            root: root.into(),
            public_path: public_path.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<String, StorageError> {
        check_key(key)?;
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, data).await?;
        tracing::debug!(path = %path.display(), "Stored image locally");
        Ok(self.public_url(key))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        check_key(key)?;
        match tokio::fs::remove_file(self.root.join(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_path)
    }
}
