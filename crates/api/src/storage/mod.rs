//! Object storage for uploaded template images.
//!
//! Handlers only see [`ImageStorage`]; the backend is chosen once at startup
//! from [`crate::config::StorageConfig`].

pub mod local;
pub mod s3;

use async_trait::async_trait;

pub use local::LocalImageStorage;
pub use s3::S3ImageStorage;

/// Failure inside a storage backend. Never shown to clients verbatim.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The object key would escape the storage root or is otherwise unusable.
    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Store `data` under `key`, returning the public URL of the object.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String, StorageError>;

    /// Remove the object at `key`. Removing a missing object succeeds.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Public URL for an object key.
    fn public_url(&self, key: &str) -> String;
}

/// Reject keys that are empty, absolute, or contain parent-directory segments.
pub(crate) fn check_key(key: &str) -> Result<(), StorageError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if bad {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
