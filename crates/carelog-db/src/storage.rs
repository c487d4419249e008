//! Audio storage providers.
//!
//! The [`StorageProvider`] contract abstracts over where raw recording
//! bytes live. Two variants exist:
//!
//! - [`DatabaseStorage`] (active): the identifier returned by `store` IS
//!   the base64-encoded payload, which the note row carries in a text
//!   column. There is no separate storage tier and no network call.
//! - [`S3Storage`]: placeholder for remote object storage. Every
//!   operation fails with a "not implemented" error.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tracing::debug;

use carelog_core::defaults::{
    ENV_STORAGE_PROVIDER, STORAGE_PROVIDER_DATABASE, STORAGE_PROVIDER_S3,
};
use carelog_core::{Error, Result, StorageProvider};

/// In-database storage: payload bytes are base64-encoded into the
/// identifier itself.
#[derive(Debug, Default, Clone)]
pub struct DatabaseStorage;

impl DatabaseStorage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StorageProvider for DatabaseStorage {
    async fn store(&self, data: &[u8], filename: &str) -> Result<String> {
        debug!(
            subsystem = "storage",
            component = "database",
            op = "store",
            filename = %filename,
            size = data.len(),
            "Encoding audio payload"
        );
        Ok(BASE64.encode(data))
    }

    async fn retrieve(&self, identifier: &str) -> Result<Vec<u8>> {
        BASE64
            .decode(identifier)
            .map_err(|e| Error::InvalidInput(format!("Malformed audio identifier: {e}")))
    }
}

/// Remote object storage. Present only as a placeholder for future
/// extension; never selected by default wiring.
#[derive(Debug, Default, Clone)]
pub struct S3Storage;

impl S3Storage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StorageProvider for S3Storage {
    async fn store(&self, _data: &[u8], _filename: &str) -> Result<String> {
        Err(Error::Unimplemented("S3 storage".to_string()))
    }

    async fn retrieve(&self, _identifier: &str) -> Result<Vec<u8>> {
        Err(Error::Unimplemented("S3 storage".to_string()))
    }
}

/// Resolve a storage provider by name.
pub fn storage_provider(name: &str) -> Result<Arc<dyn StorageProvider>> {
    match name {
        STORAGE_PROVIDER_DATABASE => Ok(Arc::new(DatabaseStorage::new())),
        STORAGE_PROVIDER_S3 => Ok(Arc::new(S3Storage::new())),
        other => Err(Error::Config(format!("unknown storage provider: {other}"))),
    }
}

/// Resolve the storage provider from the `STORAGE_PROVIDER` environment
/// variable, defaulting to the in-database variant.
pub fn storage_from_env() -> Result<Arc<dyn StorageProvider>> {
    let name =
        std::env::var(ENV_STORAGE_PROVIDER).unwrap_or_else(|_| STORAGE_PROVIDER_DATABASE.into());
    storage_provider(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_arbitrary_binary() {
        let storage = DatabaseStorage::new();
        // Every byte value, in order, plus a few awkward runs.
        let mut payload: Vec<u8> = (0u8..=255).collect();
        payload.extend_from_slice(&[0, 0, 0, 255, 255, 1]);

        let identifier = storage.store(&payload, "clip.webm").await.unwrap();
        let restored = storage.retrieve(&identifier).await.unwrap();
        assert_eq!(restored, payload);
    }

    #[tokio::test]
    async fn test_round_trip_empty_payload() {
        let storage = DatabaseStorage::new();
        let identifier = storage.store(&[], "empty.webm").await.unwrap();
        assert_eq!(identifier, "");
        assert_eq!(storage.retrieve(&identifier).await.unwrap(), Vec::<u8>::new());
    }

    #[tokio::test]
    async fn test_identifier_is_the_encoded_payload() {
        // There is no storage tier behind the identifier; it must decode
        // on its own without any lookup.
        let storage = DatabaseStorage::new();
        let identifier = storage.store(b"hello", "greeting.wav").await.unwrap();
        assert_eq!(identifier, "aGVsbG8=");
    }

    #[tokio::test]
    async fn test_retrieve_rejects_malformed_identifier() {
        let storage = DatabaseStorage::new();
        let err = storage.retrieve("not base64 !!").await.unwrap_err();
        match err {
            Error::InvalidInput(msg) => assert!(msg.contains("Malformed audio identifier")),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_s3_store_is_unimplemented() {
        let storage = S3Storage::new();
        let err = storage.store(b"bytes", "clip.webm").await.unwrap_err();
        assert!(matches!(err, Error::Unimplemented(_)));
    }

    #[tokio::test]
    async fn test_s3_retrieve_is_unimplemented() {
        let storage = S3Storage::new();
        let err = storage.retrieve("anything").await.unwrap_err();
        assert!(matches!(err, Error::Unimplemented(_)));
    }

    #[test]
    fn test_storage_provider_resolution() {
        assert!(storage_provider("database").is_ok());
        assert!(storage_provider("s3").is_ok());
        assert!(matches!(
            storage_provider("gcs"),
            Err(Error::Config(_))
        ));
    }
}
