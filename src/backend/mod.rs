//! Remote collaborators of the cabin workflow: the `cabins` table and the
//! photo container. Every call is atomic on its own; nothing spans calls.

pub(crate) mod postgres;
pub(crate) mod s3_storage;

#[cfg(test)]
pub(crate) mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::cabins::{Cabin, CabinRow, PhotoUpload};

pub use postgres::PgCabinTable;
pub use s3_storage::S3PhotoBucket;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("object storage error: {0}")]
    Storage(String),
}

/// Row access to the `cabins` table.
#[async_trait]
pub trait CabinTable: Send + Sync {
    async fn select_all(&self) -> Result<Vec<Cabin>, BackendError>;

    async fn select_by_id(&self, id: i64) -> Result<Option<Cabin>, BackendError>;

    /// Insert one row and return it with its storage-assigned id.
    async fn insert(&self, row: &CabinRow) -> Result<Cabin, BackendError>;

    /// Returns `None` when no row matches `id`.
    async fn update(&self, id: i64, row: &CabinRow) -> Result<Option<Cabin>, BackendError>;

    /// Returns `true` if a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, BackendError>;

    /// Write back a full row, id included, replacing whatever is stored under it.
    async fn restore(&self, cabin: &Cabin) -> Result<(), BackendError>;
}

/// Named blobs in the cabin photo container.
#[async_trait]
pub trait PhotoBucket: Send + Sync {
    async fn upload(&self, blob_name: &str, photo: &PhotoUpload) -> Result<(), BackendError>;

    async fn remove(&self, blob_name: &str) -> Result<(), BackendError>;
}
