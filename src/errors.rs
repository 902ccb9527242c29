use thiserror::Error;

use crate::backend::BackendError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid cabin: {0}")]
    InvalidCabin(String),

    #[error("Cabin {0} does not exist")]
    CabinNotFound(i64),

    #[error("Cabin data could not be loaded: {0}")]
    CabinRead(#[source] BackendError),

    #[error("Cabin could not be {action}: {source}")]
    CabinWrite {
        action: &'static str,
        #[source]
        source: BackendError,
    },

    #[error("Cabin could not be deleted: {0}")]
    CabinDelete(#[source] BackendError),

    #[error("Cabin photo could not be uploaded and the cabin was not {action}: {source}")]
    PhotoUpload {
        action: &'static str,
        #[source]
        source: BackendError,
    },

    #[error("Cabin photo could not be deleted, cabin {id} was kept: {source}")]
    PhotoDelete {
        id: i64,
        #[source]
        source: BackendError,
    },

    // The row written before the failed upload is still in the table.
    #[error("Cabin photo could not be uploaded ({cause}) and rolling back cabin {id} failed: {rollback}")]
    RollbackFailed {
        id: i64,
        cause: BackendError,
        rollback: BackendError,
    },
}

pub type Result<T> = std::result::Result<T, AppError>;
