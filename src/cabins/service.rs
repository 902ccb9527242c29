// cabindesk/src/cabins/service.rs
use std::sync::Arc;

use tracing::{error, info, warn};

use super::photo::{self, PhotoLinks};
use super::{Cabin, CabinDraft, CabinImage, PhotoUpload};
use crate::backend::{BackendError, CabinTable, PhotoBucket};
use crate::errors::{AppError, Result};

/// Keeps a cabin row and its photo blob consistent across create, edit and delete.
#[derive(Clone)]
pub struct CabinService {
    table: Arc<dyn CabinTable>,
    photos: Arc<dyn PhotoBucket>,
    links: PhotoLinks,
}

/// Photo step decided before anything is written.
enum PhotoPlan<'a> {
    Reuse(String),
    Upload {
        blob_name: String,
        reference: String,
        photo: &'a PhotoUpload,
    },
}

impl PhotoPlan<'_> {
    fn reference(&self) -> &str {
        match self {
            PhotoPlan::Reuse(reference) => reference,
            PhotoPlan::Upload { reference, .. } => reference,
        }
    }
}

/// Undo step for a row written ahead of its photo upload.
enum Undo {
    RemoveInserted(i64),
    RestorePrevious(Box<Cabin>),
}

impl CabinService {
    pub fn new(table: Arc<dyn CabinTable>, photos: Arc<dyn PhotoBucket>, links: PhotoLinks) -> Self {
        Self {
            table,
            photos,
            links,
        }
    }

    pub async fn list(&self) -> Result<Vec<Cabin>> {
        self.table.select_all().await.map_err(|e| {
            error!(error = %e, "failed to load cabins");
            AppError::CabinRead(e)
        })
    }

    pub async fn get(&self, id: i64) -> Result<Cabin> {
        self.table
            .select_by_id(id)
            .await
            .map_err(|e| {
                error!(cabin_id = id, error = %e, "failed to load cabin");
                AppError::CabinRead(e)
            })?
            .ok_or_else(|| {
                warn!(cabin_id = id, "cabin does not exist");
                AppError::CabinNotFound(id)
            })
    }

    pub async fn create(&self, draft: &CabinDraft) -> Result<Cabin> {
        self.create_or_update(draft, None).await
    }

    pub async fn update(&self, id: i64, draft: &CabinDraft) -> Result<Cabin> {
        self.create_or_update(draft, Some(id)).await
    }

    /// Inserts (`target` is `None`) or edits a cabin, then uploads its photo
    /// when the draft carries fresh content.
    ///
    /// The row is written first. If the upload then fails, the row write is
    /// undone: an inserted row is deleted, an edited row gets its previous
    /// values back. An undo that fails is reported as
    /// [`AppError::RollbackFailed`].
    ///
    /// Replacing a photo leaves the previous blob in the container. Photo
    /// references can be shared between rows, so only `delete` removes blobs.
    pub async fn create_or_update(&self, draft: &CabinDraft, target: Option<i64>) -> Result<Cabin> {
        let action = if target.is_some() { "edited" } else { "created" };
        draft.validate().inspect_err(|e| {
            warn!(cabin_id = ?target, error = %e, "rejected cabin draft");
        })?;
        let plan = self.plan_photo(&draft.image).inspect_err(|e| {
            warn!(cabin_id = ?target, error = %e, "rejected cabin photo");
        })?;
        let row = draft.to_row(plan.reference().to_string());

        let (cabin, undo) = match target {
            None => {
                let cabin = self.table.insert(&row).await.map_err(|source| {
                    error!(error = %source, "failed to insert cabin");
                    AppError::CabinWrite { action, source }
                })?;
                let id = cabin.id;
                (cabin, Undo::RemoveInserted(id))
            }
            Some(id) => {
                let previous = self.get(id).await?;
                let cabin = self
                    .table
                    .update(id, &row)
                    .await
                    .map_err(|source| {
                        error!(cabin_id = id, error = %source, "failed to update cabin");
                        AppError::CabinWrite { action, source }
                    })?
                    .ok_or_else(|| {
                        warn!(cabin_id = id, "cabin disappeared before it could be edited");
                        AppError::CabinNotFound(id)
                    })?;
                (cabin, Undo::RestorePrevious(Box::new(previous)))
            }
        };

        let PhotoPlan::Upload {
            blob_name, photo, ..
        } = plan
        else {
            info!(cabin_id = cabin.id, "cabin {} with existing photo", action);
            return Ok(cabin);
        };

        if let Err(cause) = self.photos.upload(&blob_name, photo).await {
            error!(cabin_id = cabin.id, blob = %blob_name, error = %cause, "photo upload failed, rolling back cabin");
            return Err(self.roll_back(undo, cause, action).await);
        }

        info!(cabin_id = cabin.id, blob = %blob_name, "cabin {} with new photo", action);
        Ok(cabin)
    }

    /// Removes the cabin's photo, then its row.
    ///
    /// A failed photo removal leaves the row untouched. A failed row delete
    /// after the photo is gone is not compensated: the row is left pointing
    /// at a missing photo and the error is returned.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let cabin = self.get(id).await?;
        let blob_name = self.links.blob_name_of(&cabin.image);

        if blob_name.is_empty() {
            warn!(cabin_id = id, image = %cabin.image, "cabin has no photo name, skipping photo removal");
        } else {
            self.photos.remove(blob_name).await.map_err(|source| {
                error!(cabin_id = id, blob = %blob_name, error = %source, "failed to delete cabin photo");
                AppError::PhotoDelete { id, source }
            })?;
        }

        match self.table.delete(id).await {
            Ok(true) => {
                info!(cabin_id = id, "cabin deleted");
                Ok(())
            }
            Ok(false) => {
                warn!(cabin_id = id, "cabin row was already gone after photo removal");
                Ok(())
            }
            Err(e) => {
                error!(cabin_id = id, blob = %blob_name, error = %e, "photo removed but cabin row could not be deleted");
                Err(AppError::CabinDelete(e))
            }
        }
    }

    fn plan_photo<'a>(&self, image: &'a CabinImage) -> Result<PhotoPlan<'a>> {
        match image {
            CabinImage::Stored(reference) if self.links.is_stored(reference) => {
                Ok(PhotoPlan::Reuse(reference.clone()))
            }
            CabinImage::Stored(reference) => Err(AppError::InvalidCabin(format!(
                "photo reference {} is not under {}",
                reference,
                self.links.public_prefix()
            ))),
            CabinImage::Upload(photo) => {
                let blob_name = photo::new_blob_name(&photo.file_name);
                let reference = self.links.public_url(&blob_name);
                Ok(PhotoPlan::Upload {
                    blob_name,
                    reference,
                    photo,
                })
            }
        }
    }

    async fn roll_back(&self, undo: Undo, cause: BackendError, action: &'static str) -> AppError {
        let (id, outcome) = match undo {
            Undo::RemoveInserted(id) => (id, self.table.delete(id).await.map(|_| ())),
            Undo::RestorePrevious(previous) => (previous.id, self.table.restore(&previous).await),
        };

        match outcome {
            Ok(()) => {
                warn!(cabin_id = id, "cabin rolled back after failed photo upload");
                AppError::PhotoUpload {
                    action,
                    source: cause,
                }
            }
            Err(rollback) => {
                error!(cabin_id = id, error = %rollback, "rollback of cabin failed");
                AppError::RollbackFailed {
                    id,
                    cause,
                    rollback,
                }
            }
        }
    }
}
