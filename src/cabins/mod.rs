pub mod draft_file;
pub mod photo;
pub mod service;

use chrono::{DateTime, Utc};

use crate::errors::{AppError, Result};

pub use photo::PhotoLinks;
pub use service::CabinService;

/// A row of the `cabins` table as the backend returns it.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Cabin {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub max_capacity: i32,
    pub regular_price: f64,
    pub discount: f64,
    pub description: String,
    pub image: String,
}

/// Column values written on insert or update. `id` and `created_at` belong to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct CabinRow {
    pub name: String,
    pub max_capacity: i32,
    pub regular_price: f64,
    pub discount: f64,
    pub description: String,
    pub image: String,
}

/// Fresh photo content supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CabinImage {
    /// Public reference of a photo that is already in the container.
    Stored(String),
    Upload(PhotoUpload),
}

/// What the caller submits to create or edit a cabin.
#[derive(Debug, Clone, PartialEq)]
pub struct CabinDraft {
    pub name: String,
    pub max_capacity: i32,
    pub regular_price: f64,
    pub discount: f64,
    pub description: String,
    pub image: CabinImage,
}

impl CabinDraft {
    /// Checks the field rules the back-office form enforces.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::InvalidCabin("name is required".to_string()));
        }
        if self.max_capacity < 1 {
            return Err(AppError::InvalidCabin(
                "capacity should be at least 1".to_string(),
            ));
        }
        // Negated comparisons so NaN is rejected too.
        if !(self.regular_price > 0.0) {
            return Err(AppError::InvalidCabin(
                "regular price should be greater than 0".to_string(),
            ));
        }
        if !(self.discount >= 0.0) {
            return Err(AppError::InvalidCabin(
                "discount cannot be negative".to_string(),
            ));
        }
        if self.discount > self.regular_price {
            return Err(AppError::InvalidCabin(format!(
                "discount ({}) should be less than the regular price ({})",
                self.discount, self.regular_price
            )));
        }
        if let CabinImage::Upload(photo) = &self.image {
            if photo.bytes.is_empty() {
                return Err(AppError::InvalidCabin("photo is empty".to_string()));
            }
        }
        Ok(())
    }

    pub(crate) fn to_row(&self, image: String) -> CabinRow {
        CabinRow {
            name: self.name.clone(),
            max_capacity: self.max_capacity,
            regular_price: self.regular_price,
            discount: self.discount,
            description: self.description.clone(),
            image,
        }
    }
}
