//! Cabin drafts read from JSON files for the command line.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use super::{CabinDraft, CabinImage, PhotoUpload};

#[derive(Debug, Deserialize)]
struct DraftFile {
    name: String,
    max_capacity: i32,
    regular_price: f64,
    #[serde(default)]
    discount: f64,
    #[serde(default)]
    description: String,
    /// Public URL of a stored photo, or a local path to upload.
    image: String,
}

/// Reads a draft JSON file. A relative local photo path is resolved against
/// the draft file's directory and its bytes are loaded for upload.
pub async fn load_draft(draft_path: &Path) -> Result<CabinDraft> {
    let content = tokio::fs::read_to_string(draft_path)
        .await
        .with_context(|| format!("Failed to read cabin draft at {}", draft_path.display()))?;
    let file: DraftFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse cabin draft at {}", draft_path.display()))?;

    let image = if file.image.starts_with("http://") || file.image.starts_with("https://") {
        CabinImage::Stored(file.image)
    } else {
        let base = draft_path.parent().unwrap_or_else(|| Path::new("."));
        CabinImage::Upload(read_photo(&base.join(&file.image)).await?)
    };

    Ok(CabinDraft {
        name: file.name,
        max_capacity: file.max_capacity,
        regular_price: file.regular_price,
        discount: file.discount,
        description: file.description,
        image,
    })
}

async fn read_photo(photo_path: &Path) -> Result<PhotoUpload> {
    let bytes = tokio::fs::read(photo_path)
        .await
        .with_context(|| format!("Failed to read cabin photo at {}", photo_path.display()))?;
    let file_name = photo_path
        .file_name()
        .context("Cabin photo path has no file name")?
        .to_string_lossy()
        .to_string();
    let content_type = mime_guess::from_path(photo_path)
        .first_or_octet_stream()
        .to_string();

    Ok(PhotoUpload {
        file_name,
        content_type,
        bytes,
    })
}
