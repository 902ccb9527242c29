//! Naming of cabin photos in the object container and their public URLs.

const PUBLIC_OBJECT_PATH: &str = "storage/v1/object/public";

/// Where public photo references point: storage base URL plus container.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoLinks {
    base_url: String,
    container: String,
}

impl PhotoLinks {
    pub fn new(base_url: &str, container: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            container: container.trim_matches('/').to_string(),
        }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// Every public reference to a blob in the container starts with this.
    pub fn public_prefix(&self) -> String {
        format!("{}/{}/{}/", self.base_url, PUBLIC_OBJECT_PATH, self.container)
    }

    pub fn public_url(&self, blob_name: &str) -> String {
        format!("{}{}", self.public_prefix(), blob_name)
    }

    /// True when `reference` points at a top-level blob in the container.
    /// Blob names never contain `/`, so nested keys are not ours.
    pub fn is_stored(&self, reference: &str) -> bool {
        reference
            .strip_prefix(&self.public_prefix())
            .is_some_and(|blob| !blob.is_empty() && !blob.contains('/'))
    }

    /// Object key a reference points at. Everything after the container
    /// prefix is the key; references from elsewhere fall back to their
    /// trailing path segment.
    pub fn blob_name_of<'a>(&self, reference: &'a str) -> &'a str {
        match reference.strip_prefix(&self.public_prefix()) {
            Some(key) => key,
            None => blob_name_from_reference(reference),
        }
    }
}

/// A fresh, randomly prefixed blob name for an uploaded file.
pub fn new_blob_name(file_name: &str) -> String {
    blob_name_with(rand::random::<f64>(), file_name)
}

// Slashes would nest the blob under a pseudo-directory.
fn blob_name_with(fraction: f64, file_name: &str) -> String {
    format!("{}-{}", fraction, file_name.replace('/', ""))
}

/// Trailing path segment of a public reference.
pub fn blob_name_from_reference(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}
