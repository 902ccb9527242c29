//! Cabin back office
//!
//! Creates, edits and deletes cabins whose rows live in Postgres and whose
//! photos live in an S3-compatible container, keeping the two consistent.

pub mod backend;
pub mod cabins;
pub mod config;
pub mod errors;

pub use cabins::{Cabin, CabinDraft, CabinImage, CabinService, PhotoLinks, PhotoUpload};
pub use errors::{AppError, Result};
