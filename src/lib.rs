//! photo-gallery - a minimal self-hosted photo gallery
//!
//! This crate provides photo upload, editing, and browsing with:
//! - A single JSON file as the record store (whole-file rewrite per mutation)
//! - A local upload directory as blob storage behind a swappable trait
//! - REST API with multipart upload support
//! - An embedded single-page UI served at `/`

pub mod api;
pub mod blob_store;
pub mod config;
pub mod store;
#[cfg(test)]
pub mod testutil;

use std::sync::Arc;

use config::Config;
use store::PhotoStore;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub store: PhotoStore,
    pub blobs: Arc<dyn blob_store::BlobStore>,
}
