mod admin;
mod photos;
mod ui;

pub use admin::{admin_purge, health};
pub use photos::{create_photo, delete_photo, list_photos, update_photo};
pub use ui::{index, serve_upload};
