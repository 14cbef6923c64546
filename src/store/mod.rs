pub mod models;
mod photos;

pub use photos::{PhotoStore, PurgeStats, StoreError};
