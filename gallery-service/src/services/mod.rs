pub mod database;
pub mod memory;
pub mod providers;

pub use database::{GalleryDb, GalleryStore};
pub use memory::InMemoryGalleryStore;
pub use providers::{AssetHost, ImageGenerator, ProviderError};
