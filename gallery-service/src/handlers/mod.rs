pub mod health;
pub mod images;

pub use health::{health_check, readiness_check};
pub use images::{generate_image, list_images};
