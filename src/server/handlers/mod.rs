//! HTTP request handlers for the web server.

mod api;
mod upload;

pub use api::health;
pub use upload::{upload_form, IMAGE_FIELD, MIN_IMAGE_BYTES};
