//! Pure formatting helpers shared by the CLI and feature code: timestamps,
//! localized error messages and image pre-upload checks.

pub mod datetime;
pub mod errors;
pub mod image;

pub use datetime::{fmt_date_time, DateInput};
pub use errors::{format_api_error, format_error_payload, translate_message, DEFAULT_FALLBACK};
pub use image::{
    format_mib, validate_single_image_file, ImageFile, ImageRejection, MAX_IMAGE_BYTES,
};
