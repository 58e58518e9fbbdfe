//! Client-side checks run before an image is uploaded. The backend still
//! re-encodes and enforces its own limits.

use std::{io, path::Path};
use thiserror::Error;

pub const MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ImageRejection {
    #[error("未选择图片。")]
    Missing,
    #[error("图片为空文件。")]
    Empty,
    #[error("图片过大：单张不超过20MB（当前约 {}MB）", format_mib(*.0))]
    TooLarge(u64),
}

/// A candidate upload: file name and size in bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub size: u64,
}

impl ImageFile {
    #[must_use]
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// Stat a file on disk.
    /// # Errors
    /// Returns the I/O error when the file cannot be read.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
        Ok(Self::new(name, metadata.len()))
    }
}

/// Size in MiB with one decimal, e.g. `20.5`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_mib(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / 1024.0 / 1024.0)
}

/// Validate one image before upload.
/// # Errors
/// Returns the rejection whose message is shown to the user.
pub fn validate_single_image_file(file: Option<&ImageFile>) -> Result<(), ImageRejection> {
    let Some(file) = file else {
        return Err(ImageRejection::Missing);
    };
    if file.size == 0 {
        return Err(ImageRejection::Empty);
    }
    if file.size > MAX_IMAGE_BYTES {
        return Err(ImageRejection::TooLarge(file.size));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn rejects_missing_and_empty() {
        assert_eq!(
            validate_single_image_file(None),
            Err(ImageRejection::Missing)
        );
        let empty = ImageFile::new("a.png", 0);
        let err = validate_single_image_file(Some(&empty)).unwrap_err();
        assert_eq!(err.to_string(), "图片为空文件。");
    }

    #[test]
    fn size_limit_is_inclusive() {
        let at_limit = ImageFile::new("a.png", MAX_IMAGE_BYTES);
        assert!(validate_single_image_file(Some(&at_limit)).is_ok());

        let over = ImageFile::new("a.png", MAX_IMAGE_BYTES + 1);
        let err = validate_single_image_file(Some(&over)).unwrap_err();
        assert_eq!(err.to_string(), "图片过大：单张不超过20MB（当前约 20.0MB）");
    }

    #[test]
    fn reports_size_with_one_decimal() {
        assert_eq!(format_mib(0), "0.0");
        assert_eq!(format_mib(25 * 1024 * 1024 + 512 * 1024), "25.5");
        let err = ImageRejection::TooLarge(31_457_280);
        assert_eq!(err.to_string(), "图片过大：单张不超过20MB（当前约 30.0MB）");
    }

    #[test]
    fn reads_size_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0_u8; 64]).unwrap();
        let image = ImageFile::from_path(file.path()).unwrap();
        assert_eq!(image.size, 64);
        assert!(validate_single_image_file(Some(&image)).is_ok());
    }
}
