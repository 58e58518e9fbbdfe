use crate::{
    format::{validate_single_image_file, ImageFile},
    sanitize::sanitize_html,
};
use anyhow::{Context, Result};
use std::{io::Read, path::PathBuf};

#[derive(Debug)]
pub struct CheckImageArgs {
    pub path: PathBuf,
}

/// Read HTML from stdin and print the sanitized result.
/// # Errors
/// Returns an error if stdin cannot be read.
pub fn sanitize() -> Result<()> {
    let mut html = String::new();
    std::io::stdin()
        .read_to_string(&mut html)
        .context("failed to read stdin")?;
    println!("{}", sanitize_html(&html));
    Ok(())
}

/// # Errors
/// Returns the rejection message if the image would not be accepted.
pub fn check_image(args: &CheckImageArgs) -> Result<()> {
    let image = ImageFile::from_path(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    validate_single_image_file(Some(&image))?;
    println!("{}: ok ({} bytes)", image.name, image.size);
    Ok(())
}
