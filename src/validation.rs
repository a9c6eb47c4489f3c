use crate::constants::{MAX_QUALITY, MIN_QUALITY};
use crate::error::{CompressionError, Result};
use std::fs;
use std::path::Path;

/// Validate a quality setting against the 1-100 range
pub fn validate_quality(quality: u8) -> Result<u8> {
    if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
        return Err(CompressionError::InvalidQuality(quality));
    }
    Ok(quality)
}

/// Validate a maximum dimension (must be at least one pixel)
pub fn validate_dimension(name: &str, value: u32) -> Result<u32> {
    if value == 0 {
        return Err(CompressionError::config(format!(
            "{} must be at least 1 pixel",
            name
        )));
    }
    Ok(value)
}

/// Validate that the batch root exists
pub fn validate_input_root(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(CompressionError::InputNotFound(path.to_path_buf()));
    }
    if !path.is_file() && !path.is_dir() {
        return Err(CompressionError::config(format!(
            "Input path is neither a file nor a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Validate the output directory path without touching the filesystem
pub fn validate_output_dir(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(CompressionError::config("Output directory must not be empty"));
    }
    if path.is_file() {
        return Err(CompressionError::config(format!(
            "Output path exists and is a file: {:?}",
            path
        )));
    }
    Ok(())
}

/// Create the output directory (and parents) if it doesn't exist
pub fn prepare_output_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .map_err(|_| CompressionError::DirectoryCreationFailed(path.to_path_buf()))
}
