/// Utility functions for common operations
///
/// Size formatting and result reporting shared by the library and the CLI.

use crate::constants::{
    COMPRESSED_SIZE_PREFIX, COMPRESSION_RATIO_PREFIX, PROGRESS_SPINNER_TEMPLATE, SIZE_UNITS,
    SIZE_UNIT_STEP, SUCCESS_PREFIX, WARNING_PREFIX,
};
use crate::error::{CompressionError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Validate that a file exists and return a descriptive error if not
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(CompressionError::FileNotFound(path.to_path_buf()));
    }
    Ok(())
}

/// Create a progress spinner with consistent styling
pub fn create_progress_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template(PROGRESS_SPINNER_TEMPLATE) {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb
}

/// Format a byte count in human-readable form
///
/// The count is always divided at least once, so anything below 1024 bytes
/// is reported as a fraction of a kilobyte (`512` -> `"0.50KB"`). Division
/// stops at terabytes.
///
/// # Example
/// ```
/// use tiny_image::utils::format_file_size;
///
/// assert_eq!(format_file_size(1024 * 1024), "1.00MB");
/// assert_eq!(format_file_size(512), "0.50KB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    let mut size = bytes as f64 / SIZE_UNIT_STEP;
    let mut unit_index = 0;

    while size >= SIZE_UNIT_STEP && unit_index < SIZE_UNITS.len() - 1 {
        size /= SIZE_UNIT_STEP;
        unit_index += 1;
    }

    format!("{:.2}{}", size, SIZE_UNITS[unit_index])
}

/// Calculate compression ratio as a percentage
///
/// Positive means reduction, negative means the output grew.
pub fn calculate_compression_ratio(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    ((original_size as f64 - compressed_size as f64) / original_size as f64) * 100.0
}

/// Print compression result with formatted output
pub fn print_compression_result(original_size: u64, compressed_size: u64) {
    let ratio = calculate_compression_ratio(original_size, compressed_size);

    println!(
        "{} {} bytes ({})",
        COMPRESSED_SIZE_PREFIX,
        compressed_size,
        format_file_size(compressed_size)
    );
    println!("{} {:.1}%", COMPRESSION_RATIO_PREFIX, ratio);

    if ratio > 0.0 {
        println!("{} Successfully reduced file size by {:.1}%", SUCCESS_PREFIX, ratio);
    } else {
        println!("{}  File size not reduced ({:.1}%)", WARNING_PREFIX, ratio);
    }
}
