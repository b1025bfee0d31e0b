//! Garment catalog: directory scan, validation, and ordering.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::naming::{garment_name, has_allowed_extension};

/// One candidate garment image from the catalog directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarmentItem {
    /// Display name: the filename up to its first dot.
    pub name: String,
    /// Catalog filename including extension.
    pub filename: String,
    /// Full path to the image file.
    pub path: PathBuf,
}

/// List garment images in `dir`, naturally sorted by filename.
///
/// Only `jpg`/`jpeg`/`png` files are included. A missing directory
/// yields an empty catalog rather than an error.
pub fn list_garments(dir: &Path) -> std::io::Result<Vec<GarmentItem>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut filenames: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| has_allowed_extension(name))
        .collect();

    // Numbered files sort as 1, 2, 10 rather than 1, 10, 2.
    filenames.sort_by(|a, b| natural_sort_key(a).cmp(&natural_sort_key(b)));

    Ok(filenames
        .into_iter()
        .map(|filename| GarmentItem {
            name: garment_name(&filename).to_string(),
            path: dir.join(&filename),
            filename,
        })
        .collect())
}

/// Validate a caller-supplied catalog filename.
///
/// Rules:
/// - Must not be empty.
/// - Must not contain path separators or parent-directory components.
/// - Must carry an allowed image extension.
pub fn validate_garment_filename(filename: &str) -> Result<(), CoreError> {
    if filename.is_empty() {
        return Err(CoreError::Validation(
            "Garment filename must not be empty".to_string(),
        ));
    }
    if filename.contains(['/', '\\']) || filename.contains("..") {
        return Err(CoreError::Validation(format!(
            "Garment filename must not contain path components: '{filename}'"
        )));
    }
    if !has_allowed_extension(filename) {
        return Err(CoreError::Validation(format!(
            "Garment filename must end in one of {}: '{filename}'",
            crate::naming::ALLOWED_EXTENSIONS.join(", ")
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Natural sort
// ---------------------------------------------------------------------------

/// A filename fragment: either a run of digits or a run of other chars.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortPart {
    Number(u64),
    Text(String),
}

/// Split a filename into alternating digit/text runs for comparison.
///
/// Digit runs compare numerically, text runs case-insensitively.
fn natural_sort_key(name: &str) -> Vec<SortPart> {
    let mut parts = Vec::new();
    let mut buf = String::new();
    let mut buf_is_digits = false;

    for c in name.chars() {
        let is_digit = c.is_ascii_digit();
        if !buf.is_empty() && is_digit != buf_is_digits {
            parts.push(flush(&mut buf, buf_is_digits));
        }
        buf_is_digits = is_digit;
        buf.push(c);
    }
    if !buf.is_empty() {
        parts.push(flush(&mut buf, buf_is_digits));
    }
    parts
}

fn flush(buf: &mut String, is_digits: bool) -> SortPart {
    let part = if is_digits {
        // A pathological digit run longer than u64 still sorts after
        // everything parseable.
        SortPart::Number(buf.parse().unwrap_or(u64::MAX))
    } else {
        SortPart::Text(buf.to_lowercase())
    };
    buf.clear();
    part
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
