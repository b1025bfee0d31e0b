//! File naming conventions for uploads and results.

/// Extensions accepted for uploaded and catalog images.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Whether `filename` carries an allowed image extension (case-insensitive).
pub fn has_allowed_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Display name of a garment: the filename up to its first dot.
pub fn garment_name(filename: &str) -> &str {
    filename.split('.').next().unwrap_or(filename)
}

/// Filename under the uploads directory for a session's person image.
pub fn person_image_filename(session_id: &str) -> String {
    format!("{session_id}_user.jpg")
}

/// Filename under the results directory for one garment's try-on output.
pub fn result_filename(session_id: &str, garment_name: &str) -> String {
    format!("{session_id}_{garment_name}_result.jpg")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_extensions_are_case_insensitive() {
        assert!(has_allowed_extension("photo.jpg"));
        assert!(has_allowed_extension("photo.JPEG"));
        assert!(has_allowed_extension("photo.Png"));
    }

    #[test]
    fn disallowed_extensions_rejected() {
        assert!(!has_allowed_extension("archive.zip"));
        assert!(!has_allowed_extension("photo.gif"));
        assert!(!has_allowed_extension("no_extension"));
    }

    #[test]
    fn garment_name_strips_extension() {
        assert_eq!(garment_name("jacket-02.jpg"), "jacket-02");
        assert_eq!(garment_name("dress.v2.png"), "dress");
        assert_eq!(garment_name("bare"), "bare");
    }

    #[test]
    fn person_image_filename_format() {
        assert_eq!(person_image_filename("abc-123"), "abc-123_user.jpg");
    }

    #[test]
    fn result_filename_format() {
        assert_eq!(
            result_filename("abc-123", "jacket"),
            "abc-123_jacket_result.jpg"
        );
    }
}
