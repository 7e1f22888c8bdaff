//! Upload policy and stored filename rules for vessel files.
//!
//! Stored names have the shape `<epoch_ms>-<token>-<sanitized original>`.
//! The timestamp orders uploads, the random token separates uploads that land
//! in the same millisecond, and sanitizing the original name removes path
//! separators so a stored name can never escape the upload directory.

use std::path::Path;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Multipart field carrying the file, on both upload and report routes.
pub const UPLOAD_FIELD: &str = "vessel";

/// Default maximum upload size (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default extension allow-list.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] =
    &["craft", "sfs", "txt", "log", "json", "png", "jpg", "jpeg", "zip"];

/// Replacement for characters outside the safe set.
const PLACEHOLDER: char = '_';

/// Fallback when nothing usable is left of the original filename.
const FALLBACK_NAME: &str = "file";

/// Length of the random token in stored filenames.
const TOKEN_LEN: usize = 8;

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Extension allow-list and size ceiling applied to every upload.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    allowed_extensions: Vec<String>,
    max_bytes: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_EXTENSIONS.iter().copied(), DEFAULT_MAX_UPLOAD_BYTES)
    }
}

impl UploadPolicy {
    /// Build a policy. Extensions are lowercased and a leading dot is
    /// stripped, so `".CRAFT"` and `"craft"` are equivalent.
    pub fn new<I, S>(allowed_extensions: I, max_bytes: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_extensions = allowed_extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            allowed_extensions,
            max_bytes,
        }
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Check the extension of `filename` against the allow-list and return
    /// it lowercased.
    pub fn validate_extension(&self, filename: &str) -> Result<String, CoreError> {
        let extension = extension_of(filename).unwrap_or_default();
        if !extension.is_empty() && self.allowed_extensions.contains(&extension) {
            Ok(extension)
        } else {
            Err(CoreError::UnsupportedExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            })
        }
    }

    /// Check a byte count against the size ceiling.
    pub fn check_size(&self, size: usize) -> Result<(), CoreError> {
        if size > self.max_bytes {
            return Err(CoreError::PayloadTooLarge {
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Filename helpers
// ---------------------------------------------------------------------------

/// Lowercased extension of the last path component, if any.
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(base_name(filename))
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

/// Reduce a client-supplied filename to a safe single path component.
///
/// Directory parts are dropped and every character outside
/// `[A-Za-z0-9._-]` becomes `_`.
pub fn sanitize_filename(original: &str) -> String {
    let sanitized: String = base_name(original)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                PLACEHOLDER
            }
        })
        .collect();

    if sanitized.chars().all(|c| c == '.') {
        FALLBACK_NAME.to_string()
    } else {
        sanitized
    }
}

/// Compose a stored filename from its parts.
pub fn stored_filename(original: &str, timestamp_ms: i64, token: &str) -> String {
    format!("{timestamp_ms}-{token}-{}", sanitize_filename(original))
}

/// Generate a fresh stored filename for an upload happening now.
pub fn generate_stored_filename(original: &str) -> String {
    let token = uuid::Uuid::new_v4().simple().to_string();
    stored_filename(
        original,
        chrono::Utc::now().timestamp_millis(),
        &token[..TOKEN_LEN],
    )
}

fn base_name(filename: &str) -> &str {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
