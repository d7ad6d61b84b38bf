//! File upload validation
//!
//! Campaign banners and creatives are uploaded by advertisers. The checks
//! below run before any bytes are stored.

use serde::{Deserialize, Serialize};

/// Default maximum upload size (5 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Characters that must never appear in an uploaded filename
const FORBIDDEN_FILENAME_CHARS: &[char] = &['<', '>', '&', '$', '`', '|', ';'];

/// Upload limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadPolicy {
    pub max_size: u64,
    pub allowed_types: Vec<String>,
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_types: ["image/jpeg", "image/png", "image/gif", "image/webp"]
                .map(String::from)
                .to_vec(),
            allowed_extensions: [".jpg", ".jpeg", ".png", ".gif", ".webp"]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// Reason an upload was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadRejection {
    TooLarge,
    TypeNotAllowed,
    ExtensionNotAllowed,
    InvalidFilename,
}

impl UploadRejection {
    pub const fn message(&self) -> &'static str {
        match self {
            Self::TooLarge => "File size exceeds limit",
            Self::TypeNotAllowed => "File type not allowed",
            Self::ExtensionNotAllowed => "File extension not allowed",
            Self::InvalidFilename => "Invalid filename",
        }
    }
}

/// Result of an upload check, serialized as `{ "valid": bool, "error"?: string }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadVerdict {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip)]
    pub rejection: Option<UploadRejection>,
}

impl UploadVerdict {
    fn accepted() -> Self {
        Self {
            valid: true,
            error: None,
            rejection: None,
        }
    }

    fn rejected(reason: UploadRejection) -> Self {
        Self {
            valid: false,
            error: Some(reason.message()),
            rejection: Some(reason),
        }
    }
}

/// Validate an upload's declared metadata
///
/// Checks run in order and the first failure wins: size, MIME type,
/// extension, then dangerous filename characters (path traversal, markup,
/// shell metacharacters).
pub fn validate_file_upload(
    filename: &str,
    mimetype: &str,
    size: u64,
    policy: &UploadPolicy,
) -> UploadVerdict {
    if size > policy.max_size {
        return UploadVerdict::rejected(UploadRejection::TooLarge);
    }

    if !policy.allowed_types.iter().any(|t| t == mimetype) {
        return UploadVerdict::rejected(UploadRejection::TypeNotAllowed);
    }

    let lowered = filename.to_lowercase();
    let extension = lowered.rfind('.').map_or(lowered.as_str(), |i| &lowered[i..]);
    if !policy.allowed_extensions.iter().any(|e| e == extension) {
        return UploadVerdict::rejected(UploadRejection::ExtensionNotAllowed);
    }

    if filename.contains("..") || filename.contains(FORBIDDEN_FILENAME_CHARS) {
        return UploadVerdict::rejected(UploadRejection::InvalidFilename);
    }

    UploadVerdict::accepted()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(filename: &str, mimetype: &str, size: u64) -> UploadVerdict {
        validate_file_upload(filename, mimetype, size, &UploadPolicy::default())
    }

    #[test]
    fn test_accepts_banner_image() {
        let verdict = check("banner.PNG", "image/png", 120_000);
        assert!(verdict.valid);
        assert_eq!(verdict.error, None);
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        assert!(check("a.jpg", "image/jpeg", DEFAULT_MAX_UPLOAD_BYTES).valid);
        let verdict = check("a.jpg", "image/jpeg", DEFAULT_MAX_UPLOAD_BYTES + 1);
        assert_eq!(verdict.rejection, Some(UploadRejection::TooLarge));
        assert_eq!(verdict.error, Some("File size exceeds limit"));
    }

    #[test]
    fn test_rejects_mime_type() {
        let verdict = check("a.png", "application/x-msdownload", 10);
        assert_eq!(verdict.rejection, Some(UploadRejection::TypeNotAllowed));
    }

    #[test]
    fn test_rejects_extension() {
        assert_eq!(
            check("shell.php", "image/png", 10).rejection,
            Some(UploadRejection::ExtensionNotAllowed)
        );
        assert_eq!(
            check("noextension", "image/png", 10).rejection,
            Some(UploadRejection::ExtensionNotAllowed)
        );
        assert_eq!(
            check("double.png.exe", "image/png", 10).rejection,
            Some(UploadRejection::ExtensionNotAllowed)
        );
    }

    #[test]
    fn test_rejects_dangerous_filenames() {
        for name in ["../../etc/x.png", "<svg>.png", "a;rm.png", "a|b.png", "$(x).png", "`x`.png", "a&b.png"] {
            assert_eq!(
                check(name, "image/png", 10).rejection,
                Some(UploadRejection::InvalidFilename),
                "{name}"
            );
        }
    }

    #[test]
    fn test_size_checked_before_type() {
        let verdict = check("evil.exe", "application/octet-stream", u64::MAX);
        assert_eq!(verdict.rejection, Some(UploadRejection::TooLarge));
    }

    #[test]
    fn test_verdict_serializes_like_dashboard_contract() {
        let ok = serde_json::to_value(check("a.gif", "image/gif", 1)).unwrap();
        assert_eq!(ok, serde_json::json!({ "valid": true }));

        let bad = serde_json::to_value(check("a.gif", "text/html", 1)).unwrap();
        assert_eq!(
            bad,
            serde_json::json!({ "valid": false, "error": "File type not allowed" })
        );
    }

    #[test]
    fn test_custom_policy() {
        let policy = UploadPolicy {
            max_size: 10,
            allowed_types: vec!["application/pdf".to_string()],
            allowed_extensions: vec![".pdf".to_string()],
        };
        assert!(validate_file_upload("terms.pdf", "application/pdf", 10, &policy).valid);
        assert!(!validate_file_upload("terms.pdf", "application/pdf", 11, &policy).valid);
    }
}
