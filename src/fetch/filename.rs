//! Filename hint extraction, sanitization, and unique path resolution.
//!
//! Accepted images are always written under the canonical extension of their
//! detected format, never under whatever extension the URL implied.

use std::path::{Component, Path, PathBuf};

use url::Url;

/// Extracts a filename hint from the URL's last path segment, percent-decoded.
///
/// Returns `None` when the path has no non-empty last segment (e.g. the URL
/// ends in `/`), or when the decoded segment sanitizes to nothing.
#[must_use]
pub fn filename_hint_from_url(url: &Url) -> Option<String> {
    let last = url.path_segments()?.next_back()?;
    if last.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(last)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_else(|_| last.to_string());
    let sanitized = sanitize_filename(&decoded);
    (!sanitized.trim_matches('_').is_empty()).then_some(sanitized)
}

/// Sanitizes a filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems
/// (`/ \ : * ? " < > |` and control characters), and rewrites dot-only
/// segments so the result can never escape the destination directory.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

/// Applies the canonical extension for the detected format to a hint name.
///
/// A hint that already carries the canonical extension (or an accepted alias,
/// e.g. `.jpeg` for `.jpg`) is kept as-is. Any other extension is replaced so
/// on-disk names always reflect the validated format.
#[must_use]
pub fn apply_extension(name: &str, canonical_ext: &str, aliases: &[&str]) -> String {
    let lower = name.to_lowercase();
    if lower.ends_with(canonical_ext) || aliases.iter().any(|alias| lower.ends_with(alias)) {
        return name.to_string();
    }
    let stem = match name.rfind('.') {
        // Keep dotted names like "img.v2" intact when the tail is not an
        // extension-sized suffix.
        Some(pos) if name.len() - pos <= 6 && pos > 0 => &name[..pos],
        _ => name,
    };
    format!("{stem}{canonical_ext}")
}

/// Synthesizes a filename for URLs that carry no usable hint.
#[must_use]
pub fn synthesize_filename(canonical_ext: &str) -> String {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("image_{timestamp}{canonical_ext}")
}

/// Resolves a unique file path, adding a numeric suffix if the file exists.
///
/// Existing files are never overwritten; collisions yield `name_1.ext`,
/// `name_2.ext`, and so on.
#[must_use]
pub fn resolve_unique_path(dir: &Path, filename: &str) -> PathBuf {
    let filename = {
        let sanitized = sanitize_filename(filename);
        // No path separators may remain (defense against path traversal)
        if sanitized.contains('/')
            || sanitized.contains('\\')
            || sanitized.trim_matches('_').is_empty()
        {
            "image.bin".to_string()
        } else {
            sanitized
        }
    };
    let base_path = dir.join(&filename);

    if !base_path.exists() {
        return base_path;
    }

    let (stem, ext) = match filename.rfind('.') {
        Some(pos) => (&filename[..pos], &filename[pos..]),
        None => (filename.as_str(), ""),
    };

    for i in 1..1000 {
        let new_name = format!("{stem}_{i}{ext}");
        let new_path = dir.join(new_name);
        if !new_path.exists() {
            return new_path;
        }
    }

    // Fallback (extremely unlikely)
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    dir.join(format!("{stem}_{timestamp}{ext}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::Component;

    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_filename_hint_last_segment() {
        let url = Url::parse("https://example.com/photos/cat.png").unwrap();
        assert_eq!(filename_hint_from_url(&url), Some("cat.png".to_string()));
    }

    #[test]
    fn test_filename_hint_percent_decoded() {
        let url = Url::parse("https://example.com/my%20cat.jpg").unwrap();
        assert_eq!(filename_hint_from_url(&url), Some("my cat.jpg".to_string()));
    }

    #[test]
    fn test_filename_hint_trailing_slash_is_none() {
        let url = Url::parse("https://example.com/photos/").unwrap();
        assert_eq!(filename_hint_from_url(&url), None);
    }

    #[test]
    fn test_filename_hint_root_is_none() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(filename_hint_from_url(&url), None);
    }

    #[test]
    fn test_filename_hint_sanitizes_encoded_separators() {
        let url = Url::parse("https://example.com/a%2Fb%2Fcat.png").unwrap();
        let hint = filename_hint_from_url(&url).unwrap();
        assert!(!hint.contains('/'), "hint must not contain separators: {hint}");
    }

    #[test]
    fn test_sanitize_filename_removes_invalid_chars() {
        assert_eq!(sanitize_filename("file/name.png"), "file_name.png");
        assert_eq!(sanitize_filename("file:name.png"), "file_name.png");
        assert_eq!(sanitize_filename("file*name?.png"), "file_name_.png");
        assert_eq!(sanitize_filename("file|name.png"), "file_name.png");
    }

    #[test]
    fn test_sanitize_filename_rewrites_dot_segments() {
        assert_eq!(sanitize_filename("."), "_");
        assert_eq!(sanitize_filename(".."), "__");
    }

    #[test]
    fn test_sanitize_filename_preserves_valid_chars() {
        assert_eq!(sanitize_filename("valid-file_name.png"), "valid-file_name.png");
        assert_eq!(sanitize_filename("photo (1).jpg"), "photo (1).jpg");
    }

    #[test]
    fn test_apply_extension_keeps_canonical() {
        assert_eq!(apply_extension("cat.png", ".png", &[]), "cat.png");
    }

    #[test]
    fn test_apply_extension_keeps_alias() {
        assert_eq!(apply_extension("cat.jpeg", ".jpg", &[".jpeg"]), "cat.jpeg");
        assert_eq!(apply_extension("CAT.JPEG", ".jpg", &[".jpeg"]), "CAT.JPEG");
    }

    #[test]
    fn test_apply_extension_replaces_wrong_extension() {
        // Server said PNG bytes; URL claimed .php
        assert_eq!(apply_extension("cat.php", ".png", &[]), "cat.png");
    }

    #[test]
    fn test_apply_extension_appends_when_missing() {
        assert_eq!(apply_extension("cat", ".gif", &[]), "cat.gif");
    }

    #[test]
    fn test_apply_extension_keeps_long_dotted_stem() {
        assert_eq!(
            apply_extension("release.20240101", ".png", &[]),
            "release.20240101.png"
        );
    }

    #[test]
    fn test_synthesize_filename_has_extension() {
        let name = synthesize_filename(".webp");
        assert!(name.starts_with("image_"));
        assert!(name.ends_with(".webp"));
    }

    #[test]
    fn test_resolve_unique_path_no_conflict() {
        let temp_dir = TempDir::new().unwrap();
        let path = resolve_unique_path(temp_dir.path(), "cat.png");
        assert_eq!(path, temp_dir.path().join("cat.png"));
    }

    #[test]
    fn test_resolve_unique_path_with_conflict() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("cat.png"), b"existing").unwrap();

        let path = resolve_unique_path(temp_dir.path(), "cat.png");
        assert_eq!(path, temp_dir.path().join("cat_1.png"));
    }

    #[test]
    fn test_resolve_unique_path_multiple_conflicts() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("cat.png"), b"1").unwrap();
        std::fs::write(temp_dir.path().join("cat_1.png"), b"2").unwrap();
        std::fs::write(temp_dir.path().join("cat_2.png"), b"3").unwrap();

        let path = resolve_unique_path(temp_dir.path(), "cat.png");
        assert_eq!(path, temp_dir.path().join("cat_3.png"));
    }

    #[test]
    fn test_resolve_unique_path_dot_segment_stays_under_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = resolve_unique_path(temp_dir.path(), "..");
        assert_eq!(path, temp_dir.path().join("image.bin"));
    }

    #[test]
    fn test_resolve_unique_path_protects_against_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();

        for malicious in ["../../etc/passwd", "subdir/../../../etc/passwd", "a/\\b\\c"] {
            let path = resolve_unique_path(base, malicious);
            assert!(
                path.starts_with(base),
                "resolved path must be under dest dir: got {}",
                path.display()
            );
            let has_parent_dir = path.components().any(|c| c == Component::ParentDir);
            assert!(
                !has_parent_dir,
                "resolved path must not have .. component: got {}",
                path.display()
            );
        }
    }
}
