//! Generated blob names.
//!
//! A name is 40 lowercase hex characters taken from a SHA-256 digest over a
//! random nonce and the blob bytes, followed by an extension derived from the
//! content type: `3f0c...9a.jpg`. The nonce keeps identical uploads apart so
//! deleting one never removes a blob another record still points at.

use sha2::{Digest, Sha256};

const STEM_LEN: usize = 40;
const MAX_NAME_LEN: usize = 128;

pub fn generate(data: &[u8], mime_type: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(uuid::Uuid::new_v4().as_bytes());
    hasher.update(data);
    let digest = hex::encode(hasher.finalize());
    format!("{}.{}", &digest[..STEM_LEN], extension_for(mime_type))
}

/// Lowercased MIME type without parameters (`image/PNG; q=1` -> `image/png`).
pub fn essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

pub fn extension_for(mime_type: &str) -> &'static str {
    match essence(mime_type).as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/svg+xml" => "svg",
        "" | "application/octet-stream" => "bin",
        other => mime_guess::get_mime_extensions_str(other)
            .and_then(|exts| exts.first().copied())
            .unwrap_or("bin"),
    }
}

/// Accepts `stem` or `stem.ext` with ASCII alphanumeric parts only, so a
/// name can never escape its namespace directory. The `meta` extension is
/// reserved for sidecar files.
pub fn is_valid(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return false;
    }
    let alnum = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric());
    match name.split_once('.') {
        Some((stem, ext)) => alnum(stem) && alnum(ext) && ext != "meta",
        None => alnum(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_are_valid_and_typed() {
        let name = generate(b"fake jpeg", "image/jpeg");
        assert!(is_valid(&name), "{name}");
        assert!(name.ends_with(".jpg"));
        assert_eq!(name.len(), STEM_LEN + 4);
    }

    #[test]
    fn same_bytes_get_distinct_names() {
        let a = generate(b"same", "image/png");
        let b = generate(b"same", "image/png");
        assert_ne!(a, b);
    }

    #[test]
    fn extension_mapping() {
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("IMAGE/JPEG; charset=binary"), "jpg");
        assert_eq!(extension_for("image/svg+xml"), "svg");
        assert_eq!(extension_for("application/x-unknown-thing"), "bin");
        assert_eq!(extension_for("application/octet-stream"), "bin");
        assert_eq!(extension_for(""), "bin");
    }

    #[test]
    fn rejects_path_like_names() {
        assert!(!is_valid(""));
        assert!(!is_valid("../etc/passwd"));
        assert!(!is_valid("a/b.png"));
        assert!(!is_valid("abc.meta.png"));
        assert!(!is_valid(".png"));
        assert!(!is_valid("abc."));
        assert!(!is_valid("abc.meta"));
        assert!(is_valid("abc123.png"));
        assert!(is_valid("abc123"));
    }
}
