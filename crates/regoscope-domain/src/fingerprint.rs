use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a loaded file.
///
/// Identity fields:
/// - file path (as given by the caller)
/// - raw contents
pub fn fingerprint_for_file(path: &str, contents: &str) -> String {
    let canonical = [path, contents].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
