use sha2::{Digest, Sha256};

/// Content fingerprint of a document: hex-encoded SHA-256 of its extracted
/// text. Two uploads with byte-identical text are the same logical document
/// no matter the filename or upload time. Uniqueness is enforced by the
/// store's unique column at insert time, not by a separate lookup.
pub fn fingerprint(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}
