//! Content hashing utilities
//!
//! Record identifiers are derived from content, so the digest must be stable
//! across runs and platforms. MD5 is used for speed and stability, not for
//! collision resistance.

/// Compute the lowercase hex MD5 digest of a byte slice.
pub fn md5_hex(data: &[u8]) -> String {
    let digest = md5::compute(data);
    format!("{:x}", digest)
}
