//! Generation cache key.

use sha2::{Digest, Sha256};
use themeforge_core::blueprint::Blueprint;
use themeforge_patterns::PatternRegistry;

/// Hex sha256 over the blueprint's JSON form and the registry catalog digest.
///
/// Blueprint maps are ordered, so equal blueprints serialize identically.
pub fn fingerprint(blueprint: &Blueprint, registry: &PatternRegistry) -> serde_json::Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(blueprint)?);
    hasher.update([0u8]);
    hasher.update(registry.digest().as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Hex sha256 of file content.
#[must_use]
pub fn content_sha256(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
