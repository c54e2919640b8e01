//! Digest computation for configuration snapshots.
//!
//! The commit pipeline records a digest alongside each accepted sequence so
//! replicas can confirm they materialized the same configuration.
//!
//! ## Determinism Guarantees
//!
//! - Same items → same digest (keys are ordered, JSON encoding is canonical)
//! - Item versions are part of the digest, unlike item equality: two
//!   replicas that agree on content but not on version stamps have diverged

use crate::errors::Result;
use crate::snapshot::ConfigSnapshot;
use sha2::{Digest, Sha256};

/// Compute the hex-encoded SHA256 digest of a snapshot
///
/// # Errors
///
/// Returns `ConfigTxError::Serialization` if JSON serialization fails.
pub fn compute_snapshot_digest(snapshot: &ConfigSnapshot) -> Result<String> {
    let canonical = serde_json::to_string(snapshot)?;
    Ok(hash_string(&canonical))
}

fn hash_string(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::flatten;
    use crate::model::{ConfigGroup, ConfigValue};

    fn snapshot(version: u64, bytes: &[u8]) -> ConfigSnapshot {
        let tree =
            ConfigGroup::new(0, "Admins").with_value("A", ConfigValue::new(version, bytes, "P1"));
        flatten("Channel", &tree).unwrap()
    }

    #[test]
    fn test_digest_is_hex_sha256() {
        let digest = compute_snapshot_digest(&snapshot(0, b"a")).unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_digest_is_deterministic() {
        assert_eq!(
            compute_snapshot_digest(&snapshot(0, b"a")).unwrap(),
            compute_snapshot_digest(&snapshot(0, b"a")).unwrap()
        );
    }

    #[test]
    fn test_digest_sees_version_and_content() {
        let base = compute_snapshot_digest(&snapshot(0, b"a")).unwrap();
        assert_ne!(base, compute_snapshot_digest(&snapshot(1, b"a")).unwrap());
        assert_ne!(base, compute_snapshot_digest(&snapshot(0, b"b")).unwrap());
    }
}
