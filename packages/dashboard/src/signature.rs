//! Structural signatures of dashboard inputs.
//!
//! A ranking fetch is only started when the signature of the
//! `(rank_type, group_by, filters)` triple differs from the one that
//! triggered the previous fetch.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::SettingsSnapshot;

/// SHA-256 over the canonical JSON of a [`SettingsSnapshot`], hex-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuerySignature(String);

impl QuerySignature {
    /// Computes the signature of `snapshot`.
    #[must_use]
    pub fn of(snapshot: &SettingsSnapshot) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(canonical_json(snapshot).as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// The hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QuerySignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serializes `value` to compact JSON.
///
/// Filter sets serialize deterministically: struct fields in declaration
/// order and set members in domain order.
///
/// # Panics
///
/// Panics if `value` fails to serialize. The dashboard's own types contain
/// no maps with non-string keys, so this cannot happen for them.
pub(crate) fn canonical_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| panic!("Failed to serialize dashboard state: {e}"))
}
