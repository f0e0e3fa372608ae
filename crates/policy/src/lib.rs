//! Validation policy for the GS1 pharma scan validator.
//!
//! A [`Policy`] decides the parts of validation that are product-owner
//! choices rather than format rules: whether GTIN check digits are
//! enforced, whether trailing garbage rejects a scan, and which language
//! messages are rendered in. [`Policy::default`] reproduces the legacy
//! behaviour of the scan handler.

#![warn(missing_docs)]

use std::fs;
use std::path::Path;

use gs1_pharma_jsonc_strip::to_strict_json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use gs1_pharma_diagnostics::Locale;

/// Schema major version this crate understands.
pub const SCHEMA_MAJOR: u32 = 1;

/// Errors that can occur when loading or validating a policy.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The policy file could not be read.
    #[error("failed to read policy file {path}: {source}")]
    Io {
        /// Path that was attempted.
        path: String,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// JSON deserialization failed.
    #[error("invalid policy JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A field value is out of its valid range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The name of the field that failed validation.
        field: String,
        /// A human-readable explanation of why the field value is invalid.
        reason: String,
    },
}

/// Validation policy.
///
/// # Example
/// ```
/// let policy = gs1_pharma_policy::Policy {
///     strict_gtin_checksum: true,
///     ..Default::default()
/// };
/// assert!(!policy.reject_trailing_data);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Policy {
    /// Policy identifier (e.g., `"default"`, `"press-line-3"`).
    pub id: String,
    /// Policy schema version (e.g., `"1.0.0"`).
    pub schema_version: String,
    /// Enforce the GTIN (AI 01) check digit.
    ///
    /// Off by default: scans from some presses carry GTINs that fail the
    /// weighted check, and the legacy handler accepted them. Pending
    /// product-owner confirmation before it is switched on anywhere.
    #[serde(default, alias = "strictGtinChecksum")]
    pub strict_gtin_checksum: bool,
    /// Treat unrecognized data as an error instead of a note: trailing
    /// characters of a raw scan, or text outside the `(AI)` groups of a
    /// transcription.
    #[serde(default, alias = "rejectTrailingData")]
    pub reject_trailing_data: bool,
    /// Language for rendered diagnostic messages.
    #[serde(default)]
    pub locale: Locale,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            id: "default".into(),
            schema_version: "1.0.0".into(),
            strict_gtin_checksum: false,
            reject_trailing_data: false,
            locale: Locale::Tr,
        }
    }
}

/// Load and validate a [`Policy`] from a JSON or JSONC string.
///
/// Comments and trailing commas are accepted. After deserialization:
/// - `id` and `schema_version` must be non-empty
/// - the major component of `schema_version` must equal [`SCHEMA_MAJOR`]
pub fn load_policy_from_str(s: &str) -> Result<Policy, PolicyError> {
    let policy: Policy = serde_json::from_str(&to_strict_json(s))?;

    if policy.id.trim().is_empty() {
        return Err(PolicyError::InvalidField {
            field: "id".into(),
            reason: "must not be empty".into(),
        });
    }
    if policy.schema_version.trim().is_empty() {
        return Err(PolicyError::InvalidField {
            field: "schema_version".into(),
            reason: "must not be empty".into(),
        });
    }

    let major = policy
        .schema_version
        .split('.')
        .next()
        .and_then(|m| m.trim().parse::<u32>().ok());
    match major {
        Some(SCHEMA_MAJOR) => {}
        Some(other) => {
            return Err(PolicyError::InvalidField {
                field: "schema_version".into(),
                reason: format!("major version {other} is not supported (expected {SCHEMA_MAJOR})"),
            });
        }
        None => {
            return Err(PolicyError::InvalidField {
                field: "schema_version".into(),
                reason: format!("'{}' is not a semantic version", policy.schema_version),
            });
        }
    }

    Ok(policy)
}

/// Read and validate a policy file.
pub fn load_policy_from_path(path: impl AsRef<Path>) -> Result<Policy, PolicyError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| PolicyError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_policy_from_str(&text)
}
