//! Shared logic for gs1-pharma language bindings.
//!
//! Contains the decode, validate, check-digit, and explain workflows that
//! every binding target exposes. Each binding crate wraps these functions
//! with its own type conversion layer; errors cross the boundary as
//! `String`.

use gs1_pharma_core::{DecodeResult, Policy, ScanOutcome, ValidationResult};
use gs1_pharma_policy::load_policy_from_str;

// ── Decode ──────────────────────────────────────────────────────────────

/// Decode a scan payload with Turkish diagnostic messages.
pub fn decode_scan(input: &str) -> DecodeResult {
    gs1_pharma_core::decode(input)
}

// ── Validate ────────────────────────────────────────────────────────────

/// Resolve a policy from optional JSON/JSONC text; `None` means the default.
pub fn load_policy(policy_json: Option<&str>) -> Result<Policy, String> {
    match policy_json {
        Some(json) => load_policy_from_str(json).map_err(|e| format!("invalid policy: {e}")),
        None => Ok(Policy::default()),
    }
}

/// Decode and validate a scan payload under an optional policy.
pub fn validate_scan(input: &str, policy_json: Option<&str>) -> Result<ValidationResult, String> {
    let policy = load_policy(policy_json)?;
    Ok(gs1_pharma_core::validate_scan(input, &policy))
}

/// The scan handler's `{status, ...}` result under the default policy.
pub fn pharma_validator(input: &str) -> ScanOutcome {
    gs1_pharma_core::pharma_validator(input)
}

// ── GTIN ────────────────────────────────────────────────────────────────

/// Check digit for a 12- or 13-digit GTIN body.
pub fn gtin_check_digit(body: &str) -> Option<u8> {
    gs1_pharma_core::gtin_check_digit(body)
}

/// Whether a 13- or 14-digit GTIN carries a correct check digit.
pub fn gtin_checksum_ok(gtin: &str) -> bool {
    gs1_pharma_core::gtin_checksum_ok(gtin)
}

// ── Explain ─────────────────────────────────────────────────────────────

/// Explain a diagnostic code, returning the human-readable description.
pub fn explain_diagnostic(id: &str) -> Option<&'static str> {
    gs1_pharma_diagnostics::explain(id)
}
