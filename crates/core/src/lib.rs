//! GS1 pharma scan core library.
//!
//! Decodes the GS1 Application Identifier payload of a pharmaceutical
//! data-matrix scan (GTIN, expiry, lot, serial) and validates it. The main
//! entry points are [`decode`] for the raw field map, [`validate_scan`] for
//! a policy-driven check, and [`pharma_validator`] for the scan handler's
//! `{status, ...}` result.
//!
//! Nothing here fails on malformed input: problems are reported as
//! [`Diagnostic`]s.

#![warn(missing_docs)]

/// Shorthand for building a `BTreeMap<String, String>` context from key-value pairs.
///
/// ```ignore
/// ctx!("ai" => code, "value" => val)
/// ```
macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        std::collections::BTreeMap::from([$(($k.into(), $v.into())),+])
    };
}

/// Supported Application Identifiers and their length rules.
pub mod ai;
/// Payload decoding: normalization, format detection, both decoders.
pub mod decode;
/// Field validators and the top-level scan check.
pub mod validate;

// ── Convenience re-exports ──────────────────────────────────────────────────

// AI table
pub use ai::{Ai, GROUP_SEPARATOR, LengthKind};

// Decoder
pub use decode::normalize::normalize_payload;
pub use decode::{
    DecodeResult, DecodedField, FieldMap, PayloadFormat, decode, decode_with_locale, detect_format,
};

// Validator
pub use validate::expiry::{normalize_expiry, parse_expiry};
pub use validate::gtin::{gtin_check_digit, gtin_checksum_ok};
pub use validate::{PharmaScan, ScanOutcome, ValidationResult, pharma_validator, validate_scan};

// Diagnostics and policy (re-exported from their crates)
pub use gs1_pharma_diagnostics::{Diagnostic, Locale, Severity, Span, codes};
pub use gs1_pharma_policy::Policy;
