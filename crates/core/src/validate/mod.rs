//! Field validation and the top-level pharma scan check.
//!
//! [`validate_scan`] decodes a payload, checks the four required fields,
//! and folds everything into a [`ValidationResult`]. Every field is
//! checked even after an earlier one fails, so a single pass reports all
//! problems.

/// Expiry date (AI 17) parsing.
pub mod expiry;
/// GTIN (AI 01) check digit.
pub mod gtin;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::ai::Ai;
use crate::decode::{DecodeResult, decode_with_locale};
use expiry::normalize_expiry;
use gs1_pharma_diagnostics::{Diagnostic, Locale, Severity, codes};
use gs1_pharma_policy::Policy;
use gtin::{gtin_check_digit, gtin_checksum_ok};

/// Fields of an accepted scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PharmaScan {
    /// GTIN as scanned (13 or 14 digits).
    pub gtin: String,
    /// Expiry normalized to `YYYYMMDD`.
    pub exp: String,
    /// Lot number as scanned.
    pub lot: String,
    /// Serial number as scanned.
    pub serial: String,
}

/// What the scan handler receives.
///
/// Serializes as `{"status": true, "gtin": ..., "exp": ..., "lot": ...,
/// "serial": ...}` or `{"status": false, "message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// All required fields present and valid.
    Success(PharmaScan),
    /// At least one error; `message` joins every error message with `, `.
    Failure {
        /// Human-readable reasons.
        message: String,
    },
}

impl ScanOutcome {
    /// Whether the scan was accepted.
    pub fn is_success(&self) -> bool {
        matches!(self, ScanOutcome::Success(_))
    }

    /// The accepted fields, if any.
    pub fn scan(&self) -> Option<&PharmaScan> {
        match self {
            ScanOutcome::Success(scan) => Some(scan),
            ScanOutcome::Failure { .. } => None,
        }
    }
}

impl Serialize for ScanOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ScanOutcome::Success(scan) => {
                let mut map = serializer.serialize_map(Some(5))?;
                map.serialize_entry("status", &true)?;
                map.serialize_entry("gtin", &scan.gtin)?;
                map.serialize_entry("exp", &scan.exp)?;
                map.serialize_entry("lot", &scan.lot)?;
                map.serialize_entry("serial", &scan.serial)?;
                map.end()
            }
            ScanOutcome::Failure { message } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("status", &false)?;
                map.serialize_entry("message", message)?;
                map.end()
            }
        }
    }
}

/// Result of validating a scan payload.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    /// `true` if no errors were found (warnings and info are allowed).
    pub ok: bool,
    /// Accepted fields; present exactly when `ok` is `true`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan: Option<PharmaScan>,
    /// Field issues in GTIN, expiry, lot, serial order, then decoder notes.
    pub issues: Vec<Diagnostic>,
    /// The underlying decode.
    pub decoded: DecodeResult,
}

impl ValidationResult {
    /// Error-severity issues, in report order.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.issues.iter().filter(|d| d.is_error())
    }

    /// Collapse into the scan handler's success/failure shape.
    pub fn outcome(&self) -> ScanOutcome {
        match &self.scan {
            Some(scan) => ScanOutcome::Success(scan.clone()),
            None => ScanOutcome::Failure {
                message: self
                    .errors()
                    .map(|d| d.message.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            },
        }
    }
}

/// Decode and validate `input` under `policy`.
pub fn validate_scan(input: &str, policy: &Policy) -> ValidationResult {
    let decoded = decode_with_locale(input, policy.locale);
    let fields = &decoded.fields;
    let locale = policy.locale;
    let mut issues = Vec::new();

    match fields.field(Ai::Gtin) {
        None => issues.push(missing(Ai::Gtin, codes::GTIN_MISSING, locale)),
        Some(f) if policy.strict_gtin_checksum && !gtin_checksum_ok(&f.value) => {
            let expected = f
                .value
                .get(..f.value.len().saturating_sub(1))
                .and_then(gtin_check_digit)
                .map_or_else(|| "?".to_string(), |d| d.to_string());
            issues.push(Diagnostic::from_catalogue(
                codes::GTIN_CHECK_DIGIT,
                locale,
                ctx!("ai" => Ai::Gtin.code(), "value" => f.value.as_str(), "expected" => expected),
                Some(f.span),
            ));
        }
        Some(_) => {}
    }

    let exp = match fields.field(Ai::Expiry) {
        None => {
            issues.push(missing(Ai::Expiry, codes::EXPIRY_MISSING, locale));
            None
        }
        Some(f) => {
            let normalized = normalize_expiry(&f.value);
            if normalized.is_none() {
                issues.push(Diagnostic::from_catalogue(
                    codes::EXPIRY_INVALID,
                    locale,
                    ctx!("ai" => Ai::Expiry.code(), "value" => f.value.as_str()),
                    Some(f.span),
                ));
            }
            normalized
        }
    };

    if !fields.contains(Ai::Lot) {
        issues.push(missing(Ai::Lot, codes::LOT_MISSING, locale));
    }
    if !fields.contains(Ai::Serial) {
        issues.push(missing(Ai::Serial, codes::SERIAL_MISSING, locale));
    }

    for diag in &decoded.diagnostics {
        let unrecognized = diag.id == codes::TRAILING_DATA || diag.id == codes::STRAY_DATA;
        if policy.reject_trailing_data && unrecognized {
            issues.push(diag.clone().with_severity(Severity::Error));
        } else {
            issues.push(diag.clone());
        }
    }

    let ok = !issues.iter().any(Diagnostic::is_error);
    let scan = match (
        fields.get(Ai::Gtin),
        exp,
        fields.get(Ai::Lot),
        fields.get(Ai::Serial),
    ) {
        (Some(gtin), Some(exp), Some(lot), Some(serial)) if ok => Some(PharmaScan {
            gtin: gtin.to_string(),
            exp,
            lot: lot.to_string(),
            serial: serial.to_string(),
        }),
        _ => None,
    };
    tracing::debug!(ok, issues = issues.len(), "scan validated");

    ValidationResult {
        ok,
        scan,
        issues,
        decoded,
    }
}

/// Validate `input` with the default policy and return the scan handler's
/// success/failure shape.
///
/// # Example
/// ```
/// use gs1_pharma_core::{ScanOutcome, pharma_validator};
///
/// let out = pharma_validator("(01)08699550011111(21)0000000000010158(10)173350(17)271229");
/// let ScanOutcome::Success(scan) = out else { panic!("rejected") };
/// assert_eq!(scan.exp, "20271229");
/// ```
pub fn pharma_validator(input: &str) -> ScanOutcome {
    validate_scan(input, &Policy::default()).outcome()
}

fn missing(ai: Ai, id: &'static str, locale: Locale) -> Diagnostic {
    Diagnostic::from_catalogue(id, locale, ctx!("ai" => ai.code()), None)
}
