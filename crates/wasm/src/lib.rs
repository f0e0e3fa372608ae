//! WASM bindings for gs1-pharma.
//!
//! Exposes the scan validator, decoder, check-digit helper, and diagnostic
//! explanations to the browser scan handler via `wasm-bindgen`. Results are
//! returned as native JS objects using `serde-wasm-bindgen`.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use gs1_pharma_bindings_common as common;

// ── Public API ──────────────────────────────────────────────────────────

/// Validate a scan with the default policy.
///
/// Returns `{ status: true, gtin, exp, lot, serial }` or
/// `{ status: false, message }`.
#[wasm_bindgen(js_name = "pharmaValidator")]
pub fn pharma_validator(input: &str) -> Result<JsValue, JsError> {
    to_js(&common::pharma_validator(input))
}

/// Decode a scan and return `{ format, normalized, fields, trailing?, diagnostics }`.
#[wasm_bindgen]
pub fn decode(input: &str) -> Result<JsValue, JsError> {
    to_js(&common::decode_scan(input))
}

/// Decode and validate a scan.
///
/// Returns `{ ok, scan?, issues, decoded }`. Optionally accepts a policy
/// JSON/JSONC string (e.g., to enforce GTIN check digits).
#[wasm_bindgen(js_name = "validate")]
pub fn validate_scan(input: &str, policy_json: Option<String>) -> Result<JsValue, JsError> {
    let vr = common::validate_scan(input, policy_json.as_deref()).map_err(|e| JsError::new(&e))?;
    to_js(&vr)
}

/// Check digit for a 12- or 13-digit GTIN body, or `undefined` when the
/// body is malformed.
#[wasm_bindgen(js_name = "gtinCheckDigit")]
pub fn gtin_check_digit(body: &str) -> Option<u8> {
    common::gtin_check_digit(body)
}

/// Whether a 13- or 14-digit GTIN carries a correct check digit.
///
/// Lets the scan handler check digits itself while the policy leaves
/// `strictGtinChecksum` off.
#[wasm_bindgen(js_name = "gtinChecksumOk")]
pub fn gtin_checksum_ok(gtin: &str) -> bool {
    common::gtin_checksum_ok(gtin)
}

/// Explain a diagnostic code (e.g., "GS1P1301").
///
/// Returns the explanation string, or `null` if unknown.
#[wasm_bindgen]
pub fn explain(id: &str) -> Option<String> {
    common::explain_diagnostic(id).map(|s| s.to_string())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Serialize to a plain JS value. Maps (the `{status, ...}` outcome, the
/// field map) become ordinary objects rather than ES2015 `Map`s.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| JsError::new(&e.to_string()))
}
