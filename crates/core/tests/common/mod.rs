//! Shared test helpers for `gs1_pharma_core` integration tests.

#![allow(unreachable_pub)]

use gs1_pharma_core::{Ai, DecodeResult, Diagnostic};

/// Group separator as a `&str`, for building payloads with `format!`.
#[allow(dead_code)]
pub const GS: &str = "\u{1d}";

/// The canonical human transcription used across the suite.
#[allow(dead_code)]
pub const PAREN_SCAN: &str = "(01)08699550011111(21)0000000000010158(10)173350(17)271229";

/// Concatenated scan whose serial contains `17` + six digits before the
/// real expiry, and a `10` even earlier.
#[allow(dead_code)]
pub const ADVERSARIAL_SCAN: &str = "01086995500111112100000000000101581727122910173350";

// ─── Decode-result helpers ───────────────────────────────────────────────────

/// `(code, value)` pairs as owned strings, for easy comparison.
#[allow(dead_code)]
pub fn pairs(result: &DecodeResult) -> Vec<(String, String)> {
    result
        .fields
        .iter()
        .map(|f| (f.ai.code().to_string(), f.value.clone()))
        .collect()
}

/// Collect diagnostic codes in report order.
#[allow(dead_code)]
pub fn diag_ids(issues: &[Diagnostic]) -> Vec<String> {
    issues.iter().map(|d| d.id.to_string()).collect()
}

/// Find first diagnostic with the given code.
#[allow(dead_code)]
pub fn find_diag<'a>(issues: &'a [Diagnostic], code: &str) -> &'a Diagnostic {
    issues
        .iter()
        .find(|d| &*d.id == code)
        .unwrap_or_else(|| panic!("expected diagnostic {code}"))
}

// ─── Payload builders ────────────────────────────────────────────────────────

/// Concatenate AI/value pairs with no separators.
#[allow(dead_code)]
pub fn concatenated(fields: &[(Ai, &str)]) -> String {
    fields
        .iter()
        .map(|(ai, value)| format!("{}{}", ai.code(), value))
        .collect()
}

/// Render AI/value pairs in the parenthesized form.
#[allow(dead_code)]
pub fn parenthesized(fields: &[(Ai, &str)]) -> String {
    fields
        .iter()
        .map(|(ai, value)| format!("({}){}", ai.code(), value))
        .collect()
}

// ─── Simple deterministic PRNG (LCG) ────────────────────────────────────────

/// Reproducible randomness without an external crate.
#[allow(dead_code)]
pub struct SimpleRng(u64);

#[allow(dead_code)]
impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    pub fn gen_range(&mut self, max: usize) -> usize {
        ((self.next() >> 33) as usize) % max
    }

    /// A string of `len` characters drawn from `alphabet`.
    pub fn gen_from(&mut self, alphabet: &[char], len: usize) -> String {
        (0..len)
            .map(|_| alphabet[self.gen_range(alphabet.len())])
            .collect()
    }
}
