//! GTIN (AI 01) check digit.
//!
//! The check digit is computed over the GTIN left-padded to 14 digits.
//! Weights alternate 1, 3, 1, ... starting at the most significant of the
//! first 13 digits, and the check digit is `(10 - sum % 10) % 10`.

use crate::ai::GTIN_LENGTHS;

/// Digits in a padded GTIN body (everything but the check digit).
const BODY_LEN: usize = 13;

/// Whether `gtin` (13 or 14 ASCII digits) carries a correct check digit.
///
/// Any other length or a non-digit character fails; this never panics.
pub fn gtin_checksum_ok(gtin: &str) -> bool {
    if !GTIN_LENGTHS.contains(&gtin.len()) || !gtin.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let (body, check) = gtin.split_at(gtin.len() - 1);
    gtin_check_digit(body).is_some_and(|d| check.as_bytes()[0] == b'0' + d)
}

/// Check digit for a 12- or 13-digit GTIN body.
///
/// Returns `None` for any other length or a non-digit character.
pub fn gtin_check_digit(body: &str) -> Option<u8> {
    if !(BODY_LEN - 1..=BODY_LEN).contains(&body.len()) {
        return None;
    }
    let mut digits = [0u8; BODY_LEN];
    let pad = BODY_LEN - body.len();
    for (slot, b) in digits[pad..].iter_mut().zip(body.bytes()) {
        if !b.is_ascii_digit() {
            return None;
        }
        *slot = b - b'0';
    }

    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| u32::from(d) * if i % 2 == 0 { 1 } else { 3 })
        .sum();
    // sum % 10 < 10, so the result fits in a digit.
    Some(((10 - sum % 10) % 10) as u8)
}
