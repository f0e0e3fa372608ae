//! Property-style round trips: a payload built from known fields decodes
//! back to exactly those fields.

mod common;

use common::{SimpleRng, concatenated, parenthesized, pairs};
use gs1_pharma_core::{Ai, decode};

const LETTERS: &[char] = &[
    'A', 'B', 'C', 'K', 'L', 'M', 'X', 'Y', 'Z', 'a', 'q', 'w', '-', '/', '.',
];
const DIGITS: &[char] = &['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// A field set with no separators and no AI-like substrings inside
/// variable values.
fn unambiguous_fields(rng: &mut SimpleRng) -> Vec<(Ai, String)> {
    // A 14-digit GTIN ending in 2 would read as "21" with a following "1x" code.
    let gtin_len = 13 + rng.gen_range(2);
    let mut gtin = rng.gen_from(DIGITS, gtin_len - 1);
    gtin.push(['0', '1', '3', '4', '5', '6', '7', '8', '9'][rng.gen_range(9)]);

    let exp = format!(
        "{:02}{:02}{:02}",
        rng.gen_range(100),
        1 + rng.gen_range(12),
        rng.gen_range(29)
    );
    let lot_len = 1 + rng.gen_range(20);
    let lot = rng.gen_from(LETTERS, lot_len);
    let serial_len = 1 + rng.gen_range(20);
    let serial = rng.gen_from(LETTERS, serial_len);

    let mut fields = vec![
        (Ai::Gtin, gtin),
        (Ai::Expiry, exp),
        (Ai::Lot, lot),
        (Ai::Serial, serial),
    ];
    // Fisher-Yates with the test PRNG.
    for i in (1..fields.len()).rev() {
        let j = rng.gen_range(i + 1);
        fields.swap(i, j);
    }
    fields
}

fn expected(fields: &[(Ai, String)]) -> Vec<(String, String)> {
    fields
        .iter()
        .map(|(ai, v)| (ai.code().to_string(), v.clone()))
        .collect()
}

fn borrowed(fields: &[(Ai, String)]) -> Vec<(Ai, &str)> {
    fields.iter().map(|(ai, v)| (*ai, v.as_str())).collect()
}

#[test]
fn concatenated_round_trip() {
    let mut rng = SimpleRng::new(0xC0FF_EE01);
    for _ in 0..1_000 {
        let fields = unambiguous_fields(&mut rng);
        let payload = concatenated(&borrowed(&fields));
        let r = decode(&payload);
        assert_eq!(pairs(&r), expected(&fields), "payload {payload:?}");
        assert!(r.trailing.is_none(), "payload {payload:?}");
    }
}

#[test]
fn parenthesized_round_trip() {
    let mut rng = SimpleRng::new(7);
    let free: Vec<char> = LETTERS.iter().chain(DIGITS).chain(&[')', ' ']).copied().collect();
    for _ in 0..1_000 {
        let mut fields = unambiguous_fields(&mut rng);
        // Parenthesized values are taken verbatim, so anything but '(' works.
        let lot_len = rng.gen_range(30);
        if let Some(lot) = fields.iter_mut().find(|(ai, _)| *ai == Ai::Lot) {
            lot.1 = rng.gen_from(&free, lot_len);
        }
        let payload = parenthesized(&borrowed(&fields));
        let r = decode(&payload);
        assert_eq!(pairs(&r), expected(&fields), "payload {payload:?}");
    }
}
