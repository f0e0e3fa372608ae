use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::ai::GROUP_SEPARATOR;

/// Escaped GS as it arrives from web forms and log files: `\u001D`, `\x1D`.
static ESCAPED_GS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\\u001d|\\x1d").expect("static regex"));

/// AIM symbology identifier some scanners prefix (`]d2`, `]C1`, `]Q3`, ...).
static SYMBOLOGY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\][A-Za-z][0-9]").expect("static regex"));

/// Prepare a raw scan for decoding.
///
/// - escaped GS sequences become a real GS character
/// - a leading AIM symbology identifier is removed
/// - leading GS characters (FNC1 in first position) are removed
/// - trailing CR/LF left by keyboard-wedge scanners is removed
///
/// Returns the input unchanged (borrowed) when nothing applies.
pub fn normalize_payload(raw: &str) -> Cow<'_, str> {
    let unescaped = ESCAPED_GS.replace_all(raw, "\u{1d}");

    let start = SYMBOLOGY_ID.find(&unescaped).map_or(0, |m| m.end());
    let body = &unescaped[start..];
    let start = start + (body.len() - body.trim_start_matches(GROUP_SEPARATOR).len());
    let end = unescaped.trim_end_matches(['\r', '\n']).len().max(start);

    match unescaped {
        Cow::Borrowed(b) => Cow::Borrowed(&b[start..end]),
        Cow::Owned(mut o) => {
            o.truncate(end);
            o.drain(..start);
            Cow::Owned(o)
        }
    }
}
