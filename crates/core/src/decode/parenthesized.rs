use std::sync::LazyLock;

use regex::Regex;

use super::FieldSink;
use crate::ai::Ai;
use gs1_pharma_diagnostics::{Span, codes};

/// `(AI)value` groups. A value runs up to the next `(` or the end of input.
static GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([0-9]{2,4})\)([^(]*)").expect("static regex"));

/// Decode `(01)...(17)...` transcriptions.
///
/// Values are taken verbatim, including any stray `)` or GS characters.
/// Groups for unsupported AIs are reported and skipped. Text outside any
/// group is skipped and reported as stray data.
pub(crate) fn decode_parenthesized(payload: &str, sink: &mut FieldSink) {
    let mut covered = 0;
    for caps in GROUP.captures_iter(payload) {
        let (Some(group), Some(code), Some(value)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        note_stray(payload, covered, group.start(), sink);
        covered = group.end();

        let span = Span::new(value.start(), value.end());
        match Ai::from_code(code.as_str()) {
            Some(ai) => sink.record(ai, value.as_str(), span),
            None => {
                tracing::debug!(ai = code.as_str(), "skipping unsupported AI");
                sink.note(codes::UNKNOWN_AI, ctx!("ai" => code.as_str()), Some(span));
            }
        }
    }
    note_stray(payload, covered, payload.len(), sink);
}

/// Report `payload[start..end]` as text outside any group, if non-empty.
fn note_stray(payload: &str, start: usize, end: usize, sink: &mut FieldSink) {
    if start >= end {
        return;
    }
    let stray = &payload[start..end];
    let count = stray.chars().count();
    tracing::debug!(count, "skipping text outside AI groups");
    sink.note(
        codes::STRAY_DATA,
        ctx!("count" => count.to_string(), "data" => stray),
        Some(Span::new(start, end)),
    );
}
