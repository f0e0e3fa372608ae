use std::collections::HashSet;

use super::FieldSink;
use crate::ai::{AI_WIDTHS, Ai, GROUP_SEPARATOR, GTIN_LENGTHS, LengthKind};
use gs1_pharma_diagnostics::{Span, codes};

/// Digits that must follow a `17` inside a serial for it to end the serial.
const EXPIRY_DIGITS: usize = 6;

/// Decode a raw scanner payload.
///
/// Returns the span of any characters left after the last recognized field.
pub(crate) fn decode_concatenated(payload: &str, sink: &mut FieldSink) -> Option<Span> {
    Scanner::new(payload).run(sink)
}

struct Scanner<'a> {
    payload: &'a str,
    /// `(byte offset, char)`; all positions below are indices into this.
    chars: Vec<(usize, char)>,
    pos: usize,
    /// AIs consumed so far, including the one whose value is being read.
    seen: HashSet<Ai>,
}

impl<'a> Scanner<'a> {
    fn new(payload: &'a str) -> Self {
        Self {
            payload,
            chars: payload.char_indices().collect(),
            pos: 0,
            seen: HashSet::new(),
        }
    }

    fn run(mut self, sink: &mut FieldSink) -> Option<Span> {
        loop {
            while self.char_at(self.pos) == Some(GROUP_SEPARATOR) {
                self.pos += 1;
            }
            if self.pos >= self.chars.len() {
                return None;
            }

            let Some((ai, width)) = self.ai_at(self.pos) else {
                return Some(Span::new(self.offset(self.pos), self.payload.len()));
            };
            self.pos += width;
            self.seen.insert(ai);

            let start = self.pos;
            let remaining = self.chars.len() - start;
            let (len, consume_gs) = match ai.length_kind() {
                LengthKind::Fixed { len } => {
                    if remaining < len {
                        tracing::debug!(
                            ai = ai.code(),
                            expected = len,
                            actual = remaining,
                            "fixed field truncated"
                        );
                        let span = Span::new(self.offset(start), self.payload.len());
                        sink.note(
                            codes::TRUNCATED_FIELD,
                            ctx!(
                                "ai" => ai.code(),
                                "expected" => len.to_string(),
                                "actual" => remaining.to_string(),
                            ),
                            Some(span),
                        );
                        return None;
                    }
                    (len, false)
                }
                LengthKind::Variable { max } if ai == Ai::Gtin => self.gtin_len(start, max),
                LengthKind::Variable { max } => self.variable_len(ai, start, max),
            };

            let span = Span::new(self.offset(start), self.offset(start + len));
            sink.record(ai, &self.payload[span.start..span.end], span);
            self.pos = start + len + usize::from(consume_gs);
        }
    }

    /// Length of a GTIN value starting at `start`, and whether a GS ends it.
    fn gtin_len(&self, start: usize, max: usize) -> (usize, bool) {
        let remaining = self.chars.len() - start;
        if let Some(k) = (0..=max.min(remaining))
            .find(|&k| self.char_at(start + k) == Some(GROUP_SEPARATOR))
        {
            return (k, true);
        }
        for k in GTIN_LENGTHS {
            if k < remaining && self.terminator_at(start + k).is_some() {
                tracing::trace!(len = k, "gtin ended by next AI");
                return (k, false);
            }
        }
        (remaining.min(max), false)
    }

    /// Length of a lot or serial value starting at `start`, and whether a
    /// GS ends it.
    fn variable_len(&self, ai: Ai, start: usize, max: usize) -> (usize, bool) {
        let window = max.min(self.chars.len() - start);
        let gs = (0..=window).find(|&k| self.char_at(start + k) == Some(GROUP_SEPARATOR));
        let limit = gs.unwrap_or(window);

        if ai == Ai::Serial
            && let Some(k) = (1..limit).find(|&k| self.expiry_follows(start + k))
        {
            tracing::debug!(len = k, "serial truncated at embedded expiry");
            return (k, false);
        }
        if let Some(k) = (1..limit).find(|&k| self.terminator_at(start + k).is_some()) {
            return (k, false);
        }
        (limit, gs == Some(limit))
    }

    /// An unseen `17` at `idx` followed by six digits.
    fn expiry_follows(&self, idx: usize) -> bool {
        self.terminator_at(idx) == Some(Ai::Expiry)
            && (idx + 2..idx + 2 + EXPIRY_DIGITS)
                .all(|i| self.char_at(i).is_some_and(|c| c.is_ascii_digit()))
    }

    /// Supported AI starting at `idx`, trying each code width in turn.
    fn ai_at(&self, idx: usize) -> Option<(Ai, usize)> {
        AI_WIDTHS
            .take_while(|w| idx + w <= self.chars.len())
            .find_map(|w| {
                let code = &self.payload[self.offset(idx)..self.offset(idx + w)];
                Ai::from_code(code).map(|ai| (ai, w))
            })
    }

    /// An AI at `idx` that may end the current value.
    fn terminator_at(&self, idx: usize) -> Option<Ai> {
        self.ai_at(idx)
            .map(|(ai, _)| ai)
            .filter(|ai| !self.seen.contains(ai))
    }

    fn char_at(&self, idx: usize) -> Option<char> {
        self.chars.get(idx).map(|&(_, c)| c)
    }

    fn offset(&self, idx: usize) -> usize {
        self.chars
            .get(idx)
            .map_or(self.payload.len(), |&(offset, _)| offset)
    }
}
