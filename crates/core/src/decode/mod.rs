//! Scan payload decoding: format dispatch, both decoders, and the field map.
//!
//! [`decode`] normalizes the raw scanner string, sniffs its format, and runs
//! either the parenthesized or the concatenated decoder. Decoding never
//! fails; anything unexpected is reported as a [`Diagnostic`] on the
//! [`DecodeResult`].

/// Concatenated (raw scanner) decoder.
pub mod concatenated;
/// Input clean-up applied before format detection.
pub mod normalize;
/// Parenthesized (human transcription) decoder.
pub mod parenthesized;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::ai::Ai;
use gs1_pharma_diagnostics::{Diagnostic, Locale, Span, codes};

/// Which wire format a payload was decoded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    /// Raw scanner output, fields back to back with optional GS separators.
    Concatenated,
    /// Human transcription with `(AI)` markers.
    Parenthesized,
}

/// One decoded AI value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedField {
    /// The identifier.
    pub ai: Ai,
    /// Raw value, verbatim from the payload.
    pub value: String,
    /// Byte span of the value in the normalized payload.
    pub span: Span,
}

/// AI → raw value, in order of first appearance.
///
/// Serializes as a JSON object keyed by AI code (`{"01": "...", ...}`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    fields: Vec<DecodedField>,
}

impl FieldMap {
    /// Raw value for `ai`, if it was decoded.
    pub fn get(&self, ai: Ai) -> Option<&str> {
        self.field(ai).map(|f| f.value.as_str())
    }

    /// Full field record for `ai`, if it was decoded.
    pub fn field(&self, ai: Ai) -> Option<&DecodedField> {
        self.fields.iter().find(|f| f.ai == ai)
    }

    /// Whether `ai` was decoded.
    pub fn contains(&self, ai: Ai) -> bool {
        self.field(ai).is_some()
    }

    /// Number of decoded fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field was decoded.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in order of appearance.
    pub fn iter(&self) -> std::slice::Iter<'_, DecodedField> {
        self.fields.iter()
    }

    /// `(code, value)` pairs in order of appearance.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        self.fields
            .iter()
            .map(|f| (f.ai.code(), f.value.as_str()))
            .collect()
    }

    /// Insert a field. A repeated AI overwrites the earlier value in place
    /// and returns `true`.
    pub(crate) fn insert(&mut self, field: DecodedField) -> bool {
        match self.fields.iter_mut().find(|f| f.ai == field.ai) {
            Some(existing) => {
                *existing = field;
                true
            }
            None => {
                self.fields.push(field);
                false
            }
        }
    }
}

impl<'a> IntoIterator for &'a FieldMap {
    type Item = &'a DecodedField;
    type IntoIter = std::slice::Iter<'a, DecodedField>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for f in &self.fields {
            map.serialize_entry(f.ai.code(), &f.value)?;
        }
        map.end()
    }
}

/// Result of decoding a scan payload.
#[derive(Debug, Clone, Serialize)]
pub struct DecodeResult {
    /// Detected wire format.
    pub format: PayloadFormat,
    /// The payload after normalization; all spans index into this string.
    pub normalized: String,
    /// Decoded fields.
    pub fields: FieldMap,
    /// Characters left unconsumed after the last recognized field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing: Option<Span>,
    /// Decoder observations (duplicates, truncation, skipped data).
    pub diagnostics: Vec<Diagnostic>,
}

impl DecodeResult {
    /// Number of trailing characters the decoder dropped.
    pub fn trailing_chars(&self) -> usize {
        self.trailing
            .map(|s| self.normalized[s.start..s.end].chars().count())
            .unwrap_or(0)
    }
}

/// Decide which decoder handles `payload`.
///
/// Any `(` together with any `)` selects the parenthesized format. This is
/// a content sniff, not a grammar check.
pub fn detect_format(payload: &str) -> PayloadFormat {
    if payload.contains('(') && payload.contains(')') {
        PayloadFormat::Parenthesized
    } else {
        PayloadFormat::Concatenated
    }
}

/// Decode a raw scan with Turkish diagnostic messages.
pub fn decode(input: &str) -> DecodeResult {
    decode_with_locale(input, Locale::default())
}

/// Decode a raw scan, rendering diagnostic messages in `locale`.
pub fn decode_with_locale(input: &str, locale: Locale) -> DecodeResult {
    let normalized = normalize::normalize_payload(input).into_owned();
    let format = detect_format(&normalized);
    tracing::debug!(?format, len = normalized.len(), "decoding scan payload");

    let mut sink = FieldSink::new(locale);
    let trailing = match format {
        PayloadFormat::Parenthesized => {
            parenthesized::decode_parenthesized(&normalized, &mut sink);
            None
        }
        PayloadFormat::Concatenated => concatenated::decode_concatenated(&normalized, &mut sink),
    };

    if let Some(span) = trailing {
        let dropped = &normalized[span.start..span.end];
        tracing::debug!(count = dropped.chars().count(), "dropping trailing data");
        sink.note(
            codes::TRAILING_DATA,
            ctx!("count" => dropped.chars().count().to_string(), "data" => dropped),
            Some(span),
        );
    }

    DecodeResult {
        format,
        normalized,
        fields: sink.fields,
        trailing,
        diagnostics: sink.diagnostics,
    }
}

/// Collects fields and diagnostics for both decoders.
pub(crate) struct FieldSink {
    locale: Locale,
    fields: FieldMap,
    diagnostics: Vec<Diagnostic>,
}

impl FieldSink {
    fn new(locale: Locale) -> Self {
        Self {
            locale,
            fields: FieldMap::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Record a field, reporting duplicates and empty values.
    pub(crate) fn record(&mut self, ai: Ai, value: &str, span: Span) {
        tracing::trace!(ai = ai.code(), value, "field decoded");
        if value.is_empty() {
            self.note(codes::EMPTY_VALUE, ctx!("ai" => ai.code()), Some(span));
        }
        let replaced = self.fields.insert(DecodedField {
            ai,
            value: value.to_string(),
            span,
        });
        if replaced {
            self.note(codes::DUPLICATE_AI, ctx!("ai" => ai.code()), Some(span));
        }
    }

    pub(crate) fn note(
        &mut self,
        id: &'static str,
        context: std::collections::BTreeMap<String, String>,
        span: Option<Span>,
    ) {
        self.diagnostics
            .push(Diagnostic::from_catalogue(id, self.locale, context, span));
    }
}
