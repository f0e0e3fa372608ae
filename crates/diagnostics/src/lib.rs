//! Diagnostics for the GS1 pharma toolchain.
//!
//! Provides [`Diagnostic`], [`Severity`], [`Span`], and [`Locale`] types
//! used to report errors, warnings, and informational messages from the
//! decoder and validator. Diagnostic codes are defined in the [`codes`]
//! module; their messages are rendered from per-locale templates.

#![warn(missing_docs)]

/// Diagnostic ID constants auto-generated from the catalogue.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Hard error: the scan is rejected.
    Error,
    /// Warning: the scan is accepted but something looked off.
    Warn,
    /// Informational note.
    Info,
}

/// Language used for human-readable diagnostic messages.
///
/// The production line operators read Turkish, so [`Locale::Tr`] is the
/// default. Message *content* is a presentation detail; codes are the
/// stable contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Turkish.
    #[default]
    Tr,
    /// English.
    En,
}

impl Locale {
    /// The catalogue key for this locale (`"tr"` or `"en"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Tr => "tr",
            Locale::En => "en",
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tr" => Ok(Locale::Tr),
            "en" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{other}' (expected tr or en)")),
        }
    }
}

/// Byte span in the normalized scan payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    /// Byte offset of the first character (0-based).
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Create a span covering `[start, end)`.
    ///
    /// Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Create a zero-width span at the given position.
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A diagnostic message produced by the decoder or validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"GS1P1301"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// Optional byte span in the normalized payload that this diagnostic relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Machine-readable context for tooling. Keys and values are free-form strings.
    ///
    /// Uses `BTreeMap` for deterministic key ordering in serialized output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// Build a diagnostic from the catalogue: default severity, localized
    /// message rendered from `context`, and `context` attached.
    ///
    /// Unknown codes fall back to `Warn` and the raw code as message.
    pub fn from_catalogue(
        id: &'static str,
        locale: Locale,
        context: BTreeMap<String, String>,
        span: Option<Span>,
    ) -> Self {
        let severity = severity_for_code(id).unwrap_or(Severity::Warn);
        let message = match message_template_for(id, locale.as_str()) {
            Some(template) => render_template(template, &context),
            None => id.to_string(),
        };
        let diag = Self::new(id, severity, message, span);
        if context.is_empty() {
            diag
        } else {
            diag.with_context(context)
        }
    }

    /// Attach machine-readable context metadata (builder pattern).
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Override the severity (builder pattern).
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Whether this diagnostic is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Returns the human-readable explanation for this diagnostic's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
///
/// Auto-generated from `spec/diagnostics.jsonc` at build time.
pub fn explain(id: &str) -> Option<&'static str> {
    include!(concat!(env!("OUT_DIR"), "/generated_explain.rs"))
}

/// Returns the catalogue's default severity for a diagnostic code.
pub fn severity_for_code(id: &str) -> Option<Severity> {
    include!(concat!(env!("OUT_DIR"), "/generated_severity.rs"))
}

/// Returns the message template for a code in the given locale (`"tr"`, `"en"`).
pub fn message_template_for(id: &str, locale: &str) -> Option<&'static str> {
    include!(concat!(env!("OUT_DIR"), "/generated_templates.rs"))
}

/// Substitute `{key}` placeholders in `template` with values from `values`.
///
/// Placeholders without a value are left as-is; an unclosed `{` ends
/// substitution and the rest of the template is copied through.
pub fn render_template(template: &str, values: &BTreeMap<String, String>) -> String {
    let mut rendered = String::with_capacity(template.len() + 16);
    let mut scan_from = 0usize;
    while let Some(open_rel) = template[scan_from..].find('{') {
        let open = scan_from + open_rel;
        rendered.push_str(&template[scan_from..open]);
        let after_open = open + 1;
        let Some(close_rel) = template[after_open..].find('}') else {
            rendered.push_str(&template[open..]);
            return rendered;
        };
        let close = after_open + close_rel;
        match values.get(&template[after_open..close]) {
            Some(value) => rendered.push_str(value),
            None => rendered.push_str(&template[open..=close]),
        }
        scan_from = close + 1;
    }
    rendered.push_str(&template[scan_from..]);
    rendered
}
