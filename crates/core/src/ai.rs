//! The supported GS1 Application Identifiers and their length rules.
//!
//! Only the four AIs printed on pharmaceutical data-matrix codes are
//! modelled. Every decoder branch matches on [`Ai`] exhaustively, so adding
//! an identifier is a compile-time-checked change.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// ASCII group separator (GS, code point 29) terminating variable fields.
pub const GROUP_SEPARATOR: char = '\u{1d}';

/// Widths (in characters) an AI code can have. Tried shortest first.
pub const AI_WIDTHS: RangeInclusive<usize> = 2..=4;

/// Accepted GTIN lengths. Pharma packs carry both EAN-13 and GTIN-14 forms.
pub const GTIN_LENGTHS: RangeInclusive<usize> = 13..=14;

/// A supported GS1 Application Identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ai {
    /// `01`: product code (GTIN).
    Gtin,
    /// `17`: expiry date, `YYMMDD`.
    Expiry,
    /// `10`: lot / batch number.
    Lot,
    /// `21`: serial number.
    Serial,
}

/// How the end of an AI's value is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthKind {
    /// Exactly `len` characters, no separator.
    Fixed {
        /// Exact value length.
        len: usize,
    },
    /// At most `max` characters, ended early by GS or the next AI.
    Variable {
        /// Maximum value length.
        max: usize,
    },
}

impl Ai {
    /// All supported AIs, in the order the validator checks them.
    pub const ALL: [Ai; 4] = [Ai::Gtin, Ai::Expiry, Ai::Lot, Ai::Serial];

    /// The numeric AI code (e.g., `"01"`).
    pub const fn code(self) -> &'static str {
        match self {
            Ai::Gtin => "01",
            Ai::Expiry => "17",
            Ai::Lot => "10",
            Ai::Serial => "21",
        }
    }

    /// Look up an AI by its numeric code. Unsupported codes return `None`.
    pub fn from_code(code: &str) -> Option<Ai> {
        match code {
            "01" => Some(Ai::Gtin),
            "17" => Some(Ai::Expiry),
            "10" => Some(Ai::Lot),
            "21" => Some(Ai::Serial),
            _ => None,
        }
    }

    /// Length rule for this AI's value.
    pub const fn length_kind(self) -> LengthKind {
        match self {
            Ai::Gtin => LengthKind::Variable { max: 14 },
            Ai::Expiry => LengthKind::Fixed { len: 6 },
            Ai::Lot | Ai::Serial => LengthKind::Variable { max: 20 },
        }
    }

    /// Short English name used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Ai::Gtin => "gtin",
            Ai::Expiry => "expiry",
            Ai::Lot => "lot",
            Ai::Serial => "serial",
        }
    }
}

impl fmt::Display for Ai {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Ai {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Ai {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ai::from_code(&code)
            .ok_or_else(|| serde::de::Error::custom(format!("unsupported AI code '{code}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for ai in Ai::ALL {
            assert_eq!(Ai::from_code(ai.code()), Some(ai));
        }
        assert_eq!(Ai::from_code("00"), None);
        assert_eq!(Ai::from_code("011"), None);
    }

    #[test]
    fn length_table() {
        assert_eq!(Ai::Expiry.length_kind(), LengthKind::Fixed { len: 6 });
        assert_eq!(Ai::Gtin.length_kind(), LengthKind::Variable { max: 14 });
        assert_eq!(Ai::Lot.length_kind(), LengthKind::Variable { max: 20 });
        assert_eq!(Ai::Serial.length_kind(), LengthKind::Variable { max: 20 });
    }

    #[test]
    fn codes_fit_width_range() {
        for ai in Ai::ALL {
            assert!(AI_WIDTHS.contains(&ai.code().len()), "{ai}");
        }
    }

    #[test]
    fn serde_uses_code() {
        assert_eq!(serde_json::to_string(&Ai::Serial).unwrap(), "\"21\"");
        let ai: Ai = serde_json::from_str("\"17\"").unwrap();
        assert_eq!(ai, Ai::Expiry);
        assert!(serde_json::from_str::<Ai>("\"99\"").is_err());
    }
}
