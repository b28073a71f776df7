//! Range resolution: one letter/number interval plus formatting options,
//! expanded into an ordered token sequence.
//!
//! Resolution is split from expansion: `resolve()` normalizes and checks a
//! `RangeSpec` once, and the resulting `ResolvedRange` hands out tokens by
//! index. Nothing is retained between calls, so a resolved range can be
//! iterated any number of times and always yields the same sequence.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Wire types ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeType {
    Letters,
    Numbers,
}

impl RangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Letters => "letters",
            Self::Numbers => "numbers",
        }
    }
}

impl fmt::Display for RangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A range endpoint as it arrives over the wire.
///
/// Clients send letters as strings and numbers as either JSON integers or
/// numeric strings, so both shapes are accepted here and interpreted by
/// `resolve()` according to the range type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeBound {
    Number(u64),
    Text(String),
}

impl fmt::Display for RangeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for RangeBound {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for RangeBound {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSpec {
    pub range_type: RangeType,
    pub start: RangeBound,
    pub end: RangeBound,
    /// Uppercase each token. Letters only.
    #[serde(default)]
    pub capitalize: bool,
    /// Left-pad each token to the digit width of `end`. Numbers only.
    #[serde(default)]
    pub zero_pad: bool,
}

impl RangeSpec {
    pub fn letters(start: &str, end: &str) -> Self {
        Self {
            range_type: RangeType::Letters,
            start: start.into(),
            end: end.into(),
            capitalize: false,
            zero_pad: false,
        }
    }

    pub fn numbers(start: u64, end: u64) -> Self {
        Self {
            range_type: RangeType::Numbers,
            start: start.into(),
            end: end.into(),
            capitalize: false,
            zero_pad: false,
        }
    }

    pub fn capitalized(mut self) -> Self {
        self.capitalize = true;
        self
    }

    pub fn zero_padded(mut self) -> Self {
        self.zero_pad = true;
        self
    }
}

// ── Errors ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("range start '{start}' is after range end '{end}'")]
    Reversed { start: String, end: String },

    #[error("letter range bounds must be exactly one character, got '{0}'")]
    NotSingleLetter(String),

    #[error("'{0}' is not a letter between a and z")]
    NotALetter(String),

    #[error("'{0}' is not a non-negative integer")]
    NotANumber(String),

    #[error("'{option}' cannot be applied to a {range_type} range")]
    OptionMismatch {
        option: &'static str,
        range_type: RangeType,
    },
}

// ── Resolved range ────────────────────────────────────────────

/// A validated, normalized range. This is also the shape recorded in the
/// audit snapshot of every location created from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "range_type", rename_all = "snake_case")]
pub enum ResolvedRange {
    Letters {
        start: char,
        end: char,
        capitalize: bool,
    },
    Numbers {
        start: u64,
        end: u64,
        zero_pad: bool,
    },
}

/// Normalize and check a single range.
pub fn resolve(spec: &RangeSpec) -> Result<ResolvedRange, RangeError> {
    match spec.range_type {
        RangeType::Letters => {
            if spec.zero_pad {
                return Err(RangeError::OptionMismatch {
                    option: "zero_pad",
                    range_type: RangeType::Letters,
                });
            }
            let start = letter_bound(&spec.start)?;
            let end = letter_bound(&spec.end)?;
            if start > end {
                return Err(RangeError::Reversed {
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
            Ok(ResolvedRange::Letters {
                start,
                end,
                capitalize: spec.capitalize,
            })
        }
        RangeType::Numbers => {
            if spec.capitalize {
                return Err(RangeError::OptionMismatch {
                    option: "capitalize",
                    range_type: RangeType::Numbers,
                });
            }
            let start = number_bound(&spec.start)?;
            let end = number_bound(&spec.end)?;
            if start > end {
                return Err(RangeError::Reversed {
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
            Ok(ResolvedRange::Numbers {
                start,
                end,
                zero_pad: spec.zero_pad,
            })
        }
    }
}

fn letter_bound(bound: &RangeBound) -> Result<char, RangeError> {
    let text = match bound {
        RangeBound::Text(s) => s,
        RangeBound::Number(n) => return Err(RangeError::NotALetter(n.to_string())),
    };
    let mut chars = text.chars();
    let c = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => return Err(RangeError::NotSingleLetter(text.clone())),
    };
    let c = c.to_ascii_lowercase();
    if !c.is_ascii_lowercase() {
        return Err(RangeError::NotALetter(text.clone()));
    }
    Ok(c)
}

fn number_bound(bound: &RangeBound) -> Result<u64, RangeError> {
    match bound {
        RangeBound::Number(n) => Ok(*n),
        RangeBound::Text(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| RangeError::NotANumber(s.clone())),
    }
}

impl ResolvedRange {
    pub fn range_type(&self) -> RangeType {
        match self {
            Self::Letters { .. } => RangeType::Letters,
            Self::Numbers { .. } => RangeType::Numbers,
        }
    }

    /// Number of tokens, inclusive of both ends. Never zero.
    pub fn len(&self) -> u64 {
        match *self {
            Self::Letters { start, end, .. } => u64::from(end as u32 - start as u32) + 1,
            // A full 0..=u64::MAX span does not fit; saturate, the size
            // check rejects it long before that matters.
            Self::Numbers { start, end, .. } => (end - start).saturating_add(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Token at position `index`. Callers keep `index < len()`.
    pub fn token(&self, index: u64) -> String {
        match *self {
            Self::Letters {
                start, capitalize, ..
            } => {
                let code = start as u32 + index as u32;
                let c = char::from_u32(code).unwrap_or(start);
                if capitalize {
                    c.to_ascii_uppercase().to_string()
                } else {
                    c.to_string()
                }
            }
            Self::Numbers {
                start,
                end,
                zero_pad,
            } => {
                let value = start + index;
                if zero_pad {
                    format!("{value:0width$}", width = decimal_width(end))
                } else {
                    value.to_string()
                }
            }
        }
    }

    pub fn first(&self) -> String {
        self.token(0)
    }

    pub fn last(&self) -> String {
        self.token(self.len() - 1)
    }

    pub fn tokens(&self) -> Tokens<'_> {
        Tokens {
            range: self,
            next: 0,
            len: self.len(),
        }
    }
}

fn decimal_width(n: u64) -> usize {
    n.checked_ilog10().map_or(1, |digits| digits as usize + 1)
}

/// Ordered tokens of a resolved range.
pub struct Tokens<'a> {
    range: &'a ResolvedRange,
    next: u64,
    len: u64,
}

impl Iterator for Tokens<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next >= self.len {
            return None;
        }
        let token = self.range.token(self.next);
        self.next += 1;
        Some(token)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.len - self.next).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}
