use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A state description as carried by the input graph.
///
/// The planner emits either a compact bit-packed form (a string of hex
/// digits, most significant digit first) or an already expanded list of
/// active predicate names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateDesc {
    Expanded(Vec<String>),
    Packed(String),
}

impl Default for StateDesc {
    fn default() -> Self {
        StateDesc::Expanded(Vec::new())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid hex digit {ch:?} at position {pos} in packed state")]
    InvalidDigit { ch: char, pos: usize },
}

/// Expands a state description into a newline-separated list of active
/// predicate names using the predicate table carried by the graph root.
///
/// Packed states are decoded four predicates per hex digit. Within a digit
/// bits are tested from the most significant down (8, 4, 2, 1); the
/// predicate index advances once per bit tested whether or not the bit is
/// set. Bits past the end of the predicate table are ignored.
pub fn describe(state: &StateDesc, predicates: &[String]) -> Result<String, DecodeError> {
    match state {
        StateDesc::Expanded(names) => Ok(names.join("\n")),
        StateDesc::Packed(digits) => {
            let mut names = Vec::new();
            for (pos, ch) in digits.chars().enumerate() {
                let value = ch
                    .to_digit(16)
                    .ok_or(DecodeError::InvalidDigit { ch, pos })?;
                for bit in 0..4 {
                    if value & (0b1000 >> bit) != 0 {
                        if let Some(name) = predicates.get(pos * 4 + bit) {
                            names.push(name.as_str());
                        }
                    }
                }
            }
            Ok(names.join("\n"))
        }
    }
}
