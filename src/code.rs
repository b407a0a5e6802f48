//! Shareable weight codes.
//!
//! Each weight is written as two base-36 digits, most significant first, and the
//! pairs are concatenated in indicator order with no delimiter. The codec knows
//! nothing about which indicator a position belongs to; callers must decode into
//! the same ordering they encoded from.

use thiserror::Error;

const RADIX: u32 = 36;
const WIDTH: usize = 2;

/// Largest value two base-36 digits can hold ("ZZ").
pub const MAX_ENCODABLE: u32 = RADIX * RADIX - 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("code length {0} is odd; every weight takes two characters")]
    OddLength(usize),
    #[error("'{ch}' at position {position} is not a base-36 digit")]
    InvalidDigit { ch: char, position: usize },
    #[error("weight {value} does not fit in a code (maximum {max})", max = MAX_ENCODABLE)]
    Overflow { value: u32 },
    #[error("code holds {found} weights but {expected} indicators are registered")]
    LengthMismatch { expected: usize, found: usize },
    #[error("weight {value} is above the per-indicator limit of {max}")]
    WeightOutOfRange { value: u32, max: u32 },
}

impl CodeError {
    /// True for errors in the code text itself, as opposed to a mismatch with the indicators.
    pub fn is_malformed(&self) -> bool {
        matches!(self, CodeError::OddLength(_) | CodeError::InvalidDigit { .. })
    }
}

/// Encode weights in order. Fails on the first weight above [`MAX_ENCODABLE`].
pub fn encode(weights: &[u32]) -> Result<String, CodeError> {
    let mut code = String::with_capacity(weights.len() * WIDTH);
    for &value in weights {
        if value > MAX_ENCODABLE {
            return Err(CodeError::Overflow { value });
        }
        code.push(digit(value / RADIX));
        code.push(digit(value % RADIX));
    }
    Ok(code)
}

/// Decode a code back into weights. Digits are case-insensitive; an empty code decodes to no weights.
pub fn decode(code: &str) -> Result<Vec<u32>, CodeError> {
    let chars: Vec<char> = code.chars().collect();
    if chars.len() % WIDTH != 0 {
        return Err(CodeError::OddLength(chars.len()));
    }

    chars
        .chunks(WIDTH)
        .enumerate()
        .map(|(index, pair)| {
            pair.iter()
                .enumerate()
                .try_fold(0u32, |acc, (offset, &ch)| {
                    let d = ch.to_digit(RADIX).ok_or(CodeError::InvalidDigit {
                        ch,
                        position: index * WIDTH + offset,
                    })?;
                    Ok(acc * RADIX + d)
                })
        })
        .collect()
}

fn digit(value: u32) -> char {
    // value < RADIX by construction
    char::from_digit(value, RADIX)
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_fixed_width_uppercase() {
        assert_eq!(encode(&[0, 100, 1295]).unwrap(), "002SZZ");
        assert_eq!(encode(&[35, 36]).unwrap(), "0Z10");
    }

    #[test]
    fn scenario_round_trip() {
        let weights = vec![0, 100, 1295];
        assert_eq!(decode(&encode(&weights).unwrap()).unwrap(), weights);
    }

    #[test]
    fn round_trip_full_range() {
        let weights: Vec<u32> = (0..=MAX_ENCODABLE).collect();
        let code = encode(&weights).unwrap();
        assert_eq!(code.len(), weights.len() * 2);
        assert_eq!(decode(&code).unwrap(), weights);
    }

    #[test]
    fn empty_round_trip() {
        assert_eq!(encode(&[]).unwrap(), "");
        assert_eq!(decode("").unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn decode_is_case_insensitive() {
        assert_eq!(decode("2s").unwrap(), vec![100]);
        assert_eq!(decode("zZ").unwrap(), vec![1295]);
    }

    #[test]
    fn odd_length_is_malformed() {
        let err = decode("1").unwrap_err();
        assert_eq!(err, CodeError::OddLength(1));
        assert!(err.is_malformed());
        assert_eq!(decode("00A").unwrap_err(), CodeError::OddLength(3));
    }

    #[test]
    fn non_base36_digit_is_malformed() {
        let err = decode("00-1").unwrap_err();
        assert_eq!(err, CodeError::InvalidDigit { ch: '-', position: 2 });
        assert!(err.is_malformed());
    }

    #[test]
    fn sign_prefix_rejected() {
        assert!(matches!(decode("+1"), Err(CodeError::InvalidDigit { ch: '+', position: 0 })));
    }

    #[test]
    fn non_ascii_rejected() {
        assert!(matches!(decode("é0"), Err(CodeError::InvalidDigit { ch: 'é', .. })));
    }

    #[test]
    fn overflow_rejected() {
        assert_eq!(encode(&[1, 1296]).unwrap_err(), CodeError::Overflow { value: 1296 });
    }

    #[test]
    fn encoding_is_deterministic() {
        let weights = [12, 0, 999, 40];
        assert_eq!(encode(&weights).unwrap(), encode(&weights).unwrap());
        assert_eq!(encode(&weights).unwrap(), "0C00RR14");
    }
}
