//! The size-suffix grammar: `<number>[<unit>]`.
//!
//! A unit is one of `B`, `K`, `M`, `G` or `T` (in either case) and multiplies
//! the number by 1024 raised to 0, 1, 2, 3 or 4 respectively. The number may
//! be an integer or a decimal; decimals are scaled first and then truncated
//! toward zero, so `3.5k` is `3584`.

use crate::errors::SizeError;

const B: i64 = 1;
const K: i64 = B << 10;
const M: i64 = K << 10;
const G: i64 = M << 10;
const T: i64 = G << 10;

/// Returns the multiplier for a unit letter.
pub fn unit_multiplier(unit: char) -> Option<i64> {
    match unit.to_ascii_uppercase() {
        'B' => Some(B),
        'K' => Some(K),
        'M' => Some(M),
        'G' => Some(G),
        'T' => Some(T),
        _ => None,
    }
}

/// Parses a size like `10K` or `3.5m` into its magnitude.
///
/// When the last character is not a unit letter the grammar does not apply
/// and `SizeError::NoUnit` is returned: a plain `-10` is not a size, it is
/// the caller's business to parse it as an ordinary integer.
pub fn parse_sized(s: &str) -> Result<i64, SizeError> {
    let unit = match s.chars().last() {
        Some(c) => c,
        None => return Err(SizeError::NoUnit),
    };
    let mult = unit_multiplier(unit).ok_or(SizeError::NoUnit)?;
    let number = &s[..s.len() - unit.len_utf8()];

    if let Ok(n) = number.parse::<i64>() {
        return n.checked_mul(mult).ok_or_else(|| SizeError::Overflow {
            value: s.into(),
        });
    }
    let f = number.parse::<f64>().map_err(|err| SizeError::Number {
        value: s.into(),
        reason: err.to_string(),
    })?;
    let scaled = (f * mult as f64).trunc();
    // i64::MAX is not representable as f64; 2^63 is the first value past it.
    if !scaled.is_finite() || scaled < i64::MIN as f64 || scaled >= -(i64::MIN as f64) {
        return Err(SizeError::Overflow { value: s.into() });
    }
    Ok(scaled as i64)
}
