//! Hexadecimal text encoding for `f64` values.
//!
//! Policy files store every probability as text that round-trips bit-exactly.
//! The canonical form is the 16-digit big-endian hex rendering of the IEEE-754
//! bit pattern (`3ff0000000000000` is `1.0`). C99 `%a` literals such as
//! `0x1.8p+1` are accepted as well.

use crate::error::{ArenaError, ArenaResult};

/// Number of hex digits in the canonical bit-pattern form.
pub const HEX_F64_WIDTH: usize = 16;

/// Encode a value as its 16-digit bit pattern.
pub fn encode_hex_f64(value: f64) -> String {
    format!("{:016x}", value.to_bits())
}

/// Decode a single hex-encoded value.
///
/// A token of exactly 16 hex digits is always read as a bit pattern, so
/// NaN payloads and signed zeros survive unchanged. Anything else is parsed
/// as a hex-float literal.
pub fn decode_hex_f64(token: &str) -> ArenaResult<f64> {
    let token = token.trim();

    if token.len() == HEX_F64_WIDTH && token.bytes().all(|b| b.is_ascii_hexdigit()) {
        let bits = u64::from_str_radix(token, 16)
            .map_err(|e| ArenaError::Parse(format!("invalid hex float {:?}: {}", token, e)))?;
        return Ok(f64::from_bits(bits));
    }

    parse_hex_literal(token)
        .ok_or_else(|| ArenaError::Parse(format!("invalid hex float {:?}", token)))
}

/// Parse `[sign][0x]digits[.digits][p[sign]exp]`, `inf`, `infinity` or `nan`.
fn parse_hex_literal(token: &str) -> Option<f64> {
    let (negative, rest) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let lower = rest.to_ascii_lowercase();

    let magnitude = match lower.as_str() {
        "inf" | "infinity" => f64::INFINITY,
        "nan" => f64::NAN,
        _ => {
            let body = lower.strip_prefix("0x").unwrap_or(&lower);
            let (digits, exp) = match body.split_once('p') {
                Some((digits, exp)) => (digits, exp.parse::<i32>().ok()?),
                None => (body, 0),
            };
            let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
            if int_part.is_empty() && frac_part.is_empty() {
                return None;
            }

            let mut mantissa: u64 = 0;
            let mut exponent = i64::from(exp);
            let mut sticky = false;

            for (i, c) in int_part.chars().chain(frac_part.chars()).enumerate() {
                let digit = u64::from(c.to_digit(16)?);
                let is_frac = i >= int_part.len();
                if mantissa >> 60 == 0 {
                    mantissa = (mantissa << 4) | digit;
                    if is_frac {
                        exponent -= 4;
                    }
                } else {
                    // Digits past 60 bits only matter for rounding.
                    sticky |= digit != 0;
                    if !is_frac {
                        exponent += 4;
                    }
                }
            }
            if sticky {
                mantissa |= 1;
            }

            scale(mantissa as f64, exponent)
        }
    };

    Some(if negative { -magnitude } else { magnitude })
}

/// Multiply an integral `value >= 1` (or zero) by `2^exponent`, rounding once.
fn scale(mut value: f64, mut exponent: i64) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    if exponent > 2200 {
        return f64::INFINITY;
    }
    if exponent < -2200 {
        return 0.0;
    }
    while exponent > 1023 && value.is_finite() {
        value *= pow2(1023);
        exponent -= 1023;
    }
    if exponent < -1022 {
        // value >= 1, so this step stays normal and exact.
        value *= pow2(-1022);
        exponent += 1022;
    }
    value * pow2(exponent)
}

/// Exact power of two, or 0 / infinity outside the representable range.
fn pow2(exponent: i64) -> f64 {
    if exponent > 1023 {
        f64::INFINITY
    } else if exponent >= -1022 {
        f64::from_bits(((exponent + 1023) as u64) << 52)
    } else if exponent >= -1074 {
        f64::from_bits(1u64 << (exponent + 1074))
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_bit_patterns() {
        assert_eq!(decode_hex_f64("3ff0000000000000").unwrap(), 1.0);
        assert_eq!(decode_hex_f64("4000000000000000").unwrap(), 2.0);
        assert_eq!(decode_hex_f64("3fd5555555555555").unwrap(), 1.0 / 3.0);
        assert_eq!(decode_hex_f64("0000000000000000").unwrap(), 0.0);
        assert_eq!(decode_hex_f64("3FF0000000000000").unwrap(), 1.0);
    }

    #[test]
    fn test_bit_patterns_round_trip_exactly() {
        let values = [
            0.0,
            -0.0,
            1.0,
            0.1,
            1.0 / 3.0,
            2.0 / 3.0,
            1e-300,
            f64::MIN_POSITIVE,
            5e-324,
            f64::MAX,
            f64::INFINITY,
            f64::NEG_INFINITY,
            123_456.789,
        ];
        for &value in &values {
            let encoded = encode_hex_f64(value);
            assert_eq!(encoded.len(), HEX_F64_WIDTH);
            let decoded = decode_hex_f64(&encoded).unwrap();
            assert_eq!(decoded.to_bits(), value.to_bits(), "value {} via {}", value, encoded);
        }
    }

    #[test]
    fn test_nan_payload_survives() {
        let nan = f64::from_bits(0x7ff8_0000_0000_0abc);
        let decoded = decode_hex_f64(&encode_hex_f64(nan)).unwrap();
        assert_eq!(decoded.to_bits(), nan.to_bits());
    }

    #[test]
    fn test_decode_hex_literals() {
        assert_eq!(decode_hex_f64("0x1p+0").unwrap(), 1.0);
        assert_eq!(decode_hex_f64("0x1.8p+1").unwrap(), 3.0);
        assert_eq!(decode_hex_f64("-0x1.0p-1").unwrap(), -0.5);
        assert_eq!(decode_hex_f64("0x0p+0").unwrap(), 0.0);
        assert!(decode_hex_f64("-0x0p+0").unwrap().is_sign_negative());
        assert_eq!(decode_hex_f64("0x1.5555555555555p-2").unwrap(), 1.0 / 3.0);
        assert_eq!(decode_hex_f64("0x1.fffffffffffffp+1023").unwrap(), f64::MAX);
        assert_eq!(decode_hex_f64("0x0.0000000000001p-1022").unwrap(), 5e-324);
        assert_eq!(decode_hex_f64("ff").unwrap(), 255.0);
        assert_eq!(decode_hex_f64(" 0x1p+0 ").unwrap(), 1.0);
        assert_eq!(decode_hex_f64("inf").unwrap(), f64::INFINITY);
        assert_eq!(decode_hex_f64("-infinity").unwrap(), f64::NEG_INFINITY);
        assert!(decode_hex_f64("nan").unwrap().is_nan());
    }

    #[test]
    fn test_decode_out_of_range_literals() {
        assert_eq!(decode_hex_f64("0x1p+2000").unwrap(), f64::INFINITY);
        assert_eq!(decode_hex_f64("0x1p-2000").unwrap(), 0.0);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        for token in ["", "0x", "p3", "1.0.0", "zz", "0x1p", "0x1g", "a,b"] {
            assert!(
                matches!(decode_hex_f64(token), Err(ArenaError::Parse(_))),
                "token {:?} should fail",
                token
            );
        }
    }
}
