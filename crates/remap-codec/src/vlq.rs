//! Base64 variable-length quantities.
//!
//! Each value is split into 5-bit groups, least significant first. The
//! sixth bit of every base64 digit is a continuation flag and the lowest bit
//! of the first group carries the sign.

use crate::error::DecodeError;

const BASE64_CHARS: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const BASE64_VALUES: [i8; 128] = {
    let mut table = [-1i8; 128];
    let mut i = 0;
    while i < BASE64_CHARS.len() {
        table[BASE64_CHARS[i] as usize] = i as i8;
        i += 1;
    }
    table
};

const VLQ_BASE_SHIFT: u32 = 5;
const VLQ_BASE_MASK: u64 = 0x1F;
const VLQ_CONTINUATION_BIT: u8 = 0x20;

fn base64_value(byte: u8) -> Option<u8> {
    match BASE64_VALUES.get(byte as usize) {
        Some(&value) if value >= 0 => Some(value as u8),
        _ => None,
    }
}

/// Append the VLQ encoding of `value` to `out`.
pub fn encode_vlq(value: i64, out: &mut String) {
    let mut vlq = if value < 0 {
        (value.unsigned_abs() << 1) | 1
    } else {
        (value as u64) << 1
    };

    loop {
        let mut digit = (vlq & VLQ_BASE_MASK) as u8;
        vlq >>= VLQ_BASE_SHIFT;
        if vlq > 0 {
            digit |= VLQ_CONTINUATION_BIT;
        }
        out.push(BASE64_CHARS[digit as usize] as char);
        if vlq == 0 {
            break;
        }
    }
}

/// Decode one VLQ value starting at byte `pos` of `bytes`.
///
/// Returns the value and the offset just past its last digit. A value may
/// not run into a `,`/`;` separator or the end of input while its
/// continuation bit is still set.
pub fn decode_vlq(bytes: &[u8], mut pos: usize) -> Result<(i64, usize), DecodeError> {
    let start = pos;
    let mut result: u64 = 0;
    let mut shift = 0u32;

    loop {
        let byte = match bytes.get(pos) {
            None | Some(b',') | Some(b';') => {
                return Err(DecodeError::UnexpectedEnd { offset: pos })
            }
            Some(&byte) => byte,
        };
        let digit = base64_value(byte).ok_or(DecodeError::InvalidBase64 {
            ch: byte as char,
            offset: pos,
        })?;
        if shift > 60 {
            return Err(DecodeError::Overflow { offset: start });
        }

        result |= (u64::from(digit) & VLQ_BASE_MASK) << shift;
        pos += 1;

        if digit & VLQ_CONTINUATION_BIT == 0 {
            break;
        }
        shift += VLQ_BASE_SHIFT;
    }

    let negative = result & 1 == 1;
    let magnitude = (result >> 1) as i64;
    Ok((if negative { -magnitude } else { magnitude }, pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(value: i64) -> String {
        let mut out = String::new();
        encode_vlq(value, &mut out);
        out
    }

    #[test]
    fn test_encode_small_values() {
        assert_eq!(encoded(0), "A");
        assert_eq!(encoded(1), "C");
        assert_eq!(encoded(-1), "D");
        assert_eq!(encoded(5), "K");
        assert_eq!(encoded(15), "e");
    }

    #[test]
    fn test_encode_multi_digit() {
        assert_eq!(encoded(16), "gB");
        assert_eq!(encoded(-16), "hB");
        assert_eq!(encoded(1000), "w+B");
    }

    #[test]
    fn test_decode_reports_position() {
        let (value, next) = decode_vlq(b"KgB", 0).unwrap();
        assert_eq!((value, next), (5, 1));
        let (value, next) = decode_vlq(b"KgB", 1).unwrap();
        assert_eq!((value, next), (16, 3));
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert_eq!(
            decode_vlq(b"A!", 1),
            Err(DecodeError::InvalidBase64 { ch: '!', offset: 1 })
        );
        assert_eq!(decode_vlq(b"g", 0), Err(DecodeError::UnexpectedEnd { offset: 1 }));
        assert_eq!(decode_vlq(b"g,A", 0), Err(DecodeError::UnexpectedEnd { offset: 1 }));
        assert_eq!(
            decode_vlq(b"gggggggggggggggA", 0),
            Err(DecodeError::Overflow { offset: 0 })
        );
    }
}
