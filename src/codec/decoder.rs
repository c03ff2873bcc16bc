// Decoder for Pybricks broadcast advertisements
//
// Raw layout: [len] [ad type] [0x97 0x03] [channel] [tag payload]...
// The advertisement spans bytes 0..=len. Tags start at offset 5.

use super::constants::{
    CHANNEL_OFFSET, LEGO_MANUFACTURER_ID, MANUFACTURER_OFFSET, VALUES_OFFSET,
};
use super::elements::{read_f32_le, read_i16_le, read_i32_le, read_i8, take_payload};
use super::error::{CodecError, Result};
use super::tag::{DataType, Tag};
use super::value::Value;

/// Check for the LEGO manufacturer id at bytes 2 and 3.
///
/// Never fails: buffers too short to hold the id are simply not a match.
pub fn has_expected_manufacturer(raw: &[u8]) -> bool {
    raw.get(MANUFACTURER_OFFSET) == Some(&LEGO_MANUFACTURER_ID[0])
        && raw.get(MANUFACTURER_OFFSET + 1) == Some(&LEGO_MANUFACTURER_ID[1])
}

/// Broadcast channel byte, if the buffer is long enough to carry one
pub fn channel(raw: &[u8]) -> Option<u8> {
    raw.get(CHANNEL_OFFSET).copied()
}

/// Exclusive end of the region to scan.
///
/// The length byte is read as "bytes 0..=len". A length byte one larger than
/// that (counting itself) is tolerated; anything further past the buffer is
/// malformed.
fn scan_end(raw: &[u8]) -> Result<usize> {
    let Some(&length) = raw.first() else {
        return Err(CodecError::MalformedLength {
            declared: 1,
            available: 0,
        });
    };

    let declared = length as usize + 1;
    if declared > raw.len() + 1 {
        return Err(CodecError::MalformedLength {
            declared,
            available: raw.len(),
        });
    }

    Ok(declared.min(raw.len()))
}

/// Decode every value in the advertisement, in stream order.
///
/// The manufacturer id is not checked here; see [`has_expected_manufacturer`]
/// and [`decode_checked`].
pub fn decode(raw: &[u8]) -> Result<Vec<Value>> {
    let end = scan_end(raw)?;
    let stream = &raw[..end];
    let mut values = Vec::new();
    let mut cursor = VALUES_OFFSET;

    while cursor < end {
        let tag = Tag::from_byte(stream[cursor]);

        match tag.data_type {
            DataType::Continuation => {
                cursor += 1;
            }
            DataType::True => {
                values.push(Value::Bool(true));
                cursor += 1;
            }
            DataType::False => {
                values.push(Value::Bool(false));
                cursor += 1;
            }
            DataType::Reserved => {
                return Err(CodecError::UnsupportedTag {
                    tag: tag.to_byte(),
                    offset: cursor,
                });
            }
            DataType::Int | DataType::Float | DataType::Str | DataType::Bytes => {
                check_width(tag, cursor)?;
                let size = tag.payload_len();
                let payload = take_payload(stream, cursor + 1, size)?;
                let value = decode_payload(tag, payload, cursor)?;
                tracing::trace!(
                    "offset {}: {} tag, {} bytes -> {}",
                    cursor,
                    tag.data_type,
                    size,
                    value
                );
                values.push(value);
                cursor += size + 1;
            }
        }
    }

    Ok(values)
}

/// Decode only if the manufacturer id matches, otherwise `PredicateMiss`
pub fn decode_checked(raw: &[u8]) -> Result<Vec<Value>> {
    if !has_expected_manufacturer(raw) {
        return Err(CodecError::PredicateMiss);
    }
    decode(raw)
}

/// Int and float tags only come in the widths a hub sends.
/// Checked before the payload is sliced so a bad width wins over a short buffer.
fn check_width(tag: Tag, offset: usize) -> Result<()> {
    let supported = match tag.data_type {
        DataType::Int => matches!(tag.size, 1 | 2 | 4),
        DataType::Float => tag.size == 4,
        _ => true,
    };

    if supported {
        Ok(())
    } else {
        Err(CodecError::UnsupportedTag {
            tag: tag.to_byte(),
            offset,
        })
    }
}

fn decode_payload(tag: Tag, payload: &[u8], offset: usize) -> Result<Value> {
    let unsupported = || CodecError::UnsupportedTag {
        tag: tag.to_byte(),
        offset,
    };

    match tag.data_type {
        DataType::Int => match payload.len() {
            1 => read_i8(payload).map(Value::Int8),
            2 => read_i16_le(payload).map(Value::Int16),
            4 => read_i32_le(payload).map(Value::Int32),
            _ => Err(unsupported()),
        },
        DataType::Float => match payload.len() {
            4 => read_f32_le(payload).map(Value::Float32),
            _ => Err(unsupported()),
        },
        DataType::Str => std::str::from_utf8(payload)
            .map(|s| Value::Str(s.to_string()))
            .map_err(|source| CodecError::EncodingError { offset, source }),
        DataType::Bytes => Ok(Value::Bytes(payload.to_vec())),
        DataType::Continuation | DataType::True | DataType::False | DataType::Reserved => {
            Err(unsupported())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manufacturer_check() {
        assert!(has_expected_manufacturer(&[0x08, 0xFF, 0x97, 0x03]));
        assert!(has_expected_manufacturer(&[
            0x08, 0xFF, 0x97, 0x03, 0x01, 0x00, 0x62, 0x10, 0x00
        ]));
        assert!(!has_expected_manufacturer(&[0x08, 0xFF, 0x03, 0x97]));
        assert!(!has_expected_manufacturer(&[0x08, 0xFF, 0x97, 0x04]));
    }

    #[test]
    fn test_manufacturer_check_short_buffers() {
        assert!(!has_expected_manufacturer(&[]));
        assert!(!has_expected_manufacturer(&[0x08]));
        assert!(!has_expected_manufacturer(&[0x08, 0xFF]));
        assert!(!has_expected_manufacturer(&[0x08, 0xFF, 0x97]));
    }

    #[test]
    fn test_channel() {
        assert_eq!(channel(&[0x08, 0xFF, 0x97, 0x03, 0x02]), Some(2));
        assert_eq!(channel(&[0x08, 0xFF, 0x97, 0x03]), None);
    }

    #[test]
    fn test_decode_single_int8() {
        // Length byte counts itself, so the span runs one past the buffer
        let raw = [0x07, 0xFF, 0x97, 0x03, 0x00, 0x61, 0x2A];
        assert_eq!(decode(&raw).unwrap(), vec![Value::Int8(42)]);
    }

    #[test]
    fn test_decode_int_size_zero() {
        // 0x60 is an int tag of size 0, not a one byte int
        let raw = [0x07, 0xFF, 0x97, 0x03, 0x00, 0x60, 0x2A];
        assert_eq!(
            decode(&raw),
            Err(CodecError::UnsupportedTag {
                tag: 0x60,
                offset: 5
            })
        );
    }

    #[test]
    fn test_decode_sample_sender_payload() {
        // Single-object broadcast of 900 on channel 1
        let raw = [0x08, 0xFF, 0x97, 0x03, 0x01, 0x00, 0x62, 0x84, 0x03];
        assert_eq!(decode(&raw).unwrap(), vec![Value::Int16(900)]);
    }

    #[test]
    fn test_decode_negative_int16() {
        let raw = [0x07, 0xFF, 0x97, 0x03, 0x00, 0x62, 0xFF, 0xFF];
        assert_eq!(decode(&raw).unwrap(), vec![Value::Int16(-1)]);
    }

    #[test]
    fn test_decode_int32() {
        let raw = [0x09, 0xFF, 0x97, 0x03, 0x00, 0x64, 0x00, 0x00, 0x01, 0x80];
        assert_eq!(decode(&raw).unwrap(), vec![Value::Int32(-2147418112)]);
    }

    #[test]
    fn test_decode_bool_advances_one_byte() {
        // 0x25: type 1 with a non-zero size; the next byte must still be read as a tag
        let raw = [0x08, 0xFF, 0x97, 0x03, 0x00, 0x25, 0x41, 0x61, 0x05];
        assert_eq!(
            decode(&raw).unwrap(),
            vec![Value::Bool(true), Value::Bool(false), Value::Int8(5)]
        );
    }

    #[test]
    fn test_decode_continuation_ignores_size() {
        let raw = [0x08, 0xFF, 0x97, 0x03, 0x00, 0x1F, 0x00, 0x20, 0x40];
        assert_eq!(
            decode(&raw).unwrap(),
            vec![Value::Bool(true), Value::Bool(false)]
        );
    }

    #[test]
    fn test_decode_float_string_bytes() {
        let mut raw = vec![0x00, 0xFF, 0x97, 0x03, 0x00];
        raw.push(0x84);
        raw.extend_from_slice(&2.5f32.to_le_bytes());
        raw.push(0xA2);
        raw.extend_from_slice(b"hi");
        raw.push(0xC3);
        raw.extend_from_slice(&[0x00, 0x01, 0xFF]);
        raw[0] = (raw.len() - 1) as u8;

        assert_eq!(
            decode(&raw).unwrap(),
            vec![
                Value::Float32(2.5),
                Value::from("hi"),
                Value::Bytes(vec![0x00, 0x01, 0xFF]),
            ]
        );
    }

    #[test]
    fn test_decode_empty_stream() {
        assert!(decode(&[0x04, 0xFF, 0x97, 0x03, 0x00]).unwrap().is_empty());
        assert!(decode(&[0x02, 0xFF, 0x97]).unwrap().is_empty());
    }

    #[test]
    fn test_decode_stops_at_declared_length() {
        // Span is [0, 6): the trailing reserved tags are never scanned
        let raw = [0x05, 0xFF, 0x97, 0x03, 0x00, 0x20, 0xFF, 0xFF];
        assert_eq!(decode(&raw).unwrap(), vec![Value::Bool(true)]);
    }

    #[test]
    fn test_decode_scans_byte_at_length_offset() {
        // Byte L itself is inside the span
        let raw = [0x06, 0xFF, 0x97, 0x03, 0x00, 0x20, 0x40, 0xFF];
        assert_eq!(
            decode(&raw).unwrap(),
            vec![Value::Bool(true), Value::Bool(false)]
        );

        let raw = [0x06, 0xFF, 0x97, 0x03, 0x00, 0x20, 0xFF];
        assert_eq!(
            decode(&raw),
            Err(CodecError::UnsupportedTag {
                tag: 0xFF,
                offset: 6
            })
        );
    }

    #[test]
    fn test_decode_length_past_buffer() {
        let raw = [0x1E, 0xFF, 0x97, 0x03, 0x00, 0x61, 0x01];
        assert_eq!(
            decode(&raw),
            Err(CodecError::MalformedLength {
                declared: 31,
                available: 7
            })
        );
    }

    #[test]
    fn test_decode_element_past_span() {
        // Int16 tag with only one payload byte inside the span
        let raw = [0x06, 0xFF, 0x97, 0x03, 0x00, 0x62, 0x01];
        assert!(matches!(
            decode(&raw),
            Err(CodecError::MalformedLength { .. })
        ));

        // String claiming 31 bytes
        let raw = [0x07, 0xFF, 0x97, 0x03, 0x00, 0xBF, b'a', b'b'];
        assert!(matches!(
            decode(&raw),
            Err(CodecError::MalformedLength { .. })
        ));
    }

    #[test]
    fn test_decode_empty_buffer() {
        assert!(matches!(
            decode(&[]),
            Err(CodecError::MalformedLength { .. })
        ));
    }

    #[test]
    fn test_decode_reserved_tag() {
        let raw = [0x06, 0xFF, 0x97, 0x03, 0x00, 0x20, 0xE0];
        assert_eq!(
            decode(&raw),
            Err(CodecError::UnsupportedTag {
                tag: 0xE0,
                offset: 6
            })
        );
    }

    #[test]
    fn test_decode_unsupported_int_size() {
        let raw = [0x08, 0xFF, 0x97, 0x03, 0x00, 0x63, 0x01, 0x02, 0x03];
        assert_eq!(
            decode(&raw),
            Err(CodecError::UnsupportedTag {
                tag: 0x63,
                offset: 5
            })
        );
    }

    #[test]
    fn test_decode_bad_width_before_bounds() {
        // Size 3 int whose payload would also run past the span
        let raw = [0x06, 0xFF, 0x97, 0x03, 0x00, 0x63, 0x01];
        assert_eq!(
            decode(&raw),
            Err(CodecError::UnsupportedTag {
                tag: 0x63,
                offset: 5
            })
        );

        // Size 8 float with a single payload byte
        let raw = [0x06, 0xFF, 0x97, 0x03, 0x00, 0x88, 0x01];
        assert_eq!(
            decode(&raw),
            Err(CodecError::UnsupportedTag {
                tag: 0x88,
                offset: 5
            })
        );
    }

    #[test]
    fn test_decode_float_wrong_size() {
        let raw = [0x07, 0xFF, 0x97, 0x03, 0x00, 0x82, 0x00, 0x00];
        assert!(matches!(
            decode(&raw),
            Err(CodecError::UnsupportedTag { tag: 0x82, .. })
        ));
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let raw = [0x07, 0xFF, 0x97, 0x03, 0x00, 0xA2, 0xC3, 0x28];
        assert!(matches!(
            decode(&raw),
            Err(CodecError::EncodingError { offset: 5, .. })
        ));
    }

    #[test]
    fn test_decode_checked() {
        let raw = [0x07, 0xFF, 0x97, 0x03, 0x00, 0x61, 0x2A];
        assert_eq!(decode_checked(&raw).unwrap(), vec![Value::Int8(42)]);

        let foreign = [0x07, 0xFF, 0x4C, 0x00, 0x00, 0x61, 0x2A];
        assert_eq!(decode_checked(&foreign), Err(CodecError::PredicateMiss));
        assert!(decode_checked(&[0x01]).unwrap_err().is_predicate_miss());
    }
}
