// Hex text helpers for advertisement bytes typed or logged by hand

use crate::codec::constants::{CHANNEL_OFFSET, LENGTH_OFFSET, MANUFACTURER_OFFSET, VALUES_OFFSET};
use crate::codec::Tag;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum HexError {
    #[error("Invalid hex digit {digit:?} in {token:?}")]
    InvalidDigit { digit: char, token: String },

    #[error("Odd number of hex digits in {0:?}")]
    OddLength(String),
}

pub type Result<T> = std::result::Result<T, HexError>;

/// Parse hex text into bytes.
///
/// Accepts whitespace or comma separated tokens, optional `0x` prefixes and
/// contiguous runs: `"07 FF 97"`, `"0x07,0xFF"` and `"07ff97"` all work.
/// A single digit token is one byte (`"0x7"` is 0x07).
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();

    for token in text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);

        if let Some(digit) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(HexError::InvalidDigit {
                digit,
                token: token.to_string(),
            });
        }

        match digits.len() {
            0 => return Err(HexError::OddLength(token.to_string())),
            1 => bytes.push(nibble(digits.as_bytes()[0])),
            n if n % 2 == 1 => return Err(HexError::OddLength(token.to_string())),
            _ => {
                for pair in digits.as_bytes().chunks_exact(2) {
                    bytes.push((nibble(pair[0]) << 4) | nibble(pair[1]));
                }
            }
        }
    }

    Ok(bytes)
}

fn nibble(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

/// Format bytes as space separated upper-case hex
pub fn to_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write an offset / hex / ASCII dump, 16 bytes per row
pub fn write_hex_dump<W: Write>(out: &mut W, data: &[u8]) -> io::Result<()> {
    writeln!(
        out,
        "Offset(h) 00 01 02 03 04 05 06 07 08 09 0A 0B 0C 0D 0E 0F  ASCII"
    )?;

    for (row, chunk) in data.chunks(16).enumerate() {
        write!(out, "{:08X}  ", row * 16)?;

        for (i, byte) in chunk.iter().enumerate() {
            write!(out, "{:02X} ", byte)?;
            if i == 7 {
                write!(out, " ")?;
            }
        }

        // Padding for incomplete rows
        for i in chunk.len()..16 {
            write!(out, "   ")?;
            if i == 7 {
                write!(out, " ")?;
            }
        }

        write!(out, " ")?;
        for byte in chunk {
            let c = if byte.is_ascii_graphic() || *byte == b' ' {
                *byte as char
            } else {
                '.'
            };
            write!(out, "{}", c)?;
        }

        writeln!(out)?;
    }

    Ok(())
}

/// Hex dump followed by the header fields and tag boundaries of an
/// advertisement. Elements are split without validation so broken
/// payloads still show where each tag claims to end.
pub fn write_advertisement_dump<W: Write>(out: &mut W, data: &[u8]) -> io::Result<()> {
    write_hex_dump(out, data)?;

    let header = [
        (LENGTH_OFFSET, 1, "length"),
        (LENGTH_OFFSET + 1, 1, "ad type"),
        (MANUFACTURER_OFFSET, 2, "manufacturer"),
        (CHANNEL_OFFSET, 1, "channel"),
    ];
    for (offset, len, field) in header {
        let Some(bytes) = data.get(offset..offset + len) else {
            return Ok(());
        };
        writeln!(out, "  {:02X}  {:<14} {}", offset, field, to_hex(bytes))?;
    }

    let end = data
        .first()
        .map_or(0, |&len| (len as usize + 1).min(data.len()));
    let mut offset = VALUES_OFFSET;
    while offset < end {
        let tag = Tag::from_byte(data[offset]);
        let next = offset + 1 + tag.payload_len();
        let label = format!("{} /{}", tag.data_type, tag.size);
        writeln!(
            out,
            "  {:02X}  {:<14} {}",
            offset,
            label,
            to_hex(&data[offset..next.min(end)])
        )?;
        offset = next;
    }

    Ok(())
}
