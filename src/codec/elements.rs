// Little-endian element readers for tag payloads, built on nom
// Every reader is bounds checked; a short slice is a MalformedLength error

use super::error::{CodecError, Result};
use nom::{
    bytes::complete::take,
    number::complete::{le_f32, le_i16, le_i32, le_i8},
    IResult,
};

fn insufficient(expected: usize, actual: usize) -> CodecError {
    CodecError::MalformedLength {
        declared: expected,
        available: actual,
    }
}

/// Slice `len` bytes starting at `offset` out of `stream`
pub fn take_payload(stream: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let rest = stream.get(offset..).unwrap_or_default();
    let parsed: IResult<&[u8], &[u8]> = take(len)(rest);
    parsed
        .map(|(_, bytes)| bytes)
        .map_err(|_| insufficient(offset + len, stream.len()))
}

/// Read an i8
pub fn read_i8(data: &[u8]) -> Result<i8> {
    let parsed: IResult<&[u8], i8> = le_i8(data);
    parsed.map(|(_, v)| v).map_err(|_| insufficient(1, data.len()))
}

/// Read an i16 in little-endian format
pub fn read_i16_le(data: &[u8]) -> Result<i16> {
    let parsed: IResult<&[u8], i16> = le_i16(data);
    parsed.map(|(_, v)| v).map_err(|_| insufficient(2, data.len()))
}

/// Read an i32 in little-endian format
pub fn read_i32_le(data: &[u8]) -> Result<i32> {
    let parsed: IResult<&[u8], i32> = le_i32(data);
    parsed.map(|(_, v)| v).map_err(|_| insufficient(4, data.len()))
}

/// Read an IEEE-754 f32 in little-endian format
pub fn read_f32_le(data: &[u8]) -> Result<f32> {
    let parsed: IResult<&[u8], f32> = le_f32(data);
    parsed.map(|(_, v)| v).map_err(|_| insufficient(4, data.len()))
}

/// Write an i16 in little-endian format
pub fn write_i16_le(value: i16) -> [u8; 2] {
    value.to_le_bytes()
}

/// Write an i32 in little-endian format
pub fn write_i32_le(value: i32) -> [u8; 4] {
    value.to_le_bytes()
}

/// Write an f32 in little-endian format
pub fn write_f32_le(value: f32) -> [u8; 4] {
    value.to_le_bytes()
}
