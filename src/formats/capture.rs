//! Capture files: recorded advertisements, one hex line each
//!
//! ```text
//! # speed on channel 1
//! 08 FF 97 03 01 00 62 84 03
//! 0x07,0xFF,0x97,0x03,0x00,0x61,0x2A
//! ```

use super::hex::{parse_hex, to_hex};
use crate::codec::{self, Value};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CaptureError>;

/// One raw advertisement read from a capture
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRecord {
    /// 1-based line number in the source
    pub line: usize,
    pub data: Vec<u8>,
}

/// A capture line that decoded successfully
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedRecord {
    pub line: usize,
    pub channel: Option<u8>,
    pub raw: String,
    pub values: Vec<Value>,
}

/// Read capture lines from any buffered reader
pub fn read_capture<R: BufRead>(reader: R) -> Result<Vec<CaptureRecord>> {
    let mut records = Vec::new();

    for (idx, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let text = line.split('#').next().unwrap_or("").trim();
        if text.is_empty() {
            continue;
        }

        match parse_hex(text) {
            Ok(data) => records.push(CaptureRecord {
                line: idx + 1,
                data,
            }),
            Err(e) => {
                tracing::warn!("Skipping line {}: {}", idx + 1, e);
            }
        }
    }

    Ok(records)
}

/// Load a capture file from disk
pub fn load_capture(path: impl AsRef<Path>) -> Result<Vec<CaptureRecord>> {
    let file = File::open(path)?;
    read_capture(BufReader::new(file))
}

/// Decode every Pybricks advertisement in the capture.
///
/// Foreign advertisements and lines that fail to decode are skipped.
pub fn decode_capture(records: &[CaptureRecord]) -> Vec<DecodedRecord> {
    let mut decoded = Vec::new();

    for record in records {
        if !codec::has_expected_manufacturer(&record.data) {
            tracing::debug!("Line {}: not a LEGO advertisement", record.line);
            continue;
        }

        match codec::decode(&record.data) {
            Ok(values) => decoded.push(DecodedRecord {
                line: record.line,
                channel: codec::channel(&record.data),
                raw: to_hex(&record.data),
                values,
            }),
            Err(e) => {
                tracing::warn!("Skipping line {}: {}", record.line, e);
            }
        }
    }

    decoded
}

/// Write decoded records as JSON lines
pub fn write_json_lines<W: Write>(mut out: W, records: &[DecodedRecord]) -> Result<()> {
    for record in records {
        serde_json::to_writer(&mut out, record)?;
        writeln!(out)?;
    }
    Ok(())
}
