// Text formats for advertisements: hex strings and capture files
pub mod capture;
pub mod hex;

pub use capture::{decode_capture, load_capture, read_capture, CaptureError, DecodedRecord};
pub use hex::{parse_hex, to_hex, write_advertisement_dump, write_hex_dump, HexError};
