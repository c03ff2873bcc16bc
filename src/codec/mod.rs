// Codec for the Pybricks broadcast advertisement format
// Tag-length-value stream inside BLE manufacturer specific data

pub mod constants;
pub mod decoder;
pub mod elements;
pub mod encoder;
pub mod error;
pub mod tag;
pub mod value;

pub use decoder::{channel, decode, decode_checked, has_expected_manufacturer};
pub use encoder::{encode, encode_single, write_value};
pub use error::{CodecError, Result};
pub use tag::{DataType, Tag};
pub use value::{Value, ValueParseError};
