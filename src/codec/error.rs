// Error type shared by the advertisement decoder and encoder

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Advertisement does not carry the LEGO manufacturer id")]
    PredicateMiss,

    #[error("Malformed length: need {declared} bytes, buffer has {available}")]
    MalformedLength { declared: usize, available: usize },

    #[error("Unsupported tag 0x{tag:02X} at offset {offset}")]
    UnsupportedTag { tag: u8, offset: usize },

    #[error("Invalid UTF-8 string at offset {offset}: {source}")]
    EncodingError {
        offset: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Value payload of {size} bytes exceeds the 31 byte tag limit")]
    ValueTooLarge { size: usize },

    #[error("Advertisement of {len} bytes exceeds the 31 byte limit")]
    AdvertisementTooLong { len: usize },
}

impl CodecError {
    /// True when the advertisement simply isn't a Pybricks broadcast
    pub fn is_predicate_miss(&self) -> bool {
        matches!(self, CodecError::PredicateMiss)
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
