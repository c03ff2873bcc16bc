// PYBRICKS-ADV: codec for Pybricks BLE broadcast advertisements
// Decodes and encodes the typed values LEGO hubs broadcast and observe
// Copyright 2024 - Licensed under GPLv3

pub mod codec;
pub mod formats;
pub mod observe;

// Re-export commonly used types
pub use codec::{
    decode, decode_checked, encode, encode_single, has_expected_manufacturer, CodecError, Value,
};
pub use formats::{parse_hex, to_hex};
pub use observe::{LatestValues, Observation, Observer, ObserverConfig, ScanReport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_observer_payload_from_hex() {
        // Hub broadcasting a motor angle, as printed by a scanner
        let raw = parse_hex("07 FF 97 03 00 61 2A").unwrap();
        assert!(has_expected_manufacturer(&raw));
        assert_eq!(decode(&raw).unwrap(), vec![Value::Int8(42)]);
    }
}
