// Constants describing the Pybricks broadcast advertisement layout
// Reference: pybricks technical-info, pybricks-ble-broadcast-observe.md

/// LEGO System A/S Bluetooth SIG company identifier, as it appears on air
pub const LEGO_MANUFACTURER_ID: [u8; 2] = [0x97, 0x03];

/// AD structure type for manufacturer specific data
pub const AD_TYPE_MANUFACTURER_DATA: u8 = 0xFF;

/// Offset of the length byte
pub const LENGTH_OFFSET: usize = 0;

/// Offset of the first manufacturer id byte
pub const MANUFACTURER_OFFSET: usize = 2;

/// Offset of the broadcast channel byte
pub const CHANNEL_OFFSET: usize = 4;

/// Offset of the first tag byte of the value stream
pub const VALUES_OFFSET: usize = 5;

/// Bytes written before the value stream: length, AD type, id (2), channel
pub const HEADER_LEN: usize = VALUES_OFFSET;

/// Largest payload a single tag can describe (5-bit size field)
pub const MAX_VALUE_SIZE: usize = 0x1F;

/// Legacy BLE advertising data limit, length byte included
pub const MAX_ADVERTISEMENT_LEN: usize = 31;

/// Tag byte a hub emits before a value broadcast on its own (not as a tuple)
pub const SINGLE_OBJECT_MARKER: u8 = 0x00;
