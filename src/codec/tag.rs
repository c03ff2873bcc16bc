// Tag byte of the broadcast value stream
// Layout: bits 7-5 data type, bits 4-0 payload size in bytes

use std::fmt;

/// Data type carried in the top three bits of a tag byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Skip this byte and read the next one as a tag. Pybricks writes it
    /// before a value that was broadcast on its own rather than as a tuple.
    Continuation,
    True,
    False,
    Int,
    Float,
    Str,
    Bytes,
    /// Type 7 has no meaning on the wire and is always rejected
    Reserved,
}

impl DataType {
    /// Map the three type bits (already shifted down) to a data type
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => DataType::Continuation,
            1 => DataType::True,
            2 => DataType::False,
            3 => DataType::Int,
            4 => DataType::Float,
            5 => DataType::Str,
            6 => DataType::Bytes,
            _ => DataType::Reserved,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            DataType::Continuation => 0,
            DataType::True => 1,
            DataType::False => 2,
            DataType::Int => 3,
            DataType::Float => 4,
            DataType::Str => 5,
            DataType::Bytes => 6,
            DataType::Reserved => 7,
        }
    }

    /// Bare tags are a single byte; their size field is never read
    pub fn is_bare(self) -> bool {
        matches!(
            self,
            DataType::Continuation | DataType::True | DataType::False
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            DataType::Continuation => "continuation",
            DataType::True => "true",
            DataType::False => "false",
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::Str => "str",
            DataType::Bytes => "bytes",
            DataType::Reserved => "reserved",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded tag byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub data_type: DataType,
    pub size: u8,
}

impl Tag {
    pub const TYPE_SHIFT: u8 = 5;
    pub const SIZE_MASK: u8 = 0x1F;

    /// Build a tag; sizes above 31 are truncated to the 5-bit field
    pub fn new(data_type: DataType, size: u8) -> Self {
        Self {
            data_type,
            size: size & Self::SIZE_MASK,
        }
    }

    pub fn from_byte(byte: u8) -> Self {
        Self {
            data_type: DataType::from_bits(byte >> Self::TYPE_SHIFT),
            size: byte & Self::SIZE_MASK,
        }
    }

    pub fn to_byte(self) -> u8 {
        (self.data_type.bits() << Self::TYPE_SHIFT) | (self.size & Self::SIZE_MASK)
    }

    /// Number of payload bytes following the tag byte
    pub fn payload_len(self) -> usize {
        if self.data_type.is_bare() {
            0
        } else {
            self.size as usize
        }
    }
}

impl From<u8> for Tag {
    fn from(byte: u8) -> Self {
        Tag::from_byte(byte)
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag.to_byte()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tag_byte() {
        let tag = Tag::from_byte(0x62);
        assert_eq!(tag.data_type, DataType::Int);
        assert_eq!(tag.size, 2);

        let tag = Tag::from_byte(0x84);
        assert_eq!(tag.data_type, DataType::Float);
        assert_eq!(tag.size, 4);

        let tag = Tag::from_byte(0xFF);
        assert_eq!(tag.data_type, DataType::Reserved);
        assert_eq!(tag.size, 31);
    }

    #[test]
    fn test_bare_tags_have_no_payload() {
        // Size bits are ignored for continuation/true/false
        assert_eq!(Tag::from_byte(0x1F).payload_len(), 0);
        assert_eq!(Tag::from_byte(0x25).payload_len(), 0);
        assert_eq!(Tag::from_byte(0x45).payload_len(), 0);
        assert_eq!(Tag::from_byte(0xA5).payload_len(), 5);
    }

    #[test]
    fn test_tag_byte_roundtrip() {
        for byte in 0..=u8::MAX {
            assert_eq!(Tag::from_byte(byte).to_byte(), byte);
        }
    }

    #[test]
    fn test_new_truncates_size() {
        let tag = Tag::new(DataType::Bytes, 0x25);
        assert_eq!(tag.size, 0x05);
        assert_eq!(u8::from(tag), 0xC5);
    }
}
