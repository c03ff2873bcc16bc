// Typed values carried in a Pybricks broadcast

use super::tag::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One value of a broadcast, in stream order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Float32(f32),
    Str(String),
    Bytes(#[serde(with = "base64_bytes")] Vec<u8>),
}

impl Value {
    /// Integer in the narrowest width that holds it, as a hub sends it
    pub fn int(value: i32) -> Self {
        if let Ok(v) = i8::try_from(value) {
            Value::Int8(v)
        } else if let Ok(v) = i16::try_from(value) {
            Value::Int16(v)
        } else {
            Value::Int32(value)
        }
    }

    /// Data type written in this value's tag byte
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Bool(true) => DataType::True,
            Value::Bool(false) => DataType::False,
            Value::Int8(_) | Value::Int16(_) | Value::Int32(_) => DataType::Int,
            Value::Float32(_) => DataType::Float,
            Value::Str(_) => DataType::Str,
            Value::Bytes(_) => DataType::Bytes,
        }
    }

    /// Variant name, matching the JSON `type` field
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int8(_) => "int8",
            Value::Int16(_) => "int16",
            Value::Int32(_) => "int32",
            Value::Float32(_) => "float32",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
        }
    }

    /// Payload bytes following the tag byte
    pub fn payload_len(&self) -> usize {
        match self {
            Value::Bool(_) => 0,
            Value::Int8(_) => 1,
            Value::Int16(_) => 2,
            Value::Int32(_) | Value::Float32(_) => 4,
            Value::Str(s) => s.len(),
            Value::Bytes(b) => b.len(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Any integer width, widened to i32
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int8(v) => Some(i32::from(*v)),
            Value::Int16(v) => Some(i32::from(*v)),
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    /// Floats as-is, integers converted
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float32(v) => Some(*v),
            other => other.as_i32().map(|v| v as f32),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int8(v) => write!(f, "{}", v),
            Value::Int16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Float32(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Bytes(b) => {
                write!(f, "b'")?;
                for byte in b {
                    write!(f, "\\x{:02x}", byte)?;
                }
                write!(f, "'")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Int8(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float32(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ValueParseError {
    #[error("Missing type prefix in {0:?} (expected e.g. i:42, f:1.5, s:text, b:true, x:01ff)")]
    MissingPrefix(String),

    #[error("Unknown type prefix {0:?}")]
    UnknownPrefix(String),

    #[error("Invalid {kind} literal {literal:?}")]
    InvalidLiteral { kind: &'static str, literal: String },
}

/// Parses `<prefix>:<literal>` as used on the command line.
///
/// Prefixes: `b` bool, `i` narrowest int, `i8`/`i16`/`i32` fixed width,
/// `f` float, `s` string, `x` hex bytes.
impl FromStr for Value {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, literal) = s
            .split_once(':')
            .ok_or_else(|| ValueParseError::MissingPrefix(s.to_string()))?;

        let invalid = |kind: &'static str| ValueParseError::InvalidLiteral {
            kind,
            literal: literal.to_string(),
        };

        match prefix {
            "b" => match literal.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err(invalid("bool")),
            },
            "i" => literal.parse().map(Value::int).map_err(|_| invalid("int")),
            "i8" => literal.parse().map(Value::Int8).map_err(|_| invalid("i8")),
            "i16" => literal.parse().map(Value::Int16).map_err(|_| invalid("i16")),
            "i32" => literal.parse().map(Value::Int32).map_err(|_| invalid("i32")),
            "f" => literal.parse().map(Value::Float32).map_err(|_| invalid("float")),
            "s" => Ok(Value::Str(literal.to_string())),
            "x" => crate::formats::hex::parse_hex(literal)
                .map(Value::Bytes)
                .map_err(|_| invalid("hex")),
            other => Err(ValueParseError::UnknownPrefix(other.to_string())),
        }
    }
}

/// Byte blobs travel as base64 strings in JSON
mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_picks_narrowest_width() {
        assert_eq!(Value::int(42), Value::Int8(42));
        assert_eq!(Value::int(-128), Value::Int8(-128));
        assert_eq!(Value::int(128), Value::Int16(128));
        assert_eq!(Value::int(-900), Value::Int16(-900));
        assert_eq!(Value::int(40_000), Value::Int32(40_000));
    }

    #[test]
    fn test_data_type_and_payload_len() {
        assert_eq!(Value::Bool(true).data_type(), DataType::True);
        assert_eq!(Value::Bool(false).data_type(), DataType::False);
        assert_eq!(Value::Bool(false).payload_len(), 0);
        assert_eq!(Value::Int16(5).payload_len(), 2);
        assert_eq!(Value::Float32(0.0).payload_len(), 4);
        assert_eq!(Value::from("héllo").payload_len(), 6);
        assert_eq!(Value::from(vec![1, 2, 3]).data_type(), DataType::Bytes);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Int8(-3).as_i32(), Some(-3));
        assert_eq!(Value::Int16(300).as_f32(), Some(300.0));
        assert_eq!(Value::Float32(2.5).as_i32(), None);
        assert_eq!(Value::from("abc").as_str(), Some("abc"));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::from(&[9u8, 8][..]).as_bytes(), Some(&[9u8, 8][..]));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Int32(-7).to_string(), "-7");
        assert_eq!(Value::from("hi").to_string(), "\"hi\"");
        assert_eq!(Value::from(vec![0x01, 0xAB]).to_string(), "b'\\x01\\xab'");
    }

    #[test]
    fn test_parse_from_str() {
        assert_eq!("i:42".parse::<Value>(), Ok(Value::Int8(42)));
        assert_eq!("i16:42".parse::<Value>(), Ok(Value::Int16(42)));
        assert_eq!("f:1.5".parse::<Value>(), Ok(Value::Float32(1.5)));
        assert_eq!("b:false".parse::<Value>(), Ok(Value::Bool(false)));
        assert_eq!("s:a:b".parse::<Value>(), Ok(Value::from("a:b")));
        assert_eq!("x:01ff".parse::<Value>(), Ok(Value::Bytes(vec![0x01, 0xFF])));

        assert!(matches!(
            "42".parse::<Value>(),
            Err(ValueParseError::MissingPrefix(_))
        ));
        assert!(matches!(
            "q:1".parse::<Value>(),
            Err(ValueParseError::UnknownPrefix(_))
        ));
        assert!(matches!(
            "i8:300".parse::<Value>(),
            Err(ValueParseError::InvalidLiteral { kind: "i8", .. })
        ));
    }

    #[test]
    fn test_json_representation() {
        let values = vec![
            Value::Int16(-1),
            Value::from("go"),
            Value::Bytes(vec![0xDE, 0xAD]),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(
            json,
            r#"[{"type":"int16","value":-1},{"type":"str","value":"go"},{"type":"bytes","value":"3q0="}]"#
        );

        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }
}
