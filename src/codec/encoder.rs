// Encoder producing advertisements a Pybricks hub can observe
// Reference: pybricks-ble-broadcast-observe.md, pico sample senders

use super::constants::{
    AD_TYPE_MANUFACTURER_DATA, HEADER_LEN, LEGO_MANUFACTURER_ID, LENGTH_OFFSET,
    MAX_ADVERTISEMENT_LEN, MAX_VALUE_SIZE, SINGLE_OBJECT_MARKER,
};
use super::elements::{write_f32_le, write_i16_le, write_i32_le};
use super::error::{CodecError, Result};
use super::tag::Tag;
use super::value::Value;

/// Encode `values` as a tuple broadcast on `channel`
pub fn encode(values: &[Value], channel: u8) -> Result<Vec<u8>> {
    let mut adv = header(channel);
    for value in values {
        write_value(&mut adv, value)?;
    }
    finish(adv)
}

/// Encode one value the way a hub broadcasts a lone (non-tuple) object:
/// a continuation marker precedes the value.
pub fn encode_single(value: &Value, channel: u8) -> Result<Vec<u8>> {
    let mut adv = header(channel);
    adv.push(SINGLE_OBJECT_MARKER);
    write_value(&mut adv, value)?;
    finish(adv)
}

/// Append the tag byte and payload of `value`
pub fn write_value(out: &mut Vec<u8>, value: &Value) -> Result<()> {
    let size = value.payload_len();
    if size > MAX_VALUE_SIZE {
        return Err(CodecError::ValueTooLarge { size });
    }

    out.push(Tag::new(value.data_type(), size as u8).to_byte());

    match value {
        Value::Bool(_) => {}
        Value::Int8(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::Int16(v) => out.extend_from_slice(&write_i16_le(*v)),
        Value::Int32(v) => out.extend_from_slice(&write_i32_le(*v)),
        Value::Float32(v) => out.extend_from_slice(&write_f32_le(*v)),
        Value::Str(s) => out.extend_from_slice(s.as_bytes()),
        Value::Bytes(b) => out.extend_from_slice(b),
    }

    Ok(())
}

fn header(channel: u8) -> Vec<u8> {
    let mut adv = Vec::with_capacity(MAX_ADVERTISEMENT_LEN);
    adv.extend_from_slice(&[
        0,
        AD_TYPE_MANUFACTURER_DATA,
        LEGO_MANUFACTURER_ID[0],
        LEGO_MANUFACTURER_ID[1],
        channel,
    ]);
    debug_assert_eq!(adv.len(), HEADER_LEN);
    adv
}

fn finish(mut adv: Vec<u8>) -> Result<Vec<u8>> {
    if adv.len() > MAX_ADVERTISEMENT_LEN {
        return Err(CodecError::AdvertisementTooLong { len: adv.len() });
    }
    adv[LENGTH_OFFSET] = (adv.len() - 1) as u8;
    Ok(adv)
}
