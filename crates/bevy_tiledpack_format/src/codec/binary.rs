//! Little-endian primitives shared by every record codec.
//!
//! Integers and floats are 4 bytes, booleans 1 byte, strings carry their byte
//! length as a 7-bit variable-length prefix followed by UTF-8.

use std::io::{Read, Write};

use bevy::math::Vec2;

use crate::error::CodecError;
use crate::reference::ExternalReference;

/// Upper bound on capacity reserved up front for a declared element count.
/// Larger collections grow as elements are actually read, so a bogus count
/// fails on end of stream instead of allocating.
pub(crate) const MAX_PREALLOCATION: usize = 1024;

const MAX_LENGTH_PREFIX_BYTES: u32 = 5;

/// Forward-only writer over any [`Write`] sink.
pub struct BinaryWriter<W> {
    inner: W,
}

impl<W: Write> BinaryWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), CodecError> {
        self.inner.write_all(&[value])?;
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<(), CodecError> {
        self.write_u8(u8::from(value))
    }

    pub fn write_i32(&mut self, value: i32) -> Result<(), CodecError> {
        self.inner.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), CodecError> {
        self.inner.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<(), CodecError> {
        self.inner.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn write_vec2(&mut self, value: Vec2) -> Result<(), CodecError> {
        self.write_f32(value.x)?;
        self.write_f32(value.y)
    }

    /// Writes an unsigned model value into an `i32` slot.
    pub fn write_u32_as_i32(&mut self, field: &'static str, value: u32) -> Result<(), CodecError> {
        let value = i32::try_from(value).map_err(|_| {
            CodecError::UnsupportedGeometry(format!("{field} = {value} does not fit in an i32"))
        })?;
        self.write_i32(value)
    }

    /// Writes a collection length as an `i32` count.
    pub fn write_count(&mut self, field: &'static str, count: usize) -> Result<(), CodecError> {
        let count = i32::try_from(count).map_err(|_| {
            CodecError::UnsupportedGeometry(format!("{field} = {count} does not fit in an i32"))
        })?;
        self.write_i32(count)
    }

    pub fn write_str(&mut self, value: &str) -> Result<(), CodecError> {
        let len = u32::try_from(value.len())
            .ok()
            .filter(|len| *len <= i32::MAX as u32)
            .ok_or_else(|| {
                CodecError::UnsupportedGeometry(format!(
                    "string of {} bytes is too long",
                    value.len()
                ))
            })?;
        self.write_length_prefix(len)?;
        self.inner.write_all(value.as_bytes())?;
        Ok(())
    }

    pub fn write_reference(&mut self, reference: &ExternalReference) -> Result<(), CodecError> {
        self.write_str(reference.as_str())
    }

    fn write_length_prefix(&mut self, mut value: u32) -> Result<(), CodecError> {
        while value >= 0x80 {
            self.write_u8((value as u8) | 0x80)?;
            value >>= 7;
        }
        self.write_u8(value as u8)
    }
}

/// Forward-only reader over any [`Read`] source.
///
/// Every read names the field being decoded so a truncated or malformed stream
/// reports where it went wrong.
pub struct BinaryReader<R> {
    inner: R,
}

impl<R: Read> BinaryReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn read_array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], CodecError> {
        let mut buf = [0u8; N];
        self.inner
            .read_exact(&mut buf)
            .map_err(|err| CodecError::from_read(field, err))?;
        Ok(buf)
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, CodecError> {
        let [byte] = self.read_array::<1>(field)?;
        Ok(byte)
    }

    pub fn read_bool(&mut self, field: &'static str) -> Result<bool, CodecError> {
        Ok(self.read_u8(field)? != 0)
    }

    pub fn read_i32(&mut self, field: &'static str) -> Result<i32, CodecError> {
        Ok(i32::from_le_bytes(self.read_array(field)?))
    }

    pub fn read_u32(&mut self, field: &'static str) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.read_array(field)?))
    }

    pub fn read_f32(&mut self, field: &'static str) -> Result<f32, CodecError> {
        Ok(f32::from_le_bytes(self.read_array(field)?))
    }

    pub fn read_vec2(&mut self, field: &'static str) -> Result<Vec2, CodecError> {
        let x = self.read_f32(field)?;
        let y = self.read_f32(field)?;
        Ok(Vec2::new(x, y))
    }

    /// Reads an `i32` slot that must hold a non-negative value.
    pub fn read_non_negative(&mut self, field: &'static str) -> Result<u32, CodecError> {
        let value = self.read_i32(field)?;
        u32::try_from(value)
            .map_err(|_| CodecError::malformed(field, format!("negative value {value}")))
    }

    /// Reads an `i32` element count. Negative counts are rejected before any
    /// allocation happens.
    pub fn read_count(&mut self, field: &'static str) -> Result<usize, CodecError> {
        let count = self.read_i32(field)?;
        usize::try_from(count)
            .map_err(|_| CodecError::malformed(field, format!("negative count {count}")))
    }

    pub fn read_string(&mut self, field: &'static str) -> Result<String, CodecError> {
        let len = self.read_length_prefix(field)?;
        let mut bytes = Vec::with_capacity(len.min(MAX_PREALLOCATION));
        (&mut self.inner)
            .take(len as u64)
            .read_to_end(&mut bytes)
            .map_err(|err| CodecError::from_read(field, err))?;
        if bytes.len() != len {
            return Err(CodecError::malformed(field, "unexpected end of stream"));
        }
        String::from_utf8(bytes).map_err(|err| CodecError::malformed(field, err.to_string()))
    }

    pub fn read_reference(&mut self, field: &'static str) -> Result<ExternalReference, CodecError> {
        let token = self.read_string(field)?;
        if token.is_empty() {
            return Err(CodecError::malformed(field, "empty external reference"));
        }
        Ok(ExternalReference::new(token))
    }

    fn read_length_prefix(&mut self, field: &'static str) -> Result<usize, CodecError> {
        let mut value: u64 = 0;
        for group in 0..MAX_LENGTH_PREFIX_BYTES {
            let byte = self.read_u8(field)?;
            value |= u64::from(byte & 0x7f) << (7 * group);
            if byte & 0x80 == 0 {
                if value > i32::MAX as u64 {
                    return Err(CodecError::malformed(
                        field,
                        format!("string length {value} exceeds i32::MAX"),
                    ));
                }
                return Ok(value as usize);
            }
        }
        Err(CodecError::malformed(
            field,
            "string length prefix is longer than five bytes",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(f: impl FnOnce(&mut BinaryWriter<Vec<u8>>) -> Result<(), CodecError>) -> Vec<u8> {
        let mut writer = BinaryWriter::new(Vec::new());
        f(&mut writer).unwrap();
        writer.into_inner()
    }

    #[test]
    fn test_integers_are_little_endian() {
        let bytes = written(|w| w.write_i32(0x0102_0304));
        assert_eq!(bytes, vec![0x04, 0x03, 0x02, 0x01]);

        let bytes = written(|w| w.write_i32(-1));
        assert_eq!(bytes, vec![0xff; 4]);
    }

    #[test]
    fn test_short_string_has_single_byte_prefix() {
        let bytes = written(|w| w.write_str("abc"));
        assert_eq!(bytes, vec![3, b'a', b'b', b'c']);
    }

    #[test]
    fn test_long_string_prefix_uses_continuation_bits() {
        let text = "x".repeat(300);
        let bytes = written(|w| w.write_str(&text));
        // 300 = 0b10_0101100 -> 0xac 0x02
        assert_eq!(&bytes[..2], &[0xac, 0x02]);
        assert_eq!(bytes.len(), 302);

        let mut reader = BinaryReader::new(bytes.as_slice());
        assert_eq!(reader.read_string("text").unwrap(), text);
    }

    #[test]
    fn test_utf8_string_round_trips() {
        let bytes = written(|w| w.write_str("tuile \u{e9}t\u{e9} \u{1f600}"));
        let mut reader = BinaryReader::new(bytes.as_slice());
        assert_eq!(
            reader.read_string("text").unwrap(),
            "tuile \u{e9}t\u{e9} \u{1f600}"
        );
    }

    #[test]
    fn test_bool_reads_any_nonzero_as_true() {
        let mut reader = BinaryReader::new([0u8, 1, 7].as_slice());
        assert!(!reader.read_bool("flag").unwrap());
        assert!(reader.read_bool("flag").unwrap());
        assert!(reader.read_bool("flag").unwrap());
    }

    #[test]
    fn test_truncated_read_is_malformed_input() {
        let mut reader = BinaryReader::new([1u8, 2].as_slice());
        let err = reader.read_i32("tile width").unwrap_err();
        assert!(matches!(
            err,
            CodecError::MalformedInput {
                field: "tile width",
                ..
            }
        ));
    }

    #[test]
    fn test_truncated_string_body_is_malformed_input() {
        let mut reader = BinaryReader::new([5u8, b'a', b'b'].as_slice());
        assert!(matches!(
            reader.read_string("name"),
            Err(CodecError::MalformedInput { field: "name", .. })
        ));
    }

    #[test]
    fn test_overlong_length_prefix_is_rejected() {
        let mut reader = BinaryReader::new([0xffu8, 0xff, 0xff, 0xff, 0xff, 0x01].as_slice());
        assert!(matches!(
            reader.read_string("name"),
            Err(CodecError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let mut reader = BinaryReader::new([2u8, 0xc3, 0x28].as_slice());
        assert!(matches!(
            reader.read_string("name"),
            Err(CodecError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_negative_count_is_rejected() {
        let bytes = written(|w| w.write_i32(-3));
        let mut reader = BinaryReader::new(bytes.as_slice());
        assert!(matches!(
            reader.read_count("object count"),
            Err(CodecError::MalformedInput {
                field: "object count",
                ..
            })
        ));
    }

    #[test]
    fn test_empty_reference_is_rejected() {
        let bytes = written(|w| w.write_str(""));
        let mut reader = BinaryReader::new(bytes.as_slice());
        assert!(matches!(
            reader.read_reference("texture"),
            Err(CodecError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_oversized_model_value_is_unsupported() {
        let mut writer = BinaryWriter::new(Vec::new());
        assert!(matches!(
            writer.write_u32_as_i32("tile width", u32::MAX),
            Err(CodecError::UnsupportedGeometry(_))
        ));
    }
}
