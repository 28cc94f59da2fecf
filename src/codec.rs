//! Leaf-value binary codec: the primitive Avro wire types.
//!
//! Grounded in the teacher's `util.rs` (`integer_encoding` for zig-zag
//! varints, used here for both `int` and `long`) and `codec.rs`'s CRC32
//! helper, with exact zig-zag semantics and little-endian float/double
//! layout cross-checked against `avro/io.py`'s `BinaryEncoder`/`BinaryDecoder`.

use crate::error::AvroError;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use integer_encoding::{VarIntReader, VarIntWriter};
use std::io::{Read, Write};
use std::str;

/// Decodes primitive Avro values from any `Read` source.
pub struct Decoder<R> {
    inner: R,
}

impl<R: Read> Decoder<R> {
    /// Wraps `inner` as a source of Avro-encoded primitives.
    pub fn new(inner: R) -> Self {
        Decoder { inner }
    }

    /// Unwraps this decoder, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Reads an Avro `null` (a no-op; `null` occupies zero bytes).
    pub fn read_null(&mut self) -> Result<(), AvroError> {
        Ok(())
    }

    /// Reads a single byte, requiring it to be exactly `0x00` or `0x01`.
    pub fn read_boolean(&mut self) -> Result<bool, AvroError> {
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf).map_err(AvroError::DecodeFailed)?;
        match buf[0] {
            0x00 => Ok(false),
            0x01 => Ok(true),
            other => Err(AvroError::Encoding(format!(
                "boolean must be encoded as 0x00 or 0x01, found {:#04x}",
                other
            ))),
        }
    }

    /// Reads a zig-zag varint-encoded 32-bit `int`.
    pub fn read_int(&mut self) -> Result<i32, AvroError> {
        self.inner.read_varint().map_err(AvroError::DecodeFailed)
    }

    /// Reads a zig-zag varint-encoded 64-bit `long`.
    pub fn read_long(&mut self) -> Result<i64, AvroError> {
        self.inner.read_varint().map_err(AvroError::DecodeFailed)
    }

    /// Reads a little-endian IEEE-754 32-bit `float`.
    pub fn read_float(&mut self) -> Result<f32, AvroError> {
        self.inner
            .read_f32::<LittleEndian>()
            .map_err(AvroError::DecodeFailed)
    }

    /// Reads a little-endian IEEE-754 64-bit `double`.
    pub fn read_double(&mut self) -> Result<f64, AvroError> {
        self.inner
            .read_f64::<LittleEndian>()
            .map_err(AvroError::DecodeFailed)
    }

    /// Reads a `long`-prefixed length, then that many raw bytes.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>, AvroError> {
        let len = self.read_long()?;
        if len < 0 {
            return Err(AvroError::Encoding(format!(
                "negative byte-string length: {}",
                len
            )));
        }
        let mut buf = vec![0u8; len as usize];
        self.inner.read_exact(&mut buf).map_err(AvroError::DecodeFailed)?;
        Ok(buf)
    }

    /// Reads a length-prefixed byte string and validates it as UTF-8.
    pub fn read_utf8(&mut self) -> Result<String, AvroError> {
        let buf = self.read_bytes()?;
        String::from_utf8(buf)
            .map_err(|e| AvroError::Encoding(format!("invalid utf-8 in string: {}", e)))
    }

    /// Reads exactly `size` raw bytes, with no length prefix.
    pub fn read_fixed(&mut self, size: usize) -> Result<Vec<u8>, AvroError> {
        let mut buf = vec![0u8; size];
        self.inner.read_exact(&mut buf).map_err(AvroError::DecodeFailed)?;
        Ok(buf)
    }

    /// Discards `n` bytes. Implemented as read-and-discard: every `Read`
    /// source supports this, so there's no `Seek` bound on `Decoder`. A
    /// caller wrapping a seekable source can always skip faster on its own.
    pub fn skip(&mut self, n: usize) -> Result<(), AvroError> {
        let mut remaining = n;
        let mut buf = [0u8; 4096];
        while remaining > 0 {
            let take = remaining.min(buf.len());
            self.inner
                .read_exact(&mut buf[..take])
                .map_err(AvroError::DecodeFailed)?;
            remaining -= take;
        }
        Ok(())
    }

    /// Skips an Avro `null` (a no-op).
    pub fn skip_null(&mut self) -> Result<(), AvroError> {
        Ok(())
    }

    /// Skips a varint-encoded `long` without returning it.
    pub fn skip_long(&mut self) -> Result<(), AvroError> {
        self.read_long().map(|_| ())
    }

    /// Skips a length-prefixed byte string without returning it.
    pub fn skip_bytes(&mut self) -> Result<(), AvroError> {
        let len = self.read_long()?;
        self.skip(len.max(0) as usize)
    }

    /// Verifies a CRC32 (IEEE) checksum against a buffer. Exposed for callers
    /// that embed this codec in a container-file format of their own.
    pub fn check_crc32(buf: &[u8], expected: u32) -> Result<(), AvroError> {
        let found = crc32(buf);
        if found != expected {
            return Err(AvroError::ChecksumMismatch { found, expected });
        }
        Ok(())
    }
}

/// Encodes primitive Avro values to any `Write` sink.
pub struct Encoder<W> {
    inner: W,
}

impl<W: Write> Encoder<W> {
    /// Wraps `inner` as a sink for Avro-encoded primitives.
    pub fn new(inner: W) -> Self {
        Encoder { inner }
    }

    /// Unwraps this encoder, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Borrows the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Writes an Avro `null` (a no-op; `null` occupies zero bytes).
    pub fn write_null(&mut self) -> Result<(), AvroError> {
        Ok(())
    }

    /// Writes a `boolean` as a single `0x00`/`0x01` byte.
    pub fn write_boolean(&mut self, value: bool) -> Result<(), AvroError> {
        self.inner
            .write_all(&[if value { 0x01 } else { 0x00 }])
            .map_err(AvroError::EncodeFailed)
    }

    /// Writes a 32-bit `int` as a zig-zag varint.
    pub fn write_int(&mut self, value: i32) -> Result<(), AvroError> {
        self.inner
            .write_varint(value)
            .map_err(AvroError::EncodeFailed)
            .map(|_| ())
    }

    /// Writes a 64-bit `long` as a zig-zag varint.
    pub fn write_long(&mut self, value: i64) -> Result<(), AvroError> {
        self.inner
            .write_varint(value)
            .map_err(AvroError::EncodeFailed)
            .map(|_| ())
    }

    /// Writes a 32-bit `float` as little-endian IEEE-754.
    pub fn write_float(&mut self, value: f32) -> Result<(), AvroError> {
        self.inner
            .write_f32::<LittleEndian>(value)
            .map_err(AvroError::EncodeFailed)
    }

    /// Writes a 64-bit `double` as little-endian IEEE-754.
    pub fn write_double(&mut self, value: f64) -> Result<(), AvroError> {
        self.inner
            .write_f64::<LittleEndian>(value)
            .map_err(AvroError::EncodeFailed)
    }

    /// Writes a `long`-prefixed length, then the raw bytes.
    pub fn write_bytes(&mut self, value: &[u8]) -> Result<(), AvroError> {
        self.write_long(value.len() as i64)?;
        self.inner.write_all(value).map_err(AvroError::EncodeFailed)
    }

    /// Writes a UTF-8 string as length-prefixed bytes.
    pub fn write_utf8(&mut self, value: &str) -> Result<(), AvroError> {
        self.write_bytes(value.as_bytes())
    }

    /// Writes raw bytes with no length prefix.
    pub fn write_fixed(&mut self, value: &[u8]) -> Result<(), AvroError> {
        self.inner.write_all(value).map_err(AvroError::EncodeFailed)
    }

    /// Appends a big-endian CRC32 (IEEE) checksum of `buf`, for callers that
    /// embed this codec in a container-file format of their own.
    pub fn write_crc32(&mut self, buf: &[u8]) -> Result<(), AvroError> {
        self.inner
            .write_u32::<byteorder::BigEndian>(crc32(buf))
            .map_err(AvroError::EncodeFailed)
    }
}

fn crc32(buf: &[u8]) -> u32 {
    crc::crc32::checksum_ieee(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_round_trip() {
        let mut buf = Vec::new();
        let mut enc = Encoder::new(&mut buf);
        enc.write_boolean(true).unwrap();
        enc.write_boolean(false).unwrap();

        let mut dec = Decoder::new(buf.as_slice());
        assert!(dec.read_boolean().unwrap());
        assert!(!dec.read_boolean().unwrap());
    }

    #[test]
    fn strict_boolean_decoding_rejects_other_bytes() {
        let mut dec = Decoder::new(&[0x02u8][..]);
        assert!(dec.read_boolean().is_err());
    }

    #[test]
    fn long_zigzag_round_trip() {
        for v in [0i64, -1, 1, -2, i64::MIN, i64::MAX] {
            let mut buf = Vec::new();
            Encoder::new(&mut buf).write_long(v).unwrap();
            let decoded = Decoder::new(buf.as_slice()).read_long().unwrap();
            assert_eq!(decoded, v);
        }
    }

    #[test]
    fn strings_round_trip() {
        let mut buf = Vec::new();
        Encoder::new(&mut buf).write_utf8("hello avro").unwrap();
        let decoded = Decoder::new(buf.as_slice()).read_utf8().unwrap();
        assert_eq!(decoded, "hello avro");
    }

    #[test]
    fn float_and_double_are_little_endian() {
        let mut buf = Vec::new();
        let mut enc = Encoder::new(&mut buf);
        enc.write_float(1.5f32).unwrap();
        enc.write_double(2.5f64).unwrap();

        let mut dec = Decoder::new(buf.as_slice());
        assert_eq!(dec.read_float().unwrap(), 1.5f32);
        assert_eq!(dec.read_double().unwrap(), 2.5f64);
    }

    #[test]
    fn crc_mismatch_is_detected() {
        let buf = b"some bytes";
        let good = crc32(buf);
        assert!(Decoder::<&[u8]>::check_crc32(buf, good).is_ok());
        assert!(Decoder::<&[u8]>::check_crc32(buf, good.wrapping_add(1)).is_err());
    }
}
