//! Unformatted sequential records.
//!
//! A record is a body framed by two 4-byte byte-count markers:
//!
//! ```text
//! +--------+------------------+--------+
//! | len:u32| body (len bytes) | len:u32|
//! +--------+------------------+--------+
//! ```
//!
//! Both markers must agree. Running out of bytes anywhere inside a record is
//! reported as truncation, a disagreeing trailing marker as a marker mismatch.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use snapshot_common::FormatError;

/// Size of a byte-count marker.
pub const MARKER_LEN: usize = 4;

/// Sequential reader over the records of one file.
#[derive(Debug, Clone)]
pub struct RecordReader {
    buf: Bytes,
    record: usize,
}

impl RecordReader {
    pub fn new(buf: Bytes) -> Self {
        Self { buf, record: 0 }
    }

    /// Zero-based index of the next record to be read.
    pub fn position(&self) -> usize {
        self.record
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Read the next record body.
    pub fn next_record(&mut self) -> Result<Bytes, FormatError> {
        let record = self.record;

        let leading = self.read_marker()?;
        let len = leading as usize;
        if self.buf.remaining() < len {
            return Err(FormatError::Truncated {
                record,
                expected: len,
                found: self.buf.remaining(),
            });
        }
        let body = self.buf.split_to(len);

        let trailing = self.read_marker()?;
        if trailing != leading {
            return Err(FormatError::MarkerMismatch {
                record,
                leading,
                trailing,
            });
        }

        self.record += 1;
        Ok(body)
    }

    /// Read a record holding exactly `count` 32-bit floats.
    pub fn read_f32_exact(&mut self, count: usize) -> Result<Vec<f32>, FormatError> {
        let record = self.record;
        let mut body = self.next_record()?;
        check_metadata_len(record, count, body.len())?;
        Ok((0..count).map(|_| body.get_f32_ne()).collect())
    }

    /// Read a record holding exactly `count` 32-bit integers.
    pub fn read_i32_exact(&mut self, count: usize) -> Result<Vec<i32>, FormatError> {
        let record = self.record;
        let mut body = self.next_record()?;
        check_metadata_len(record, count, body.len())?;
        Ok((0..count).map(|_| body.get_i32_ne()).collect())
    }

    /// Read a record of 32-bit floats of any length.
    pub fn read_f32_record(&mut self) -> Result<Vec<f32>, FormatError> {
        let record = self.record;
        let mut body = self.next_record()?;
        if body.len() % 4 != 0 {
            return Err(FormatError::Misaligned {
                record,
                len: body.len(),
            });
        }
        let count = body.len() / 4;
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(body.get_f32_ne());
        }
        Ok(values)
    }

    fn read_marker(&mut self) -> Result<u32, FormatError> {
        if self.buf.remaining() < MARKER_LEN {
            return Err(FormatError::Truncated {
                record: self.record,
                expected: MARKER_LEN,
                found: self.buf.remaining(),
            });
        }
        Ok(self.buf.get_u32_ne())
    }
}

fn check_metadata_len(record: usize, count: usize, found: usize) -> Result<(), FormatError> {
    let expected = count * 4;
    if found != expected {
        return Err(FormatError::MetadataShape {
            record,
            expected,
            found,
        });
    }
    Ok(())
}

/// Append one record framed by its byte-count markers.
pub fn write_record(out: &mut BytesMut, body: &[u8]) -> Result<(), FormatError> {
    let len = u32::try_from(body.len()).map_err(|_| FormatError::RecordTooLarge { len: body.len() })?;
    out.reserve(body.len() + 2 * MARKER_LEN);
    out.put_u32_ne(len);
    out.put_slice(body);
    out.put_u32_ne(len);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framed(leading: u32, body: &[u8], trailing: u32) -> Bytes {
        let mut out = BytesMut::new();
        out.put_u32_ne(leading);
        out.put_slice(body);
        out.put_u32_ne(trailing);
        out.freeze()
    }

    #[test]
    fn test_read_single_record() {
        let mut reader = RecordReader::new(framed(3, b"abc", 3));
        let body = reader.next_record().unwrap();
        assert_eq!(&body[..], b"abc");
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_empty_input_is_truncated() {
        let mut reader = RecordReader::new(Bytes::new());
        assert_eq!(
            reader.next_record(),
            Err(FormatError::Truncated {
                record: 0,
                expected: 4,
                found: 0
            })
        );
    }

    #[test]
    fn test_short_body_is_truncated() {
        let mut out = BytesMut::new();
        out.put_u32_ne(16);
        out.put_slice(&[0u8; 6]);
        let mut reader = RecordReader::new(out.freeze());
        assert!(matches!(
            reader.next_record(),
            Err(FormatError::Truncated {
                expected: 16,
                found: 6,
                ..
            })
        ));
    }

    #[test]
    fn test_missing_trailing_marker_is_truncated() {
        let mut out = BytesMut::new();
        out.put_u32_ne(2);
        out.put_slice(b"xy");
        let mut reader = RecordReader::new(out.freeze());
        assert!(matches!(
            reader.next_record(),
            Err(FormatError::Truncated { expected: 4, .. })
        ));
    }

    #[test]
    fn test_marker_mismatch() {
        let mut reader = RecordReader::new(framed(4, b"abcd", 5));
        assert_eq!(
            reader.next_record(),
            Err(FormatError::MarkerMismatch {
                record: 0,
                leading: 4,
                trailing: 5
            })
        );
    }

    #[test]
    fn test_metadata_shape_checked() {
        let mut out = BytesMut::new();
        write_record(&mut out, &[0u8; 12]).unwrap();
        let mut reader = RecordReader::new(out.freeze());
        assert_eq!(
            reader.read_f32_exact(2),
            Err(FormatError::MetadataShape {
                record: 0,
                expected: 8,
                found: 12
            })
        );
    }

    #[test]
    fn test_misaligned_float_record() {
        let mut out = BytesMut::new();
        write_record(&mut out, &[0u8; 7]).unwrap();
        let mut reader = RecordReader::new(out.freeze());
        assert_eq!(
            reader.read_f32_record(),
            Err(FormatError::Misaligned { record: 0, len: 7 })
        );
    }

    #[test]
    fn test_write_then_read_sequence() {
        let mut out = BytesMut::new();
        write_record(&mut out, &1.5f32.to_ne_bytes()).unwrap();
        write_record(&mut out, &[]).unwrap();
        let mut reader = RecordReader::new(out.freeze());
        assert_eq!(reader.read_f32_exact(1).unwrap(), vec![1.5]);
        assert_eq!(reader.read_f32_record().unwrap(), Vec::<f32>::new());
        assert_eq!(reader.position(), 2);
    }
}
