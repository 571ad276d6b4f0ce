//! Tagged record framing.
//!
//! An EFD file is nothing but a run of self-describing records:
//!
//! ```text
//! Bytes 0-3:  Tag (ASCII, e.g. "EFDF")
//! Bytes 4-11: Payload length (u64, little-endian)
//! Bytes 12-:  Payload (exactly `length` bytes)
//! ```
//!
//! There is no file header or trailer. The stream must end on a record
//! boundary; anything else is a truncated file.

use std::fmt;
use std::io::{ErrorKind, Read};

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;

use crate::error::EfdError;

/// Size of the tag + length header in front of every payload
pub const RECORD_HEADER_SIZE: usize = 12;

/// Largest payload length accepted before the length is treated as garbage.
///
/// Real records are a few hundred bytes; 16 MiB leaves room for any future
/// record kind while still rejecting a tag misread as a length.
pub const MAX_RECORD_LENGTH: u64 = 16 * 1024 * 1024;

/// Four-byte record identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    /// Roll metadata
    pub const ROLL: Tag = Tag(*b"EFDF");
    /// Frame metadata
    pub const FRAME: Tag = Tag(*b"EFRM");
    /// Thumbnail descriptor
    pub const THUMBNAIL: Tag = Tag(*b"EFTP");
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02X}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({self})")
    }
}

impl Serialize for Tag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One framed record, consumed straight into a typed decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub tag: Tag,
    /// Stream offset of the record header
    pub offset: u64,
    pub payload: Vec<u8>,
}

impl RawRecord {
    /// Declared payload length.
    pub fn len(&self) -> u64 {
        self.payload.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Lazy iterator over the records of a byte stream.
///
/// Yields `Ok(record)` until the stream ends cleanly on a record boundary.
/// After the first error the iterator is exhausted.
pub struct RecordReader<R> {
    inner: R,
    position: u64,
    done: bool,
}

impl<R: Read> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            position: 0,
            done: false,
        }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Fill `buf` as far as the stream allows; returns the byte count read.
    fn read_full(&mut self, buf: &mut [u8]) -> Result<usize, EfdError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(EfdError::Io(e)),
            }
        }
        self.position += filled as u64;
        Ok(filled)
    }

    fn next_record(&mut self) -> Result<Option<RawRecord>, EfdError> {
        let offset = self.position;

        let mut header = [0u8; RECORD_HEADER_SIZE];
        let got = self.read_full(&mut header)?;
        if got == 0 {
            return Ok(None);
        }
        if got < RECORD_HEADER_SIZE {
            return Err(EfdError::TruncatedStream {
                offset,
                expected: RECORD_HEADER_SIZE as u64,
                actual: got as u64,
            });
        }

        let tag = Tag([header[0], header[1], header[2], header[3]]);
        let length = LittleEndian::read_u64(&header[4..12]);
        if length > MAX_RECORD_LENGTH {
            return Err(EfdError::MalformedLength {
                tag,
                length,
                max: MAX_RECORD_LENGTH,
            });
        }

        let mut payload = vec![0u8; length as usize];
        let got = self.read_full(&mut payload)?;
        if (got as u64) < length {
            return Err(EfdError::TruncatedStream {
                offset,
                expected: length,
                actual: got as u64,
            });
        }

        Ok(Some(RawRecord {
            tag,
            offset,
            payload,
        }))
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<RawRecord, EfdError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn encode_record(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(RECORD_HEADER_SIZE + payload.len());
    bytes.extend_from_slice(tag);
    bytes.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    bytes.extend_from_slice(payload);
    bytes
}
