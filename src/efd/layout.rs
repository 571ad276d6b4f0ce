//! Bounds-checked reads at fixed payload offsets.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::EfdError;
use crate::translate::fixed_text;

/// View over one record payload, labelled for error messages.
pub(crate) struct Layout<'a> {
    record: &'static str,
    payload: &'a [u8],
}

impl<'a> Layout<'a> {
    pub(crate) fn new(record: &'static str, payload: &'a [u8]) -> Self {
        Self { record, payload }
    }

    fn slice(&self, field: &'static str, offset: usize, width: usize) -> Result<&'a [u8], EfdError> {
        let end = offset + width;
        if end > self.payload.len() {
            return Err(EfdError::PayloadTooShort {
                record: self.record,
                field,
                offset,
                required: end,
                actual: self.payload.len(),
            });
        }
        Ok(&self.payload[offset..end])
    }

    pub(crate) fn u8(&self, field: &'static str, offset: usize) -> Result<u8, EfdError> {
        Ok(self.slice(field, offset, 1)?[0])
    }

    pub(crate) fn u16(&self, field: &'static str, offset: usize) -> Result<u16, EfdError> {
        Ok(LittleEndian::read_u16(self.slice(field, offset, 2)?))
    }

    pub(crate) fn u32(&self, field: &'static str, offset: usize) -> Result<u32, EfdError> {
        Ok(LittleEndian::read_u32(self.slice(field, offset, 4)?))
    }

    pub(crate) fn i32(&self, field: &'static str, offset: usize) -> Result<i32, EfdError> {
        Ok(LittleEndian::read_i32(self.slice(field, offset, 4)?))
    }

    pub(crate) fn u64(&self, field: &'static str, offset: usize) -> Result<u64, EfdError> {
        Ok(LittleEndian::read_u64(self.slice(field, offset, 8)?))
    }

    /// Copy `N` raw bytes, used for reserved ranges and byte tables.
    pub(crate) fn bytes<const N: usize>(
        &self,
        field: &'static str,
        offset: usize,
    ) -> Result<[u8; N], EfdError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.slice(field, offset, N)?);
        Ok(out)
    }

    /// Null-terminated text in a fixed-width slot.
    pub(crate) fn text(
        &self,
        field: &'static str,
        offset: usize,
        width: usize,
    ) -> Result<String, EfdError> {
        Ok(fixed_text(self.slice(field, offset, width)?))
    }
}
