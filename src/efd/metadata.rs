//! Roll-level record (`EFDF`).
//!
//! ```text
//! 0x000  8   reserved
//! 0x008  8   film loaded date/time
//! 0x010  u16 frame count
//! 0x012  2   reserved
//! 0x014  u32 DX ISO
//! 0x018  u8  contact sheet: frames in first row
//! 0x019  u8  contact sheet: frames per row
//! 0x01A  6   reserved
//! 0x020  64  title
//! 0x060  256 remarks
//! ```

use serde::Serialize;

use super::frame::DateTimeFields;
use super::layout::Layout;
use crate::error::EfdError;

/// Minimum size of a roll metadata payload
pub const ROLL_METADATA_SIZE: usize = 0x160;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollMetadata {
    #[serde(skip)]
    pub reserved0: [u8; 8],
    pub film_loaded_date: DateTimeFields,
    pub frame_count: u16,
    #[serde(skip)]
    pub reserved1: [u8; 2],
    pub iso_dx: u32,
    pub first_row: u8,
    pub per_row: u8,
    #[serde(skip)]
    pub reserved2: [u8; 6],
    pub title: String,
    pub remarks: String,
}

impl RollMetadata {
    /// Decode an `EFDF` payload.
    pub fn decode(payload: &[u8]) -> Result<Self, EfdError> {
        let l = Layout::new("EFDF", payload);
        Ok(Self {
            reserved0: l.bytes("Reserved0", 0x000)?,
            film_loaded_date: DateTimeFields::read(&l, "FilmLoadedDate", 0x008)?,
            frame_count: l.u16("FrameCount", 0x010)?,
            reserved1: l.bytes("Reserved1", 0x012)?,
            iso_dx: l.u32("IsoDX", 0x014)?,
            first_row: l.u8("FirstRow", 0x018)?,
            per_row: l.u8("PerRow", 0x019)?,
            reserved2: l.bytes("Reserved2", 0x01A)?,
            title: l.text("Title", 0x020, 64)?,
            remarks: l.text("Remarks", 0x060, 256)?,
        })
    }
}

#[cfg(test)]
pub(crate) fn roll_payload(title: &[u8], frame_count: u16) -> Vec<u8> {
    let mut p = vec![0u8; ROLL_METADATA_SIZE];
    p[0x008..0x00A].copy_from_slice(&2003u16.to_le_bytes());
    p[0x00A] = 6;
    p[0x00B] = 14;
    p[0x00C] = 10;
    p[0x00D] = 5;
    p[0x00E] = 30;
    p[0x010..0x012].copy_from_slice(&frame_count.to_le_bytes());
    p[0x014..0x018].copy_from_slice(&400u32.to_le_bytes());
    p[0x018] = 4;
    p[0x019] = 6;
    p[0x020..0x020 + title.len()].copy_from_slice(title);
    p
}
