//! Per-frame record (`EFRM`).
//!
//! # Layout (512 bytes)
//!
//! ```text
//! 0x000  8   reserved
//! 0x008  u32 focal length (mm), 0xFFFFFFFF = not recorded
//! 0x00C  u32 max aperture code
//! 0x010  i32 shutter (Tv) code
//! 0x014  u32 bulb exposure time (s)
//! 0x018  u32 aperture (Av) code
//! 0x01C  i32 exposure compensation
//! 0x020  i32 flash exposure compensation
//! 0x024  u32 metered ISO
//! 0x028  u32 DX ISO
//! 0x02C  u8  flash mode          0x02D u8 metering mode
//! 0x02E  u8  shooting mode       0x02F u8 film advance mode
//! 0x030  u8  AF mode             0x031 u8 multiple exposure
//! 0x032  2   reserved
//! 0x034  8   capture date/time
//! 0x03C  8   battery loaded date/time
//! 0x044  8   film loaded date/time
//! 0x04C  u16 frame number
//! 0x04E  2   reserved
//! 0x050  20  custom functions C.Fn-0..C.Fn-19
//! 0x064  u64 focus point bitfield
//! 0x06C  148 reserved
//! 0x100  256 remarks
//! ```

use serde::Serialize;

use super::layout::Layout;
use crate::error::EfdError;

/// Size of a frame record payload
pub const FRAME_RECORD_SIZE: usize = 0x200;

/// Number of custom-function slots recorded per frame
pub const CUSTOM_FUNCTION_COUNT: usize = 20;

/// Date/time block as stored by the camera: unvalidated calendar fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DateTimeFields {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    #[serde(skip)]
    pub reserved: u8,
}

impl DateTimeFields {
    /// Size of the block in bytes
    pub const SIZE: usize = 8;

    pub(crate) fn read(layout: &Layout<'_>, field: &'static str, offset: usize) -> Result<Self, EfdError> {
        Ok(Self {
            year: layout.u16(field, offset)?,
            month: layout.u8(field, offset + 2)?,
            day: layout.u8(field, offset + 3)?,
            hour: layout.u8(field, offset + 4)?,
            minute: layout.u8(field, offset + 5)?,
            second: layout.u8(field, offset + 6)?,
            reserved: layout.u8(field, offset + 7)?,
        })
    }
}

/// Exposure data for one frame, straight from the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameRecord {
    #[serde(skip)]
    pub reserved0: [u8; 8],
    pub focal_length: u32,
    pub max_aperture: u32,
    pub tv: i32,
    pub bulb_exposure_time: u32,
    pub av: u32,
    pub exposure_compensation: i32,
    pub flash_exposure_compensation: i32,
    pub iso_metered: u32,
    pub iso_dx: u32,
    pub flash_mode: u8,
    pub metering_mode: u8,
    pub shooting_mode: u8,
    pub film_advance_mode: u8,
    pub af_mode: u8,
    pub multiple_exposure: u8,
    #[serde(skip)]
    pub reserved1: [u8; 2],
    pub capture_date: DateTimeFields,
    pub battery_loaded_date: DateTimeFields,
    pub film_loaded_date: DateTimeFields,
    pub frame_number: u16,
    #[serde(skip)]
    pub reserved2: [u8; 2],
    pub custom_functions: [u8; CUSTOM_FUNCTION_COUNT],
    pub focus_points: u64,
    #[serde(skip)]
    pub reserved3: [u8; 148],
    pub remarks: String,
}

impl FrameRecord {
    /// Decode an `EFRM` payload.
    pub fn decode(payload: &[u8]) -> Result<Self, EfdError> {
        let l = Layout::new("EFRM", payload);
        Ok(Self {
            reserved0: l.bytes("Reserved0", 0x000)?,
            focal_length: l.u32("FocalLength", 0x008)?,
            max_aperture: l.u32("MaxAperture", 0x00C)?,
            tv: l.i32("Tv", 0x010)?,
            bulb_exposure_time: l.u32("BulbExposureTime", 0x014)?,
            av: l.u32("Av", 0x018)?,
            exposure_compensation: l.i32("ExposureCompensation", 0x01C)?,
            flash_exposure_compensation: l.i32("FlashExposureCompensation", 0x020)?,
            iso_metered: l.u32("IsoM", 0x024)?,
            iso_dx: l.u32("IsoDX", 0x028)?,
            flash_mode: l.u8("FlashMode", 0x02C)?,
            metering_mode: l.u8("MeteringMode", 0x02D)?,
            shooting_mode: l.u8("ShootingMode", 0x02E)?,
            film_advance_mode: l.u8("FilmAdvanceMode", 0x02F)?,
            af_mode: l.u8("AFMode", 0x030)?,
            multiple_exposure: l.u8("MultipleExposure", 0x031)?,
            reserved1: l.bytes("Reserved1", 0x032)?,
            capture_date: DateTimeFields::read(&l, "CaptureDate", 0x034)?,
            battery_loaded_date: DateTimeFields::read(&l, "BatteryLoadedDate", 0x03C)?,
            film_loaded_date: DateTimeFields::read(&l, "FilmLoadedDate", 0x044)?,
            frame_number: l.u16("FrameNumber", 0x04C)?,
            reserved2: l.bytes("Reserved2", 0x04E)?,
            custom_functions: l.bytes("CustomFunctions", 0x050)?,
            focus_points: l.u64("FocusPoints", 0x064)?,
            reserved3: l.bytes("Reserved3", 0x06C)?,
            remarks: l.text("Remarks", 0x100, 256)?,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::FramePayload;
    use super::*;

    #[test]
    fn decodes_fixed_offsets() {
        let mut p = FramePayload::new(17);
        p.u32(0x014, 42)
            .i32(0x01C, -7)
            .i32(0x020, 3)
            .u8(0x02D, 2)
            .u8(0x02E, 4)
            .u8(0x02F, 1)
            .u8(0x030, 1)
            .u8(0x031, 1)
            .u64(0x064, 0b101)
            .remarks(b"backlit portrait");
        p.0[0x050] = 3;
        let frame = p.decode();

        assert_eq!(frame.frame_number, 17);
        assert_eq!(frame.focal_length, 50);
        assert_eq!(frame.max_aperture, 140);
        assert_eq!(frame.tv, -250);
        assert_eq!(frame.bulb_exposure_time, 42);
        assert_eq!(frame.av, 280);
        assert_eq!(frame.exposure_compensation, -7);
        assert_eq!(frame.flash_exposure_compensation, 3);
        assert_eq!(frame.iso_metered, 100);
        assert_eq!(frame.iso_dx, 100);
        assert_eq!(frame.metering_mode, 2);
        assert_eq!(frame.shooting_mode, 4);
        assert_eq!(frame.film_advance_mode, 1);
        assert_eq!(frame.af_mode, 1);
        assert_eq!(frame.multiple_exposure, 1);
        assert_eq!(frame.custom_functions[0], 3);
        assert_eq!(frame.custom_functions[1], 0xFF);
        assert_eq!(frame.focus_points, 0b101);
        assert_eq!(frame.remarks, "backlit portrait");
        assert_eq!(
            frame.capture_date,
            DateTimeFields {
                year: 2003,
                month: 6,
                day: 14,
                hour: 15,
                minute: 42,
                second: 7,
                reserved: 0,
            }
        );
        assert_eq!(frame.film_loaded_date.minute, 5);
        assert_eq!(frame.battery_loaded_date.month, 1);
    }

    #[test]
    fn reserved_bytes_are_preserved() {
        let mut p = FramePayload::new(1);
        p.u8(0x000, 0xAB).u8(0x033, 0xCD).u8(0x06C + 147, 0xEF);
        let frame = p.decode();
        assert_eq!(frame.reserved0[0], 0xAB);
        assert_eq!(frame.reserved1[1], 0xCD);
        assert_eq!(frame.reserved3[147], 0xEF);
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut p = FramePayload::new(5);
        p.0.extend_from_slice(&[0x55; 64]);
        assert_eq!(p.decode().frame_number, 5);
    }

    #[test]
    fn short_payload_fails_on_first_missing_field() {
        let p = FramePayload::new(1);
        let err = FrameRecord::decode(&p.0[..0x100]).unwrap_err();
        assert!(matches!(
            err,
            EfdError::PayloadTooShort {
                record: "EFRM",
                field: "Remarks",
                offset: 0x100,
                ..
            }
        ));
    }

    #[test]
    fn remarks_drop_bytes_after_terminator() {
        let mut p = FramePayload::new(1);
        p.remarks(b"ok\0\x07\x08hidden");
        assert_eq!(p.decode().remarks, "ok");
    }
}
