use thiserror::Error;

use crate::efd::Tag;

/// Errors raised while decoding an EFD stream or translating its values.
///
/// Structural variants (truncation, bad lengths, short payloads) are always
/// fatal. Code-table variants are only raised in strict mode; lenient mode
/// drops the affected field instead. Date variants are raised in both modes.
#[derive(Debug, Error)]
pub enum EfdError {
    /// Underlying reader failed for a reason other than end of stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stream ended in the middle of a record
    #[error("Truncated stream: record at offset {offset} needs {expected} more bytes, got {actual}")]
    TruncatedStream {
        offset: u64,
        expected: u64,
        actual: u64,
    },

    /// Declared record length is larger than any real record
    #[error("Malformed length for record {tag}: {length} bytes exceeds limit of {max}")]
    MalformedLength { tag: Tag, length: u64, max: u64 },

    /// Payload ends before a fixed-offset field
    #[error(
        "Payload too short for {record}.{field}: needs {required} bytes at offset 0x{offset:03X}, payload has {actual}"
    )]
    PayloadTooShort {
        record: &'static str,
        field: &'static str,
        offset: usize,
        required: usize,
        actual: usize,
    },

    /// File has no roll metadata record
    #[error("Missing roll metadata record (EFDF)")]
    MissingRollMetadata,

    /// File has more than one roll metadata record
    #[error("Duplicate roll metadata record (EFDF)")]
    DuplicateRollMetadata,

    #[error("Invalid aperture code for {field}: {code}")]
    InvalidApertureCode { field: &'static str, code: u32 },

    #[error("Invalid shutter speed code: {0}")]
    InvalidShutterCode(i32),

    /// Bulb shutter with no recorded duration
    #[error("Invalid bulb exposure time: shutter is in bulb mode but exposure time is 0")]
    InvalidBulbExposureTime,

    #[error("Invalid ISO code for {field}: {code}")]
    InvalidIsoCode { field: &'static str, code: u32 },

    #[error("Invalid capture date: {0}")]
    InvalidCaptureDate(String),

    #[error("Invalid battery loaded date: {0}")]
    InvalidBatteryLoadedDate(String),

    #[error("Invalid film loaded date: {0}")]
    InvalidFilmLoadedDate(String),

    #[error("Invalid flash mode: {0}")]
    InvalidFlashMode(u8),

    #[error("Invalid metering mode: {0}")]
    InvalidMeteringMode(u8),

    #[error("Invalid shooting mode: {0}")]
    InvalidShootingMode(u8),

    #[error("Invalid AF mode: {0}")]
    InvalidAfMode(u8),

    #[error("Invalid film advance mode: {0}")]
    InvalidFilmAdvanceMode(u8),

    #[error("Invalid multiple exposure flag: {0}")]
    InvalidMultipleExposure(u8),

    #[error("Invalid exposure compensation: {0}")]
    InvalidExposureCompensation(i32),

    #[error("Invalid flash exposure compensation: {0}")]
    InvalidFlashCompensation(i32),

    /// No frame in the roll carries the requested number
    #[error("Frame number {0} not found")]
    FrameNumberNotFound(u16),

    /// Frame number is used by more than one frame record
    #[error("Duplicate frame number {frame_number}: {count} frames share it")]
    DuplicateFrameNumber { frame_number: u16, count: usize },
}
