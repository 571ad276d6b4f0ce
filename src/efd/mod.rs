//! EFD file decoding.
//!
//! An EFD file is a flat sequence of tagged records (see [`record`]). Three
//! record kinds are understood:
//!
//! - `EFDF`: roll metadata, exactly one per file ([`RollMetadata`])
//! - `EFRM`: one per exposed frame ([`FrameRecord`])
//! - `EFTP`: thumbnail descriptors ([`ThumbnailRecord`])
//!
//! Anything else is skipped. [`Roll::decode`] assembles the three into a
//! [`Roll`], which is read-only from then on.

mod frame;
mod layout;
mod metadata;
pub mod record;
mod thumbnail;

pub use frame::{CUSTOM_FUNCTION_COUNT, DateTimeFields, FRAME_RECORD_SIZE, FrameRecord};
pub use metadata::{ROLL_METADATA_SIZE, RollMetadata};
pub use record::{MAX_RECORD_LENGTH, RawRecord, RecordReader, Tag};
pub use thumbnail::{THUMBNAIL_RECORD_SIZE, ThumbnailRecord};

#[cfg(test)]
pub(crate) use frame::fixtures::FramePayload;
#[cfg(test)]
pub(crate) use metadata::roll_payload;

use anyhow::Context;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::EfdError;

/// A fully decoded roll of film.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Roll {
    pub metadata: RollMetadata,
    /// Frames in stream order. Numbers may repeat or skip.
    pub frames: Vec<FrameRecord>,
    pub thumbnails: Vec<ThumbnailRecord>,
}

impl Roll {
    /// Decode every record of `reader` into a roll.
    pub fn decode<R: Read>(reader: R) -> Result<Self, EfdError> {
        let mut metadata = None;
        let mut frames = Vec::new();
        let mut thumbnails = Vec::new();

        for record in RecordReader::new(reader) {
            let record = record?;
            match record.tag {
                Tag::ROLL => {
                    if metadata.is_some() {
                        return Err(EfdError::DuplicateRollMetadata);
                    }
                    metadata = Some(RollMetadata::decode(&record.payload)?);
                }
                Tag::FRAME => frames.push(FrameRecord::decode(&record.payload)?),
                Tag::THUMBNAIL => thumbnails.push(ThumbnailRecord::decode(&record.payload)?),
                other => {
                    log::debug!(
                        "Skipping unknown record {other} at offset {} ({} bytes)",
                        record.offset,
                        record.len()
                    );
                }
            }
        }

        let metadata = metadata.ok_or(EfdError::MissingRollMetadata)?;
        log::debug!(
            "Decoded roll '{}': {} frame(s), {} thumbnail(s)",
            metadata.title,
            frames.len(),
            thumbnails.len()
        );

        Ok(Self {
            metadata,
            frames,
            thumbnails,
        })
    }

    /// Open and decode an EFD file.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open EFD file {}", path.display()))?;
        Self::decode(BufReader::new(file))
            .with_context(|| format!("Failed to decode EFD file {}", path.display()))
    }

    /// Find the single frame numbered `frame_number`.
    ///
    /// Frame numbers are not unique in the format, so a repeated number is
    /// reported rather than resolved to the first match.
    pub fn frame(&self, frame_number: u16) -> Result<&FrameRecord, EfdError> {
        let mut matches = self
            .frames
            .iter()
            .filter(|f| f.frame_number == frame_number);

        let first = matches
            .next()
            .ok_or(EfdError::FrameNumberNotFound(frame_number))?;
        let extra = matches.count();
        if extra > 0 {
            return Err(EfdError::DuplicateFrameNumber {
                frame_number,
                count: extra + 1,
            });
        }
        Ok(first)
    }

    /// Decode every thumbnail bitmap found under `base_dir`.
    ///
    /// Thumbnails that cannot be loaded are logged and left empty. Returns
    /// how many were loaded.
    pub fn load_thumbnails(&mut self, base_dir: &Path) -> usize {
        let mut loaded = 0;
        for thumb in &mut self.thumbnails {
            match thumb.load_bitmap(base_dir) {
                Ok(_) => loaded += 1,
                Err(e) => log::warn!("Thumbnail {}: {e:#}", thumb.index),
            }
        }
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::record::encode_record;
    use super::thumbnail::thumbnail_payload;
    use super::*;
    use std::io::Cursor;

    fn roll_bytes(frame_numbers: &[u16]) -> Vec<u8> {
        let mut bytes = encode_record(b"EFDF", &roll_payload(b"Test roll", frame_numbers.len() as u16));
        for &n in frame_numbers {
            bytes.extend(encode_record(b"EFRM", &FramePayload::new(n).0));
        }
        bytes
    }

    #[test]
    fn decode_collects_all_record_kinds() {
        let mut bytes = roll_bytes(&[3, 1, 2]);
        bytes.extend(encode_record(b"ZZZZ", b"ignored"));
        bytes.extend(encode_record(b"EFTP", &thumbnail_payload(0, 80, 60, b"t0.bmp")));

        let roll = Roll::decode(Cursor::new(bytes)).unwrap();
        assert_eq!(roll.metadata.title, "Test roll");
        let numbers: Vec<u16> = roll.frames.iter().map(|f| f.frame_number).collect();
        assert_eq!(numbers, vec![3, 1, 2]);
        assert_eq!(roll.thumbnails.len(), 1);
        assert_eq!(roll.thumbnails[0].path, "t0.bmp");
    }

    #[test]
    fn decode_is_deterministic() {
        let bytes = roll_bytes(&[1, 2, 3, 4]);
        let a = Roll::decode(Cursor::new(bytes.clone())).unwrap();
        let b = Roll::decode(Cursor::new(bytes)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_roll_metadata() {
        let bytes = encode_record(b"EFRM", &FramePayload::new(1).0);
        assert!(matches!(
            Roll::decode(Cursor::new(bytes)),
            Err(EfdError::MissingRollMetadata)
        ));
    }

    #[test]
    fn duplicate_roll_metadata() {
        let mut bytes = roll_bytes(&[1]);
        bytes.extend(encode_record(b"EFDF", &roll_payload(b"again", 1)));
        assert!(matches!(
            Roll::decode(Cursor::new(bytes)),
            Err(EfdError::DuplicateRollMetadata)
        ));
    }

    #[test]
    fn short_frame_payload_aborts_decode() {
        let mut bytes = roll_bytes(&[]);
        bytes.extend(encode_record(b"EFRM", &[0u8; 16]));
        assert!(matches!(
            Roll::decode(Cursor::new(bytes)),
            Err(EfdError::PayloadTooShort { record: "EFRM", .. })
        ));
    }

    #[test]
    fn frame_lookup_single_match() {
        let roll = Roll::decode(Cursor::new(roll_bytes(&[1, 3]))).unwrap();
        assert_eq!(roll.frame(3).unwrap().frame_number, 3);
    }

    #[test]
    fn frame_lookup_not_found() {
        let roll = Roll::decode(Cursor::new(roll_bytes(&[1, 3]))).unwrap();
        assert!(matches!(roll.frame(2), Err(EfdError::FrameNumberNotFound(2))));
    }

    #[test]
    fn frame_lookup_duplicate() {
        let roll = Roll::decode(Cursor::new(roll_bytes(&[1, 1, 2]))).unwrap();
        assert!(matches!(
            roll.frame(1),
            Err(EfdError::DuplicateFrameNumber {
                frame_number: 1,
                count: 2
            })
        ));
        assert!(roll.frame(2).is_ok());
    }

    #[test]
    fn load_thumbnails_skips_missing_files() {
        let dir = tempfile::TempDir::new().unwrap();
        image::RgbImage::new(2, 2).save(dir.path().join("a.png")).unwrap();

        let mut bytes = roll_bytes(&[1]);
        bytes.extend(encode_record(b"EFTP", &thumbnail_payload(0, 2, 2, b"X:\\a.png")));
        bytes.extend(encode_record(b"EFTP", &thumbnail_payload(1, 2, 2, b"X:\\b.png")));
        let mut roll = Roll::decode(Cursor::new(bytes)).unwrap();

        assert_eq!(roll.load_thumbnails(dir.path()), 1);
        assert!(roll.thumbnails[0].bitmap.is_some());
        assert!(roll.thumbnails[1].bitmap.is_none());
    }

    #[test]
    fn open_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("roll.efd");
        std::fs::write(&path, roll_bytes(&[7])).unwrap();
        let roll = Roll::open(&path).unwrap();
        assert_eq!(roll.frames[0].frame_number, 7);
    }
}
