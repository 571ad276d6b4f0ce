//! Thumbnail descriptor (`EFTP`) and lazy bitmap loading.
//!
//! The record only names the thumbnail file as it was on the machine that
//! wrote the EFD (often a Windows path). The bitmap is decoded on demand from
//! a directory chosen by the caller.

use anyhow::{Context, Result};
use image::DynamicImage;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::layout::Layout;
use crate::error::EfdError;

/// Minimum size of a thumbnail payload
pub const THUMBNAIL_RECORD_SIZE: usize = 0x10C;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThumbnailRecord {
    pub index: u32,
    pub width: u32,
    pub height: u32,
    pub path: String,
    /// Decoded image, filled by [`ThumbnailRecord::load_bitmap`].
    #[serde(skip)]
    pub bitmap: Option<DynamicImage>,
}

impl ThumbnailRecord {
    /// Decode an `EFTP` payload. The bitmap is left empty.
    pub fn decode(payload: &[u8]) -> Result<Self, EfdError> {
        let l = Layout::new("EFTP", payload);
        Ok(Self {
            index: l.u32("Index", 0x000)?,
            width: l.u32("Width", 0x004)?,
            height: l.u32("Height", 0x008)?,
            path: l.text("Path", 0x00C, 256)?,
            bitmap: None,
        })
    }

    /// File name of the recorded path, whichever separator it uses.
    pub fn file_name(&self) -> Option<&str> {
        self.path
            .rsplit(['\\', '/'])
            .next()
            .filter(|name| !name.is_empty())
    }

    /// Where the thumbnail is expected to live under `base_dir`.
    pub fn resolve_path(&self, base_dir: &Path) -> Option<PathBuf> {
        self.file_name().map(|name| base_dir.join(name))
    }

    /// Decode the thumbnail file and keep the result on the record.
    pub fn load_bitmap(&mut self, base_dir: &Path) -> Result<&DynamicImage> {
        let path = self
            .resolve_path(base_dir)
            .with_context(|| format!("Thumbnail {} has no file path", self.index))?;
        let img = image::open(&path)
            .with_context(|| format!("Failed to decode thumbnail {}", path.display()))?;

        if img.width() != self.width || img.height() != self.height {
            log::debug!(
                "Thumbnail {} is {}x{}, record says {}x{}",
                self.index,
                img.width(),
                img.height(),
                self.width,
                self.height
            );
        }

        Ok(self.bitmap.insert(img))
    }
}

#[cfg(test)]
pub(crate) fn thumbnail_payload(index: u32, width: u32, height: u32, path: &[u8]) -> Vec<u8> {
    let mut p = vec![0u8; THUMBNAIL_RECORD_SIZE];
    p[0..4].copy_from_slice(&index.to_le_bytes());
    p[4..8].copy_from_slice(&width.to_le_bytes());
    p[8..12].copy_from_slice(&height.to_le_bytes());
    p[12..12 + path.len()].copy_from_slice(path);
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    #[test]
    fn decodes_descriptor() {
        let payload = thumbnail_payload(3, 160, 120, b"C:\\EFD\\ROLL01\\T0003.BMP\0junk");
        let thumb = ThumbnailRecord::decode(&payload).unwrap();
        assert_eq!(thumb.index, 3);
        assert_eq!(thumb.width, 160);
        assert_eq!(thumb.height, 120);
        assert_eq!(thumb.path, "C:\\EFD\\ROLL01\\T0003.BMP");
        assert!(thumb.bitmap.is_none());
    }

    #[test]
    fn file_name_handles_both_separators() {
        let win = ThumbnailRecord::decode(&thumbnail_payload(1, 1, 1, b"C:\\a\\b.bmp")).unwrap();
        assert_eq!(win.file_name(), Some("b.bmp"));
        let unix = ThumbnailRecord::decode(&thumbnail_payload(1, 1, 1, b"/x/y/c.png")).unwrap();
        assert_eq!(unix.file_name(), Some("c.png"));
        let empty = ThumbnailRecord::decode(&thumbnail_payload(1, 1, 1, b"")).unwrap();
        assert_eq!(empty.file_name(), None);
    }

    #[test]
    fn load_bitmap_reads_from_base_dir() {
        let dir = TempDir::new().unwrap();
        RgbImage::from_pixel(4, 3, Rgb([200, 10, 10]))
            .save(dir.path().join("t1.png"))
            .unwrap();

        let mut thumb =
            ThumbnailRecord::decode(&thumbnail_payload(1, 4, 3, b"D:\\scans\\t1.png")).unwrap();
        let img = thumb.load_bitmap(dir.path()).unwrap();
        assert_eq!((img.width(), img.height()), (4, 3));
        assert!(thumb.bitmap.is_some());
    }

    #[test]
    fn load_bitmap_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let mut thumb =
            ThumbnailRecord::decode(&thumbnail_payload(1, 4, 3, b"nothere.bmp")).unwrap();
        assert!(thumb.load_bitmap(dir.path()).is_err());
        assert!(thumb.bitmap.is_none());
    }

    #[test]
    fn short_payload_names_path_field() {
        let payload = thumbnail_payload(2, 8, 8, b"t2.bmp");
        let err = ThumbnailRecord::decode(&payload[..THUMBNAIL_RECORD_SIZE - 1]).unwrap_err();
        assert!(matches!(
            err,
            EfdError::PayloadTooShort {
                record: "EFTP",
                field: "Path",
                offset: 0x00C,
                required: THUMBNAIL_RECORD_SIZE,
                ..
            }
        ));

        let err = ThumbnailRecord::decode(&payload[..6]).unwrap_err();
        assert!(matches!(
            err,
            EfdError::PayloadTooShort { field: "Width", actual: 6, .. }
        ));
    }
}
