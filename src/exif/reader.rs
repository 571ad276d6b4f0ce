use anyhow::{Context, Result};
use nom_exif::*;
use serde::Serialize;
use std::path::Path;

/// Exposure-related EXIF already present in an image.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExifData {
    pub make: Option<String>,
    pub model: Option<String>,
    pub date_time_original: Option<String>,
    pub exposure_time: Option<String>,
    pub f_number: Option<String>,
    pub iso: Option<String>,
    pub focal_length: Option<String>,
    pub description: Option<String>,
    pub user_comment: Option<String>,
}

impl ExifData {
    /// Rows for display, skipping absent values.
    pub fn rows(&self) -> Vec<(&'static str, &str)> {
        [
            ("Make", &self.make),
            ("Model", &self.model),
            ("DateTimeOriginal", &self.date_time_original),
            ("ExposureTime", &self.exposure_time),
            ("FNumber", &self.f_number),
            ("ISO", &self.iso),
            ("FocalLength", &self.focal_length),
            ("ImageDescription", &self.description),
            ("UserComment", &self.user_comment),
        ]
        .into_iter()
        .filter_map(|(tag, value)| value.as_deref().map(|v| (tag, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }
}

/// Read the existing EXIF of an image file.
///
/// Files without EXIF yield an empty [`ExifData`] rather than an error.
pub fn read_exif(path: &Path) -> Result<ExifData> {
    let mut parser = MediaParser::new();
    let ms = MediaSource::file_path(path).context("Failed to open image file")?;

    let iter: ExifIter = match parser.parse(ms) {
        Ok(iter) => iter,
        Err(_) => {
            log::debug!("No EXIF data found in {}", path.display());
            return Ok(ExifData::default());
        }
    };
    let exif: Exif = iter.into();

    Ok(ExifData {
        make: tag_string(&exif, ExifTag::Make),
        model: tag_string(&exif, ExifTag::Model),
        date_time_original: tag_string(&exif, ExifTag::DateTimeOriginal),
        exposure_time: tag_string(&exif, ExifTag::ExposureTime),
        f_number: tag_string(&exif, ExifTag::FNumber),
        iso: tag_string(&exif, ExifTag::ISOSpeedRatings),
        focal_length: tag_string(&exif, ExifTag::FocalLength),
        description: tag_string(&exif, ExifTag::ImageDescription),
        user_comment: tag_string(&exif, ExifTag::UserComment),
    })
}

fn tag_string(exif: &Exif, tag: ExifTag) -> Option<String> {
    exif.get(tag).and_then(entry_to_string)
}

/// Convert an EntryValue to an Option<String>.
fn entry_to_string(val: &EntryValue) -> Option<String> {
    let s = val.to_string();
    let s = s.trim().trim_matches('"').to_string();
    if s.is_empty() { None } else { Some(s) }
}
