//! Frame → tag/value assembly for the metadata writer.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::efd::FrameRecord;
use crate::error::EfdError;
use crate::translate::{self, DateKind};

/// Translated tags for one frame, in export order.
///
/// Only non-empty values are kept: an absent tag means the value was unset
/// or (in lenient mode) not representable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslatedFrame {
    tags: Vec<(&'static str, String)>,
}

impl TranslatedFrame {
    fn push(&mut self, tag: &'static str, value: String) {
        if !value.is_empty() {
            self.tags.push((tag, value));
        }
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.tags.iter().map(|(t, v)| (*t, v.as_str()))
    }

    pub fn tag_names(&self) -> Vec<&'static str> {
        self.tags.iter().map(|(t, _)| *t).collect()
    }
}

impl Serialize for TranslatedFrame {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tags.len()))?;
        for (tag, value) in &self.tags {
            map.serialize_entry(tag, value)?;
        }
        map.end()
    }
}

/// Translate every exportable field of `frame`.
///
/// The first translation error aborts the whole frame.
pub fn assemble(frame: &FrameRecord, strict: bool) -> Result<TranslatedFrame, EfdError> {
    let mut out = TranslatedFrame::default();

    out.push("description", frame.remarks.clone());
    out.push("FNumber", translate::aperture(frame.av, strict)?);
    out.push(
        "MaxApertureValue",
        translate::max_aperture_value(frame.max_aperture, strict)?,
    );
    out.push("FocalLength", translate::focal_length(frame.focal_length));
    out.push(
        "ExposureTime",
        translate::exposure_time(frame.tv, frame.bulb_exposure_time, strict)?,
    );
    out.push(
        "ISO",
        translate::iso(frame.iso_metered, frame.iso_dx, strict)?,
    );
    out.push(
        "ExposureCompensation",
        translate::exposure_compensation(frame.exposure_compensation, strict)?,
    );
    out.push(
        "FlashExposureComp",
        translate::flash_compensation(frame.flash_exposure_compensation, strict)?,
    );

    let flash = translate::flash(frame.flash_mode, strict)?;
    out.push("Flash", flash.fired);
    out.push("FlashMode", flash.mode);

    out.push(
        "MeteringMode",
        translate::metering_mode(frame.metering_mode, strict)?,
    );
    out.push(
        "ShootingMode",
        translate::shooting_mode(frame.shooting_mode, strict)?,
    );
    out.push("AFMode", translate::af_mode(frame.af_mode, strict)?);
    out.push(
        "FilmAdvanceMode",
        translate::film_advance_mode(frame.film_advance_mode, strict)?,
    );
    out.push(
        "MultipleExposure",
        translate::multiple_exposure(frame.multiple_exposure, strict)?,
    );
    out.push(
        "DateTimeOriginal",
        translate::calendar(&frame.capture_date, DateKind::Capture)?,
    );
    out.push(
        "UserComment",
        translate::custom_functions(&frame.custom_functions),
    );
    out.push("FocusPoints", translate::focus_points(frame.focus_points));
    out.push("FrameNumber", frame.frame_number.to_string());
    out.push(
        "BatteryLoadedDate",
        translate::calendar(&frame.battery_loaded_date, DateKind::BatteryLoaded)?,
    );
    out.push(
        "FilmLoadedDate",
        translate::calendar(&frame.film_loaded_date, DateKind::FilmLoaded)?,
    );

    Ok(out)
}
