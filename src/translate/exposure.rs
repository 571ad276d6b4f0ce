use super::lookup_or_omit;
use super::tables::{APERTURE, ISO, SHUTTER};
use crate::error::EfdError;

/// Shutter code recorded for bulb exposures
pub const BULB_SENTINEL: i32 = 0x7F00_0000;

/// Aperture (Av) code → f-number, e.g. `280` → `"2.8"`. `0` is unset.
pub fn aperture(code: u32, strict: bool) -> Result<String, EfdError> {
    aperture_field("FNumber", code, strict)
}

fn aperture_field(field: &'static str, code: u32, strict: bool) -> Result<String, EfdError> {
    if code == 0 {
        return Ok(String::new());
    }
    let value = lookup_or_omit(&APERTURE, code, strict, |code| {
        EfdError::InvalidApertureCode { field, code }
    })?;
    Ok(value.map(|s| s.to_string()).unwrap_or_default())
}

/// Max aperture code → APEX aperture value `2·log2(N)`, one decimal.
pub fn max_aperture_value(code: u32, strict: bool) -> Result<String, EfdError> {
    let fstop = aperture_field("MaxApertureValue", code, strict)?;
    if fstop.is_empty() {
        return Ok(fstop);
    }
    let n = code as f64 / 100.0;
    Ok(format!("{:.1}", 2.0 * n.log2()))
}

/// Shutter (Tv) code → display string (`1/250`, `30"`, `Bulb`).
pub fn shutter_speed(code: i32, strict: bool) -> Result<String, EfdError> {
    if code == 0 {
        return Ok(String::new());
    }
    if code == BULB_SENTINEL {
        return Ok("Bulb".to_string());
    }
    let value = lookup_or_omit(&SHUTTER, code, strict, EfdError::InvalidShutterCode)?;
    Ok(value.map(|s| s.to_string()).unwrap_or_default())
}

/// Shutter code → EXIF exposure time.
///
/// Long exposures lose their seconds mark (`30"` → `30`). In bulb mode the
/// value is the recorded bulb time in seconds, which must be non-zero in
/// strict mode; lenient mode reports a zero bulb time as `"0"`.
pub fn exposure_time(code: i32, bulb_exposure_time: u32, strict: bool) -> Result<String, EfdError> {
    if code == BULB_SENTINEL {
        if bulb_exposure_time == 0 && strict {
            return Err(EfdError::InvalidBulbExposureTime);
        }
        return Ok(bulb_exposure_time.to_string());
    }
    let speed = shutter_speed(code, strict)?;
    Ok(speed.trim_end_matches('"').to_string())
}

/// A single ISO source. `0` and `u32::MAX` mean "not recorded".
pub fn iso_code(field: &'static str, code: u32, strict: bool) -> Result<String, EfdError> {
    if code == 0 || code == u32::MAX {
        return Ok(String::new());
    }
    let value = lookup_or_omit(&ISO, code, strict, |code| EfdError::InvalidIsoCode {
        field,
        code,
    })?;
    Ok(value.map(|s| s.to_string()).unwrap_or_default())
}

/// Film speed: the metered ISO when recorded, otherwise the DX-coded ISO.
pub fn iso(metered: u32, dx: u32, strict: bool) -> Result<String, EfdError> {
    let value = iso_code("IsoM", metered, strict)?;
    if !value.is_empty() {
        return Ok(value);
    }
    iso_code("IsoDX", dx, strict)
}

/// Focal length in mm; `u32::MAX` means no lens data.
pub fn focal_length(mm: u32) -> String {
    if mm == u32::MAX {
        String::new()
    } else {
        mm.to_string()
    }
}
