use super::lookup_or_omit;
use super::tables::{AF, COMPENSATION, FILM_ADVANCE, FLASH, METERING, MULTI_EXPOSURE, SHOOTING};
use crate::efd::CUSTOM_FUNCTION_COUNT;
use crate::error::EfdError;

/// Custom-function slot value meaning "not recorded"
const CUSTOM_FUNCTION_UNSET: u8 = 0xFF;

/// Focus points on the AF sensor
const FOCUS_POINT_COUNT: u32 = 45;

/// Both outputs of one flash-mode code. Empty strings mean "omit".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlashTranslation {
    /// EXIF `Flash` value (fired / mode bits)
    pub fired: String,
    /// Human-readable flash mode
    pub mode: String,
}

pub fn flash(code: u8, strict: bool) -> Result<FlashTranslation, EfdError> {
    let entry = lookup_or_omit(&FLASH, code, strict, EfdError::InvalidFlashMode)?;
    Ok(entry
        .map(|&(fired, mode)| FlashTranslation {
            fired: fired.to_string(),
            mode: mode.to_string(),
        })
        .unwrap_or_default())
}

fn label<K>(
    table: &std::collections::HashMap<K, &'static str>,
    code: K,
    strict: bool,
    err: impl FnOnce(K) -> EfdError,
) -> Result<String, EfdError>
where
    K: Eq + std::hash::Hash + Copy,
{
    Ok(lookup_or_omit(table, code, strict, err)?
        .map(|s| s.to_string())
        .unwrap_or_default())
}

pub fn metering_mode(code: u8, strict: bool) -> Result<String, EfdError> {
    label(&METERING, code, strict, EfdError::InvalidMeteringMode)
}

pub fn shooting_mode(code: u8, strict: bool) -> Result<String, EfdError> {
    label(&SHOOTING, code, strict, EfdError::InvalidShootingMode)
}

pub fn af_mode(code: u8, strict: bool) -> Result<String, EfdError> {
    label(&AF, code, strict, EfdError::InvalidAfMode)
}

pub fn film_advance_mode(code: u8, strict: bool) -> Result<String, EfdError> {
    label(&FILM_ADVANCE, code, strict, EfdError::InvalidFilmAdvanceMode)
}

pub fn multiple_exposure(code: u8, strict: bool) -> Result<String, EfdError> {
    label(&MULTI_EXPOSURE, code, strict, EfdError::InvalidMultipleExposure)
}

/// Exposure compensation, EV × 10 → signed EV string (`-0.7`, `+1`).
pub fn exposure_compensation(code: i32, strict: bool) -> Result<String, EfdError> {
    label(&COMPENSATION, code, strict, EfdError::InvalidExposureCompensation)
}

pub fn flash_compensation(code: i32, strict: bool) -> Result<String, EfdError> {
    label(&COMPENSATION, code, strict, EfdError::InvalidFlashCompensation)
}

/// Active focus points as 1-based indices, e.g. `"1,23"`.
pub fn focus_points(bits: u64) -> String {
    (0..FOCUS_POINT_COUNT)
        .filter(|i| bits & (1u64 << i) != 0)
        .map(|i| (i + 1).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Recorded custom-function settings as `C.Fn 0-1 3-2 …`.
pub fn custom_functions(slots: &[u8; CUSTOM_FUNCTION_COUNT]) -> String {
    let set: Vec<String> = slots
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v != CUSTOM_FUNCTION_UNSET)
        .map(|(i, v)| format!("{i}-{v}"))
        .collect();
    if set.is_empty() {
        String::new()
    } else {
        format!("C.Fn {}", set.join(" "))
    }
}
