//! Camera code → EXIF value translation.
//!
//! Every translator is a pure function. Those that can reject a code take an
//! explicit `strict` flag:
//!
//! - **strict**: a code missing from its table is an error (the file does not
//!   match the firmware these tables describe)
//! - **lenient**: a missing code becomes an empty string, and the tag is left
//!   out of the export
//!
//! Calendar fields ignore the flag: an impossible date means a corrupt file.

mod calendar;
mod exposure;
mod modes;
mod tables;

pub use calendar::{DateKind, calendar};
pub use exposure::{
    BULB_SENTINEL, aperture, exposure_time, focal_length, iso, iso_code, max_aperture_value,
    shutter_speed,
};
pub use modes::{
    FlashTranslation, af_mode, custom_functions, exposure_compensation, film_advance_mode, flash,
    flash_compensation, focus_points, metering_mode, multiple_exposure, shooting_mode,
};

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::EfdError;

/// Look `code` up in `table`.
///
/// A hit returns the entry. A miss is `err(code)` in strict mode and `None`
/// in lenient mode.
pub(crate) fn lookup_or_omit<K, V>(
    table: &HashMap<K, V>,
    code: K,
    strict: bool,
    err: impl FnOnce(K) -> EfdError,
) -> Result<Option<&V>, EfdError>
where
    K: Eq + Hash + Copy,
{
    match table.get(&code) {
        Some(v) => Ok(Some(v)),
        None if strict => Err(err(code)),
        None => {
            log::debug!("Omitting value: code not in table (lenient mode)");
            Ok(None)
        }
    }
}

/// Text from a fixed-width, null-terminated byte slot.
pub fn fixed_text(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_hit_ignores_mode() {
        let table = HashMap::from([(1u8, "one")]);
        for strict in [true, false] {
            let v = lookup_or_omit(&table, 1, strict, EfdError::InvalidAfMode).unwrap();
            assert_eq!(v, Some(&"one"));
        }
    }

    #[test]
    fn lookup_miss_depends_on_mode() {
        let table = HashMap::from([(1u8, "one")]);
        assert!(matches!(
            lookup_or_omit(&table, 9, true, EfdError::InvalidAfMode),
            Err(EfdError::InvalidAfMode(9))
        ));
        assert_eq!(
            lookup_or_omit(&table, 9, false, EfdError::InvalidAfMode).unwrap(),
            None
        );
    }

    #[test]
    fn fixed_text_variants() {
        assert_eq!(fixed_text(b""), "");
        assert_eq!(fixed_text(b"\0abc"), "");
        assert_eq!(fixed_text(b"abc"), "abc");
        assert_eq!(fixed_text(b"abc\0\xFF\xFE"), "abc");
    }
}
