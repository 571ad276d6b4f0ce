use chrono::NaiveDate;

use crate::efd::DateTimeFields;
use crate::error::EfdError;

/// Which of the recorded timestamps is being translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    Capture,
    BatteryLoaded,
    FilmLoaded,
}

impl DateKind {
    fn error(self, detail: String) -> EfdError {
        match self {
            DateKind::Capture => EfdError::InvalidCaptureDate(detail),
            DateKind::BatteryLoaded => EfdError::InvalidBatteryLoadedDate(detail),
            DateKind::FilmLoaded => EfdError::InvalidFilmLoadedDate(detail),
        }
    }
}

/// Calendar fields → `YYYY-MM-DD HH:MM:SS`.
///
/// Fails for any impossible date or time, in both strict and lenient mode.
pub fn calendar(fields: &DateTimeFields, kind: DateKind) -> Result<String, EfdError> {
    let raw = format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        fields.year, fields.month, fields.day, fields.hour, fields.minute, fields.second
    );

    let dt = NaiveDate::from_ymd_opt(
        i32::from(fields.year),
        u32::from(fields.month),
        u32::from(fields.day),
    )
    .and_then(|d| {
        d.and_hms_opt(
            u32::from(fields.hour),
            u32::from(fields.minute),
            u32::from(fields.second),
        )
    })
    .ok_or_else(|| kind.error(raw))?;

    Ok(dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> DateTimeFields {
        DateTimeFields {
            year,
            month,
            day,
            hour,
            minute,
            second,
            reserved: 0,
        }
    }

    #[test]
    fn formats_valid_date() {
        assert_eq!(
            calendar(&fields(2003, 6, 4, 9, 5, 7), DateKind::Capture).unwrap(),
            "2003-06-04 09:05:07"
        );
    }

    #[test]
    fn leap_day() {
        assert!(calendar(&fields(2004, 2, 29, 0, 0, 0), DateKind::Capture).is_ok());
        assert!(matches!(
            calendar(&fields(2003, 2, 29, 0, 0, 0), DateKind::Capture),
            Err(EfdError::InvalidCaptureDate(_))
        ));
        assert!(calendar(&fields(2000, 2, 29, 0, 0, 0), DateKind::Capture).is_ok());
        assert!(calendar(&fields(1900, 2, 29, 0, 0, 0), DateKind::Capture).is_err());
    }

    #[test]
    fn month_thirteen_fails_for_every_kind() {
        let bad = fields(2003, 13, 1, 0, 0, 0);
        assert!(matches!(
            calendar(&bad, DateKind::Capture),
            Err(EfdError::InvalidCaptureDate(ref s)) if s == "2003-13-01 00:00:00"
        ));
        assert!(matches!(
            calendar(&bad, DateKind::BatteryLoaded),
            Err(EfdError::InvalidBatteryLoadedDate(_))
        ));
        assert!(matches!(
            calendar(&bad, DateKind::FilmLoaded),
            Err(EfdError::InvalidFilmLoadedDate(_))
        ));
    }

    #[test]
    fn time_out_of_range() {
        assert!(calendar(&fields(2003, 1, 1, 24, 0, 0), DateKind::Capture).is_err());
        assert!(calendar(&fields(2003, 1, 1, 23, 60, 0), DateKind::Capture).is_err());
        assert!(calendar(&fields(2003, 1, 1, 23, 59, 60), DateKind::Capture).is_err());
        assert!(calendar(&fields(2003, 4, 31, 12, 0, 0), DateKind::Capture).is_err());
    }

    #[test]
    fn all_zero_is_invalid() {
        assert!(calendar(&DateTimeFields::default(), DateKind::BatteryLoaded).is_err());
    }
}
