//! Code tables, built once on first use and never mutated.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Aperture codes are the f-number × 100.
const APERTURE_CODES: &[(u32, &str)] = &[
    (100, "1.0"),
    (110, "1.1"),
    (120, "1.2"),
    (140, "1.4"),
    (160, "1.6"),
    (170, "1.7"),
    (180, "1.8"),
    (200, "2.0"),
    (220, "2.2"),
    (250, "2.5"),
    (280, "2.8"),
    (320, "3.2"),
    (350, "3.5"),
    (400, "4.0"),
    (450, "4.5"),
    (500, "5.0"),
    (560, "5.6"),
    (630, "6.3"),
    (670, "6.7"),
    (710, "7.1"),
    (800, "8.0"),
    (900, "9.0"),
    (950, "9.5"),
    (1000, "10"),
    (1100, "11"),
    (1300, "13"),
    (1400, "14"),
    (1600, "16"),
    (1800, "18"),
    (1900, "19"),
    (2000, "20"),
    (2200, "22"),
    (2500, "25"),
    (2700, "27"),
    (2900, "29"),
    (3200, "32"),
    (3600, "36"),
    (3800, "38"),
    (4000, "40"),
    (4500, "45"),
    (5100, "51"),
    (5700, "57"),
    (6400, "64"),
    (7200, "72"),
    (8000, "80"),
    (9000, "90"),
    (9100, "91"),
];

/// Positive codes are seconds × 100 and carry the `"` seconds mark;
/// negative codes `-N` are `1/N` s.
const SHUTTER_CODES: &[(i32, &str)] = &[
    (3000, "30\""),
    (2500, "25\""),
    (2000, "20\""),
    (1500, "15\""),
    (1300, "13\""),
    (1000, "10\""),
    (800, "8\""),
    (600, "6\""),
    (500, "5\""),
    (400, "4\""),
    (320, "3.2\""),
    (300, "3\""),
    (250, "2.5\""),
    (200, "2\""),
    (160, "1.6\""),
    (150, "1.5\""),
    (130, "1.3\""),
    (100, "1\""),
    (80, "0.8\""),
    (70, "0.7\""),
    (60, "0.6\""),
    (50, "0.5\""),
    (40, "0.4\""),
    (30, "0.3\""),
    (-4, "1/4"),
    (-5, "1/5"),
    (-6, "1/6"),
    (-8, "1/8"),
    (-10, "1/10"),
    (-13, "1/13"),
    (-15, "1/15"),
    (-20, "1/20"),
    (-25, "1/25"),
    (-30, "1/30"),
    (-40, "1/40"),
    (-45, "1/45"),
    (-50, "1/50"),
    (-60, "1/60"),
    (-80, "1/80"),
    (-90, "1/90"),
    (-100, "1/100"),
    (-125, "1/125"),
    (-160, "1/160"),
    (-180, "1/180"),
    (-200, "1/200"),
    (-250, "1/250"),
    (-320, "1/320"),
    (-350, "1/350"),
    (-400, "1/400"),
    (-500, "1/500"),
    (-640, "1/640"),
    (-750, "1/750"),
    (-800, "1/800"),
    (-1000, "1/1000"),
    (-1250, "1/1250"),
    (-1500, "1/1500"),
    (-1600, "1/1600"),
    (-2000, "1/2000"),
    (-2500, "1/2500"),
    (-3000, "1/3000"),
    (-3200, "1/3200"),
    (-4000, "1/4000"),
    (-5000, "1/5000"),
    (-6000, "1/6000"),
    (-6400, "1/6400"),
    (-8000, "1/8000"),
];

/// Nominal third-stop film speeds.
const ISO_CODES: &[(u32, &str)] = &[
    (6, "6"),
    (8, "8"),
    (10, "10"),
    (12, "12"),
    (16, "16"),
    (20, "20"),
    (25, "25"),
    (32, "32"),
    (40, "40"),
    (50, "50"),
    (64, "64"),
    (80, "80"),
    (100, "100"),
    (125, "125"),
    (160, "160"),
    (200, "200"),
    (250, "250"),
    (320, "320"),
    (400, "400"),
    (500, "500"),
    (640, "640"),
    (800, "800"),
    (1000, "1000"),
    (1250, "1250"),
    (1600, "1600"),
    (2000, "2000"),
    (2500, "2500"),
    (3200, "3200"),
    (4000, "4000"),
    (5000, "5000"),
    (6400, "6400"),
];

/// EV × 10, third and half stops within ±3 EV.
const COMPENSATION_CODES: &[(i32, &str)] = &[
    (-30, "-3"),
    (-27, "-2.7"),
    (-25, "-2.5"),
    (-23, "-2.3"),
    (-20, "-2"),
    (-17, "-1.7"),
    (-15, "-1.5"),
    (-13, "-1.3"),
    (-10, "-1"),
    (-7, "-0.7"),
    (-5, "-0.5"),
    (-3, "-0.3"),
    (0, "0"),
    (3, "+0.3"),
    (5, "+0.5"),
    (7, "+0.7"),
    (10, "+1"),
    (13, "+1.3"),
    (15, "+1.5"),
    (17, "+1.7"),
    (20, "+2"),
    (23, "+2.3"),
    (25, "+2.5"),
    (27, "+2.7"),
    (30, "+3"),
];

/// Flash mode → (EXIF Flash value, description).
const FLASH_MODES: &[(u8, (&str, &str))] = &[
    (0, ("16", "Off")),
    (10, ("9", "Manual flash")),
    (11, ("25", "TTL autoflash")),
    (12, ("25", "A-TTL autoflash")),
    (13, ("25", "E-TTL autoflash")),
    (14, ("25", "E-TTL autoflash, high-speed sync")),
    (15, ("89", "E-TTL autoflash, red-eye reduction")),
];

const METERING_MODES: &[(u8, &str)] = &[
    (0, "Multi-segment"),
    (1, "Partial"),
    (2, "Spot"),
    (3, "Center-weighted average"),
    (4, "Multi-spot"),
];

const SHOOTING_MODES: &[(u8, &str)] = &[
    (0, "Program AE"),
    (1, "Shutter-priority AE"),
    (2, "Aperture-priority AE"),
    (3, "Depth-of-field AE"),
    (4, "Manual"),
    (5, "Bulb"),
];

const AF_MODES: &[(u8, &str)] = &[(0, "One-shot AF"), (1, "AI Servo AF"), (2, "Manual focus")];

const FILM_ADVANCE_MODES: &[(u8, &str)] = &[
    (0, "Single-frame"),
    (1, "Continuous, high speed"),
    (2, "Continuous, low speed"),
    (3, "Self-timer (10 s)"),
    (4, "Self-timer (2 s)"),
];

const MULTIPLE_EXPOSURE: &[(u8, &str)] = &[(0, "Off"), (1, "On")];

fn build<K, V>(entries: &[(K, V)]) -> HashMap<K, V>
where
    K: Copy + Eq + std::hash::Hash,
    V: Copy,
{
    entries.iter().copied().collect()
}

pub(crate) static APERTURE: LazyLock<HashMap<u32, &'static str>> =
    LazyLock::new(|| build(APERTURE_CODES));
pub(crate) static SHUTTER: LazyLock<HashMap<i32, &'static str>> =
    LazyLock::new(|| build(SHUTTER_CODES));
pub(crate) static ISO: LazyLock<HashMap<u32, &'static str>> = LazyLock::new(|| build(ISO_CODES));
pub(crate) static COMPENSATION: LazyLock<HashMap<i32, &'static str>> =
    LazyLock::new(|| build(COMPENSATION_CODES));
pub(crate) static FLASH: LazyLock<HashMap<u8, (&'static str, &'static str)>> =
    LazyLock::new(|| build(FLASH_MODES));
pub(crate) static METERING: LazyLock<HashMap<u8, &'static str>> =
    LazyLock::new(|| build(METERING_MODES));
pub(crate) static SHOOTING: LazyLock<HashMap<u8, &'static str>> =
    LazyLock::new(|| build(SHOOTING_MODES));
pub(crate) static AF: LazyLock<HashMap<u8, &'static str>> = LazyLock::new(|| build(AF_MODES));
pub(crate) static FILM_ADVANCE: LazyLock<HashMap<u8, &'static str>> =
    LazyLock::new(|| build(FILM_ADVANCE_MODES));
pub(crate) static MULTI_EXPOSURE: LazyLock<HashMap<u8, &'static str>> =
    LazyLock::new(|| build(MULTIPLE_EXPOSURE));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_have_no_duplicate_codes() {
        assert_eq!(APERTURE.len(), APERTURE_CODES.len());
        assert_eq!(SHUTTER.len(), SHUTTER_CODES.len());
        assert_eq!(ISO.len(), ISO_CODES.len());
        assert_eq!(COMPENSATION.len(), COMPENSATION_CODES.len());
        assert_eq!(FLASH.len(), FLASH_MODES.len());
    }

    #[test]
    fn unset_codes_are_not_in_value_tables() {
        assert!(!APERTURE.contains_key(&0));
        assert!(!SHUTTER.contains_key(&0));
        assert!(!ISO.contains_key(&0));
        assert!(!ISO.contains_key(&u32::MAX));
    }
}
