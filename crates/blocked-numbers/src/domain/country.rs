//! Calling-code metadata per ISO 3166-1 region.
//!
//! Only what the normalizer needs: calling code, international dialing
//! prefix, trunk prefix and the length range of national significant
//! numbers.

use std::ops::RangeInclusive;

/// Dialing rules for one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryInfo {
    /// Upper-case ISO 3166-1 alpha-2 code.
    pub iso: &'static str,
    /// Country calling code without the `+`.
    pub calling_code: &'static str,
    /// Prefix dialed before a calling code for international calls.
    pub international_prefix: &'static str,
    /// National trunk prefix, if the region uses one.
    pub trunk_prefix: Option<&'static str>,
    /// Allowed length of the national significant number.
    pub national_lengths: RangeInclusive<usize>,
}

impl CountryInfo {
    /// Whether the region belongs to the North American Numbering Plan.
    pub fn is_nanp(&self) -> bool {
        self.calling_code == "1"
    }
}

const fn nanp(iso: &'static str) -> CountryInfo {
    CountryInfo {
        iso,
        calling_code: "1",
        international_prefix: "011",
        trunk_prefix: Some("1"),
        national_lengths: 10..=10,
    }
}

const fn region(
    iso: &'static str,
    calling_code: &'static str,
    international_prefix: &'static str,
    trunk_prefix: Option<&'static str>,
    national_lengths: RangeInclusive<usize>,
) -> CountryInfo {
    CountryInfo {
        iso,
        calling_code,
        international_prefix,
        trunk_prefix,
        national_lengths,
    }
}

static COUNTRIES: [CountryInfo; 30] = [
    nanp("US"),
    nanp("CA"),
    nanp("PR"),
    region("GB", "44", "00", Some("0"), 9..=10),
    region("IE", "353", "00", Some("0"), 7..=9),
    region("FR", "33", "00", Some("0"), 9..=9),
    region("DE", "49", "00", Some("0"), 6..=13),
    region("NL", "31", "00", Some("0"), 9..=9),
    region("BE", "32", "00", Some("0"), 8..=9),
    region("CH", "41", "00", Some("0"), 9..=9),
    region("AT", "43", "00", Some("0"), 4..=13),
    region("SE", "46", "00", Some("0"), 7..=9),
    region("PL", "48", "00", None, 9..=9),
    region("IT", "39", "00", None, 6..=11),
    region("ES", "34", "00", None, 9..=9),
    region("PT", "351", "00", None, 9..=9),
    region("RU", "7", "810", Some("8"), 10..=10),
    region("TR", "90", "00", Some("0"), 10..=10),
    region("IL", "972", "00", Some("0"), 8..=9),
    region("IN", "91", "00", Some("0"), 10..=10),
    region("CN", "86", "00", Some("0"), 9..=11),
    region("JP", "81", "010", Some("0"), 9..=10),
    region("KR", "82", "001", Some("0"), 8..=10),
    region("SG", "65", "000", None, 8..=8),
    region("AU", "61", "0011", Some("0"), 9..=9),
    region("NZ", "64", "00", Some("0"), 8..=10),
    region("BR", "55", "00", Some("0"), 10..=11),
    region("MX", "52", "00", None, 10..=10),
    region("AR", "54", "00", Some("0"), 10..=10),
    region("ZA", "27", "00", Some("0"), 9..=9),
];

/// Look up a region by ISO code, ignoring ASCII case and surrounding
/// whitespace.
pub fn lookup(iso: &str) -> Option<&'static CountryInfo> {
    let iso = iso.trim();
    COUNTRIES
        .iter()
        .find(|info| info.iso.eq_ignore_ascii_case(iso))
}

/// Whether `iso` names a region in the table.
pub fn is_known(iso: &str) -> bool {
    lookup(iso).is_some()
}
