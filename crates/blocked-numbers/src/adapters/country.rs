//! Country detector adapters.

use crate::ports::outbound::CountryDetector;
use std::env;

/// Always reports the same region. Used by tests and the `--country` flag.
#[derive(Debug, Clone)]
pub struct FixedCountryDetector {
    iso: String,
}

impl FixedCountryDetector {
    pub fn new(iso: impl Into<String>) -> Self {
        Self {
            iso: iso.into().trim().to_ascii_uppercase(),
        }
    }
}

impl CountryDetector for FixedCountryDetector {
    fn current_country_iso(&self) -> Option<String> {
        Some(self.iso.clone())
    }
}

/// Detection unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCountryDetector;

impl CountryDetector for NoCountryDetector {
    fn current_country_iso(&self) -> Option<String> {
        None
    }
}

/// Reads the region from the process environment on every call.
///
/// Checks `BLOCKLIST_COUNTRY_ISO` first, then the territory part of the
/// locale in `LC_ALL` or `LANG` (`en_US.UTF-8` gives `US`).
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCountryDetector;

impl EnvCountryDetector {
    /// Territory of a POSIX locale string such as `de_DE.UTF-8@euro`.
    pub fn region_from_locale(locale: &str) -> Option<String> {
        let locale = locale.split(['.', '@']).next()?;
        let (_, region) = locale.split_once('_')?;
        (region.len() == 2 && region.bytes().all(|b| b.is_ascii_alphabetic()))
            .then(|| region.to_ascii_uppercase())
    }
}

impl CountryDetector for EnvCountryDetector {
    fn current_country_iso(&self) -> Option<String> {
        if let Ok(iso) = env::var("BLOCKLIST_COUNTRY_ISO") {
            let iso = iso.trim();
            if !iso.is_empty() {
                return Some(iso.to_ascii_uppercase());
            }
        }

        ["LC_ALL", "LANG"]
            .into_iter()
            .filter_map(|var| env::var(var).ok())
            .find_map(|locale| Self::region_from_locale(&locale))
    }
}
