use crate::domain::country;
use crate::domain::normalizer::{self, NormalizedNumber};
use crate::ports::outbound::CountryDetector;
use std::sync::Arc;

/// Normalizer bound to a country detector.
///
/// Asks the detector for the current region on every call, falling back to
/// the configured region when the detector reports nothing usable.
#[derive(Clone)]
pub struct Normalizer {
    detector: Arc<dyn CountryDetector>,
    fallback_country: Option<String>,
}

impl Normalizer {
    pub fn new(detector: Arc<dyn CountryDetector>) -> Self {
        Self {
            detector,
            fallback_country: None,
        }
    }

    pub fn with_fallback_country(mut self, iso: Option<String>) -> Self {
        self.fallback_country = iso.map(|iso| iso.trim().to_ascii_uppercase());
        self
    }

    /// Region used for national-format input, if any.
    pub fn current_country(&self) -> Option<String> {
        self.detector
            .current_country_iso()
            .filter(|iso| country::is_known(iso))
            .map(|iso| iso.trim().to_ascii_uppercase())
            .or_else(|| self.fallback_country.clone())
    }

    pub fn normalize(&self, raw: &str) -> NormalizedNumber {
        let country = self.current_country();
        normalizer::normalize(raw, country.as_deref())
    }
}
