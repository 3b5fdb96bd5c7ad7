//! Phone number normalization.
//!
//! Turns raw caller input into the comparison keys used by the blocklist
//! indexes. This is deliberately narrow: it knows enough numbering-plan
//! rules to produce E.164 for the common dialing forms and otherwise gives
//! up, leaving the digits-only key as the fallback.

use super::country::{self, CountryInfo};

/// Shortest E.164 subscriber part accepted after a `+`.
pub const MIN_E164_DIGITS: usize = 7;

/// Longest E.164 number allowed by ITU-T E.164.
pub const MAX_E164_DIGITS: usize = 15;

/// International prefix recognized when no country is known.
const DEFAULT_INTERNATIONAL_PREFIX: &str = "00";

/// Comparison keys derived from one raw input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedNumber {
    /// Every ASCII digit of the input, in order.
    pub stripped: String,
    /// `+<digits>` when the input could be read as a phone number.
    pub e164: Option<String>,
}

/// Derive both comparison keys for `raw`.
pub fn normalize(raw: &str, current_country_iso: Option<&str>) -> NormalizedNumber {
    NormalizedNumber {
        stripped: strip(raw),
        e164: to_e164(raw, current_country_iso),
    }
}

/// Remove every character that is not an ASCII digit.
pub fn strip(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Convert `raw` to E.164 if it looks like a dialable phone number.
///
/// National-format input needs `current_country_iso`; without it (or with
/// an unknown region) only explicitly international input is converted.
pub fn to_e164(raw: &str, current_country_iso: Option<&str>) -> Option<String> {
    let trimmed = raw.trim();
    if !is_dialable(trimmed) {
        return None;
    }

    let digits = strip(trimmed);
    if trimmed.starts_with('+') {
        return international(&digits);
    }

    let country = current_country_iso.and_then(country::lookup);
    let intl_prefix = country
        .map(|c| c.international_prefix)
        .unwrap_or(DEFAULT_INTERNATIONAL_PREFIX);
    if let Some(rest) = digits.strip_prefix(intl_prefix) {
        return international(rest);
    }

    national(&digits, country?)
}

/// Key used to compare an E.164 value against the E.164 index.
///
/// Caller-supplied values are stored verbatim, so punctuation is removed
/// here: `+81-45-111-2222` and `+81451112222` share the key
/// `+81451112222`. A value without a leading `+` keys on its digits alone.
pub fn e164_index_key(value: &str) -> String {
    let digits = strip(value);
    if value.trim_start().starts_with('+') {
        format!("+{digits}")
    } else {
        digits
    }
}

/// Characters allowed in something we are willing to read as a number.
fn is_dialable(trimmed: &str) -> bool {
    let mut saw_digit = false;

    for (i, ch) in trimmed.char_indices() {
        match ch {
            '0'..='9' => saw_digit = true,
            '+' if i == 0 => {}
            '-' | '.' | '(' | ')' | '/' => {}
            c if c.is_whitespace() => {}
            _ => return false,
        }
    }

    saw_digit
}

fn international(digits: &str) -> Option<String> {
    (MIN_E164_DIGITS..=MAX_E164_DIGITS)
        .contains(&digits.len())
        .then(|| format!("+{digits}"))
}

/// The trunk prefix is dropped only when what remains is a valid national
/// number; otherwise the digits are tried as dialed (RU area codes may
/// start with the trunk digit `8`).
fn national(digits: &str, country: &CountryInfo) -> Option<String> {
    let without_trunk = country
        .trunk_prefix
        .and_then(|trunk| digits.strip_prefix(trunk))
        .filter(|rest| is_significant(rest, country));

    let significant = match without_trunk {
        Some(rest) => rest,
        None if is_significant(digits, country) => digits,
        None => return None,
    };

    let e164 = format!("+{}{}", country.calling_code, significant);
    (e164.len() - 1 <= MAX_E164_DIGITS).then_some(e164)
}

/// NANP area codes never start with 0 or 1.
fn is_significant(digits: &str, country: &CountryInfo) -> bool {
    country.national_lengths.contains(&digits.len())
        && !(country.is_nanp() && digits.starts_with(['0', '1']))
}
