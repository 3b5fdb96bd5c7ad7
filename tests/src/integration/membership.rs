//! # Membership Matching
//!
//! End-to-end checks of the three match tiers across regions, including
//! the conservative cross-country behaviour: stored records are never
//! re-derived under a different country.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::{number, provider_for};
    use blocked_numbers::{
        BlockedNumberWriter, BlocklistService, CountryDetector, MatchTier, MembershipCheck,
        NewBlockedNumber,
    };
    use blocklist_bus::ChangeNotifier;
    use parking_lot::RwLock;

    /// Detector whose region can change mid-test, like a roaming device.
    struct RoamingDetector {
        iso: RwLock<Option<String>>,
    }

    impl RoamingDetector {
        fn new(iso: &str) -> Self {
            Self {
                iso: RwLock::new(Some(iso.to_string())),
            }
        }

        fn travel_to(&self, iso: &str) {
            *self.iso.write() = Some(iso.to_string());
        }
    }

    impl CountryDetector for RoamingDetector {
        fn current_country_iso(&self) -> Option<String> {
            self.iso.read().clone()
        }
    }

    #[test]
    fn test_empty_query_never_blocked() {
        let (provider, _) = provider_for("US");
        provider.insert("blocked", &number("123")).unwrap();

        assert!(!provider.is_blocked(""));
    }

    #[test]
    fn test_no_substring_matching() {
        let (provider, _) = provider_for("US");
        provider.insert("blocked", &number("123")).unwrap();

        assert!(provider.is_blocked("123"));
        assert!(!provider.is_blocked("1234"));
        assert!(!provider.is_blocked("12"));
        assert!(!provider.is_blocked("0123"));
    }

    #[test]
    fn test_e164_override_matches_punctuated_query() {
        let (provider, _) = provider_for("US");
        provider
            .insert(
                "blocked",
                &number("045-381-1111").with("e164_number", "+81453811111"),
            )
            .unwrap();

        assert!(provider.is_blocked("+81 45 381 1111"));
        assert!(provider.is_blocked("045-381-1111"));
        assert!(provider.is_blocked("045 381 1111"));
    }

    #[test]
    fn test_punctuated_override_is_keyed_by_digits() {
        let (provider, _) = provider_for("US");
        provider
            .insert(
                "blocked",
                &number("045-111-2222").with("e164_number", "+81-45-111-2222"),
            )
            .unwrap();

        assert!(provider.is_blocked("+81451112222"));
        assert!(provider.is_blocked("+81 45 111 2222"));
        assert!(provider.is_blocked("045 111 2222"));
    }

    #[test]
    fn test_us_national_and_international_forms() {
        let (provider, _) = provider_for("US");
        provider.insert("blocked", &number("+1-500-454-1111")).unwrap();
        provider.insert("blocked", &number("1-500-454-2222")).unwrap();

        for query in [
            "500-454 1111",
            "+1 500-454 1111",
            "1 500-454 1111",
            "(500) 454-1111",
            "011 1 500 454 1111",
            "500-454 2222",
            "+1 (500) 454-2222",
        ] {
            assert!(provider.is_blocked(query), "{query}");
        }

        assert!(!provider.is_blocked("500-454 3333"));
    }

    #[test]
    fn test_non_numeric_identifiers_match_verbatim() {
        let (provider, _) = provider_for("US");
        provider.insert("blocked", &number("abc.def@gmail.com")).unwrap();

        assert!(provider.is_blocked("abc.def@gmail.com"));
        assert!(!provider.is_blocked("abcdef@gmail.com"));
        assert!(!provider.is_blocked("abc.def@gmail.co"));
        assert!(!provider.is_blocked("bc.def@gmail.com"));
        assert!(!provider.is_blocked("ABC.DEF@gmail.com"));
    }

    #[test]
    fn test_national_forms_under_other_regions() {
        let (gb, _) = provider_for("GB");
        gb.insert("blocked", &number("+44 20 7946 0018")).unwrap();
        assert!(gb.is_blocked("020 7946 0018"));
        assert!(gb.is_blocked("00 44 20 7946 0018"));

        let (jp, _) = provider_for("JP");
        jp.insert("blocked", &number("045-111-2222")).unwrap();
        assert!(jp.is_blocked("+81 45 111 2222"));
        assert!(jp.is_blocked("010 81 45 111 2222"));
    }

    #[test]
    fn test_record_blocked_abroad_is_not_rederived() {
        let detector = Arc::new(RoamingDetector::new("JP"));
        let service = BlocklistService::in_memory(detector.clone(), Arc::new(ChangeNotifier::new()));

        // Blocked in Japan: stored E.164 is +81451112222.
        service.insert(NewBlockedNumber::new("045-111-2222")).unwrap();
        assert_eq!(
            service.check("+81 45 111 2222").unwrap().matched_tier,
            Some(MatchTier::E164Number)
        );

        detector.travel_to("US");

        // The international form still matches through the E.164 index.
        assert!(service.is_blocked("+81-45-111-2222"));
        // The national spelling matches only because the digits agree.
        assert_eq!(
            service.check("045 111 2222").unwrap().matched_tier,
            Some(MatchTier::StrippedNumber)
        );
        // Dropping the trunk prefix no longer matches anything.
        assert!(!service.is_blocked("45 111 2222"));
    }

    #[test]
    fn test_tier_order() {
        let (provider, _) = provider_for("US");
        provider.insert("blocked", &number("+1-500-454-1111")).unwrap();
        let service = provider.service();

        assert_eq!(
            service.check("+1-500-454-1111").unwrap().matched_tier,
            Some(MatchTier::OriginalNumber)
        );
        assert_eq!(
            service.check("500 454 1111").unwrap().matched_tier,
            Some(MatchTier::E164Number)
        );
        assert_eq!(
            service.check("+15004541111").unwrap().matched_tier,
            Some(MatchTier::E164Number)
        );

        let metrics = service.metrics().snapshot();
        assert_eq!(metrics.lookups, 3);
        assert_eq!(metrics.hits_original, 1);
        assert_eq!(metrics.hits_e164, 2);
    }
}
