//! Tiered membership matching.
//!
//! Tiers are tried in order and the first hit wins:
//!
//! 1. the query text equals a stored `original_number`
//! 2. the query's E.164 form matches the E.164 index
//! 3. the query's digits match the stripped index
//!
//! E.164 derivation uses only the current country. Stored records are never
//! re-derived under another country, so a national number blocked while
//! abroad does not match its home-format spelling unless the digits agree.

use super::keys::KeyPrefix;
use super::BlocklistService;
use crate::domain::normalizer::e164_index_key;
use crate::error::Result;
use crate::ports::inbound::{MatchResult, MatchTier, MembershipCheck};
use crate::ports::outbound::KeyValueStore;
use tracing::{debug, warn};

impl BlocklistService {
    /// Membership check that reports which tier matched.
    ///
    /// All index probes run under one read lock, so the answer reflects a
    /// single consistent state of the table.
    pub fn check(&self, number: &str) -> Result<MatchResult> {
        if number.is_empty() {
            self.metrics.record_lookup(None);
            return Ok(MatchResult::miss());
        }

        let result = {
            let store = self.kv_store.read();
            self.probe(store.as_ref(), number)
        };

        match &result {
            Ok(outcome) => {
                self.metrics.record_lookup(outcome.matched_tier);
                debug!(blocked = outcome.blocked, tier = ?outcome.matched_tier, "Membership checked");
            }
            Err(_) => self.metrics.record_lookup_error(),
        }

        result
    }

    fn probe(&self, store: &dyn KeyValueStore, number: &str) -> Result<MatchResult> {
        if store.exists(&KeyPrefix::original_key(number))? {
            return Ok(MatchResult::hit(MatchTier::OriginalNumber));
        }

        let normalized = self.normalizer.normalize(number);

        if let Some(e164) = &normalized.e164 {
            let prefix = KeyPrefix::E164.index_prefix(&e164_index_key(e164));
            if !store.prefix_scan(&prefix)?.is_empty() {
                return Ok(MatchResult::hit(MatchTier::E164Number));
            }
        }

        if !normalized.stripped.is_empty() {
            let prefix = KeyPrefix::Stripped.index_prefix(&normalized.stripped);
            if !store.prefix_scan(&prefix)?.is_empty() {
                return Ok(MatchResult::hit(MatchTier::StrippedNumber));
            }
        }

        Ok(MatchResult::miss())
    }
}

impl MembershipCheck for BlocklistService {
    fn is_blocked(&self, number: &str) -> bool {
        match self.check(number) {
            Ok(result) => result.blocked,
            Err(e) => {
                warn!(error = %e, "Membership check failed, treating number as not blocked");
                false
            }
        }
    }
}
