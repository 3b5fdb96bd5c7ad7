//! Integration tests and shared fixtures.

pub mod concurrency;
pub mod membership;
pub mod notifications;
pub mod provider_contract;

use std::sync::Arc;

use blocked_numbers::{BlocklistProvider, BlocklistService, FieldValues, FixedCountryDetector};
use blocklist_bus::ChangeNotifier;

/// Provider over an in-memory store with a fixed country.
pub fn provider_for(country: &str) -> (BlocklistProvider, Arc<ChangeNotifier>) {
    let notifier = Arc::new(ChangeNotifier::new());
    let service = BlocklistService::in_memory(
        Arc::new(FixedCountryDetector::new(country)),
        notifier.clone(),
    );
    (BlocklistProvider::new(Arc::new(service)), notifier)
}

/// Field map with only `original_number` set.
pub fn number(original: &str) -> FieldValues {
    FieldValues::new().with("original_number", original)
}
