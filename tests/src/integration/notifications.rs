//! # Change Notifications
//!
//! Observers registered on the notifier hear about every row-changing
//! mutation exactly once, after the change is visible, and never about
//! reads, rejected writes or no-op deletes.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    use super::super::{number, provider_for};
    use blocked_numbers::{BlocklistProvider, BlocklistService, FixedCountryDetector};
    use blocklist_bus::{ChangeEvent, ChangeNotifier, ChangePublisher, SubscriptionError};

    #[test]
    fn test_each_observer_hears_each_mutation_once() {
        let (provider, notifier) = provider_for("US");
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();

        let resource = provider.insert("blocked", &number("123")).unwrap();
        assert_eq!(first.drain(), 1);
        assert_eq!(second.drain(), 1);

        provider.delete(&resource.to_string(), None, &[]).unwrap();
        assert_eq!(first.drain(), 1);
        assert_eq!(second.drain(), 1);

        assert_eq!(notifier.notifications_sent(), 2);
    }

    #[test]
    fn test_silent_operations() {
        let (provider, notifier) = provider_for("US");
        provider.insert("blocked", &number("123")).unwrap();
        let mut sub = notifier.subscribe();

        let _ = provider.insert("blocked", &number("123"));
        let _ = provider.insert("blocked", &number(""));
        let _ = provider.update("blocked", &number("456"), None, &[]);
        let _ = provider.delete("blocked", Some("; DROP TABLE blocked"), &[]);
        provider
            .delete("blocked", Some("original_number = ?"), &["999"])
            .unwrap();
        provider.delete("blocked/42", None, &[]).unwrap();
        provider.is_blocked("123");
        provider.query("blocked", None, &[]).unwrap();

        assert_eq!(sub.try_recv(), Ok(None));
    }

    #[test]
    fn test_unsubscribed_observer_hears_nothing() {
        let (provider, notifier) = provider_for("US");
        let mut kept = notifier.subscribe();
        let mut removed = notifier.subscribe();

        assert!(notifier.unsubscribe(removed.id()));
        provider.insert("blocked", &number("123")).unwrap();

        assert_eq!(kept.try_recv(), Ok(Some(ChangeEvent::RecordsChanged)));
        assert_eq!(removed.try_recv(), Err(SubscriptionError::Closed));
    }

    #[test]
    fn test_dropped_subscription_is_pruned() {
        let (provider, notifier) = provider_for("US");
        let sub = notifier.subscribe();
        assert_eq!(notifier.observer_count(), 1);

        drop(sub);
        assert_eq!(notifier.observer_count(), 0);

        provider.insert("blocked", &number("123")).unwrap();
        assert_eq!(notifier.notifications_sent(), 1);
    }

    #[test]
    fn test_slow_observer_coalesces_without_blocking_writers() {
        let notifier = Arc::new(ChangeNotifier::with_capacity(1));
        let service = BlocklistService::in_memory(
            Arc::new(FixedCountryDetector::new("US")),
            notifier.clone(),
        );
        let provider = BlocklistProvider::new(Arc::new(service));
        let mut sub = notifier.subscribe();

        for i in 0..100 {
            provider
                .insert("blocked", &number(&format!("555-0{i:03}")))
                .unwrap();
        }

        assert_eq!(sub.drain(), 1);
        assert_eq!(notifier.notifications_sent(), 100);
        assert_eq!(notifier.observer_count(), 1);
    }

    #[tokio::test]
    async fn test_change_visible_when_observer_wakes() {
        let (provider, notifier) = provider_for("US");
        let mut sub = notifier.subscribe();

        let writer = provider.clone();
        let handle = tokio::task::spawn_blocking(move || {
            writer.insert("blocked", &number("+1-500-454-1111")).unwrap()
        });

        let event = timeout(Duration::from_secs(1), sub.recv())
            .await
            .expect("timeout waiting for notification")
            .expect("notifier closed");
        assert_eq!(event, ChangeEvent::RecordsChanged);
        assert!(provider.is_blocked("500-454 1111"));

        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_stream_of_changes() {
        let (provider, notifier) = provider_for("US");
        let mut stream = notifier.subscribe().into_stream();

        provider.insert("blocked", &number("1")).unwrap();
        let first = timeout(Duration::from_secs(1), stream.next()).await.unwrap();
        assert_eq!(first, Some(ChangeEvent::RecordsChanged));

        provider.delete("blocked", None, &[]).unwrap();
        let second = timeout(Duration::from_secs(1), stream.next()).await.unwrap();
        assert_eq!(second, Some(ChangeEvent::RecordsChanged));
    }
}
