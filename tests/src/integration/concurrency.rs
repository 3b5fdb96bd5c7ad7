//! # Concurrent Writers and Readers
//!
//! The uniqueness check and the write happen under one lock, so racing
//! inserts of the same number produce exactly one row. Readers always see
//! a record together with all of its index entries.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    use rand::seq::SliceRandom;
    use rand::thread_rng;

    use super::super::{number, provider_for};
    use blocked_numbers::{
        BlockedNumberReader, BlocklistConfig, BlocklistService, ErrorKind, FixedCountryDetector,
        StorageBackend,
    };
    use blocklist_bus::ChangeNotifier;

    const THREADS: usize = 16;

    #[test]
    fn test_racing_duplicate_inserts() {
        let (provider, notifier) = provider_for("US");
        let mut sub = notifier.subscribe();
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let provider = provider.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    provider.insert("blocked", &number("+1-500-454-1111"))
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
        }

        assert_eq!(provider.service().count().unwrap(), 1);
        assert_eq!(sub.drain(), 1);
    }

    #[test]
    fn test_parallel_distinct_inserts_get_distinct_ids() {
        let (provider, _) = provider_for("US");

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let provider = provider.clone();
                thread::spawn(move || {
                    (0..25)
                        .map(|i| {
                            provider
                                .insert("blocked", &number(&format!("+1-500-{t:03}-{i:04}")))
                                .unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<_> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .filter_map(|resource| resource.id())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), THREADS * 25);

        let listed: Vec<_> = provider
            .query("blocked", None, &[])
            .unwrap()
            .map(|row| row.id)
            .collect();
        assert_eq!(listed, ids);
    }

    #[test]
    fn test_readers_see_whole_records() {
        let (provider, _) = provider_for("US");
        let mut numbers: Vec<String> = (0..200).map(|i| format!("+1-500-555-{i:04}")).collect();
        numbers.shuffle(&mut thread_rng());

        let done = Arc::new(AtomicBool::new(false));

        let reader = {
            let provider = provider.clone();
            let done = done.clone();
            thread::spawn(move || {
                while !done.load(Ordering::Acquire) {
                    for row in provider.query("blocked", None, &[]).unwrap() {
                        // A listed record is always reachable through its indexes.
                        assert!(provider.is_blocked(&row.stripped_number));
                    }
                }
            })
        };

        let writers: Vec<_> = numbers
            .chunks(50)
            .map(|chunk| {
                let provider = provider.clone();
                let chunk = chunk.to_vec();
                thread::spawn(move || {
                    for n in &chunk {
                        provider.insert("blocked", &number(n)).unwrap();
                    }
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap();
        }
        done.store(true, Ordering::Release);
        reader.join().unwrap();

        for n in numbers.iter().step_by(2) {
            let removed = provider
                .delete("blocked", Some("original_number = ?"), &[n.as_str()])
                .unwrap();
            assert_eq!(removed, 1);
            assert!(!provider.is_blocked(n));
        }
        assert_eq!(provider.service().count().unwrap(), 100);
    }

    #[test]
    fn test_file_store_survives_reopen_and_is_exclusive() {
        let dir = tempfile::tempdir().unwrap();
        let config = BlocklistConfig::default()
            .with_storage(StorageBackend::file(dir.path().join("blocked.db")));
        let open = || {
            BlocklistService::open(
                &config,
                Arc::new(FixedCountryDetector::new("US")),
                Arc::new(ChangeNotifier::new()),
            )
        };

        let service = open().unwrap();
        let provider = blocked_numbers::BlocklistProvider::new(Arc::new(service));
        provider.insert("blocked", &number("+1-500-454-1111")).unwrap();
        let last = provider.insert("blocked", &number("123")).unwrap();

        let err = open().err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Storage);

        let before: Vec<_> = provider.query("blocked", None, &[]).unwrap().collect();
        drop(provider);

        let reopened = open().unwrap();
        let after: Vec<_> = reopened.query(None).unwrap().collect();
        assert_eq!(before, after);
        assert!(reopened.check("500-454 1111").unwrap().blocked);

        let provider = blocked_numbers::BlocklistProvider::new(Arc::new(reopened));
        let next = provider.insert("blocked", &number("456")).unwrap();
        assert!(next.id() > last.id());
    }
}
