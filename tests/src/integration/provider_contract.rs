//! # Provider Contract
//!
//! The rules the resource surface guarantees to collaborators: which field
//! maps are accepted, how references and selections combine, and that
//! nothing ever updates a stored row.

#[cfg(test)]
mod tests {
    use super::super::{number, provider_for};
    use blocked_numbers::{ErrorKind, FieldValues, RecordType, ResourceRef};

    fn row_count(provider: &blocked_numbers::BlocklistProvider) -> usize {
        provider.query("blocked", None, &[]).unwrap().count()
    }

    // =========================================================================
    // INSERT VALIDATION
    // =========================================================================

    #[test]
    fn test_invalid_inserts_create_no_row() {
        let (provider, notifier) = provider_for("US");
        let mut sub = notifier.subscribe();

        let mut null_original = FieldValues::new();
        null_original.put_null("original_number");

        let rejected = [
            FieldValues::new(),
            number(""),
            null_original,
            number("123").with("id", 1i64),
            number("123").with("stripped_number", "123"),
            FieldValues::new().with("e164_number", "+15004541111"),
            number("123").with("label", "spam"),
        ];

        for values in rejected {
            let err = provider.insert("blocked", &values).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{values:?}");
        }

        assert_eq!(row_count(&provider), 0);
        assert_eq!(sub.drain(), 0);
    }

    #[test]
    fn test_duplicate_insert_adds_one_row() {
        let (provider, _) = provider_for("US");

        provider.insert("blocked", &number("123")).unwrap();
        let err = provider.insert("blocked", &number("123")).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
        assert_eq!(row_count(&provider), 1);
    }

    #[test]
    fn test_insert_reference_resolves_to_one_record() {
        let (provider, _) = provider_for("US");

        for (i, original) in ["123", "+1-500-454-1111", "abc.def@gmail.com"]
            .into_iter()
            .enumerate()
        {
            let resource = provider.insert("blocked", &number(original)).unwrap();
            assert_eq!(row_count(&provider), i + 1);

            let path = resource.to_string();
            assert_eq!(provider.record_type(&path), Some(RecordType::Item));

            let rows: Vec<_> = provider.query(&path, None, &[]).unwrap().collect();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].original_number, original);
            assert_eq!(ResourceRef::item(rows[0].id), resource);
        }
    }

    // =========================================================================
    // DELETE
    // =========================================================================

    #[test]
    fn test_item_delete_rules() {
        let (provider, _) = provider_for("US");
        let keep = provider.insert("blocked", &number("123")).unwrap();
        let gone = provider.insert("blocked", &number("456")).unwrap();

        let err = provider
            .delete(&gone.to_string(), Some("original_number = ?"), &["456"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("selection must be null"));
        assert_eq!(row_count(&provider), 2);

        assert_eq!(provider.delete(&gone.to_string(), None, &[]).unwrap(), 1);
        assert_eq!(provider.delete(&gone.to_string(), None, &[]).unwrap(), 0);

        let remaining: Vec<_> = provider.query("blocked", None, &[]).unwrap().collect();
        assert_eq!(remaining.len(), 1);
        assert_eq!(ResourceRef::item(remaining[0].id), keep);
    }

    #[test]
    fn test_table_drop_selection_is_backend_error() {
        let (provider, _) = provider_for("US");
        provider.insert("blocked", &number("123")).unwrap();
        provider.insert("blocked", &number("456")).unwrap();

        for selection in [
            "; DROP TABLE blocked; ",
            "id = 1; DROP TABLE blocked",
            "1 = 1 --",
            "original_number LIKE '%1%'",
            "DROP",
        ] {
            let err = provider.delete("blocked", Some(selection), &[]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Backend, "{selection}");
        }

        assert_eq!(row_count(&provider), 2);
    }

    #[test]
    fn test_delete_by_e164_override() {
        let (provider, _) = provider_for("US");
        provider.insert("blocked", &number("123")).unwrap();
        provider
            .insert("blocked", &number("045-381-1111").with("e164_number", "12345"))
            .unwrap();
        provider
            .insert("blocked", &number("045-381-2222").with("e164_number", "123456"))
            .unwrap();

        let removed = provider
            .delete("blocked", Some("e164_number=?"), &["12345"])
            .unwrap();
        assert_eq!(removed, 1);

        let left: Vec<_> = provider
            .query("blocked", None, &[])
            .unwrap()
            .map(|row| row.original_number)
            .collect();
        assert_eq!(left, vec!["123".to_string(), "045-381-2222".to_string()]);
    }

    #[test]
    fn test_null_aware_selection() {
        let (provider, _) = provider_for("US");
        provider.insert("blocked", &number("abc.def@gmail.com")).unwrap();
        provider.insert("blocked", &number("+1-500-454-1111")).unwrap();

        let without_e164: Vec<_> = provider
            .query("blocked", Some("e164_number IS NULL"), &[])
            .unwrap()
            .collect();
        assert_eq!(without_e164.len(), 1);
        assert_eq!(without_e164[0].original_number, "abc.def@gmail.com");

        // Comparing against an absent value is unknown, never true.
        let ne: Vec<_> = provider
            .query("blocked", Some("e164_number <> ?"), &["x"])
            .unwrap()
            .collect();
        assert_eq!(ne.len(), 1);
        assert_eq!(ne[0].original_number, "+1-500-454-1111");
    }

    #[test]
    fn test_long_or_chain_is_backend_error() {
        let (provider, _) = provider_for("US");
        provider.insert("blocked", &number("123")).unwrap();

        let selection = vec!["id = 999"; 20_000].join(" OR ");
        let err = provider
            .delete("blocked", Some(&selection), &[])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Backend);
        assert_eq!(row_count(&provider), 1);
    }

    #[test]
    fn test_placeholder_count_mismatch_rejected() {
        let (provider, _) = provider_for("US");

        let err = provider
            .query("blocked", Some("original_number = ? OR e164_number = ?"), &["1"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Backend);
    }

    // =========================================================================
    // UPDATE AND PATHS
    // =========================================================================

    #[test]
    fn test_update_never_changes_rows() {
        let (provider, _) = provider_for("US");
        let resource = provider.insert("blocked", &number("123")).unwrap();
        let item = resource.to_string();
        let before: Vec<_> = provider.query("blocked", None, &[]).unwrap().collect();

        let attempts = [
            ("blocked", number("456"), None),
            ("blocked", FieldValues::new(), Some("id = 1")),
            (item.as_str(), number("789"), None),
            ("nowhere", FieldValues::new(), None),
        ];

        for (path, values, selection) in attempts {
            let err = provider.update(path, &values, selection, &[]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Unsupported);
        }

        let after: Vec<_> = provider.query("blocked", None, &[]).unwrap().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_unrecognised_paths() {
        let (provider, _) = provider_for("US");

        for path in ["", "blocked/", "blocked/1/2", "blocked/x", "other"] {
            assert_eq!(provider.record_type(path), None, "{path}");
            let err = provider.query(path, None, &[]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{path}");
        }

        assert_eq!(
            provider.record_type("blocked").map(|t| t.content_type()),
            Some("vnd.blocklist.dir/blocked_number")
        );
        assert_eq!(
            provider.record_type("/blocked/5").map(|t| t.content_type()),
            Some("vnd.blocklist.item/blocked_number")
        );
    }
}
