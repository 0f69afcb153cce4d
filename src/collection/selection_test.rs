#[cfg(test)]
mod tests {
    use super::super::comparator::SortSpec;
    use super::super::criteria::FilterCriteria;
    use super::super::fixtures::{ids, row, row_config};
    use super::super::pipeline::visible;
    use super::super::selection::{Dispatch, SelectionSet};
    use std::collections::HashSet;
    use std::fmt;

    #[derive(Debug, PartialEq)]
    struct ApiError(String);

    impl fmt::Display for ApiError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "api error: {}", self.0)
        }
    }

    impl std::error::Error for ApiError {}

    #[test]
    fn test_toggle() {
        let mut selection = SelectionSet::new();
        assert!(selection.toggle("a"));
        assert!(selection.is_selected("a"));
        assert!(!selection.toggle("a"));
        assert!(!selection.is_selected("a"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_selection_survives_filtering() {
        let rows = vec![row("a", "postgres"), row("b", "nginx")];
        let config = row_config();
        let spec = SortSpec::ascending("name");
        let mut selection = SelectionSet::new();

        selection.toggle("a");

        let filtered = visible(&rows, &config, &FilterCriteria::new().with_search("nginx"), &spec).unwrap();
        assert_eq!(ids(filtered), vec!["b"]);
        assert!(selection.is_selected("a"));

        let unfiltered = visible(&rows, &config, &FilterCriteria::new(), &spec).unwrap();
        assert_eq!(unfiltered.len(), 2);
        assert!(selection.is_selected("a"));
    }

    #[test]
    fn test_select_all_replaces_previous_selection() {
        let mut selection = SelectionSet::new();
        selection.toggle("z");

        selection.select_all(["x", "y"]);

        assert!(selection.is_selected("x"));
        assert!(selection.is_selected("y"));
        assert!(!selection.is_selected("z"));
        assert_eq!(selection.ids().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn test_select_all_is_exactly_visible() {
        let rows = vec![
            row("1", "api").level("error"),
            row("2", "db").level("info"),
            row("3", "cache").level("error"),
        ];
        let criteria = FilterCriteria::new().with_values("level", ["error"]);
        let shown = visible(&rows, &row_config(), &criteria, &SortSpec::ascending("name")).unwrap();

        let mut selection = SelectionSet::new();
        selection.toggle("2");
        selection.select_all(shown.iter().map(|r| r.id.as_str()));

        for r in &rows {
            assert_eq!(selection.is_selected(&r.id), r.level.as_deref() == Some("error"));
        }
    }

    #[test]
    fn test_selection_does_not_change_visible_list() {
        let rows = vec![row("1", "b"), row("2", "a"), row("3", "c")];
        let config = row_config();
        let criteria = FilterCriteria::new();
        let spec = SortSpec::ascending("name");

        let before = ids(visible(&rows, &config, &criteria, &spec).unwrap());
        let mut selection = SelectionSet::new();
        selection.toggle("3");
        selection.select_all(["1"]);
        let after = ids(visible(&rows, &config, &criteria, &spec).unwrap());

        assert_eq!(before, after);
    }

    #[test]
    fn test_clear() {
        let mut selection = SelectionSet::new();
        selection.select_all(["a", "b"]);
        selection.clear();
        assert!(selection.is_empty());
        assert_eq!(selection.len(), 0);
    }

    #[test]
    fn test_retain_known_prunes_removed_items() {
        let mut selection = SelectionSet::new();
        selection.select_all(["a", "b", "c"]);

        let known: HashSet<&str> = ["a", "c", "d"].into_iter().collect();
        assert_eq!(selection.retain_known(&known), 1);
        assert_eq!(selection.to_vec(), vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_bulk_action_batch() {
        let mut selection = SelectionSet::new();
        selection.select_all(["web-2", "web-1"]);
        let mut calls: Vec<Vec<String>> = Vec::new();

        let result = selection.bulk_action(Dispatch::Batch, |ids| {
            calls.push(ids.to_vec());
            Ok::<(), ApiError>(())
        });

        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls, vec![vec!["web-1".to_string(), "web-2".to_string()]]);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_bulk_action_per_item_reports_failures_and_clears() {
        let mut selection = SelectionSet::new();
        selection.select_all(["a", "b", "c"]);
        let mut seen = Vec::new();

        let result = selection.bulk_action(Dispatch::PerItem, |ids| {
            seen.push(ids[0].clone());
            if ids[0] == "b" {
                Err(ApiError("409 conflict".to_string()))
            } else {
                Ok(())
            }
        });

        let err = result.unwrap_err();
        assert_eq!(seen, vec!["a", "b", "c"]);
        assert_eq!(err.attempted, 3);
        assert_eq!(err.failed_ids(), vec!["b"]);
        assert_eq!(err.to_string(), "1 of 3 bulk action calls failed (first: api error: 409 conflict)");
        assert!(std::error::Error::source(&err).is_some());
        assert!(selection.is_empty());
    }

    #[test]
    fn test_bulk_action_on_empty_selection_is_noop() {
        let mut selection = SelectionSet::new();
        let mut called = false;
        let result = selection.bulk_action(Dispatch::Batch, |_| {
            called = true;
            Ok::<(), ApiError>(())
        });
        assert_eq!(result.unwrap(), 0);
        assert!(!called);
    }
}
