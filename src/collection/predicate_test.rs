#[cfg(test)]
mod tests {
    use super::super::criteria::{FilterCriteria, SearchMode, TimeWindow};
    use super::super::fixtures::{Row, row, row_config};
    use super::super::predicate::Predicate;
    use crate::error::ViewError;

    fn visible_ids(rows: &[Row], criteria: &FilterCriteria) -> Vec<String> {
        let config = row_config();
        let predicate = Predicate::build(&config, criteria).unwrap();
        rows.iter()
            .filter(|r| predicate.matches(r))
            .map(|r| r.id.clone())
            .collect()
    }

    #[test]
    fn test_empty_criteria_matches_everything() {
        let rows = vec![row("a", "nginx-web"), row("b", ""), Row::default()];
        assert_eq!(visible_ids(&rows, &FilterCriteria::new()).len(), 3);
    }

    #[test]
    fn test_free_text_matches_service_name() {
        let rows = vec![row("1", "nginx-web"), row("2", "postgres-db")];
        let criteria = FilterCriteria::new().with_search("postgres");
        assert_eq!(visible_ids(&rows, &criteria), vec!["2"]);
    }

    #[test]
    fn test_free_text_is_case_insensitive_across_fields() {
        let rows = vec![
            row("name", "Redis-Cache"),
            row("source", "worker").source("REDIS sentinel"),
            row("tag", "queue").tags(&["infra", "redis"]),
            row("none", "queue").tags(&["infra"]),
        ];
        let criteria = FilterCriteria::new().with_search("redis");
        assert_eq!(visible_ids(&rows, &criteria), vec!["name", "source", "tag"]);
    }

    #[test]
    fn test_whitespace_search_is_empty() {
        let rows = vec![row("1", "api"), row("2", "db")];
        let criteria = FilterCriteria::new().with_search("   ");
        assert_eq!(visible_ids(&rows, &criteria).len(), 2);
    }

    #[test]
    fn test_missing_text_field_does_not_match() {
        let rows = vec![row("1", "api"), row("2", "api").source("gateway")];
        let criteria = FilterCriteria::new().with_search("gateway");
        assert_eq!(visible_ids(&rows, &criteria), vec!["2"]);
    }

    #[test]
    fn test_level_filter_selects_members() {
        let rows: Vec<Row> = ["debug", "info", "warn", "error", "fatal"]
            .iter()
            .map(|level| row(level, "log").level(level))
            .collect();
        let criteria = FilterCriteria::new().with_values("level", ["error", "fatal"]);

        assert_eq!(visible_ids(&rows, &criteria), vec!["error", "fatal"]);
    }

    #[test]
    fn test_dimension_without_value_is_excluded_when_active() {
        let rows = vec![row("1", "a").level("error"), row("2", "b")];

        let criteria = FilterCriteria::new().with_values("level", ["error"]);
        assert_eq!(visible_ids(&rows, &criteria), vec!["1"]);

        // inactive dimension imposes nothing
        let criteria = FilterCriteria::new().with_values("severity", Vec::<&str>::new());
        assert_eq!(visible_ids(&rows, &criteria).len(), 2);
    }

    #[test]
    fn test_dimension_values_compare_case_insensitively() {
        let rows = vec![row("1", "a").level("ERROR"), row("2", "b").level("warn")];
        let criteria = FilterCriteria::new().with_values("Level", ["Error"]);
        assert_eq!(visible_ids(&rows, &criteria), vec!["1"]);
    }

    #[test]
    fn test_dimensions_and_text_are_and_composed() {
        let rows = vec![
            row("1", "postgres").level("error").source("db"),
            row("2", "postgres").level("info").source("db"),
            row("3", "nginx").level("error").source("db"),
            row("4", "postgres").level("error").source("web"),
        ];
        let criteria = FilterCriteria::new()
            .with_search("postgres")
            .with_values("level", ["error"])
            .with_values("source", ["db"]);

        assert_eq!(visible_ids(&rows, &criteria), vec!["1"]);
    }

    #[test]
    fn test_unknown_dimension_is_ignored() {
        let rows = vec![row("1", "a"), row("2", "b")];
        let criteria = FilterCriteria::new().with_values("colour", ["red"]);
        assert_eq!(visible_ids(&rows, &criteria).len(), 2);
    }

    #[test]
    fn test_time_window() {
        let rows = vec![
            row("early", "a").at("2024-01-01T00:00:00Z"),
            row("mid", "b").at("2024-01-02T00:00:00Z"),
            row("late", "c").at("2024-01-03T00:00:00Z"),
            row("undated", "d"),
            row("garbled", "e").at("yesterday-ish"),
        ];
        let criteria = FilterCriteria::new().with_time_window(TimeWindow {
            after: Some(1_704_153_600_000), // 2024-01-02
            before: None,
        });

        assert_eq!(visible_ids(&rows, &criteria), vec!["mid", "late"]);
    }

    #[test]
    fn test_expression_mode() {
        let rows = vec![
            row("1", "postgres-db").tags(&["prod"]),
            row("2", "postgres-test").tags(&["staging"]),
            row("3", "mysql").tags(&["prod"]),
        ];
        let criteria = FilterCriteria::new()
            .with_search("(postgres OR mysql) AND NOT test")
            .with_mode(SearchMode::Expression);
        assert_eq!(visible_ids(&rows, &criteria), vec!["1", "3"]);

        let criteria = FilterCriteria::new()
            .with_search(r"/^postgres-\w+$/")
            .with_mode(SearchMode::Expression);
        assert_eq!(visible_ids(&rows, &criteria), vec!["1", "2"]);
    }

    #[test]
    fn test_expression_errors_and_substring_fallback() {
        let config = row_config();
        let criteria = FilterCriteria::new()
            .with_search("(postgres")
            .with_mode(SearchMode::Expression);
        assert!(matches!(
            Predicate::build(&config, &criteria),
            Err(ViewError::InvalidQuery { .. })
        ));

        let criteria = FilterCriteria::new()
            .with_search("/[bad/")
            .with_mode(SearchMode::Expression);
        assert!(matches!(
            Predicate::build(&config, &criteria),
            Err(ViewError::InvalidRegex { .. })
        ));

        // the same text is harmless as a plain substring
        let fallback = Predicate::substring(&config, &criteria);
        assert!(fallback.matches(&row("1", "weird /[bad/ name")));
        assert!(!fallback.matches(&row("2", "postgres")));
    }

    #[test]
    fn test_adding_constraints_never_grows_result() {
        let rows = vec![
            row("1", "postgres").level("error").severity("high"),
            row("2", "postgres").level("info").severity("low"),
            row("3", "redis").level("error").severity("critical"),
            row("4", "redis").level("warn"),
            row("5", "api"),
        ];

        let steps = [
            FilterCriteria::new(),
            FilterCriteria::new().with_values("level", ["error", "info", "warn"]),
            FilterCriteria::new()
                .with_values("level", ["error", "info", "warn"])
                .with_search("postgres"),
            FilterCriteria::new()
                .with_values("level", ["error", "info", "warn"])
                .with_search("postgres")
                .with_values("severity", ["high"]),
        ];

        let sizes: Vec<usize> = steps.iter().map(|c| visible_ids(&rows, c).len()).collect();
        assert_eq!(sizes, vec![5, 4, 2, 1]);
        assert!(sizes.windows(2).all(|pair| pair[1] <= pair[0]));
    }
}
