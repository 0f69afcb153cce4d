use tracing::debug;

use super::config::{Dimension, FieldGetter, ViewConfig};
use super::criteria::{FilterCriteria, SearchMode, TimeWindow};
use super::timestamp::parse_timestamp_millis;
use crate::error::ViewResult;
use crate::query::{FastLowercase, QueryCondition, parse_query};

enum TextMatcher {
    Any,
    /// Lowercased needle.
    Substring(String),
    Query(QueryCondition),
}

/// Visibility test for one item under a `FilterCriteria`: the AND of the
/// free-text match, every active enum dimension and the time window.
pub struct Predicate<'c, T> {
    config: &'c ViewConfig<T>,
    text: TextMatcher,
    dimensions: Vec<(&'c Dimension<T>, Vec<String>)>,
    time_window: Option<(FieldGetter<T>, TimeWindow)>,
}

impl<'c, T> Predicate<'c, T> {
    /// Builds the predicate, failing only when an expression-mode search does
    /// not parse or holds an invalid regex.
    pub fn build(config: &'c ViewConfig<T>, criteria: &FilterCriteria) -> ViewResult<Self> {
        let search = criteria.search.trim();
        let text = if search.is_empty() {
            TextMatcher::Any
        } else {
            match criteria.search_mode {
                SearchMode::Substring => TextMatcher::Substring(search.fast_to_lowercase()),
                SearchMode::Expression => TextMatcher::Query(parse_query(search)?.prepare()?),
            }
        };
        Ok(Self::with_text(config, criteria, text))
    }

    /// Same constraints as `build`, with the search text always taken as a
    /// plain substring. Never fails.
    pub fn substring(config: &'c ViewConfig<T>, criteria: &FilterCriteria) -> Self {
        let search = criteria.search.trim();
        let text = if search.is_empty() {
            TextMatcher::Any
        } else {
            TextMatcher::Substring(search.fast_to_lowercase())
        };
        Self::with_text(config, criteria, text)
    }

    fn with_text(config: &'c ViewConfig<T>, criteria: &FilterCriteria, text: TextMatcher) -> Self {
        let mut dimensions = Vec::new();
        for (name, values) in criteria.active_dimensions() {
            match config.find_dimension(name) {
                Some(dimension) => dimensions.push((dimension, values.to_vec())),
                None => debug!("Ignoring filter on unknown dimension '{}'", name),
            }
        }

        let time_window = match (criteria.time_window, config.time_getter()) {
            (Some(window), Some(get)) => Some((get, window)),
            (Some(_), None) => {
                debug!("Ignoring time window: view has no time field");
                None
            }
            _ => None,
        };

        Self {
            config,
            text,
            dimensions,
            time_window,
        }
    }

    pub fn matches(&self, item: &T) -> bool {
        self.matches_dimensions(item) && self.matches_time(item) && self.matches_text(item)
    }

    fn matches_text(&self, item: &T) -> bool {
        if let TextMatcher::Any = self.text {
            return true;
        }

        let mut fields = Vec::with_capacity(self.config.text_fields().len());
        for field in self.config.text_fields() {
            field.collect(item, &mut fields);
        }

        match &self.text {
            TextMatcher::Any => true,
            TextMatcher::Substring(needle) => {
                fields.iter().any(|field| field.contains_lowered(needle))
            }
            TextMatcher::Query(condition) => condition.matches_any(&fields),
        }
    }

    fn matches_dimensions(&self, item: &T) -> bool {
        self.dimensions.iter().all(|(dimension, selected)| {
            match (dimension.get)(item) {
                Some(value) => selected
                    .iter()
                    .any(|s| s == value || *s == value.fast_to_lowercase()),
                None => false,
            }
        })
    }

    fn matches_time(&self, item: &T) -> bool {
        match &self.time_window {
            None => true,
            Some((get, window)) => get(item)
                .and_then(parse_timestamp_millis)
                .is_some_and(|millis| window.contains(millis)),
        }
    }
}
