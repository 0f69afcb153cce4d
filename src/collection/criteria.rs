use smallvec::SmallVec;
use std::collections::BTreeMap;

use crate::query::FastLowercase;

/// How the free-text search string is interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Case-insensitive substring match against any text field.
    #[default]
    Substring,
    /// Boolean query language (`AND`, `OR`, `NOT`, quotes, `/regex/`).
    Expression,
}

impl SearchMode {
    pub fn toggled(self) -> Self {
        match self {
            SearchMode::Substring => SearchMode::Expression,
            SearchMode::Expression => SearchMode::Substring,
        }
    }
}

/// Inclusive bounds in epoch milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub after: Option<i64>,
    pub before: Option<i64>,
}

impl TimeWindow {
    pub fn contains(&self, millis: i64) -> bool {
        self.after.is_none_or(|after| millis >= after)
            && self.before.is_none_or(|before| millis <= before)
    }

    pub fn is_unbounded(&self) -> bool {
        self.after.is_none() && self.before.is_none()
    }
}

pub type ValueSet = SmallVec<[String; 4]>;

/// Active filter constraints. A dimension with no selected values is absent
/// from the map, so it never constrains anything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterCriteria {
    pub search: String,
    pub search_mode: SearchMode,
    pub time_window: Option<TimeWindow>,
    dimensions: BTreeMap<String, ValueSet>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    pub fn with_values<I, S>(mut self, dimension: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_values(dimension, values);
        self
    }

    pub fn with_time_window(mut self, window: TimeWindow) -> Self {
        self.time_window = (!window.is_unbounded()).then_some(window);
        self
    }

    /// Flips membership of `value` in `dimension`; returns whether it is now
    /// selected. A blank value changes nothing.
    pub fn toggle_value(&mut self, dimension: &str, value: &str) -> bool {
        let value = value.trim().fast_to_lowercase();
        if value.is_empty() {
            return false;
        }
        let key = dimension.fast_to_lowercase();
        let values = self.dimensions.entry(key.clone()).or_default();

        let selected = if let Some(pos) = values.iter().position(|v| *v == value) {
            values.remove(pos);
            false
        } else {
            values.push(value);
            true
        };

        if values.is_empty() {
            self.dimensions.remove(&key);
        }
        selected
    }

    /// Replaces the selected values of `dimension`. An empty iterator clears it.
    pub fn set_values<I, S>(&mut self, dimension: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = ValueSet::new();
        for value in values {
            let value = value.as_ref().trim().fast_to_lowercase();
            if !value.is_empty() && !set.contains(&value) {
                set.push(value);
            }
        }

        let key = dimension.fast_to_lowercase();
        if set.is_empty() {
            self.dimensions.remove(&key);
        } else {
            self.dimensions.insert(key, set);
        }
    }

    pub fn clear_dimension(&mut self, dimension: &str) {
        self.dimensions.remove(&dimension.fast_to_lowercase());
    }

    /// Drops every constraint; the search mode is a preference and is kept.
    pub fn clear(&mut self) {
        self.search.clear();
        self.time_window = None;
        self.dimensions.clear();
    }

    /// Selected values of `dimension`, lowercased.
    pub fn selected(&self, dimension: &str) -> &[String] {
        self.dimensions
            .get(&dimension.fast_to_lowercase())
            .map(|values| values.as_slice())
            .unwrap_or(&[])
    }

    pub fn active_dimensions(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.dimensions
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.time_window.is_none() && self.dimensions.is_empty()
    }
}
