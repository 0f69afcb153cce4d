use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::{SortField, ViewConfig};
use super::timestamp::parse_timestamp_millis;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// The single active sort key and its direction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }

    pub fn ascending(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Ascending)
    }

    pub fn descending(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Descending)
    }

    /// Sort-header click: the active key flips direction, any other key
    /// starts out descending.
    pub fn toggled(&self, key: &str) -> Self {
        if self.key.eq_ignore_ascii_case(key) {
            Self::new(self.key.clone(), self.direction.flipped())
        } else {
            Self::descending(key)
        }
    }
}

/// Extracted sort key of one item. `Missing` orders before every present
/// value; unranked enum values map to `Rank(0)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SortValue<'a> {
    Missing,
    Text(&'a str),
    Number(f64),
    Millis(i64),
    Rank(usize),
}

impl SortValue<'_> {
    fn cmp_ascending(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Missing, SortValue::Missing) => Ordering::Equal,
            (SortValue::Missing, _) => Ordering::Less,
            (_, SortValue::Missing) => Ordering::Greater,
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Millis(a), SortValue::Millis(b)) => a.cmp(b),
            (SortValue::Rank(a), SortValue::Rank(b)) => a.cmp(b),
            // One key never yields two kinds of value
            _ => Ordering::Equal,
        }
    }
}

/// Ordering of two items under a `SortSpec`. An unknown key compares every
/// pair as equal, which leaves a stable sort untouched.
pub struct Comparator<'c, T> {
    field: Option<&'c SortField<T>>,
    direction: SortDirection,
}

impl<'c, T> Comparator<'c, T> {
    pub fn build(config: &'c ViewConfig<T>, spec: &SortSpec) -> Self {
        let field = config.find_sort_key(&spec.key).map(|key| &key.field);
        if field.is_none() {
            debug!("Unknown sort key '{}', keeping source order", spec.key);
        }
        Self {
            field,
            direction: spec.direction,
        }
    }

    pub fn key<'a>(&self, item: &'a T) -> SortValue<'a> {
        let Some(field) = self.field else {
            return SortValue::Missing;
        };

        match field {
            SortField::Text(get) => get(item).map_or(SortValue::Missing, SortValue::Text),
            SortField::Number(get) => get(item).map_or(SortValue::Missing, SortValue::Number),
            SortField::Timestamp(get) => get(item)
                .and_then(parse_timestamp_millis)
                .map_or(SortValue::Missing, SortValue::Millis),
            SortField::Ranked(get, ranks) => SortValue::Rank(get(item).map_or(0, |v| ranks.rank(v))),
        }
    }

    pub fn compare_keys(&self, a: &SortValue<'_>, b: &SortValue<'_>) -> Ordering {
        self.direction.apply(a.cmp_ascending(b))
    }

    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.compare_keys(&self.key(a), &self.key(b))
    }
}
