use super::comparator::SortSpec;
use super::criteria::FilterCriteria;
use crate::error::{ViewError, ViewResult};

/// Items in a collection view carry a stable identifier that survives
/// re-fetches, re-filtering and re-sorting.
pub trait Identified {
    fn id(&self) -> &str;
}

/// Ordered enum values, lowest rank first. Values outside the table rank 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankTable(pub &'static [&'static str]);

impl RankTable {
    pub fn rank(&self, value: &str) -> usize {
        self.0
            .iter()
            .position(|candidate| candidate.eq_ignore_ascii_case(value))
            .map_or(0, |pos| pos + 1)
    }

    pub fn values(&self) -> &'static [&'static str] {
        self.0
    }
}

pub type FieldGetter<T> = fn(&T) -> Option<&str>;

pub enum TextSource<T> {
    Field(FieldGetter<T>),
    List(fn(&T) -> &[String]),
}

pub struct TextField<T> {
    pub name: &'static str,
    pub source: TextSource<T>,
}

impl<T> TextField<T> {
    /// Appends this field's present values to `out`.
    pub fn collect<'a>(&self, item: &'a T, out: &mut Vec<&'a str>) {
        match &self.source {
            TextSource::Field(get) => out.extend(get(item)),
            TextSource::List(get) => out.extend(get(item).iter().map(String::as_str)),
        }
    }
}

pub struct Dimension<T> {
    pub name: &'static str,
    pub get: FieldGetter<T>,
}

pub enum SortField<T> {
    Text(FieldGetter<T>),
    Number(fn(&T) -> Option<f64>),
    Timestamp(FieldGetter<T>),
    Ranked(FieldGetter<T>, RankTable),
}

pub struct SortKey<T> {
    pub name: &'static str,
    pub field: SortField<T>,
}

/// Field accessors for one item type: which fields free text searches,
/// which enum dimensions can be filtered, and which keys can be sorted on.
pub struct ViewConfig<T> {
    text_fields: Vec<TextField<T>>,
    dimensions: Vec<Dimension<T>>,
    sort_keys: Vec<SortKey<T>>,
    time_field: Option<FieldGetter<T>>,
    default_sort: SortSpec,
}

impl<T> ViewConfig<T> {
    pub fn new(default_sort: SortSpec) -> Self {
        Self {
            text_fields: Vec::new(),
            dimensions: Vec::new(),
            sort_keys: Vec::new(),
            time_field: None,
            default_sort,
        }
    }

    pub fn text(mut self, name: &'static str, get: FieldGetter<T>) -> Self {
        self.text_fields.push(TextField {
            name,
            source: TextSource::Field(get),
        });
        self
    }

    pub fn text_list(mut self, name: &'static str, get: fn(&T) -> &[String]) -> Self {
        self.text_fields.push(TextField {
            name,
            source: TextSource::List(get),
        });
        self
    }

    pub fn dimension(mut self, name: &'static str, get: FieldGetter<T>) -> Self {
        self.dimensions.push(Dimension { name, get });
        self
    }

    pub fn sort_text(self, name: &'static str, get: FieldGetter<T>) -> Self {
        self.sort_key(name, SortField::Text(get))
    }

    pub fn sort_number(self, name: &'static str, get: fn(&T) -> Option<f64>) -> Self {
        self.sort_key(name, SortField::Number(get))
    }

    pub fn sort_timestamp(self, name: &'static str, get: FieldGetter<T>) -> Self {
        self.sort_key(name, SortField::Timestamp(get))
    }

    pub fn sort_ranked(self, name: &'static str, get: FieldGetter<T>, ranks: RankTable) -> Self {
        self.sort_key(name, SortField::Ranked(get, ranks))
    }

    /// Field the time window filter applies to.
    pub fn time_field(mut self, get: FieldGetter<T>) -> Self {
        self.time_field = Some(get);
        self
    }

    fn sort_key(mut self, name: &'static str, field: SortField<T>) -> Self {
        self.sort_keys.push(SortKey { name, field });
        self
    }

    pub fn text_fields(&self) -> &[TextField<T>] {
        &self.text_fields
    }

    pub fn find_dimension(&self, name: &str) -> Option<&Dimension<T>> {
        self.dimensions
            .iter()
            .find(|dimension| dimension.name.eq_ignore_ascii_case(name))
    }

    pub fn dimension_names(&self) -> Vec<&'static str> {
        self.dimensions.iter().map(|dimension| dimension.name).collect()
    }

    pub fn find_sort_key(&self, name: &str) -> Option<&SortKey<T>> {
        self.sort_keys
            .iter()
            .find(|key| key.name.eq_ignore_ascii_case(name))
    }

    pub fn sort_key_names(&self) -> Vec<&'static str> {
        self.sort_keys.iter().map(|key| key.name).collect()
    }

    pub fn time_getter(&self) -> Option<FieldGetter<T>> {
        self.time_field
    }

    pub fn default_sort(&self) -> &SortSpec {
        &self.default_sort
    }

    /// Strict check for criteria coming from outside the UI, where an unknown
    /// dimension is a typo rather than a stale control.
    pub fn validate_criteria(&self, criteria: &FilterCriteria) -> ViewResult<()> {
        for (dimension, _) in criteria.active_dimensions() {
            if self.find_dimension(dimension).is_none() {
                return Err(ViewError::UnknownDimension {
                    dimension: dimension.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn validate_sort(&self, spec: &SortSpec) -> ViewResult<()> {
        match self.find_sort_key(&spec.key) {
            Some(_) => Ok(()),
            None => Err(ViewError::UnknownSortKey {
                key: spec.key.clone(),
            }),
        }
    }
}
