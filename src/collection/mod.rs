//! Generic filter / sort / select logic shared by every list view.

pub mod comparator;
pub mod config;
pub mod criteria;
pub mod pipeline;
pub mod predicate;
pub mod selection;
pub mod timestamp;

#[cfg(test)]
pub(crate) mod fixtures;
#[cfg(test)]
mod predicate_test;
#[cfg(test)]
mod selection_test;

pub use comparator::{Comparator, SortDirection, SortSpec, SortValue};
pub use config::{Identified, RankTable, ViewConfig};
pub use criteria::{FilterCriteria, SearchMode, TimeWindow};
pub use pipeline::{visible, visible_indices};
pub use predicate::Predicate;
pub use selection::{BulkAction, BulkActionError, BulkFailure, Dispatch, SelectionSet};
pub use timestamp::{parse_time_bound, parse_timestamp_millis};
