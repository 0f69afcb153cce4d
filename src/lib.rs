//! Client-side filter, sort and selection for WakeDock list views.
//!
//! A [`ListView`] owns one source collection plus the user's
//! [`FilterCriteria`], [`SortSpec`] and [`SelectionSet`], and derives the
//! visible list from them. The pieces in [`collection`] are usable on their
//! own for one-shot pipelines.

pub mod collection;
pub mod domain;
pub mod error;
pub mod format;
pub mod logging;
pub mod query;
pub mod source;
pub mod view;

pub use collection::{
    BulkAction, BulkActionError, Dispatch, FilterCriteria, Identified, SearchMode, SelectionSet,
    SortDirection, SortSpec, TimeWindow, ViewConfig, visible,
};
pub use domain::{ItemKind, Listable};
pub use error::{ViewError, ViewResult};
pub use query::{QueryCondition, parse_query};
pub use source::{load_items, parse_items};
pub use view::{Command, ListView, Message};
