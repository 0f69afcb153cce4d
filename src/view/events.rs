use crate::collection::{BulkAction, SortSpec, TimeWindow};

#[derive(Clone, Debug)]
pub enum Message<T> {
    // Source events
    SourceLoaded(Vec<T>),

    // Filter events
    QueryChanged(String),
    ToggleSearchMode,
    ToggleFilterValue { dimension: String, value: String },
    SetFilter { dimension: String, values: Vec<String> },
    ClearFilter(String),
    ClearFilters,
    SetTimeWindow(Option<TimeWindow>),

    // Sort events
    SortBy(String), // header click: same key flips direction
    SetSort(SortSpec),

    // Selection events
    ToggleSelection(String),
    SelectAllVisible,
    ClearSelection,

    // Action events
    RequestBulkAction(BulkAction),
    BulkActionCompleted { action: BulkAction, failed: Vec<String> },
    RequestItemAction { action: String, id: String },
}
