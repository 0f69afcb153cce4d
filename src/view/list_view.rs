use std::collections::HashSet;

use tracing::{debug, warn};

use super::commands::Command;
use super::events::Message;
use crate::collection::{
    BulkAction, BulkActionError, Comparator, FilterCriteria, Identified, Predicate, SelectionSet,
    SortSpec, ViewConfig, visible_indices,
};
use crate::error::ViewError;

/// State owned by one list view: the source collection, the user's filter,
/// sort and selection, and the memoised visible list derived from them.
///
/// All transitions go through [`ListView::update`]; side effects come back
/// as a [`Command`] for the host to run.
pub struct ListView<T> {
    config: ViewConfig<T>,
    source: Vec<T>,
    criteria: FilterCriteria,
    sort: SortSpec,
    selection: SelectionSet,
    visible: Vec<usize>,
    query_error: Option<ViewError>,
    status: Option<String>,
}

impl<T: Identified> ListView<T> {
    pub fn new(config: ViewConfig<T>) -> Self {
        let sort = config.default_sort().clone();
        Self {
            config,
            source: Vec::new(),
            criteria: FilterCriteria::new(),
            sort,
            selection: SelectionSet::new(),
            visible: Vec::new(),
            query_error: None,
            status: None,
        }
    }

    pub fn with_source(config: ViewConfig<T>, source: Vec<T>) -> Self {
        let mut view = Self::new(config);
        view.update(Message::SourceLoaded(source));
        view
    }

    pub fn update(&mut self, msg: Message<T>) -> Command {
        match msg {
            Message::SourceLoaded(items) => {
                self.source = items;
                let known: HashSet<&str> = self.source.iter().map(Identified::id).collect();
                let pruned = self.selection.retain_known(&known);
                if pruned > 0 {
                    debug!("Dropped {} selected id(s) no longer in the source", pruned);
                }
                self.recompute();
                Command::None
            }
            Message::QueryChanged(query) => {
                self.criteria.search = query;
                self.recompute();
                Command::None
            }
            Message::ToggleSearchMode => {
                self.criteria.search_mode = self.criteria.search_mode.toggled();
                self.recompute();
                Command::None
            }
            Message::ToggleFilterValue { dimension, value } => {
                self.criteria.toggle_value(&dimension, &value);
                self.recompute();
                Command::None
            }
            Message::SetFilter { dimension, values } => {
                self.criteria.set_values(&dimension, values);
                self.recompute();
                Command::None
            }
            Message::ClearFilter(dimension) => {
                self.criteria.clear_dimension(&dimension);
                self.recompute();
                Command::None
            }
            Message::ClearFilters => {
                self.criteria.clear();
                self.recompute();
                Command::None
            }
            Message::SetTimeWindow(window) => {
                self.criteria.time_window = window.filter(|w| !w.is_unbounded());
                self.recompute();
                Command::None
            }
            Message::SortBy(key) => {
                self.sort = self.sort.toggled(&key);
                self.recompute();
                Command::None
            }
            Message::SetSort(spec) => {
                self.sort = spec;
                self.recompute();
                Command::None
            }
            Message::ToggleSelection(id) => {
                self.selection.toggle(&id);
                Command::None
            }
            Message::SelectAllVisible => {
                let ids: Vec<&str> = self.visible.iter().map(|&i| self.source[i].id()).collect();
                self.selection.select_all(ids);
                Command::None
            }
            Message::ClearSelection => {
                self.selection.clear();
                Command::None
            }
            Message::RequestBulkAction(action) => {
                if self.selection.is_empty() {
                    return Command::None;
                }
                let ids = self.selection.to_vec();
                debug!("Requesting bulk action '{}' for {} item(s)", action.name, ids.len());
                Command::RunBulkAction { action, ids }
            }
            Message::BulkActionCompleted { action, failed } => {
                self.selection.clear();
                if !failed.is_empty() {
                    warn!("Bulk action '{}' failed for {} item(s)", action.name, failed.len());
                }
                let message = completion_message(&action, &failed);
                self.status = Some(message.clone());
                Command::ShowMessage(message)
            }
            Message::RequestItemAction { action, id } => Command::RunItemAction { action, id },
        }
    }

    /// Runs `action` synchronously through `handler`, then clears the
    /// selection and records the outcome in `status`, as `RequestBulkAction`
    /// followed by `BulkActionCompleted` would.
    pub fn perform_bulk_action<E, F>(
        &mut self,
        action: &BulkAction,
        handler: F,
    ) -> Result<usize, BulkActionError<E>>
    where
        F: FnMut(&[String]) -> Result<(), E>,
    {
        let result = self.selection.bulk_action(action.dispatch, handler);
        let failed = match &result {
            Ok(_) => Vec::new(),
            Err(err) => err.failed_ids().into_iter().map(String::from).collect(),
        };
        self.status = Some(completion_message(action, &failed));
        result
    }

    /// Rebuilds the visible list from the current source, criteria and sort.
    ///
    /// An expression that does not parse falls back to substring matching of
    /// the raw text; the error stays readable via `query_error`.
    fn recompute(&mut self) {
        let comparator = Comparator::build(&self.config, &self.sort);
        let predicate = match Predicate::build(&self.config, &self.criteria) {
            Ok(predicate) => {
                self.query_error = None;
                predicate
            }
            Err(err) => {
                debug!("Query fallback to substring matching: {}", err);
                self.query_error = Some(err);
                Predicate::substring(&self.config, &self.criteria)
            }
        };
        self.visible = visible_indices(&self.source, &predicate, &comparator);
    }

    pub fn config(&self) -> &ViewConfig<T> {
        &self.config
    }

    pub fn source(&self) -> &[T] {
        &self.source
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.is_selected(id)
    }

    pub fn visible(&self) -> impl Iterator<Item = &T> {
        self.visible.iter().map(|&index| &self.source[index])
    }

    pub fn visible_ids(&self) -> Vec<&str> {
        self.visible().map(Identified::id).collect()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn total_count(&self) -> usize {
        self.source.len()
    }

    pub fn query_error(&self) -> Option<&ViewError> {
        self.query_error.as_ref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

fn completion_message(action: &BulkAction, failed: &[String]) -> String {
    if failed.is_empty() {
        format!("{}: done", action.name)
    } else {
        format!("{}: failed for {}", action.name, failed.join(", "))
    }
}
