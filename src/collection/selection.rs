use std::collections::{BTreeSet, HashSet};
use std::fmt;

use tracing::{debug, warn};

/// Whether a bulk action handler receives the whole selection at once or one
/// id at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dispatch {
    #[default]
    Batch,
    PerItem,
}

/// A named action over the current selection, e.g. `restart` or `acknowledge`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkAction {
    pub name: String,
    pub dispatch: Dispatch,
}

impl BulkAction {
    pub fn batch(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dispatch: Dispatch::Batch,
        }
    }

    pub fn per_item(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dispatch: Dispatch::PerItem,
        }
    }
}

#[derive(Debug)]
pub struct BulkFailure<E> {
    pub ids: Vec<String>,
    pub error: E,
}

/// Handler failures from one bulk action. Nothing is retried or rolled back.
#[derive(Debug)]
pub struct BulkActionError<E> {
    pub attempted: usize,
    pub failures: Vec<BulkFailure<E>>,
}

impl<E> BulkActionError<E> {
    pub fn failed_ids(&self) -> Vec<&str> {
        self.failures
            .iter()
            .flat_map(|failure| failure.ids.iter().map(String::as_str))
            .collect()
    }
}

impl<E: fmt::Display> fmt::Display for BulkActionError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} bulk action calls failed",
            self.failures.len(),
            self.attempted
        )?;
        if let Some(first) = self.failures.first() {
            write!(f, " (first: {})", first.error)?;
        }
        Ok(())
    }
}

impl<E: std::error::Error + 'static> std::error::Error for BulkActionError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.failures
            .first()
            .map(|failure| &failure.error as &(dyn std::error::Error + 'static))
    }
}

/// Ids of the checked items. Membership is independent of what is currently
/// visible, so a filtered-out item stays selected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `id`; returns whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// Replaces the selection with exactly `visible_ids`.
    pub fn select_all<I, S>(&mut self, visible_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = visible_ids.into_iter().map(Into::into).collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    /// Drops ids that are no longer in the source collection. Returns how
    /// many were dropped.
    pub fn retain_known(&mut self, known: &HashSet<&str>) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| known.contains(id.as_str()));
        before - self.ids.len()
    }

    /// Runs `handler` over the selection, once with every id or once per id,
    /// then clears the selection whatever the outcome.
    ///
    /// Per-item dispatch keeps going after a failure. Returns the number of
    /// handler invocations.
    pub fn bulk_action<E, F>(
        &mut self,
        dispatch: Dispatch,
        mut handler: F,
    ) -> Result<usize, BulkActionError<E>>
    where
        F: FnMut(&[String]) -> Result<(), E>,
    {
        let ids = self.to_vec();
        self.ids.clear();
        if ids.is_empty() {
            return Ok(0);
        }

        let mut failures = Vec::new();
        let attempted = match dispatch {
            Dispatch::Batch => {
                if let Err(error) = handler(&ids) {
                    failures.push(BulkFailure { ids, error });
                }
                1
            }
            Dispatch::PerItem => {
                let count = ids.len();
                for id in ids {
                    let batch = [id];
                    if let Err(error) = handler(&batch) {
                        let [id] = batch;
                        failures.push(BulkFailure {
                            ids: vec![id],
                            error,
                        });
                    }
                }
                count
            }
        };

        if failures.is_empty() {
            debug!("Bulk action completed: {} call(s)", attempted);
            Ok(attempted)
        } else {
            warn!(
                "Bulk action: {} of {} call(s) failed",
                failures.len(),
                attempted
            );
            Err(BulkActionError {
                attempted,
                failures,
            })
        }
    }
}
