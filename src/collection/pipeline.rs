use tracing::debug;

use super::comparator::{Comparator, SortSpec};
use super::config::ViewConfig;
use super::criteria::FilterCriteria;
use super::predicate::Predicate;
use crate::error::ViewResult;

/// Indices into `source` of the visible items, filtered then stably sorted.
///
/// Sort keys are extracted once per visible item, so timestamp parsing is
/// linear in the number of matches rather than in the number of comparisons.
pub fn visible_indices<T>(
    source: &[T],
    predicate: &Predicate<'_, T>,
    comparator: &Comparator<'_, T>,
) -> Vec<usize> {
    let mut keyed: Vec<_> = source
        .iter()
        .enumerate()
        .filter(|(_, item)| predicate.matches(item))
        .map(|(index, item)| (index, comparator.key(item)))
        .collect();

    // sort_by is stable: equal keys keep their source order in both directions
    keyed.sort_by(|(_, a), (_, b)| comparator.compare_keys(a, b));

    debug!(
        "Collection pipeline: {} of {} items visible",
        keyed.len(),
        source.len()
    );
    keyed.into_iter().map(|(index, _)| index).collect()
}

/// `sort(filter(source, criteria), sort)` as borrowed items.
pub fn visible<'s, T>(
    source: &'s [T],
    config: &ViewConfig<T>,
    criteria: &FilterCriteria,
    sort: &SortSpec,
) -> ViewResult<Vec<&'s T>> {
    let predicate = Predicate::build(config, criteria)?;
    let comparator = Comparator::build(config, sort);
    Ok(visible_indices(source, &predicate, &comparator)
        .into_iter()
        .map(|index| &source[index])
        .collect())
}
