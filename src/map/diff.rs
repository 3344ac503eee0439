use std::collections::HashSet;

use crate::entities::RouteWithId;

/// Set difference between the drawn overlays and the next input list.
/// `added` and `kept` preserve the input order; `removed` is sorted for
/// determinism.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlayDiff {
    pub removed: Vec<String>,
    pub added: Vec<String>,
    pub kept: Vec<String>,
}

pub fn diff_overlays<'a, I>(drawn: I, next: &[RouteWithId]) -> OverlayDiff
where
    I: IntoIterator<Item = &'a String>,
{
    let drawn: HashSet<&String> = drawn.into_iter().collect();
    let next_ids: HashSet<&String> = next.iter().map(|item| &item.id).collect();

    let mut diff = OverlayDiff::default();

    for item in next {
        if drawn.contains(&item.id) {
            diff.kept.push(item.id.clone());
        } else {
            diff.added.push(item.id.clone());
        }
    }

    diff.removed = drawn
        .into_iter()
        .filter(|id| !next_ids.contains(*id))
        .cloned()
        .collect();
    diff.removed.sort();

    diff
}
