//! Proximity ordering for external consumers.
//!
//! Listings, routing and discovery rank addresses through these helpers so
//! they all share [`distance_cmp`] and its byte-wise tie-break.

use crate::{Address, distance::distance_cmp};

/// The candidate nearest to `reference`, or `None` if there are no candidates.
///
/// The first of several equally near candidates wins, which can only happen
/// when the same address is listed more than once.
pub fn closest_to<'a, I>(candidates: I, reference: &Address) -> Option<Address>
where
    I: IntoIterator<Item = &'a Address>,
{
    candidates
        .into_iter()
        .min_by(|a, b| distance_cmp(reference, a, b))
        .copied()
}

/// Stable sort of `list` by distance to `reference`, nearest first.
pub fn sort_by_proximity<I>(list: I, reference: &Address) -> Vec<Address>
where
    I: IntoIterator<Item = Address>,
{
    let mut sorted: Vec<Address> = list.into_iter().collect();
    sorted.sort_by(|a, b| distance_cmp(reference, a, b));
    sorted
}

/// Stable in-place sort of arbitrary records by the distance of their key
/// address to `reference`, nearest first.
pub fn sort_by_proximity_key<T, F>(items: &mut [T], reference: &Address, key: F)
where
    F: Fn(&T) -> &Address,
{
    items.sort_by(|a, b| distance_cmp(reference, key(a), key(b)));
}
