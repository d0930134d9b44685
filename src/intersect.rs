//! Intersection of sorted id lists.
//!
//! The shortest list drives: it is filtered against each of the other lists in
//! turn (shortest first), so the candidate set shrinks as fast as possible.
//! Each probe is a binary search over the part of the other list that lies
//! after the previous hit, since driver ids are visited in ascending order.
//!
//! ```rust
//! use hitomi::{SortedIdList, intersect};
//!
//! let result = intersect(vec![
//!     SortedIdList::from_unsorted(vec![1, 2, 3, 4, 5, 6]),
//!     SortedIdList::from_unsorted(vec![2, 4, 6, 8]),
//!     SortedIdList::from_unsorted(vec![4, 5, 6]),
//! ])
//! .unwrap();
//! assert_eq!(result.as_slice(), &[4, 6]);
//! ```

use crate::error::{Error, Result};
use crate::types::{GalleryId, SortedIdList};

/// Returns the ids present in every list.
///
/// A single list is returned unchanged.
///
/// # Errors
///
/// * [`Error::InvalidQuery`] - If `lists` is empty
pub fn intersect(mut lists: Vec<SortedIdList>) -> Result<SortedIdList> {
    if lists.is_empty() {
        return Err(Error::invalid_query("nothing to intersect"));
    }

    lists.sort_by_key(SortedIdList::len);
    let mut lists = lists.into_iter();
    let mut driver = match lists.next() {
        Some(driver) => driver.into_vec(),
        None => return Err(Error::invalid_query("nothing to intersect")),
    };

    for other in lists {
        if driver.is_empty() {
            break;
        }
        driver = retain_present(&driver, other.as_slice());
    }

    Ok(SortedIdList::from_sorted_unchecked(driver))
}

/// Filters `driver` down to the ids also found in `other`.
///
/// Both slices are ascending. `low` marks where the next search starts; a
/// hit moves it past the match, a miss moves it to the insertion point.
fn retain_present(driver: &[GalleryId], other: &[GalleryId]) -> Vec<GalleryId> {
    let mut kept = Vec::with_capacity(driver.len().min(other.len()));
    let mut low = 0;

    for &id in driver {
        if low >= other.len() {
            break;
        }
        match other[low..].binary_search(&id) {
            Ok(offset) => {
                kept.push(id);
                low += offset + 1;
            }
            Err(offset) => low += offset,
        }
    }

    kept
}
