//! # Paginator
//!
//! Splits line items into fixed-size printed pages.
//!
//! ## Policies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Invoice  : every item ─────────────────────────► pages of 12 (5×8 in) │
//! │  Slip     : stitching items with measurements ──► slips of 2  (5×5 in) │
//! │                                                                         │
//! │  13 items → [12][1]      3 measured items → [2][1]      0 items → []   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult};

/// Splits `items` into consecutive chunks of at most `page_size`.
///
/// Order is preserved and only the last chunk may be short. An empty input
/// yields zero pages, not one empty page.
///
/// ## Errors
/// `InvalidArgument` when `page_size` is zero.
///
/// ## Example
/// ```rust
/// use stitch_core::paginate::paginate;
///
/// let items = [1, 2, 3, 4, 5];
/// let pages = paginate(&items, 2).unwrap();
/// assert_eq!(pages, vec![&[1, 2][..], &[3, 4][..], &[5][..]]);
///
/// let none: [u8; 0] = [];
/// assert!(paginate(&none, 12).unwrap().is_empty());
/// assert!(paginate(&items, 0).is_err());
/// ```
pub fn paginate<T>(items: &[T], page_size: usize) -> CoreResult<Vec<&[T]>> {
    if page_size == 0 {
        return Err(CoreError::invalid_argument("page size must be positive"));
    }

    Ok(items.chunks(page_size).collect())
}

/// Number of pages `item_count` items fill at `page_size` per page.
pub fn page_count(item_count: usize, page_size: usize) -> CoreResult<usize> {
    if page_size == 0 {
        return Err(CoreError::invalid_argument("page size must be positive"));
    }

    Ok(item_count.div_ceil(page_size))
}
