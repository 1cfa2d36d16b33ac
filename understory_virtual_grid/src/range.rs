// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visible index ranges over a uniform grid.

use core::ops::RangeInclusive;

use crate::util::{ceil_to_usize, floor_to_usize};

/// An inclusive range of item indices, possibly empty.
///
/// A non-empty range always satisfies `first <= last`, and ranges produced by
/// [`compute_visible_range`] stay within `0..item_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisibleRange {
    // Half-open internally so that the empty range needs no sentinel.
    start: usize,
    end: usize,
}

impl VisibleRange {
    /// A range containing no indices.
    pub const EMPTY: Self = Self { start: 0, end: 0 };

    /// Creates the inclusive range `first..=last`.
    ///
    /// Returns [`VisibleRange::EMPTY`] when `last < first`.
    #[must_use]
    pub const fn inclusive(first: usize, last: usize) -> Self {
        if last < first {
            Self::EMPTY
        } else {
            Self {
                start: first,
                end: last.saturating_add(1),
            }
        }
    }

    /// Returns `true` if the range holds no indices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Number of indices in the range.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// First index, if any.
    #[must_use]
    pub const fn first(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.start)
        }
    }

    /// Last index (inclusive), if any.
    #[must_use]
    pub const fn last(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.end - 1)
        }
    }

    /// Returns `(first, last)` for a non-empty range.
    #[must_use]
    pub const fn bounds(&self) -> Option<(usize, usize)> {
        if self.is_empty() {
            None
        } else {
            Some((self.start, self.end - 1))
        }
    }

    /// Returns `true` if `index` lies within the range.
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    /// Iterates the indices in ascending order.
    pub fn indices(&self) -> RangeInclusive<usize> {
        match self.bounds() {
            Some((first, last)) => first..=last,
            #[allow(
                clippy::reversed_empty_ranges,
                reason = "An empty inclusive range is exactly what is wanted"
            )]
            None => 1..=0,
        }
    }

    /// Grows the range by `amount` indices on each side, clamped to `0..item_count`.
    #[must_use]
    pub fn expand(self, amount: usize, item_count: usize) -> Self {
        match self.bounds() {
            Some((first, last)) if item_count > 0 => Self::inclusive(
                first.saturating_sub(amount),
                last.saturating_add(amount).min(item_count - 1),
            ),
            _ => Self::EMPTY,
        }
    }
}

/// Computes the indices whose rows intersect `[offset_y, offset_y + viewport_height]`.
///
/// Every row touching the viewport is covered in full, including a partially
/// visible last row. `items_per_row` must be non-zero.
#[must_use]
pub fn compute_raw_visible_range(
    offset_y: f64,
    viewport_height: f64,
    item_height: f64,
    items_per_row: usize,
    item_count: usize,
) -> VisibleRange {
    if item_count == 0 {
        return VisibleRange::EMPTY;
    }
    debug_assert!(items_per_row > 0, "items_per_row must be non-zero");
    let items_per_row = items_per_row.max(1);

    let max_row = item_count.div_ceil(items_per_row) - 1;
    // A stale offset can point past the content after the item count shrinks.
    let first_row = floor_to_usize(offset_y / item_height).min(max_row);
    let last_row = ceil_to_usize((offset_y + viewport_height) / item_height)
        .saturating_sub(1)
        .min(max_row);

    let start = first_row * items_per_row;
    let end = (last_row + 1)
        .saturating_mul(items_per_row)
        .saturating_sub(1)
        .min(item_count - 1)
        .max(start);
    VisibleRange::inclusive(start, end)
}

/// Computes the indices to realize: the visible rows plus `buffer_rows` of lookahead.
///
/// The lookahead is `items_per_row * buffer_rows` items on each side, so it
/// covers whole rows regardless of grid width, and is clamped to
/// `0..item_count`.
#[must_use]
pub fn compute_visible_range(
    offset_y: f64,
    viewport_height: f64,
    item_height: f64,
    items_per_row: usize,
    item_count: usize,
    buffer_rows: usize,
) -> VisibleRange {
    compute_raw_visible_range(
        offset_y,
        viewport_height,
        item_height,
        items_per_row,
        item_count,
    )
    .expand(items_per_row.saturating_mul(buffer_rows), item_count)
}
