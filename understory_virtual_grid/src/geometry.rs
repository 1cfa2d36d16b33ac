// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid geometry: columns per row, row count, and total extent.

use kurbo::{Point, Rect, Size};

use crate::util::floor_to_usize;

/// Derived layout of a uniform grid.
///
/// Recomputed whenever the available width, item size, or item count changes;
/// never mutated independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    /// Number of cells in each row. Always at least `1`.
    pub items_per_row: usize,
    /// Number of rows needed for all items.
    pub row_count: usize,
    /// Total logical size of the unvirtualized content.
    pub extent: Size,
}

impl GridGeometry {
    /// Geometry of a grid with no items.
    pub const EMPTY: Self = Self {
        items_per_row: 1,
        row_count: 0,
        extent: Size::ZERO,
    };
}

/// Returns the row containing `index` when each row holds `items_per_row`.
#[must_use]
pub const fn row_of(index: usize, items_per_row: usize) -> usize {
    index / items_per_row
}

/// Returns the column of `index` within its row.
#[must_use]
pub const fn column_of(index: usize, items_per_row: usize) -> usize {
    index % items_per_row
}

/// Returns how many cells of `item_width` fit into `available_width`.
///
/// The result is never `0`, even when the available width is smaller than one
/// item. A non-finite width also yields a single column.
#[must_use]
pub fn items_per_row(available_width: f64, item_width: f64) -> usize {
    let ratio = available_width / item_width;
    if !ratio.is_finite() {
        return 1;
    }
    floor_to_usize(ratio).max(1)
}

/// Computes the geometry of `item_count` uniform cells laid out in rows.
///
/// `item_size` must be finite and positive; see
/// [`validate_item_size`](crate::validate_item_size).
#[must_use]
pub fn compute_grid_geometry(
    available_width: f64,
    item_size: Size,
    item_count: usize,
) -> GridGeometry {
    debug_assert!(
        item_size.width > 0.0 && item_size.height > 0.0,
        "item size must be positive; got {item_size:?}"
    );
    let items_per_row = items_per_row(available_width, item_size.width);
    let row_count = item_count.div_ceil(items_per_row);
    #[allow(
        clippy::cast_precision_loss,
        reason = "Row and column counts stay far below 2^52"
    )]
    let extent = Size::new(
        items_per_row as f64 * item_size.width,
        row_count as f64 * item_size.height,
    );
    GridGeometry {
        items_per_row,
        row_count,
        extent,
    }
}

/// Replaces unconstrained (infinite or NaN) axes of `available`.
///
/// Each such axis takes the last known viewport extent when it is positive,
/// and the item extent otherwise.
#[must_use]
pub fn resolve_unconstrained(available: Size, last_viewport: Size, item_size: Size) -> Size {
    let resolve = |value: f64, viewport: f64, item: f64| {
        if value.is_finite() {
            value
        } else if viewport > 0.0 {
            viewport
        } else {
            item
        }
    };
    Size::new(
        resolve(available.width, last_viewport.width, item_size.width),
        resolve(available.height, last_viewport.height, item_size.height),
    )
}

/// Returns the viewport-relative rectangle of the cell at `index`.
#[must_use]
pub fn cell_rect(index: usize, items_per_row: usize, item_size: Size, offset: Point) -> Rect {
    let row = row_of(index, items_per_row);
    let column = column_of(index, items_per_row);
    #[allow(
        clippy::cast_precision_loss,
        reason = "Row and column counts stay far below 2^52"
    )]
    let origin = Point::new(
        column as f64 * item_size.width - offset.x,
        row as f64 * item_size.height - offset.y,
    );
    Rect::from_origin_size(origin, item_size)
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Size};

    use super::{
        GridGeometry, cell_rect, column_of, compute_grid_geometry, items_per_row,
        resolve_unconstrained, row_of,
    };

    const ITEM: Size = Size::new(128.0, 128.0);

    #[test]
    fn columns_floor_the_available_width() {
        assert_eq!(items_per_row(640.0, 128.0), 5);
        assert_eq!(items_per_row(767.9, 128.0), 5);
        assert_eq!(items_per_row(768.0, 128.0), 6);
    }

    #[test]
    fn at_least_one_column() {
        assert_eq!(items_per_row(50.0, 128.0), 1);
        assert_eq!(items_per_row(0.0, 128.0), 1);
        assert_eq!(items_per_row(f64::INFINITY, 128.0), 1);
    }

    #[test]
    fn hundred_items_in_five_columns() {
        let geometry = compute_grid_geometry(640.0, ITEM, 100);
        assert_eq!(geometry.items_per_row, 5);
        assert_eq!(geometry.row_count, 20);
        assert_eq!(geometry.extent, Size::new(640.0, 2560.0));
    }

    #[test]
    fn partial_last_row_counts_as_a_row() {
        let geometry = compute_grid_geometry(640.0, ITEM, 101);
        assert_eq!(geometry.row_count, 21);
        assert_eq!(geometry.extent.height, 21.0 * 128.0);
        assert_eq!(row_of(100, geometry.items_per_row), 20);
        assert_eq!(column_of(100, geometry.items_per_row), 0);
        assert_eq!(column_of(99, geometry.items_per_row), 4);
    }

    #[test]
    fn no_items_means_no_rows() {
        let geometry = compute_grid_geometry(640.0, ITEM, 0);
        assert_eq!(geometry.row_count, 0);
        assert_eq!(geometry.extent.height, 0.0);
        assert_eq!(GridGeometry::EMPTY.items_per_row, 1);
    }

    #[test]
    fn extent_height_matches_row_math() {
        for count in 0..40_usize {
            let geometry = compute_grid_geometry(300.0, Size::new(100.0, 30.0), count);
            assert_eq!(geometry.items_per_row, 3);
            assert_eq!(geometry.extent.height, (count.div_ceil(3) * 30) as f64);
        }
    }

    #[test]
    fn unconstrained_axes_fall_back() {
        let resolved = resolve_unconstrained(
            Size::new(f64::INFINITY, f64::INFINITY),
            Size::new(500.0, 0.0),
            ITEM,
        );
        assert_eq!(resolved, Size::new(500.0, 128.0));

        let resolved =
            resolve_unconstrained(Size::new(320.0, 200.0), Size::new(500.0, 400.0), ITEM);
        assert_eq!(resolved, Size::new(320.0, 200.0));
    }

    #[test]
    fn cells_are_offset_by_scroll_position() {
        let rect = cell_rect(7, 5, ITEM, Point::new(0.0, 100.0));
        assert_eq!(rect, Rect::new(256.0, 28.0, 384.0, 156.0));
    }
}
