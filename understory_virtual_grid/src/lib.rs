// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_virtual_grid --heading-base-level=0

//! Understory Virtual Grid: virtualized layout and scrolling for uniform grids.
//!
//! This crate lays out a large, ordered collection of same-sized items as rows
//! of cells and keeps only the cells near the viewport realized. It is
//! renderer-agnostic: hosts supply containers and draw them, the crate decides
//! which indices need one and where each goes.
//!
//! The core pieces, leaves first:
//!
//! - [`compute_grid_geometry`]: columns per row, row count, and total extent
//!   from the available width, the item size, and the item count.
//! - [`compute_visible_range`]: the inclusive index range whose rows intersect
//!   the viewport, widened by a lookahead buffer of whole rows.
//! - [`ScrollController`]: offset state with clamping and the line, wheel, and
//!   page scroll units. Each mutation reports [`LayoutSignals`].
//! - [`ContainerWindow`]: index-to-container bindings, reconciled against a
//!   [`VisibleRange`] by checking containers out of, and back into, a
//!   [`ContainerHost`].
//! - [`GridLayout`]: the engine a host drives with `measure` and `arrange`,
//!   forwarding signals to a [`LayoutObserver`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use understory_virtual_grid::{ContainerHost, GridConfig, GridLayout};
//!
//! /// Containers are plain ids; the "visual tree" is a list of them.
//! #[derive(Default)]
//! struct Host {
//!     children: Vec<usize>,
//! }
//!
//! impl ContainerHost for Host {
//!     type Container = usize;
//!
//!     fn checkout(&mut self, index: usize) -> Option<usize> {
//!         Some(index)
//!     }
//!
//!     fn attach(&mut self, position: usize, container: &usize) {
//!         self.children.insert(position, *container);
//!     }
//!
//!     fn detach(&mut self, position: usize, _container: usize) {
//!         self.children.remove(position);
//!     }
//!
//!     fn arrange(&mut self, _container: &mut usize, _rect: Rect) {}
//! }
//!
//! // 128×128 cells in a 640×384 viewport: five columns, three visible rows.
//! let mut layout = GridLayout::new(GridConfig::new(Size::new(128.0, 128.0))).unwrap();
//! let mut host = Host::default();
//! let viewport = Size::new(640.0, 384.0);
//!
//! layout.measure(viewport, 100, &mut host);
//! assert_eq!(layout.geometry().items_per_row, 5);
//! // Rows 0..=2 are visible; two more rows of lookahead follow.
//! assert_eq!(layout.visible_range().bounds(), Some((0, 24)));
//!
//! layout.set_vertical_offset(1280.0);
//! layout.measure(viewport, 100, &mut host);
//! layout.arrange(viewport, &mut host);
//! assert_eq!(layout.visible_range().bounds(), Some((40, 74)));
//! assert_eq!(host.children.len(), 35);
//! ```
//!
//! ## Scrolling policy
//!
//! [`GridLayout::bring_into_view`] and [`GridLayout::make_visible`] align the
//! target's row with the top of the viewport. They do not scroll minimally,
//! center, or move horizontally.
//!
//! ## Features
//!
//! - `std` *(default)*: enables `kurbo/std`.
//! - `libm`: enables `kurbo/libm` for `no_std` targets.
//!
//! Item sizes must be finite and positive; [`GridConfig::validate`] checks this
//! when an engine is created.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod geometry;
mod layout;
mod range;
mod scroll;
mod source;
mod util;
mod window;

pub use config::{
    ConfigError, DEFAULT_BUFFER_ROWS, DEFAULT_ITEM_EXTENT, DEFAULT_MAX_ITEM_EXTENT,
    DEFAULT_MIN_ITEM_EXTENT, GridConfig, validate_item_size,
};
pub use geometry::{
    GridGeometry, cell_rect, column_of, compute_grid_geometry, items_per_row, resolve_unconstrained,
    row_of,
};
pub use layout::{GridLayout, LayoutObserver};
pub use range::{VisibleRange, compute_raw_visible_range, compute_visible_range};
pub use scroll::{LayoutSignals, ScrollController, ScrollState, ScrollUnit};
pub use source::{ItemChange, ItemSource};
pub use window::{ContainerHost, ContainerWindow, ReconcileStats};
