// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout engine that ties geometry, ranges, scrolling, and recycling together.

use kurbo::{Rect, Size};

use crate::geometry::{
    cell_rect, compute_grid_geometry, items_per_row, resolve_unconstrained, row_of,
};
use crate::range::compute_visible_range;
use crate::scroll::{LayoutSignals, ScrollController, ScrollState, ScrollUnit};
use crate::window::{ContainerHost, ContainerWindow};
use crate::{ConfigError, GridConfig, GridGeometry, ItemChange, VisibleRange, validate_item_size};

/// Receives the engine's invalidation signals.
///
/// Both methods default to doing nothing; `()` is the no-op observer.
pub trait LayoutObserver {
    /// The realized window is stale; the host should schedule a measure pass.
    fn relayout_required(&mut self) {}

    /// Offset, viewport, or extent changed; scroll bars should refresh.
    fn scroll_info_changed(&mut self) {}
}

impl LayoutObserver for () {}

/// Virtualizing layout for a uniform grid.
///
/// The host drives it with [`GridLayout::measure`] and [`GridLayout::arrange`]
/// whenever the size, the item count, or the offset changes, and forwards
/// scroll input through the scroll-unit methods. The engine owns the scroll
/// state and the index-to-container bindings; the containers themselves stay
/// with the host's [`ContainerHost`].
///
/// All work happens synchronously on the caller's thread.
#[derive(Debug)]
pub struct GridLayout<C, O: LayoutObserver = ()> {
    config: GridConfig,
    scroll: ScrollController,
    window: ContainerWindow<C>,
    geometry: GridGeometry,
    range: VisibleRange,
    observer: O,
}

impl<C> GridLayout<C> {
    /// Creates an engine without an observer.
    pub fn new(config: GridConfig) -> Result<Self, ConfigError> {
        Self::with_observer(config, ())
    }
}

macro_rules! scroll_units {
    ($($(#[$meta:meta])* $name:ident => $unit:ident;)*) => {
        $(
            $(#[$meta])*
            pub fn $name(&mut self) {
                self.scroll(ScrollUnit::$unit);
            }
        )*
    };
}

impl<C, O: LayoutObserver> GridLayout<C, O> {
    /// Creates an engine that reports signals to `observer`.
    ///
    /// Fails if `config` does not validate.
    pub fn with_observer(config: GridConfig, observer: O) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            scroll: ScrollController::new(config.item_size),
            window: ContainerWindow::new(),
            geometry: GridGeometry::EMPTY,
            range: VisibleRange::EMPTY,
            observer,
        })
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Returns the uniform item size.
    #[must_use]
    pub const fn item_size(&self) -> Size {
        self.config.item_size
    }

    /// Returns the geometry from the last measure pass.
    #[must_use]
    pub const fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    /// Returns the buffered range realized by the last measure pass.
    #[must_use]
    pub const fn visible_range(&self) -> VisibleRange {
        self.range
    }

    /// Returns offset, viewport, and extent.
    #[must_use]
    pub const fn scroll_state(&self) -> ScrollState {
        self.scroll.state()
    }

    /// Returns the scroll controller, for read-only queries.
    #[must_use]
    pub const fn scroll_controller(&self) -> &ScrollController {
        &self.scroll
    }

    /// Returns the realized container window.
    #[must_use]
    pub const fn window(&self) -> &ContainerWindow<C> {
        &self.window
    }

    /// Returns the observer.
    #[must_use]
    pub const fn observer(&self) -> &O {
        &self.observer
    }

    /// Returns the observer mutably.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    fn notify(&mut self, signals: LayoutSignals) {
        if signals.contains(LayoutSignals::RELAYOUT) {
            self.observer.relayout_required();
        }
        if signals.contains(LayoutSignals::SCROLL_INFO) {
            self.observer.scroll_info_changed();
        }
    }

    /// Measures the grid for `available` space and realizes the visible containers.
    ///
    /// Unconstrained axes fall back to the last viewport, then to the item size.
    /// Returns the resolved size, which also becomes the viewport.
    pub fn measure<H>(&mut self, available: Size, item_count: usize, host: &mut H) -> Size
    where
        H: ContainerHost<Container = C>,
    {
        let item_size = self.config.item_size;
        let available = resolve_unconstrained(available, self.scroll.viewport(), item_size);

        if item_count == 0 {
            let detached = self.window.clear(host);
            self.geometry = GridGeometry::EMPTY;
            self.range = VisibleRange::EMPTY;
            let extent = Size::new(available.width, 0.0);
            self.scroll.update_metrics(available, extent);
            tracing::trace!(detached, "measured empty grid");
            self.notify(LayoutSignals::SCROLL_INFO);
            return available;
        }

        let geometry = compute_grid_geometry(available.width, item_size, item_count);
        self.scroll.update_metrics(available, geometry.extent);
        let range = compute_visible_range(
            self.scroll.offset().y,
            available.height,
            item_size.height,
            geometry.items_per_row,
            item_count,
            self.config.buffer_rows,
        );
        tracing::trace!(
            items_per_row = geometry.items_per_row,
            row_count = geometry.row_count,
            first = range.first(),
            last = range.last(),
            "measured grid"
        );
        self.window.reconcile(range, item_size, host);
        self.geometry = geometry;
        self.range = range;
        self.notify(LayoutSignals::SCROLL_INFO);
        available
    }

    /// Places realized containers into their grid cells, shifted by the offset.
    ///
    /// Columns are recomputed from `final_size.width`. Returns `final_size`.
    pub fn arrange<H>(&mut self, final_size: Size, host: &mut H) -> Size
    where
        H: ContainerHost<Container = C>,
    {
        if self.window.is_empty() {
            return final_size;
        }
        let item_size = self.config.item_size;
        let per_row = items_per_row(final_size.width, item_size.width);
        let offset = self.scroll.offset();
        let place = |index| cell_rect(index, per_row, item_size, offset);
        self.window.arrange(host, place);
        tracing::trace!(count = self.window.len(), per_row, "arranged containers");
        final_size
    }

    /// Scrolls so the row containing `index` sits at the top of the viewport.
    ///
    /// Does nothing when `index >= item_count`. Only the vertical offset moves,
    /// and the row is always aligned to the top edge, even if it was already
    /// visible.
    pub fn bring_into_view(&mut self, index: usize, item_count: usize) {
        if index >= item_count {
            return;
        }
        self.scroll_row_to_top(index);
    }

    /// Scrolls so the row holding `container` sits at the top of the viewport.
    ///
    /// `rect` is accepted for parity with toolkit scroll-into-view requests but
    /// only row granularity is honored; it is returned unchanged. Containers
    /// not in the window are ignored.
    pub fn make_visible(&mut self, container: &C, rect: Rect) -> Rect
    where
        C: PartialEq,
    {
        let index = self
            .window
            .position_of_container(container)
            .and_then(|position| self.window.index_at(position));
        if let Some(index) = index {
            self.scroll_row_to_top(index);
        }
        rect
    }

    fn scroll_row_to_top(&mut self, index: usize) {
        let item_size = self.config.item_size;
        let per_row = items_per_row(self.scroll.viewport().width, item_size.width);
        let row = row_of(index, per_row);
        #[allow(
            clippy::cast_precision_loss,
            reason = "Row counts stay far below 2^52"
        )]
        let target = row as f64 * item_size.height;
        let signals = self.scroll.set_vertical_offset(target);
        self.notify(signals);
    }

    /// Requests a horizontal offset; see [`ScrollController::set_horizontal_offset`].
    pub fn set_horizontal_offset(&mut self, offset: f64) {
        let signals = self.scroll.set_horizontal_offset(offset);
        self.notify(signals);
    }

    /// Requests a vertical offset; see [`ScrollController::set_vertical_offset`].
    pub fn set_vertical_offset(&mut self, offset: f64) {
        let signals = self.scroll.set_vertical_offset(offset);
        self.notify(signals);
    }

    /// Applies one scroll unit.
    pub fn scroll(&mut self, unit: ScrollUnit) {
        let signals = self.scroll.scroll(unit);
        self.notify(signals);
    }

    scroll_units! {
        /// Scrolls up by half an item height.
        line_up => LineUp;
        /// Scrolls down by half an item height.
        line_down => LineDown;
        /// Scrolls left by one item width.
        line_left => LineLeft;
        /// Scrolls right by one item width.
        line_right => LineRight;
        /// Scrolls up by one item height.
        wheel_up => WheelUp;
        /// Scrolls down by one item height.
        wheel_down => WheelDown;
        /// Scrolls left by one item width.
        wheel_left => WheelLeft;
        /// Scrolls right by one item width.
        wheel_right => WheelRight;
        /// Scrolls up by one viewport height.
        page_up => PageUp;
        /// Scrolls down by one viewport height.
        page_down => PageDown;
        /// Scrolls left by one viewport width.
        page_left => PageLeft;
        /// Scrolls right by one viewport width.
        page_right => PageRight;
    }

    /// Updates container bindings after the item collection changed.
    pub fn items_changed<H>(&mut self, change: ItemChange, host: &mut H)
    where
        H: ContainerHost<Container = C>,
    {
        let detached = self.window.apply_item_change(change, host);
        tracing::debug!(?change, detached, "items changed");
        self.notify(LayoutSignals::RELAYOUT);
    }

    /// Changes the uniform item size.
    ///
    /// Rejects non-finite or non-positive sizes without changing anything.
    pub fn set_item_size(&mut self, item_size: Size) -> Result<(), ConfigError> {
        let item_size = validate_item_size(item_size)?;
        if item_size == self.config.item_size {
            return Ok(());
        }
        self.config.item_size = item_size;
        self.scroll.set_item_size(item_size);
        self.notify(LayoutSignals::RELAYOUT);
        Ok(())
    }

    /// Grows or shrinks square items by `delta`, clamped to the configured limits.
    ///
    /// Returns the resulting item extent. Non-finite deltas are ignored.
    pub fn zoom(&mut self, delta: f64) -> f64 {
        let current = self.config.item_size.width;
        if !delta.is_finite() {
            return current;
        }
        let extent =
            (current + delta).clamp(self.config.min_item_extent, self.config.max_item_extent);
        let size = Size::new(extent, extent);
        if size != self.config.item_size {
            self.config.item_size = size;
            self.scroll.set_item_size(size);
            self.notify(LayoutSignals::RELAYOUT);
        }
        extent
    }
}
