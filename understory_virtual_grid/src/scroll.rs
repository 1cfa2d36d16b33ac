// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll offset state and the scroll-unit protocol.
//!
//! Every mutation resolves the requested offset against the current viewport
//! and extent, then reports which [`LayoutSignals`] the change raises. Setting
//! an offset to its current value raises nothing, so hosts can forward every
//! input event without triggering redundant layout passes.

use kurbo::{Point, Size, Vec2};

bitflags::bitflags! {
    /// Notifications raised by a state change.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct LayoutSignals: u8 {
        /// Realized containers must be recomputed (measure again).
        const RELAYOUT    = 0b0000_0001;
        /// Offset, viewport, or extent changed; scroll bars should refresh.
        const SCROLL_INFO = 0b0000_0010;
    }
}

/// One discrete scroll request, as produced by keyboard, wheel, or scroll bar input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollUnit {
    /// Up by half an item height.
    LineUp,
    /// Down by half an item height.
    LineDown,
    /// Left by one item width.
    LineLeft,
    /// Right by one item width.
    LineRight,
    /// Up by one item height.
    WheelUp,
    /// Down by one item height.
    WheelDown,
    /// Same as [`ScrollUnit::LineLeft`].
    WheelLeft,
    /// Same as [`ScrollUnit::LineRight`].
    WheelRight,
    /// Up by one viewport height.
    PageUp,
    /// Down by one viewport height.
    PageDown,
    /// Left by one viewport width.
    PageLeft,
    /// Right by one viewport width.
    PageRight,
}

/// Offset, viewport, and extent of a scrollable grid.
///
/// On each axis `0 <= offset <= max(0, extent - viewport)`, and the offset is
/// `0` whenever the viewport is at least as large as the extent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    /// Top-left of the viewport within the extent.
    pub offset: Point,
    /// Visible window size.
    pub viewport: Size,
    /// Total content size.
    pub extent: Size,
}

impl ScrollState {
    /// Largest valid offset on each axis.
    #[must_use]
    pub fn max_offset(&self) -> Vec2 {
        Vec2::new(
            (self.extent.width - self.viewport.width).max(0.0),
            (self.extent.height - self.viewport.height).max(0.0),
        )
    }
}

/// Clamps a requested offset on one axis.
fn resolve_offset(requested: f64, viewport: f64, extent: f64) -> f64 {
    if requested.is_nan() || requested < 0.0 || viewport >= extent {
        0.0
    } else {
        requested.min(extent - viewport)
    }
}

/// Owns [`ScrollState`] and implements line, wheel, and page scrolling.
#[derive(Debug, Clone)]
pub struct ScrollController {
    state: ScrollState,
    item_size: Size,
}

impl ScrollController {
    /// Creates a controller at offset zero with an empty viewport and extent.
    ///
    /// `item_size` determines line and wheel step sizes.
    #[must_use]
    pub fn new(item_size: Size) -> Self {
        Self {
            state: ScrollState::default(),
            item_size,
        }
    }

    /// Returns the full scroll state.
    #[must_use]
    pub const fn state(&self) -> ScrollState {
        self.state
    }

    /// Returns the current offset.
    #[must_use]
    pub const fn offset(&self) -> Point {
        self.state.offset
    }

    /// Returns the current viewport size.
    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.state.viewport
    }

    /// Returns the current extent.
    #[must_use]
    pub const fn extent(&self) -> Size {
        self.state.extent
    }

    /// Returns the item size used for line and wheel steps.
    #[must_use]
    pub const fn item_size(&self) -> Size {
        self.item_size
    }

    /// Sets the item size used for line and wheel steps.
    pub fn set_item_size(&mut self, item_size: Size) {
        self.item_size = item_size;
    }

    /// Returns `true` if the content is taller than the viewport.
    #[must_use]
    pub fn can_scroll_vertically(&self) -> bool {
        self.state.extent.height > self.state.viewport.height
    }

    /// Returns `true` if the content is wider than the viewport.
    #[must_use]
    pub fn can_scroll_horizontally(&self) -> bool {
        self.state.extent.width > self.state.viewport.width
    }

    /// Stores freshly measured viewport and extent sizes.
    ///
    /// Offsets are clamped into the new bounds without raising signals; this
    /// runs inside a layout pass that already accounts for the new offsets.
    pub fn update_metrics(&mut self, viewport: Size, extent: Size) {
        self.state.viewport = viewport;
        self.state.extent = extent;
        self.state.offset = Point::new(
            resolve_offset(self.state.offset.x, viewport.width, extent.width),
            resolve_offset(self.state.offset.y, viewport.height, extent.height),
        );
    }

    /// Requests a horizontal offset, clamped into the valid range.
    pub fn set_horizontal_offset(&mut self, offset: f64) -> LayoutSignals {
        let resolved = resolve_offset(offset, self.state.viewport.width, self.state.extent.width);
        if resolved == self.state.offset.x {
            return LayoutSignals::empty();
        }
        tracing::debug!(from = self.state.offset.x, to = resolved, "horizontal offset changed");
        self.state.offset.x = resolved;
        LayoutSignals::RELAYOUT | LayoutSignals::SCROLL_INFO
    }

    /// Requests a vertical offset, clamped into the valid range.
    pub fn set_vertical_offset(&mut self, offset: f64) -> LayoutSignals {
        let resolved = resolve_offset(offset, self.state.viewport.height, self.state.extent.height);
        if resolved == self.state.offset.y {
            return LayoutSignals::empty();
        }
        tracing::debug!(from = self.state.offset.y, to = resolved, "vertical offset changed");
        self.state.offset.y = resolved;
        LayoutSignals::RELAYOUT | LayoutSignals::SCROLL_INFO
    }

    fn scroll_vertically_by(&mut self, delta: f64) -> LayoutSignals {
        self.set_vertical_offset(self.state.offset.y + delta)
    }

    fn scroll_horizontally_by(&mut self, delta: f64) -> LayoutSignals {
        self.set_horizontal_offset(self.state.offset.x + delta)
    }

    /// Applies one scroll unit.
    pub fn scroll(&mut self, unit: ScrollUnit) -> LayoutSignals {
        let item = self.item_size;
        let viewport = self.state.viewport;
        match unit {
            ScrollUnit::LineUp => self.scroll_vertically_by(-item.height / 2.0),
            ScrollUnit::LineDown => self.scroll_vertically_by(item.height / 2.0),
            ScrollUnit::LineLeft | ScrollUnit::WheelLeft => {
                self.scroll_horizontally_by(-item.width)
            }
            ScrollUnit::LineRight | ScrollUnit::WheelRight => {
                self.scroll_horizontally_by(item.width)
            }
            ScrollUnit::WheelUp => self.scroll_vertically_by(-item.height),
            ScrollUnit::WheelDown => self.scroll_vertically_by(item.height),
            ScrollUnit::PageUp => self.scroll_vertically_by(-viewport.height),
            ScrollUnit::PageDown => self.scroll_vertically_by(viewport.height),
            ScrollUnit::PageLeft => self.scroll_horizontally_by(-viewport.width),
            ScrollUnit::PageRight => self.scroll_horizontally_by(viewport.width),
        }
    }

    /// Scrolls up by half an item height.
    pub fn line_up(&mut self) -> LayoutSignals {
        self.scroll(ScrollUnit::LineUp)
    }

    /// Scrolls down by half an item height.
    pub fn line_down(&mut self) -> LayoutSignals {
        self.scroll(ScrollUnit::LineDown)
    }

    /// Scrolls left by one item width.
    pub fn line_left(&mut self) -> LayoutSignals {
        self.scroll(ScrollUnit::LineLeft)
    }

    /// Scrolls right by one item width.
    pub fn line_right(&mut self) -> LayoutSignals {
        self.scroll(ScrollUnit::LineRight)
    }

    /// Scrolls up by one item height.
    pub fn wheel_up(&mut self) -> LayoutSignals {
        self.scroll(ScrollUnit::WheelUp)
    }

    /// Scrolls down by one item height.
    pub fn wheel_down(&mut self) -> LayoutSignals {
        self.scroll(ScrollUnit::WheelDown)
    }

    /// Same as [`ScrollController::line_left`].
    pub fn wheel_left(&mut self) -> LayoutSignals {
        self.scroll(ScrollUnit::WheelLeft)
    }

    /// Same as [`ScrollController::line_right`].
    pub fn wheel_right(&mut self) -> LayoutSignals {
        self.scroll(ScrollUnit::WheelRight)
    }

    /// Scrolls up by one viewport height.
    pub fn page_up(&mut self) -> LayoutSignals {
        self.scroll(ScrollUnit::PageUp)
    }

    /// Scrolls down by one viewport height.
    pub fn page_down(&mut self) -> LayoutSignals {
        self.scroll(ScrollUnit::PageDown)
    }

    /// Scrolls left by one viewport width.
    pub fn page_left(&mut self) -> LayoutSignals {
        self.scroll(ScrollUnit::PageLeft)
    }

    /// Scrolls right by one viewport width.
    pub fn page_right(&mut self) -> LayoutSignals {
        self.scroll(ScrollUnit::PageRight)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size};

    use super::{LayoutSignals, ScrollController, ScrollUnit};

    /// 100 items of 128×128 in five columns, viewed through 640×384.
    fn controller() -> ScrollController {
        let mut scroll = ScrollController::new(Size::new(128.0, 128.0));
        scroll.update_metrics(Size::new(640.0, 384.0), Size::new(640.0, 2560.0));
        scroll
    }

    #[test]
    fn negative_offsets_clamp_to_zero() {
        let mut scroll = controller();
        scroll.set_vertical_offset(100.0);
        scroll.set_vertical_offset(-50.0);
        assert_eq!(scroll.offset().y, 0.0);
    }

    #[test]
    fn large_offsets_clamp_to_end() {
        let mut scroll = controller();
        let signals = scroll.set_vertical_offset(3000.0);
        assert_eq!(scroll.offset().y, 2176.0);
        assert_eq!(signals, LayoutSignals::RELAYOUT | LayoutSignals::SCROLL_INFO);
        assert_eq!(scroll.state().max_offset().y, 2176.0);
    }

    #[test]
    fn unchanged_offset_raises_nothing() {
        let mut scroll = controller();
        assert!(scroll.set_vertical_offset(0.0).is_empty());
        assert!(!scroll.set_vertical_offset(500.0).is_empty());
        assert!(scroll.set_vertical_offset(500.0).is_empty());
        // Both requests clamp to the same end offset.
        assert!(!scroll.set_vertical_offset(9000.0).is_empty());
        assert!(scroll.set_vertical_offset(9999.0).is_empty());
    }

    #[test]
    fn viewport_covering_extent_pins_offset_to_zero() {
        let mut scroll = controller();
        // Extent width equals viewport width, so horizontal scrolling is disabled.
        assert!(scroll.set_horizontal_offset(64.0).is_empty());
        assert_eq!(scroll.offset().x, 0.0);
        assert!(!scroll.can_scroll_horizontally());
        assert!(scroll.can_scroll_vertically());
    }

    #[test]
    fn nan_requests_resolve_to_zero() {
        let mut scroll = controller();
        scroll.set_vertical_offset(300.0);
        scroll.set_vertical_offset(f64::NAN);
        assert_eq!(scroll.offset().y, 0.0);
    }

    #[test]
    fn line_wheel_and_page_steps() {
        let mut scroll = controller();
        scroll.line_down();
        assert_eq!(scroll.offset().y, 64.0);
        scroll.wheel_down();
        assert_eq!(scroll.offset().y, 192.0);
        scroll.page_down();
        assert_eq!(scroll.offset().y, 576.0);
        scroll.line_up();
        assert_eq!(scroll.offset().y, 512.0);
        scroll.wheel_up();
        assert_eq!(scroll.offset().y, 384.0);
        scroll.page_up();
        assert_eq!(scroll.offset().y, 0.0);
        scroll.page_up();
        assert_eq!(scroll.offset().y, 0.0);
    }

    #[test]
    fn horizontal_steps_use_item_width_and_viewport_width() {
        let mut scroll = ScrollController::new(Size::new(100.0, 100.0));
        scroll.update_metrics(Size::new(250.0, 250.0), Size::new(1000.0, 1000.0));
        scroll.line_right();
        assert_eq!(scroll.offset().x, 100.0);
        scroll.wheel_right();
        assert_eq!(scroll.offset().x, 200.0);
        scroll.page_right();
        assert_eq!(scroll.offset().x, 450.0);
        scroll.wheel_left();
        assert_eq!(scroll.offset().x, 350.0);
        scroll.page_left();
        assert_eq!(scroll.offset().x, 100.0);
        scroll.line_left();
        assert_eq!(scroll.offset().x, 0.0);
        assert_eq!(
            scroll.scroll(ScrollUnit::PageRight),
            LayoutSignals::RELAYOUT | LayoutSignals::SCROLL_INFO
        );
    }

    #[test]
    fn shrinking_extent_reclamps_offset() {
        let mut scroll = controller();
        scroll.set_vertical_offset(2000.0);
        scroll.update_metrics(Size::new(640.0, 384.0), Size::new(640.0, 1024.0));
        assert_eq!(scroll.offset(), Point::new(0.0, 640.0));
        scroll.update_metrics(Size::new(640.0, 2000.0), Size::new(640.0, 1024.0));
        assert_eq!(scroll.offset().y, 0.0);
    }
}
