// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid configuration and its validation.
//!
//! Item dimensions are a precondition of every geometry computation, so they
//! are checked once here rather than during layout.

use kurbo::Size;

/// Default item width and height, in logical pixels.
pub const DEFAULT_ITEM_EXTENT: f64 = 128.0;

/// Default number of lookahead rows realized on each side of the viewport.
pub const DEFAULT_BUFFER_ROWS: usize = 2;

/// Default lower bound for [`GridLayout::zoom`](crate::GridLayout::zoom).
pub const DEFAULT_MIN_ITEM_EXTENT: f64 = 64.0;

/// Default upper bound for [`GridLayout::zoom`](crate::GridLayout::zoom).
pub const DEFAULT_MAX_ITEM_EXTENT: f64 = 512.0;

/// Errors reported when a grid configuration is malformed.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Item width or height is zero, negative, or not finite.
    #[error("item size must be finite and positive, got {width}x{height}")]
    InvalidItemSize {
        /// Offending width.
        width: f64,
        /// Offending height.
        height: f64,
    },
    /// Zoom limits are not finite, not positive, or inverted.
    #[error("item extent limits must satisfy 0 < min <= max, got [{min}, {max}]")]
    InvalidExtentLimits {
        /// Offending lower bound.
        min: f64,
        /// Offending upper bound.
        max: f64,
    },
}

/// Configuration for a [`GridLayout`](crate::GridLayout).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Uniform size of every grid cell.
    pub item_size: Size,
    /// Rows of lookahead realized before and after the visible rows.
    pub buffer_rows: usize,
    /// Smallest square item extent reachable through zooming.
    pub min_item_extent: f64,
    /// Largest square item extent reachable through zooming.
    pub max_item_extent: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            item_size: Size::new(DEFAULT_ITEM_EXTENT, DEFAULT_ITEM_EXTENT),
            buffer_rows: DEFAULT_BUFFER_ROWS,
            min_item_extent: DEFAULT_MIN_ITEM_EXTENT,
            max_item_extent: DEFAULT_MAX_ITEM_EXTENT,
        }
    }
}

impl GridConfig {
    /// Creates a configuration with the given item size and default buffering.
    #[must_use]
    pub fn new(item_size: Size) -> Self {
        Self {
            item_size,
            ..Self::default()
        }
    }

    /// Sets the number of lookahead rows on each side of the viewport.
    #[must_use]
    pub fn with_buffer_rows(mut self, buffer_rows: usize) -> Self {
        self.buffer_rows = buffer_rows;
        self
    }

    /// Sets the range that zooming clamps square item extents into.
    #[must_use]
    pub fn with_item_extent_limits(mut self, min: f64, max: f64) -> Self {
        self.min_item_extent = min;
        self.max_item_extent = max;
        self
    }

    /// Checks every field, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_item_size(self.item_size)?;
        let (min, max) = (self.min_item_extent, self.max_item_extent);
        if !(min.is_finite() && max.is_finite()) || min <= 0.0 || min > max {
            return Err(ConfigError::InvalidExtentLimits { min, max });
        }
        Ok(())
    }
}

/// Returns `size` unchanged if both dimensions are finite and positive.
pub fn validate_item_size(size: Size) -> Result<Size, ConfigError> {
    if size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
    {
        Ok(size)
    } else {
        Err(ConfigError::InvalidItemSize {
            width: size.width,
            height: size.height,
        })
    }
}
