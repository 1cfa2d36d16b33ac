// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Float-to-count conversions that do not need `std` or `libm`.

/// Rounds a ratio down to a count.
///
/// Negative values and NaN map to `0`; values past `usize::MAX` saturate.
#[inline]
pub(crate) fn floor_to_usize(ratio: f64) -> usize {
    if ratio.is_nan() || ratio <= 0.0 {
        return 0;
    }
    // `as` truncates toward zero, which is `floor` for positive values.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Value is positive and the cast saturates"
    )]
    let truncated = ratio as usize;
    truncated
}

/// Rounds a ratio up to a count.
///
/// Negative values and NaN map to `0`; values past `usize::MAX` saturate.
#[inline]
pub(crate) fn ceil_to_usize(ratio: f64) -> usize {
    let truncated = floor_to_usize(ratio);
    #[allow(
        clippy::cast_precision_loss,
        reason = "Only used to detect a fractional remainder"
    )]
    let whole = truncated as f64;
    if whole < ratio {
        truncated.saturating_add(1)
    } else {
        truncated
    }
}
