// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Clamps negative, NaN, and infinite lengths to `0.0`.
#[inline]
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Rounds toward negative infinity and converts to `isize`.
///
/// Values outside the `isize` range saturate. NaN maps to zero.
#[inline]
pub(crate) fn floor_to_isize(value: f64) -> isize {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Saturating float-to-int casts are the intended behavior here"
    )]
    let truncated = value as isize;
    #[allow(
        clippy::cast_precision_loss,
        reason = "Only used to compare against the original value"
    )]
    let back = truncated as f64;
    if back > value {
        truncated.saturating_sub(1)
    } else {
        truncated
    }
}

/// Converts an index or count to the layout scalar.
#[inline]
pub(crate) fn to_scalar(value: isize) -> f64 {
    #[allow(
        clippy::cast_precision_loss,
        reason = "Page and row counts stay far below 2^52"
    )]
    let value = value as f64;
    value
}
