// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item frames within a single row, plus visibility queries over them.

use alloc::vec::Vec;
use core::ops::Range;

use kurbo::Rect;

use crate::util::finite_or_zero;

/// Absolute frames for the items of one row.
///
/// Frames are stored by position within the row (not by item index) and are
/// laid out left to right, so their `x0` values are sorted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowLayout {
    frames: Vec<Rect>,
    content_width: f64,
}

impl RowLayout {
    /// Lays out items of the given widths.
    ///
    /// - `item_height`: height shared by every item.
    /// - `spacing`: leading gap and gap between items.
    /// - `band_height`: height of the band the row is drawn in.
    /// - `centered`: vertically center items in the band instead of
    ///   top-aligning them.
    #[must_use]
    pub fn new<I>(widths: I, item_height: f64, spacing: f64, band_height: f64, centered: bool) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let item_height = finite_or_zero(item_height);
        let spacing = finite_or_zero(spacing);
        let y = if centered {
            ((finite_or_zero(band_height) - item_height) / 2.0).max(0.0)
        } else {
            0.0
        };

        let mut x = spacing;
        let frames = widths
            .into_iter()
            .map(|width| {
                let width = finite_or_zero(width);
                let frame = Rect::new(x, y, x + width, y + item_height);
                x += width + spacing;
                frame
            })
            .collect();

        Self {
            frames,
            content_width: x,
        }
    }

    /// Number of laid out items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if the row has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Total width of the row's content, including leading and trailing spacing.
    #[must_use]
    pub const fn content_width(&self) -> f64 {
        self.content_width
    }

    /// Frame of the item at `position`.
    #[must_use]
    pub fn frame(&self, position: usize) -> Option<Rect> {
        self.frames.get(position).copied()
    }

    /// All frames in position order.
    #[must_use]
    pub fn frames(&self) -> &[Rect] {
        &self.frames
    }

    /// Positions whose frames overlap `rect`.
    ///
    /// Frames that only touch an edge of `rect` are not included.
    pub fn positions_in(&self, rect: Rect) -> impl Iterator<Item = usize> + '_ {
        self.frames
            .iter()
            .enumerate()
            .filter(move |(_, f)| {
                f.x0 < rect.x1 && rect.x0 < f.x1 && f.y0 < rect.y1 && rect.y0 < f.y1
            })
            .map(|(position, _)| position)
    }

    /// Positions horizontally overlapping a viewport at `offset`.
    ///
    /// `overscan` widens the viewport on both sides to realize items slightly
    /// before they scroll in. The result is always a contiguous range because
    /// frames never overlap each other.
    #[must_use]
    pub fn visible_range(&self, offset: f64, viewport_width: f64, overscan: f64) -> Range<usize> {
        let viewport_width = finite_or_zero(viewport_width);
        let overscan = finite_or_zero(overscan);
        if self.frames.is_empty() || viewport_width == 0.0 || !offset.is_finite() {
            return 0..0;
        }

        let min = offset - overscan;
        let max = offset + viewport_width + overscan;

        // First frame whose trailing edge passes `min`, then everything that
        // starts before `max`.
        let start = self.frames.partition_point(|f| f.x1 <= min);
        let end = start + self.frames[start..].partition_point(|f| f.x0 < max);
        start..end
    }
}
