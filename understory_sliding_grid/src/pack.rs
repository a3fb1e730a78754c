// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Round-robin packing of a flat item sequence into a bounded number of rows.

use alloc::vec;
use alloc::vec::Vec;

use crate::util::finite_or_zero;

/// Items partitioned into rows.
///
/// Every item index `0..item_count` appears in exactly one row, rows are never
/// empty, and items inside a row keep their source order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowGrid {
    rows: Vec<Vec<usize>>,
    item_count: usize,
}

impl RowGrid {
    /// Creates an empty grid.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: Vec::new(),
            item_count: 0,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the grid holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of items across all rows.
    #[must_use]
    pub const fn item_count(&self) -> usize {
        self.item_count
    }

    /// Item indices of `row`, in display order.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[usize]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// Iterates over all rows in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[usize]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Item index at `position` within `row`.
    #[must_use]
    pub fn item_at(&self, row: usize, position: usize) -> Option<usize> {
        self.rows.get(row)?.get(position).copied()
    }

    /// Finds the row holding `item` and the item's position inside it.
    #[must_use]
    pub fn locate(&self, item: usize) -> Option<(usize, usize)> {
        if item >= self.item_count {
            return None;
        }
        self.rows.iter().enumerate().find_map(|(row, items)| {
            // Rows are sorted by item index, so a binary search is enough.
            items.binary_search(&item).ok().map(|position| (row, position))
        })
    }
}

/// Packs items into at most `row_count` rows.
///
/// Items are visited in source order while a running fill width is kept for
/// the current row, starting at `spacing`. Once the row holds at least one
/// item and the next item would reach `container_width`, packing moves on to
/// the next row, wrapping back to row 0 after the last one. Consecutive items
/// therefore stack vertically inside one page before flowing to the next page.
///
/// Items wider than the container are not clamped; they simply start a fresh
/// page of their own. Rows left empty (fewer items than rows) are dropped.
#[must_use]
pub fn pack_rows(widths: &[f64], container_width: f64, spacing: f64, row_count: usize) -> RowGrid {
    if widths.is_empty() {
        return RowGrid::new();
    }

    let row_count = row_count.max(1);
    let spacing = finite_or_zero(spacing);
    let mut rows: Vec<Vec<usize>> = vec![Vec::new(); row_count];
    let mut row = 0;
    let mut fill = spacing;

    for (index, &width) in widths.iter().enumerate() {
        debug_assert!(
            width.is_finite(),
            "item widths must be finite; got {width:?} at {index}"
        );
        let width = finite_or_zero(width);

        if fill > spacing && fill + width >= container_width {
            row = if row + 1 == row_count { 0 } else { row + 1 };
            fill = spacing;
        }

        rows[row].push(index);
        fill += width + spacing;
    }

    rows.retain(|items| !items.is_empty());

    RowGrid {
        rows,
        item_count: widths.len(),
    }
}
