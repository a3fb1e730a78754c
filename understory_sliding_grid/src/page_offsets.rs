// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-row page start offsets.

use alloc::vec::Vec;

use crate::RowGrid;
use crate::util::finite_or_zero;

/// Content offsets at which each page of each row begins.
///
/// Page 0 of every row starts at `0.0` and is not stored; only the boundaries
/// that open pages `1..` are kept. Lookups past the end of a row return
/// `None` so callers can substitute their own fallback.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageOffsetTable {
    boundaries: Vec<Vec<f64>>,
}

impl PageOffsetTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            boundaries: Vec::new(),
        }
    }

    /// Number of rows covered by the table.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.boundaries.len()
    }

    /// Returns `true` if the table covers no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// Offset at which `page` of `row` begins.
    ///
    /// Returns `Some(0.0)` for page 0 of any existing row and `None` for rows
    /// or pages that do not exist.
    #[must_use]
    pub fn page_start(&self, row: usize, page: usize) -> Option<f64> {
        let boundaries = self.boundaries.get(row)?;
        match page {
            0 => Some(0.0),
            p => boundaries.get(p - 1).copied(),
        }
    }

    /// Number of pages in `row`, or zero for a missing row.
    #[must_use]
    pub fn page_count(&self, row: usize) -> usize {
        self.boundaries.get(row).map_or(0, |b| b.len() + 1)
    }

    /// Largest page count across all rows.
    #[must_use]
    pub fn max_page_count(&self) -> usize {
        self.boundaries
            .iter()
            .map(|b| b.len() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Number of page indices with a recorded boundary in at least one row.
    ///
    /// This is the number of global pages the shared scroll surface can
    /// advance by before every row has run out of content.
    #[must_use]
    pub fn boundary_count(&self) -> usize {
        self.boundaries.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Width of the shared scroll content for a container of `container_width`.
    ///
    /// One page of slack is kept past the last boundary so the final page can
    /// be overscrolled.
    #[must_use]
    pub fn content_width(&self, container_width: f64) -> f64 {
        let pages = self.boundary_count() + 1;
        #[allow(
            clippy::cast_precision_loss,
            reason = "Page counts stay far below 2^52"
        )]
        let pages = pages as f64;
        pages * finite_or_zero(container_width)
    }

    /// Stored boundaries of `row` (page starts for pages `1..`).
    #[must_use]
    pub fn boundaries(&self, row: usize) -> &[f64] {
        self.boundaries.get(row).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Computes page start offsets for every row of `grid`.
///
/// Each row is walked on its own, accumulating width from `spacing`. When a
/// page already holds an item and the next item would reach `container_width`,
/// the page closes: the next page starts at the previous page start plus the
/// width travelled so far (minus the trailing spacing), and the item that
/// forced the wrap opens the new page.
///
/// `widths` is indexed by item index; missing entries count as zero width.
#[must_use]
pub fn compute_page_offsets(
    grid: &RowGrid,
    widths: &[f64],
    container_width: f64,
    spacing: f64,
) -> PageOffsetTable {
    let spacing = finite_or_zero(spacing);
    let boundaries = grid
        .rows()
        .map(|items| {
            let mut row_boundaries = Vec::new();
            let mut page_start = 0.0;
            let mut row_width = spacing;
            for &item in items {
                let width = finite_or_zero(widths.get(item).copied().unwrap_or(0.0));
                if row_width > spacing && row_width + width >= container_width {
                    page_start += row_width - spacing;
                    row_boundaries.push(page_start);
                    row_width = spacing;
                }
                row_width += width + spacing;
            }
            row_boundaries
        })
        .collect();

    PageOffsetTable { boundaries }
}
