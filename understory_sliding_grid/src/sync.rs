// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Translation of one global scroll offset into per-row content offsets.
//!
//! The shared scroll surface pages in whole container widths. Each row pages
//! by its own, uneven page starts. For a global offset inside global page `p`
//! a row interpolates from the start of its page `p` towards the start of its
//! page `p + 1`, so every row lands on its own page boundary exactly when the
//! shared surface lands on a multiple of the container width.

use smallvec::SmallVec;

use crate::PageOffsetTable;
use crate::util::{finite_or_zero, floor_to_isize, to_scalar};

/// A global scroll offset split into a whole page and the fraction into it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageProgress {
    /// Global page index; negative while overscrolling before the first page.
    pub page: isize,
    /// Fraction of the way through `page`, in `[0, 1)`.
    pub progress: f64,
}

impl PageProgress {
    /// Splits `global_offset` into pages of `container_width`.
    ///
    /// A non-positive container width or non-finite offset yields page 0 with
    /// no progress.
    #[must_use]
    pub fn from_offset(global_offset: f64, container_width: f64) -> Self {
        let container_width = finite_or_zero(container_width);
        if container_width == 0.0 || !global_offset.is_finite() {
            return Self {
                page: 0,
                progress: 0.0,
            };
        }
        let total = global_offset / container_width;
        let page = floor_to_isize(total);
        // Guard against rounding pushing the fraction to exactly 1.
        let progress = (total - to_scalar(page)).clamp(0.0, 1.0);
        if progress >= 1.0 {
            Self {
                page: page.saturating_add(1),
                progress: 0.0,
            }
        } else {
            Self { page, progress }
        }
    }
}

/// Start of `page` in `row`, or the synthetic `page * container_width` when the
/// row has no such page.
fn page_start_or_fallback(
    table: &PageOffsetTable,
    row: usize,
    page: isize,
    container_width: f64,
) -> f64 {
    usize::try_from(page)
        .ok()
        .and_then(|page| table.page_start(row, page))
        .unwrap_or_else(|| to_scalar(page) * container_width)
}

/// Content offset of `row` at the given global page progress.
///
/// Rows with fewer pages than the global page index fall back to pages spaced
/// exactly one container width apart, so they settle instead of running off
/// their table. The per-page travel is capped at one container width so rows
/// with sparse, wide pages never overshoot.
#[must_use]
pub fn row_offset(
    table: &PageOffsetTable,
    row: usize,
    at: PageProgress,
    container_width: f64,
) -> f64 {
    let container_width = finite_or_zero(container_width);
    if container_width == 0.0 {
        return 0.0;
    }
    let previous = page_start_or_fallback(table, row, at.page, container_width);
    let next = page_start_or_fallback(table, row, at.page.saturating_add(1), container_width);
    previous + container_width.min(next - previous) * at.progress
}

/// Portion of the leading inset to subtract at the given progress.
///
/// Ramps from nothing to the full inset across page 0 and stays at full
/// strength afterwards.
#[must_use]
pub fn leading_inset_adjustment(leading_inset: f64, at: PageProgress) -> f64 {
    let leading_inset = finite_or_zero(leading_inset);
    match at.page {
        p if p < 0 => 0.0,
        0 => leading_inset * at.progress,
        _ => leading_inset,
    }
}

/// Largest global offset the shared scroll surface can rest at.
#[must_use]
pub fn max_global_offset(content_width: f64, container_width: f64) -> f64 {
    (finite_or_zero(content_width) - finite_or_zero(container_width)).max(0.0)
}

/// Page-aligned global offset the shared surface should settle at.
///
/// With no release velocity the nearest page wins; a positive velocity moves
/// to the next page boundary and a negative one to the previous. The result is
/// clamped to `[0, max_global_offset(content_width, container_width)]`.
#[must_use]
pub fn snap_target(
    global_offset: f64,
    velocity: f64,
    container_width: f64,
    content_width: f64,
) -> f64 {
    let container_width = finite_or_zero(container_width);
    if container_width == 0.0 || !global_offset.is_finite() {
        return 0.0;
    }
    let total = global_offset / container_width;
    let page = if velocity > 0.0 {
        floor_to_isize(-total).saturating_neg()
    } else if velocity < 0.0 {
        floor_to_isize(total)
    } else {
        floor_to_isize(total + 0.5)
    };
    let max = max_global_offset(content_width, container_width);
    (to_scalar(page) * container_width).clamp(0.0, max)
}

/// Keeps every row's content offset in lockstep with one global offset.
///
/// Offsets are recomputed on each [`update`](Self::update) into a reused
/// buffer; grids rarely exceed four rows, so no allocation happens per sample.
#[derive(Clone, Debug)]
pub struct ScrollSynchronizer {
    global_offset: f64,
    progress: PageProgress,
    offsets: SmallVec<[f64; 4]>,
}

impl Default for ScrollSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollSynchronizer {
    /// Creates a synchronizer resting at offset zero with no rows.
    #[must_use]
    pub fn new() -> Self {
        Self {
            global_offset: 0.0,
            progress: PageProgress {
                page: 0,
                progress: 0.0,
            },
            offsets: SmallVec::new(),
        }
    }

    /// The last global offset passed to [`update`](Self::update).
    #[must_use]
    pub const fn global_offset(&self) -> f64 {
        self.global_offset
    }

    /// The page split of the last global offset.
    #[must_use]
    pub const fn progress(&self) -> PageProgress {
        self.progress
    }

    /// Row offsets from the last update.
    #[must_use]
    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    /// Recomputes every row's offset for `global_offset`.
    ///
    /// `leading_inset` is subtracted per [`leading_inset_adjustment`].
    pub fn update(
        &mut self,
        table: &PageOffsetTable,
        global_offset: f64,
        container_width: f64,
        leading_inset: f64,
    ) -> &[f64] {
        let global_offset = if global_offset.is_finite() {
            global_offset
        } else {
            0.0
        };
        let at = PageProgress::from_offset(global_offset, container_width);
        let inset = leading_inset_adjustment(leading_inset, at);

        self.global_offset = global_offset;
        self.progress = at;
        self.offsets.clear();
        self.offsets.extend(
            (0..table.row_count()).map(|row| row_offset(table, row, at, container_width) - inset),
        );

        tracing::trace!(
            global_offset,
            page = at.page,
            progress = at.progress,
            rows = self.offsets.len(),
            "synchronized row offsets"
        );
        &self.offsets
    }

    /// Drops all row offsets and returns to offset zero.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::{
        PageProgress, ScrollSynchronizer, leading_inset_adjustment, row_offset, snap_target,
    };
    use crate::{PageOffsetTable, compute_page_offsets, pack_rows};

    const W: f64 = 300.0;

    fn table_for(widths: &[f64], rows: usize) -> PageOffsetTable {
        let grid = pack_rows(widths, W, 10.0, rows);
        compute_page_offsets(&grid, widths, W, 10.0)
    }

    /// Row 0 spans three pages (starts 0, 280, 570); row 1 fits on one page.
    fn uneven_table() -> PageOffsetTable {
        let widths = [
            130.0, 130.0, // row 0
            100.0, // row 1
            180.0, 90.0, // row 0, wraps to its page 1
            50.0, 50.0, // row 1, still fits behind item 2
            170.0, 100.0, // row 0, wraps to its page 2
        ];
        table_for(&widths, 2)
    }

    #[test]
    fn uneven_table_has_expected_shape() {
        let table = uneven_table();
        assert_eq!(table.boundaries(0), &[280.0, 570.0]);
        assert_eq!(table.page_count(1), 1);
    }

    #[test]
    fn progress_splits_offsets() {
        assert_eq!(
            PageProgress::from_offset(450.0, W),
            PageProgress {
                page: 1,
                progress: 0.5
            }
        );
        assert_eq!(PageProgress::from_offset(600.0, W).page, 2);
        assert_eq!(PageProgress::from_offset(600.0, W).progress, 0.0);
        assert_eq!(PageProgress::from_offset(-30.0, W).page, -1);
        assert_eq!(PageProgress::from_offset(100.0, 0.0).page, 0);
    }

    #[test]
    fn zero_offset_puts_every_row_at_zero() {
        let table = uneven_table();
        let mut sync = ScrollSynchronizer::new();
        assert_eq!(sync.update(&table, 0.0, W, 0.0), &[0.0, 0.0]);
    }

    #[test]
    fn page_multiples_land_exactly_on_page_starts() {
        let table = uneven_table();
        let mut sync = ScrollSynchronizer::new();
        assert_eq!(sync.update(&table, W, W, 0.0), &[280.0, W]);
        assert_eq!(sync.update(&table, 2.0 * W, W, 0.0), &[570.0, 2.0 * W]);
    }

    #[test]
    fn short_row_uses_fallback_past_its_table() {
        let table = uneven_table();
        let at = PageProgress::from_offset(2.0 * W, W);
        // Row 1 has a single page, so page 2 falls back to 2 * W.
        assert_eq!(row_offset(&table, 1, at, W), 2.0 * W);
        // Rows that do not exist at all fall back the same way.
        assert_eq!(row_offset(&table, 7, at, W), 2.0 * W);
    }

    #[test]
    fn halfway_through_a_page_interpolates() {
        let table = uneven_table();
        let at = PageProgress::from_offset(1.5 * W, W);
        // Row 0 travels from 280 to 570: 280 + 0.5 * min(300, 290) = 425.
        assert_eq!(row_offset(&table, 0, at, W), 425.0);
        // Row 1 uses fallbacks 300 and 600.
        assert_eq!(row_offset(&table, 1, at, W), 450.0);
    }

    #[test]
    fn travel_is_capped_at_one_container_width() {
        // A single row with a very wide first page.
        let table = table_for(&[500.0, 50.0], 1);
        assert_eq!(table.boundaries(0), &[510.0]);
        let at = PageProgress::from_offset(0.5 * W, W);
        assert_eq!(row_offset(&table, 0, at, W), 150.0);
    }

    #[test]
    fn leading_inset_ramps_in_on_first_page() {
        let at = PageProgress::from_offset(150.0, W);
        assert_eq!(leading_inset_adjustment(20.0, at), 10.0);
        let at = PageProgress::from_offset(750.0, W);
        assert_eq!(leading_inset_adjustment(20.0, at), 20.0);
        let at = PageProgress::from_offset(-10.0, W);
        assert_eq!(leading_inset_adjustment(20.0, at), 0.0);

        let table = uneven_table();
        let mut sync = ScrollSynchronizer::new();
        assert_eq!(sync.update(&table, W, W, 20.0), &[260.0, 280.0]);
    }

    #[test]
    fn snapping_respects_velocity_and_bounds() {
        let content = 3.0 * W;
        assert_eq!(snap_target(100.0, 0.0, W, content), 0.0);
        assert_eq!(snap_target(200.0, 0.0, W, content), W);
        assert_eq!(snap_target(10.0, 1.0, W, content), W);
        assert_eq!(snap_target(590.0, -1.0, W, content), W);
        assert_eq!(snap_target(5000.0, 0.0, W, content), 2.0 * W);
        assert_eq!(snap_target(-80.0, 0.0, W, content), 0.0);
    }

    #[test]
    fn huge_offsets_stay_finite() {
        let table = table_for(&[80.0; 10], 2);
        let mut sync = ScrollSynchronizer::new();
        for offset in [1e300, -1e300, f64::MAX, f64::MIN] {
            let offsets = sync.update(&table, offset, W, 20.0);
            assert_eq!(offsets.len(), 2);
            assert!(
                offsets.iter().all(|o| o.is_finite()),
                "offset {offset} gave {offsets:?}"
            );
        }
        assert_eq!(snap_target(1e300, 1.0, W, 2.0 * W), W);
        assert_eq!(snap_target(-1e300, -1.0, W, 2.0 * W), 0.0);
        assert_eq!(snap_target(1e300, 0.0, W, 2.0 * W), W);
    }

    #[test]
    fn non_finite_offsets_reset_to_zero() {
        let table = uneven_table();
        let mut sync = ScrollSynchronizer::new();
        assert_eq!(sync.update(&table, f64::NAN, W, 0.0), &[0.0, 0.0]);
        assert_eq!(sync.global_offset(), 0.0);
        sync.reset();
        assert!(sync.offsets().is_empty());
    }
}
