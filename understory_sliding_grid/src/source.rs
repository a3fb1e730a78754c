// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capability traits for the collaborators a [`SlidingGrid`](crate::SlidingGrid) talks to.
//!
//! The grid never owns its collaborators: each one is borrowed for the
//! duration of the call that needs it.

/// Reuse identifier used when an [`ItemSource`] does not pick one.
pub const DEFAULT_REUSE_IDENTIFIER: &str = "cell";

/// Supplies item count and widths.
///
/// Must report a stable count and stable widths for the duration of a reload.
pub trait ItemSource {
    /// Number of items.
    fn count(&self) -> usize;

    /// Width of item `index`.
    ///
    /// Negative and non-finite widths are treated as zero.
    fn width_of(&self, index: usize) -> f64;

    /// Reuse identifier of the cell template used for item `index`.
    fn reuse_identifier(&self, _index: usize) -> &str {
        DEFAULT_REUSE_IDENTIFIER
    }
}

impl ItemSource for [f64] {
    fn count(&self) -> usize {
        self.len()
    }

    fn width_of(&self, index: usize) -> f64 {
        self.get(index).copied().unwrap_or(0.0)
    }
}

impl<const N: usize> ItemSource for [f64; N] {
    fn count(&self) -> usize {
        N
    }

    fn width_of(&self, index: usize) -> f64 {
        self.get(index).copied().unwrap_or(0.0)
    }
}

impl ItemSource for alloc::vec::Vec<f64> {
    fn count(&self) -> usize {
        self.len()
    }

    fn width_of(&self, index: usize) -> f64 {
        self.get(index).copied().unwrap_or(0.0)
    }
}

/// The surface that draws cells, one per-row list at a time.
///
/// Rows are addressed by index; the grid announces the row count on every
/// reload via [`reset_rows`](Self::reset_rows) before registering templates or
/// acquiring cells.
pub trait RenderSurface {
    /// A cell template registered under a reuse identifier.
    type Template;
    /// Opaque handle to a displayed cell.
    type Handle;

    /// Discards every per-row list and prepares `row_count` new ones.
    fn reset_rows(&mut self, row_count: usize);

    /// Registers `template` under `identifier` for `row`.
    fn register_template(&mut self, row: usize, identifier: &str, template: &Self::Template);

    /// Returns a (possibly recycled) cell showing `item` in `row`.
    fn acquire_cell(&mut self, row: usize, identifier: &str, item: usize) -> Self::Handle;

    /// Whether the cell currently shows as selected.
    fn is_selected(&self, cell: &Self::Handle) -> bool;

    /// Sets the cell's selected appearance.
    fn set_selected(&mut self, cell: &mut Self::Handle, selected: bool);
}

/// Receives interaction events.
pub trait InteractionSink {
    /// Cell handle passed to [`will_display`](Self::will_display).
    type Cell;

    /// The user selected item `index`.
    fn item_selected(&mut self, index: usize);

    /// A cell is about to become visible.
    ///
    /// Hosts can use this to start an entrance animation; `dragging` tells
    /// whether the user is actively dragging the grid.
    fn will_display(&mut self, _cell: &mut Self::Cell, _dragging: bool) {}
}
