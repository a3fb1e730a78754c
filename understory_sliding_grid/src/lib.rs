// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_sliding_grid --heading-base-level=0

//! Understory Sliding Grid: a multi-row, horizontally paged flow layout.
//!
//! Variable-width items (think tags or chips) are distributed round-robin over
//! a small number of rows. Every row scrolls horizontally on its own, but all
//! rows are driven by one shared scroll offset that pages in whole container
//! widths. Because rows wrap at different points, each row has its own uneven
//! page starts, and the shared offset is translated into a per-row offset so
//! that every row lands exactly on one of its page starts whenever the shared
//! surface comes to rest on a page.
//!
//! The core pieces are:
//!
//! - [`pack_rows`]: assigns items to rows, producing a [`RowGrid`].
//! - [`compute_page_offsets`]: finds where each row's pages start, producing a
//!   [`PageOffsetTable`].
//! - [`RowLayout`]: item frames within one row plus visibility queries.
//! - [`ScrollSynchronizer`]: turns one global offset into per-row offsets.
//! - [`SelectionCoordinator`]: keeps at most one item selected across rows.
//! - [`SlidingGrid`]: a controller that owns the derived state, rebuilds it
//!   lazily after an [`Invalidation`], and talks to host collaborators through
//!   the [`ItemSource`], [`RenderSurface`], and [`InteractionSink`] traits.
//!
//! This crate does **not** draw anything, animate, or own cell instances. Host
//! frameworks are responsible for:
//!
//! - Supplying item widths.
//! - Feeding scroll samples into [`SlidingGrid::set_global_offset`] and
//!   settling drags at [`SlidingGrid::settle_target`].
//! - Creating and positioning cells returned by [`SlidingGrid::realize_visible`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Size;
//! use understory_sliding_grid::{GridConfig, RenderSurface, SlidingGrid};
//!
//! /// A surface that hands out item indices as cells.
//! #[derive(Default)]
//! struct Labels;
//!
//! impl RenderSurface for Labels {
//!     type Template = ();
//!     type Handle = usize;
//!
//!     fn reset_rows(&mut self, _row_count: usize) {}
//!     fn register_template(&mut self, _row: usize, _identifier: &str, _template: &()) {}
//!     fn acquire_cell(&mut self, _row: usize, _identifier: &str, item: usize) -> usize {
//!         item
//!     }
//!     fn is_selected(&self, _cell: &usize) -> bool {
//!         false
//!     }
//!     fn set_selected(&mut self, _cell: &mut usize, _selected: bool) {}
//! }
//!
//! let widths = [80.0; 10];
//! let config = GridConfig {
//!     item_height: 40.0,
//!     spacing: 10.0,
//!     max_rows: 2,
//!     leading_inset: 0.0,
//! };
//! let mut grid = SlidingGrid::<()>::new(config);
//! grid.set_bounds(Size::new(300.0, 200.0));
//!
//! let mut surface = Labels;
//! grid.layout_if_needed(Some(&widths), &mut surface);
//!
//! // Items alternate between the two rows.
//! assert_eq!(grid.grid().row(0), Some(&[0, 1, 2, 6, 7, 8][..]));
//! // Both rows start their second page at 270.
//! assert_eq!(grid.set_global_offset(300.0), &[270.0, 270.0]);
//! assert_eq!(grid.content_width(), 600.0);
//! ```
//!
//! All lengths are `f64` logical pixels. Non-finite and negative inputs are
//! treated as zero rather than rejected.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support in `kurbo`.
//! - `libm`: use `libm` for `kurbo` floating point math in `no_std` builds.
//! - `serde`: derives `Serialize` and `Deserialize` for [`GridConfig`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod pack;
mod page_offsets;
mod row_layout;
mod selection;
mod sliding_grid;
mod source;
mod sync;
mod util;

pub use config::{ConfigError, GridConfig};
pub use pack::{RowGrid, pack_rows};
pub use page_offsets::{PageOffsetTable, compute_page_offsets};
pub use row_layout::RowLayout;
pub use selection::{CellRef, SelectedItem, SelectionChange, SelectionCoordinator};
pub use sliding_grid::{Invalidation, RealizedCell, SlidingGrid};
pub use source::{DEFAULT_REUSE_IDENTIFIER, InteractionSink, ItemSource, RenderSurface};
pub use sync::{
    PageProgress, ScrollSynchronizer, leading_inset_adjustment, max_global_offset, row_offset,
    snap_target,
};
