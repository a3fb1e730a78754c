// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The controller tying packing, paging, scrolling, and selection together.

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use hashbrown::HashMap;
use kurbo::{Rect, Size};

use crate::sync::{max_global_offset, snap_target};
use crate::util::finite_or_zero;
use crate::{
    GridConfig, InteractionSink, ItemSource, PageOffsetTable, RenderSurface, RowGrid, RowLayout,
    ScrollSynchronizer, SelectionChange, SelectionCoordinator, compute_page_offsets, pack_rows,
};

bitflags::bitflags! {
    /// Reasons the grid must be rebuilt on the next layout pass.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Invalidation: u8 {
        /// Item count or widths may have changed.
        const DATA     = 0b0000_0001;
        /// Container bounds changed.
        const GEOMETRY = 0b0000_0010;
        /// Layout configuration changed.
        const CONFIG   = 0b0000_0100;
    }
}

/// A cell acquired from the render surface during [`SlidingGrid::realize_visible`].
#[derive(Clone, Debug, PartialEq)]
pub struct RealizedCell<H> {
    /// Row the cell is displayed in.
    pub row: usize,
    /// Position within the row.
    pub position: usize,
    /// Item index in source order.
    pub item: usize,
    /// Frame in the row's content space.
    pub frame: Rect,
    /// Handle returned by the render surface.
    pub cell: H,
}

#[derive(Clone, Debug)]
struct RowState {
    layout: RowLayout,
    band: Rect,
    realized: Range<usize>,
}

/// A multi-row, horizontally paged flow layout.
///
/// `T` is the cell template type forwarded to the [`RenderSurface`].
///
/// The grid keeps its derived state (row partition, page offsets, per-row
/// layouts) until something invalidates it. Mutations only record an
/// [`Invalidation`]; the next [`layout_if_needed`](Self::layout_if_needed)
/// performs a single, total rebuild no matter how many changes piled up.
#[derive(Debug)]
pub struct SlidingGrid<T> {
    config: GridConfig,
    bounds: Size,
    overscan: f64,
    templates: HashMap<String, T>,
    invalidation: Invalidation,

    widths: Vec<f64>,
    grid: RowGrid,
    page_offsets: PageOffsetTable,
    rows: Vec<RowState>,

    sync: ScrollSynchronizer,
    selection: SelectionCoordinator,
    dragging: bool,
    decelerating: bool,
}

impl<T> Default for SlidingGrid<T> {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

impl<T> SlidingGrid<T> {
    /// Creates an empty grid that will load its items on the first layout pass.
    #[must_use]
    pub fn new(config: GridConfig) -> Self {
        Self {
            config: config.sanitized(),
            bounds: Size::ZERO,
            overscan: 0.0,
            templates: HashMap::new(),
            invalidation: Invalidation::DATA,
            widths: Vec::new(),
            grid: RowGrid::new(),
            page_offsets: PageOffsetTable::new(),
            rows: Vec::new(),
            sync: ScrollSynchronizer::new(),
            selection: SelectionCoordinator::new(),
            dragging: false,
            decelerating: false,
        }
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Replaces the configuration, clamping invalid values.
    pub fn set_config(&mut self, config: GridConfig) {
        let config = config.sanitized();
        if config != self.config {
            self.config = config;
            self.invalidation |= Invalidation::CONFIG;
        }
    }

    /// Sets the height shared by all items.
    pub fn set_item_height(&mut self, item_height: f64) {
        self.set_config(GridConfig {
            item_height,
            ..self.config
        });
    }

    /// Sets the gap between items and rows.
    pub fn set_spacing(&mut self, spacing: f64) {
        self.set_config(GridConfig {
            spacing,
            ..self.config
        });
    }

    /// Sets the upper bound on the number of rows.
    pub fn set_max_rows(&mut self, max_rows: usize) {
        self.set_config(GridConfig {
            max_rows,
            ..self.config
        });
    }

    /// Sets the leading gutter applied while paging away from the first page.
    pub fn set_leading_inset(&mut self, leading_inset: f64) {
        self.set_config(GridConfig {
            leading_inset,
            ..self.config
        });
    }

    /// Container bounds last passed to [`set_bounds`](Self::set_bounds).
    #[must_use]
    pub const fn bounds(&self) -> Size {
        self.bounds
    }

    /// Updates the container bounds, invalidating the layout if they changed.
    pub fn set_bounds(&mut self, bounds: Size) {
        let bounds = Size::new(finite_or_zero(bounds.width), finite_or_zero(bounds.height));
        if bounds != self.bounds {
            self.bounds = bounds;
            self.invalidation |= Invalidation::GEOMETRY;
        }
    }

    /// Extra distance on both sides of the viewport in which cells are realized.
    #[must_use]
    pub const fn overscan(&self) -> f64 {
        self.overscan
    }

    /// Sets the realization overscan. Takes effect on the next
    /// [`realize_visible`](Self::realize_visible) without a reload.
    pub fn set_overscan(&mut self, overscan: f64) {
        self.overscan = finite_or_zero(overscan);
    }

    /// Remembers `template` under `identifier`.
    ///
    /// Templates are registered with every row created by later reloads.
    pub fn register_template(&mut self, identifier: impl Into<String>, template: T) {
        self.templates.insert(identifier.into(), template);
    }

    /// Requests a reload of item data on the next layout pass.
    pub fn mark_dirty(&mut self) {
        self.invalidation |= Invalidation::DATA;
    }

    /// Whether a reload is pending.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.invalidation.is_empty()
    }

    /// Everything that changed since the last reload.
    #[must_use]
    pub const fn invalidation(&self) -> Invalidation {
        self.invalidation
    }

    /// Reloads if anything was invalidated since the last reload.
    ///
    /// Returns `true` if a reload happened.
    pub fn layout_if_needed<S, R>(&mut self, source: Option<&S>, surface: &mut R) -> bool
    where
        S: ItemSource + ?Sized,
        R: RenderSurface<Template = T>,
    {
        if !self.is_dirty() {
            return false;
        }
        self.reload(source, surface);
        true
    }

    /// Discards all derived state and rebuilds it from `source`.
    ///
    /// The scroll position returns to zero and the selection is cleared.
    /// Without a source the grid becomes empty.
    pub fn reload<S, R>(&mut self, source: Option<&S>, surface: &mut R)
    where
        S: ItemSource + ?Sized,
        R: RenderSurface<Template = T>,
    {
        let config = self.config;
        let width = self.bounds.width;

        self.widths = source
            .map(|source| {
                (0..source.count())
                    .map(|index| finite_or_zero(source.width_of(index)))
                    .collect()
            })
            .unwrap_or_default();

        let row_count = config.row_count_for_height(self.bounds.height);
        self.grid = pack_rows(&self.widths, width, config.spacing, row_count);
        self.page_offsets = compute_page_offsets(&self.grid, &self.widths, width, config.spacing);

        // The row stack is centered vertically in the container.
        let mut y = (self.bounds.height - config.height_to_fit(self.grid.len())) / 2.0;
        let rows: Vec<RowState> = self
            .grid
            .rows()
            .enumerate()
            .map(|(row, items)| {
                let band_height = config.row_band_height(row);
                let layout = RowLayout::new(
                    items.iter().map(|&item| self.widths[item]),
                    config.item_height,
                    config.spacing,
                    band_height,
                    GridConfig::is_row_centered(row),
                );
                let band = Rect::new(0.0, y, width, y + band_height);
                y += band_height;
                RowState {
                    layout,
                    band,
                    realized: 0..0,
                }
            })
            .collect();
        self.rows = rows;

        surface.reset_rows(self.rows.len());
        for row in 0..self.rows.len() {
            for (identifier, template) in &self.templates {
                surface.register_template(row, identifier, template);
            }
        }

        self.sync.reset();
        self.sync
            .update(&self.page_offsets, 0.0, width, config.leading_inset);
        self.selection.reset(self.grid.len());
        self.invalidation = Invalidation::empty();

        tracing::debug!(
            items = self.widths.len(),
            rows = self.grid.len(),
            pages = self.page_offsets.max_page_count(),
            content_width = self.content_width(),
            "reloaded sliding grid"
        );
    }

    /// Row partition from the last reload.
    #[must_use]
    pub const fn grid(&self) -> &RowGrid {
        &self.grid
    }

    /// Page offsets from the last reload.
    #[must_use]
    pub const fn page_offsets(&self) -> &PageOffsetTable {
        &self.page_offsets
    }

    /// Width of item `item` as loaded by the last reload.
    #[must_use]
    pub fn item_width(&self, item: usize) -> Option<f64> {
        self.widths.get(item).copied()
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Item frames of `row`, in the row's content space.
    #[must_use]
    pub fn row_layout(&self, row: usize) -> Option<&RowLayout> {
        self.rows.get(row).map(|state| &state.layout)
    }

    /// Band occupied by `row`, in container space.
    #[must_use]
    pub fn row_frame(&self, row: usize) -> Option<Rect> {
        self.rows.get(row).map(|state| state.band)
    }

    /// Frame of a cell in container space at the current scroll position.
    #[must_use]
    pub fn viewport_frame(&self, row: usize, position: usize) -> Option<Rect> {
        let state = self.rows.get(row)?;
        let frame = state.layout.frame(position)?;
        let offset = self.sync.offsets().get(row).copied().unwrap_or(0.0);
        Some(frame + kurbo::Vec2::new(-offset, state.band.y0))
    }

    /// Width of the shared scroll content.
    #[must_use]
    pub fn content_width(&self) -> f64 {
        self.page_offsets.content_width(self.bounds.width)
    }

    /// Height a host should give the grid to show all of its rows.
    #[must_use]
    pub fn height_to_fit(&self) -> f64 {
        self.config.height_to_fit(self.grid.len())
    }

    /// The shared scroll offset.
    #[must_use]
    pub const fn global_offset(&self) -> f64 {
        self.sync.global_offset()
    }

    /// Horizontal position of the row stack inside the shared scroll content.
    ///
    /// Rows stay pinned to the viewport and scroll their own content instead,
    /// so the stack follows the global offset exactly.
    #[must_use]
    pub const fn stack_offset(&self) -> f64 {
        self.sync.global_offset()
    }

    /// Per-row content offsets for the current global offset.
    #[must_use]
    pub fn row_offsets(&self) -> &[f64] {
        self.sync.offsets()
    }

    /// Applies a scroll sample and returns the synchronized row offsets.
    pub fn set_global_offset(&mut self, global_offset: f64) -> &[f64] {
        self.sync.update(
            &self.page_offsets,
            global_offset,
            self.bounds.width,
            self.config.leading_inset,
        )
    }

    /// Largest global offset the shared scroll surface can rest at.
    #[must_use]
    pub fn max_global_offset(&self) -> f64 {
        max_global_offset(self.content_width(), self.bounds.width)
    }

    /// Page-aligned offset to settle at after a drag released with `velocity`.
    #[must_use]
    pub fn settle_target(&self, velocity: f64) -> f64 {
        snap_target(
            self.global_offset(),
            velocity,
            self.bounds.width,
            self.content_width(),
        )
    }

    /// Marks the start of a user drag.
    pub fn begin_drag(&mut self) {
        self.dragging = true;
        self.decelerating = false;
    }

    /// Marks the end of a user drag; `decelerate` tells whether the surface
    /// keeps moving on its own.
    pub fn end_drag(&mut self, decelerate: bool) {
        self.dragging = false;
        self.decelerating = decelerate;
    }

    /// Marks the end of post-drag deceleration.
    pub fn end_deceleration(&mut self) {
        self.decelerating = false;
    }

    /// Whether the user is dragging.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Whether the surface is decelerating after a drag.
    #[must_use]
    pub const fn is_decelerating(&self) -> bool {
        self.decelerating
    }

    /// Acquires cells for every position that became visible since the last call.
    ///
    /// Each row is queried at its current content offset. Newly visible
    /// cells get the sink's [`will_display`](InteractionSink::will_display)
    /// hook, and cells that claim a selection their row does not hold are
    /// forced unselected.
    pub fn realize_visible<S, R, K>(
        &mut self,
        source: &S,
        surface: &mut R,
        mut sink: Option<&mut K>,
    ) -> Vec<RealizedCell<R::Handle>>
    where
        S: ItemSource + ?Sized,
        R: RenderSurface<Template = T>,
        K: InteractionSink<Cell = R::Handle> + ?Sized,
    {
        let width = self.bounds.width;
        let mut realized = Vec::new();

        for (row, state) in self.rows.iter_mut().enumerate() {
            let offset = self.sync.offsets().get(row).copied().unwrap_or(0.0);
            let visible = state.layout.visible_range(offset, width, self.overscan);
            let previous = core::mem::replace(&mut state.realized, visible.clone());

            for position in visible {
                if previous.contains(&position) {
                    continue;
                }
                let (Some(item), Some(frame)) =
                    (self.grid.item_at(row, position), state.layout.frame(position))
                else {
                    continue;
                };

                let mut cell = surface.acquire_cell(row, source.reuse_identifier(item), item);
                if let Some(sink) = sink.as_deref_mut() {
                    sink.will_display(&mut cell, self.dragging);
                }
                let shown = surface.is_selected(&cell);
                if shown && !self.selection.displayed_selection(row, position, shown) {
                    surface.set_selected(&mut cell, false);
                }

                realized.push(RealizedCell {
                    row,
                    position,
                    item,
                    frame,
                    cell,
                });
            }
        }

        realized
    }

    /// Positions of `row` realized by the last [`realize_visible`](Self::realize_visible).
    #[must_use]
    pub fn realized_range(&self, row: usize) -> Option<Range<usize>> {
        self.rows.get(row).map(|state| state.realized.clone())
    }

    /// Handles the user selecting `position` in `row`.
    ///
    /// Deselects every other cell, notifies the sink, and returns the change
    /// so the host can refresh affected cells.
    pub fn select<K>(
        &mut self,
        row: usize,
        position: usize,
        sink: Option<&mut K>,
    ) -> Option<SelectionChange>
    where
        K: InteractionSink + ?Sized,
    {
        let change = self.selection.select(&self.grid, row, position)?;
        if let Some(sink) = sink {
            sink.item_selected(change.selected.item);
        }
        Some(change)
    }

    /// Selects `item` wherever it is displayed.
    pub fn select_item<K>(&mut self, item: usize, sink: Option<&mut K>) -> Option<SelectionChange>
    where
        K: InteractionSink + ?Sized,
    {
        let (row, position) = self.grid.locate(item)?;
        self.select(row, position, sink)
    }

    /// The selected item, if any.
    #[must_use]
    pub fn selected_item(&self) -> Option<usize> {
        self.selection.selected_item()
    }

    /// Selection state shared by all rows.
    #[must_use]
    pub const fn selection(&self) -> &SelectionCoordinator {
        &self.selection
    }

    /// Acquires a cell for `item` from the row that displays it.
    ///
    /// Returns `None` for items that are not part of the grid.
    pub fn dequeue<R>(&self, surface: &mut R, identifier: &str, item: usize) -> Option<R::Handle>
    where
        R: RenderSurface<Template = T>,
    {
        let (row, _) = self.grid.locate(item)?;
        Some(surface.acquire_cell(row, identifier, item))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;

    use hashbrown::HashSet;
    use kurbo::{Rect, Size};

    use super::{Invalidation, SlidingGrid};
    use crate::{GridConfig, InteractionSink, ItemSource, RenderSurface};

    #[derive(Debug, Clone, PartialEq)]
    struct Cell {
        row: usize,
        item: usize,
        selected: bool,
    }

    #[derive(Default)]
    struct Surface {
        resets: usize,
        row_count: usize,
        registered: Vec<(usize, String, &'static str)>,
        acquired: Vec<(usize, String, usize)>,
        // Items whose recycled cells come back still marked selected.
        stale: HashSet<usize>,
        cleared: Vec<usize>,
    }

    impl RenderSurface for Surface {
        type Template = &'static str;
        type Handle = Cell;

        fn reset_rows(&mut self, row_count: usize) {
            self.resets += 1;
            self.row_count = row_count;
        }

        fn register_template(&mut self, row: usize, identifier: &str, template: &&'static str) {
            self.registered.push((row, identifier.to_string(), *template));
        }

        fn acquire_cell(&mut self, row: usize, identifier: &str, item: usize) -> Cell {
            self.acquired.push((row, identifier.to_string(), item));
            Cell {
                row,
                item,
                selected: self.stale.contains(&item),
            }
        }

        fn is_selected(&self, cell: &Cell) -> bool {
            cell.selected
        }

        fn set_selected(&mut self, cell: &mut Cell, selected: bool) {
            if !selected {
                self.cleared.push(cell.item);
            }
            cell.selected = selected;
        }
    }

    #[derive(Default)]
    struct Sink {
        selected: Vec<usize>,
        displayed: Vec<(usize, bool)>,
    }

    impl InteractionSink for Sink {
        type Cell = Cell;

        fn item_selected(&mut self, index: usize) {
            self.selected.push(index);
        }

        fn will_display(&mut self, cell: &mut Cell, dragging: bool) {
            self.displayed.push((cell.item, dragging));
        }
    }

    struct Tags;

    impl ItemSource for Tags {
        fn count(&self) -> usize {
            10
        }

        fn width_of(&self, _index: usize) -> f64 {
            80.0
        }

        fn reuse_identifier(&self, index: usize) -> &str {
            if index % 2 == 0 { "even" } else { "odd" }
        }
    }

    fn config() -> GridConfig {
        GridConfig {
            item_height: 40.0,
            spacing: 10.0,
            max_rows: 2,
            leading_inset: 0.0,
        }
    }

    fn loaded() -> (SlidingGrid<&'static str>, Surface) {
        let mut grid = SlidingGrid::new(config());
        grid.set_bounds(Size::new(300.0, 200.0));
        let mut surface = Surface::default();
        assert!(grid.layout_if_needed(Some(&Tags), &mut surface));
        (grid, surface)
    }

    #[test]
    fn missing_source_yields_empty_grid() {
        let mut grid: SlidingGrid<&'static str> = SlidingGrid::new(config());
        grid.set_bounds(Size::new(300.0, 200.0));
        let mut surface = Surface::default();
        assert!(grid.layout_if_needed(None::<&Tags>, &mut surface));
        assert!(grid.grid().is_empty());
        assert_eq!(grid.row_count(), 0);
        assert_eq!(surface.row_count, 0);
        assert_eq!(grid.content_width(), 300.0);
        assert_eq!(grid.height_to_fit(), 10.0);
        assert!(grid.set_global_offset(120.0).is_empty());
    }

    #[test]
    fn dirty_marks_coalesce_into_one_reload() {
        let mut grid: SlidingGrid<&'static str> = SlidingGrid::new(config());
        assert!(grid.is_dirty());
        grid.mark_dirty();
        grid.set_bounds(Size::new(300.0, 200.0));
        grid.set_spacing(12.0);
        grid.set_spacing(10.0);
        assert_eq!(
            grid.invalidation(),
            Invalidation::DATA | Invalidation::GEOMETRY | Invalidation::CONFIG
        );

        let mut surface = Surface::default();
        assert!(grid.layout_if_needed(Some(&Tags), &mut surface));
        assert!(!grid.layout_if_needed(Some(&Tags), &mut surface));
        assert_eq!(surface.resets, 1);
        assert!(!grid.is_dirty());
    }

    #[test]
    fn unchanged_values_do_not_invalidate() {
        let (mut grid, _) = loaded();
        grid.set_bounds(Size::new(300.0, 200.0));
        grid.set_item_height(40.0);
        grid.set_max_rows(2);
        grid.set_config(config());
        assert!(!grid.is_dirty());

        grid.set_bounds(Size::new(320.0, 200.0));
        assert_eq!(grid.invalidation(), Invalidation::GEOMETRY);
    }

    #[test]
    fn reload_packs_and_pages_rows() {
        let (grid, _) = loaded();
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.grid().row(0), Some(&[0, 1, 2, 6, 7, 8][..]));
        assert_eq!(grid.grid().row(1), Some(&[3, 4, 5, 9][..]));
        assert_eq!(grid.page_offsets().boundaries(0), &[270.0]);
        assert_eq!(grid.content_width(), 600.0);
        assert_eq!(grid.max_global_offset(), 300.0);
        assert_eq!(grid.height_to_fit(), 110.0);
        assert_eq!(grid.item_width(3), Some(80.0));
    }

    #[test]
    fn rows_stack_vertically_centered() {
        let (grid, _) = loaded();
        // Stack height 110 inside 200: starts at 45.
        assert_eq!(grid.row_frame(0), Some(Rect::new(0.0, 45.0, 300.0, 105.0)));
        assert_eq!(grid.row_frame(1), Some(Rect::new(0.0, 105.0, 300.0, 155.0)));
        // Row 0 centers its items in a 60-high band.
        assert_eq!(
            grid.row_layout(0).unwrap().frame(0),
            Some(Rect::new(10.0, 10.0, 90.0, 50.0))
        );
        assert_eq!(
            grid.row_layout(1).unwrap().frame(0),
            Some(Rect::new(10.0, 0.0, 90.0, 40.0))
        );
    }

    #[test]
    fn templates_register_on_every_row() {
        let mut grid = SlidingGrid::new(config());
        grid.register_template("even", "EvenCell");
        grid.set_bounds(Size::new(300.0, 200.0));
        let mut surface = Surface::default();
        grid.layout_if_needed(Some(&Tags), &mut surface);
        assert_eq!(
            surface.registered,
            vec![
                (0, "even".to_string(), "EvenCell"),
                (1, "even".to_string(), "EvenCell")
            ]
        );
    }

    #[test]
    fn scrolling_keeps_rows_in_lockstep() {
        let (mut grid, _) = loaded();
        assert_eq!(grid.row_offsets(), &[0.0, 0.0]);
        assert_eq!(grid.set_global_offset(300.0), &[270.0, 270.0]);
        assert_eq!(grid.set_global_offset(150.0), &[135.0, 135.0]);
        assert_eq!(grid.stack_offset(), 150.0);
        assert_eq!(
            grid.viewport_frame(1, 0),
            Some(Rect::new(-125.0, 105.0, -45.0, 145.0))
        );
        assert_eq!(grid.settle_target(0.0), 300.0);
        assert_eq!(grid.settle_target(-1.0), 0.0);

        // Offsets far outside the content still produce finite row offsets.
        assert!(grid.set_global_offset(1e300).iter().all(|o| o.is_finite()));
        assert_eq!(grid.settle_target(1.0), 300.0);
        assert!(grid.set_global_offset(-1e300).iter().all(|o| o.is_finite()));
        assert_eq!(grid.settle_target(-1.0), 0.0);
    }

    #[test]
    fn reload_resets_scroll_and_selection() {
        let (mut grid, mut surface) = loaded();
        grid.set_global_offset(300.0);
        grid.select::<Sink>(0, 1, None).unwrap();
        grid.mark_dirty();
        grid.layout_if_needed(Some(&Tags), &mut surface);
        assert_eq!(grid.global_offset(), 0.0);
        assert_eq!(grid.row_offsets(), &[0.0, 0.0]);
        assert_eq!(grid.selected_item(), None);
    }

    #[test]
    fn realizes_newly_visible_cells_once() {
        let (mut grid, mut surface) = loaded();
        let mut sink = Sink::default();

        let cells = grid.realize_visible(&Tags, &mut surface, Some(&mut sink));
        let items: Vec<usize> = cells.iter().map(|c| c.item).collect();
        // Row 0 shows positions 0..4, row 1 all four of its items.
        assert_eq!(items, [0, 1, 2, 6, 3, 4, 5, 9]);
        assert_eq!(cells[0].frame, Rect::new(10.0, 10.0, 90.0, 50.0));
        assert_eq!(surface.acquired[0], (0, "even".to_string(), 0));
        assert_eq!(surface.acquired[1], (0, "odd".to_string(), 1));

        // Nothing new without scrolling.
        assert!(
            grid.realize_visible(&Tags, &mut surface, Some(&mut sink))
                .is_empty()
        );

        grid.begin_drag();
        grid.set_global_offset(300.0);
        let cells = grid.realize_visible(&Tags, &mut surface, Some(&mut sink));
        let items: Vec<usize> = cells.iter().map(|c| c.item).collect();
        assert_eq!(items, [7, 8]);
        assert_eq!(grid.realized_range(0), Some(3..6));
        assert_eq!(sink.displayed.last(), Some(&(8, true)));
        assert_eq!(sink.displayed[0], (0, false));
    }

    #[test]
    fn stale_selected_cells_are_cleared_on_display() {
        let (mut grid, mut surface) = loaded();
        surface.stale.insert(1);
        surface.stale.insert(4);
        grid.select::<Sink>(1, 1, None).unwrap();

        let cells = grid.realize_visible::<_, _, Sink>(&Tags, &mut surface, None);
        assert_eq!(surface.cleared, [1]);
        let four = cells.iter().find(|c| c.item == 4).unwrap();
        assert!(four.cell.selected);
        let one = cells.iter().find(|c| c.item == 1).unwrap();
        assert!(!one.cell.selected);
    }

    #[test]
    fn selection_notifies_sink_and_stays_exclusive() {
        let (mut grid, _) = loaded();
        let mut sink = Sink::default();
        let change = grid.select(1, 0, Some(&mut sink)).unwrap();
        assert_eq!(change.selected.item, 3);
        let change = grid.select_item(7, Some(&mut sink)).unwrap();
        assert_eq!(change.selected.cell.row, 0);
        assert_eq!(change.deselected.len(), 1);
        assert_eq!(sink.selected, [3, 7]);
        assert_eq!(grid.selected_item(), Some(7));
        assert!(grid.select(4, 0, Some(&mut sink)).is_none());
    }

    #[test]
    fn dequeue_routes_to_the_items_row() {
        let (grid, mut surface) = loaded();
        let cell = grid.dequeue(&mut surface, "odd", 9).unwrap();
        assert_eq!(cell.row, 1);
        assert!(grid.dequeue(&mut surface, "odd", 10).is_none());
    }

    #[test]
    fn drag_phases_are_tracked() {
        let (mut grid, _) = loaded();
        grid.begin_drag();
        assert!(grid.is_dragging());
        grid.end_drag(true);
        assert!(!grid.is_dragging());
        assert!(grid.is_decelerating());
        grid.end_deceleration();
        assert!(!grid.is_decelerating());
    }
}
