// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single selection across otherwise independent rows.
//!
//! Each row behaves like its own selectable list and keeps a set of selected
//! positions. The coordinator makes sure that, across all rows, at most one
//! item is selected at a time, and it lets hosts correct recycled cells that
//! still carry a stale selected flag.

use alloc::vec::Vec;

use hashbrown::HashSet;
use smallvec::SmallVec;

use crate::RowGrid;

/// A cell addressed by row and position within the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellRef {
    /// Row index.
    pub row: usize,
    /// Position within the row.
    pub position: usize,
}

/// The currently selected item and where it lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectedItem {
    /// Item index in source order.
    pub item: usize,
    /// Cell showing the item.
    pub cell: CellRef,
}

/// Outcome of a selection event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionChange {
    /// The newly selected item.
    pub selected: SelectedItem,
    /// Cells that lost their selection as a consequence.
    pub deselected: SmallVec<[CellRef; 4]>,
}

/// Enforces a single global selection across rows.
#[derive(Clone, Debug, Default)]
pub struct SelectionCoordinator {
    rows: Vec<HashSet<usize>>,
    selected: Option<SelectedItem>,
}

impl SelectionCoordinator {
    /// Creates a coordinator with no rows and no selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every selection and resizes for `row_count` rows.
    pub fn reset(&mut self, row_count: usize) {
        self.rows.clear();
        self.rows.resize_with(row_count, HashSet::new);
        self.selected = None;
    }

    /// The selected item, if any.
    #[must_use]
    pub const fn selected(&self) -> Option<SelectedItem> {
        self.selected
    }

    /// Index of the selected item, if any.
    #[must_use]
    pub fn selected_item(&self) -> Option<usize> {
        self.selected.map(|s| s.item)
    }

    /// Whether the cell at `position` in `row` is in that row's selected set.
    #[must_use]
    pub fn is_selected(&self, row: usize, position: usize) -> bool {
        self.rows.get(row).is_some_and(|set| set.contains(&position))
    }

    /// Handles the user selecting `position` in `row`.
    ///
    /// Every other selected cell in every row is deselected and reported in
    /// the returned change. Returns `None` when the cell is not part of
    /// `grid`.
    pub fn select(&mut self, grid: &RowGrid, row: usize, position: usize) -> Option<SelectionChange> {
        let item = grid.item_at(row, position)?;
        if self.rows.len() < grid.len() {
            self.rows.resize_with(grid.len(), HashSet::new);
        }

        let mut deselected: SmallVec<[CellRef; 4]> = SmallVec::new();
        for (r, set) in self.rows.iter_mut().enumerate() {
            for &p in set.iter() {
                if r != row || p != position {
                    deselected.push(CellRef { row: r, position: p });
                }
            }
            set.clear();
        }
        // Hash set iteration order is arbitrary; report in grid order.
        deselected.sort_unstable_by_key(|c| (c.row, c.position));

        self.rows[row].insert(position);
        let selected = SelectedItem {
            item,
            cell: CellRef { row, position },
        };
        self.selected = Some(selected);

        tracing::trace!(item, row, position, deselected = deselected.len(), "item selected");
        Some(SelectionChange {
            selected,
            deselected,
        })
    }

    /// Clears the selection, returning the cells that were selected.
    pub fn clear(&mut self) -> SmallVec<[CellRef; 4]> {
        let mut cleared: SmallVec<[CellRef; 4]> = self
            .rows
            .iter_mut()
            .enumerate()
            .flat_map(|(row, set)| set.drain().map(move |position| CellRef { row, position }))
            .collect();
        cleared.sort_unstable_by_key(|c| (c.row, c.position));
        self.selected = None;
        cleared
    }

    /// Selection flag a cell should show when it becomes visible.
    ///
    /// A recycled cell may still carry `cell_selected == true` from a previous
    /// use; unless the row really has that position selected, the flag is
    /// forced off.
    #[must_use]
    pub fn displayed_selection(&self, row: usize, position: usize, cell_selected: bool) -> bool {
        cell_selected && self.is_selected(row, position)
    }
}
