// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tag picker: chips of different widths paged across three rows.
//!
//! This example drives a `SlidingGrid` the way a host widget would:
//! - supply labels and their measured widths through `ItemSource`,
//! - keep chips in a text "surface" that implements `RenderSurface`,
//! - feed a simulated drag into the grid and settle it on a page,
//! - select a chip and watch the previously selected one lose its mark.
//!
//! Run:
//! - `RUST_LOG=understory_sliding_grid=trace cargo run -p understory_sliding_grid_demos --example sliding_tags`

use kurbo::Size;
use tracing_subscriber::EnvFilter;
use understory_sliding_grid::{
    GridConfig, InteractionSink, ItemSource, RenderSurface, SlidingGrid,
};

const TAGS: &[&str] = &[
    "rust", "layout", "ui", "paging", "scroll", "gestures", "kurbo", "no_std", "tracing",
    "chips", "virtualization", "selection", "rows", "widgets", "understory", "flow",
];

/// Labels measured with a fixed-advance font.
struct Tags;

impl ItemSource for Tags {
    fn count(&self) -> usize {
        TAGS.len()
    }

    fn width_of(&self, index: usize) -> f64 {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Tag lengths are tiny"
        )]
        let chars = TAGS[index].len() as f64;
        chars * 9.0 + 24.0
    }

    fn reuse_identifier(&self, _index: usize) -> &str {
        "chip"
    }
}

/// A displayed chip.
#[derive(Clone, Debug)]
struct Chip {
    label: &'static str,
    selected: bool,
}

/// Keeps one list of chips per row, like a collection view per row would.
#[derive(Default)]
struct TextSurface {
    rows: Vec<Vec<Chip>>,
    templates: Vec<(usize, String)>,
}

impl RenderSurface for TextSurface {
    type Template = &'static str;
    type Handle = Chip;

    fn reset_rows(&mut self, row_count: usize) {
        self.rows = vec![Vec::new(); row_count];
        self.templates.clear();
    }

    fn register_template(&mut self, row: usize, identifier: &str, template: &&'static str) {
        println!("row {row}: registered {identifier:?} as {template}");
        self.templates.push((row, identifier.to_string()));
    }

    fn acquire_cell(&mut self, row: usize, _identifier: &str, item: usize) -> Chip {
        let chip = Chip {
            label: TAGS[item],
            selected: false,
        };
        if let Some(cells) = self.rows.get_mut(row) {
            cells.push(chip.clone());
        }
        chip
    }

    fn is_selected(&self, cell: &Chip) -> bool {
        cell.selected
    }

    fn set_selected(&mut self, cell: &mut Chip, selected: bool) {
        cell.selected = selected;
    }
}

/// Prints interaction events.
struct Log;

impl InteractionSink for Log {
    type Cell = Chip;

    fn item_selected(&mut self, index: usize) {
        println!("selected #{index} ({})", TAGS[index]);
    }

    fn will_display(&mut self, cell: &mut Chip, dragging: bool) {
        if dragging {
            println!("  fade in {}", cell.label);
        }
    }
}

fn print_rows(grid: &SlidingGrid<&'static str>) {
    println!(
        "global {:>6.1}  rows {:?}",
        grid.global_offset(),
        grid.row_offsets()
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut grid = SlidingGrid::new(GridConfig {
        max_rows: 3,
        ..GridConfig::default()
    });
    grid.register_template("chip", "ChipCell");
    grid.set_bounds(Size::new(320.0, 200.0));

    let mut surface = TextSurface::default();
    let mut sink = Log;
    grid.layout_if_needed(Some(&Tags), &mut surface);
    tracing::info!(rows = grid.row_count(), "tag picker ready");

    for (row, items) in grid.grid().rows().enumerate() {
        let labels: Vec<&str> = items.iter().map(|&item| TAGS[item]).collect();
        println!(
            "row {row} ({} pages): {labels:?}",
            grid.page_offsets().page_count(row)
        );
    }
    println!(
        "content width {} for a {} wide container, fits in {} high",
        grid.content_width(),
        grid.bounds().width,
        grid.height_to_fit()
    );

    let cells = grid.realize_visible(&Tags, &mut surface, Some(&mut sink));
    println!("initially realized {} chips", cells.len());

    // Drag left by 60% of a page, then release.
    grid.begin_drag();
    for step in 1..=6 {
        grid.set_global_offset(f64::from(step) * 32.0);
        print_rows(&grid);
        grid.realize_visible(&Tags, &mut surface, Some(&mut sink));
    }
    grid.end_drag(true);

    // Decelerate towards the page the release settles on.
    let target = grid.settle_target(0.0);
    let start = grid.global_offset();
    for step in 1..=4 {
        grid.set_global_offset(start + (target - start) * f64::from(step) / 4.0);
        print_rows(&grid);
        grid.realize_visible(&Tags, &mut surface, Some(&mut sink));
    }
    grid.end_deceleration();

    if let Some(change) = grid.select_item(3, Some(&mut sink)) {
        println!("deselected {:?}", change.deselected);
    }
    if let Some(change) = grid.select_item(10, Some(&mut sink)) {
        println!("deselected {:?}", change.deselected);
    }

    for (row, cells) in surface.rows.iter().enumerate() {
        let labels: Vec<&str> = cells.iter().map(|chip| chip.label).collect();
        println!("row {row} realized {labels:?}");
    }
    println!("{} template registrations", surface.templates.len());
}
