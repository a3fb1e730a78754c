// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout configuration shared by every stage of the engine.

use crate::util::{finite_or_zero, floor_to_isize};

/// Errors reported by [`GridConfig::validate`].
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The item height is negative, NaN, or infinite.
    #[error("item height must be finite and non-negative, got {0}")]
    InvalidItemHeight(f64),
    /// The spacing is negative, NaN, or infinite.
    #[error("spacing must be finite and non-negative, got {0}")]
    InvalidSpacing(f64),
    /// The leading inset is negative, NaN, or infinite.
    #[error("leading inset must be finite and non-negative, got {0}")]
    InvalidLeadingInset(f64),
    /// The row limit is zero.
    #[error("at least one row must be allowed")]
    ZeroRows,
}

/// Geometry and limits for a sliding grid.
///
/// All lengths live in the same coordinate space as the container bounds
/// (typically logical pixels).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// Height of every item; rows never vary in height.
    pub item_height: f64,
    /// Gap before the first item of a page, between items, and between rows.
    pub spacing: f64,
    /// Upper bound on the number of rows.
    pub max_rows: usize,
    /// Extra leading gutter applied to the first page while paging.
    ///
    /// Zero disables the adjustment.
    pub leading_inset: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            item_height: 44.0,
            spacing: 8.0,
            max_rows: 4,
            leading_inset: 0.0,
        }
    }
}

impl GridConfig {
    /// Checks that every field is usable as-is.
    ///
    /// The controller clamps bad values on its own, so this is only useful for
    /// hosts that want to surface configuration mistakes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_length(self.item_height) {
            return Err(ConfigError::InvalidItemHeight(self.item_height));
        }
        if !is_length(self.spacing) {
            return Err(ConfigError::InvalidSpacing(self.spacing));
        }
        if !is_length(self.leading_inset) {
            return Err(ConfigError::InvalidLeadingInset(self.leading_inset));
        }
        if self.max_rows == 0 {
            return Err(ConfigError::ZeroRows);
        }
        Ok(())
    }

    /// Returns a copy with every field clamped into its valid range.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            item_height: finite_or_zero(self.item_height),
            spacing: finite_or_zero(self.spacing),
            max_rows: self.max_rows.max(1),
            leading_inset: finite_or_zero(self.leading_inset),
        }
    }

    /// Number of rows that fit into a container of the given height.
    ///
    /// Never returns less than one row, even for containers too short to hold
    /// a single item.
    #[must_use]
    pub fn row_count_for_height(&self, height: f64) -> usize {
        let stride = self.item_height + self.spacing;
        if stride <= 0.0 || !stride.is_finite() || !height.is_finite() {
            return self.max_rows.max(1);
        }
        let possible = floor_to_isize((height - self.spacing) / stride);
        let possible = usize::try_from(possible).unwrap_or(0);
        possible.min(self.max_rows).max(1)
    }

    /// Height needed to show `rows` rows without clipping.
    #[must_use]
    pub fn height_to_fit(&self, rows: usize) -> f64 {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Row counts are tiny compared to f64 mantissa range"
        )]
        let rows = rows as f64;
        self.spacing + rows * (self.item_height + self.spacing)
    }

    /// Height of the horizontal band that hosts `row`.
    ///
    /// Row 0 gets spacing above and below and centers its items; the others
    /// only carry trailing spacing and top-align.
    #[must_use]
    pub fn row_band_height(&self, row: usize) -> f64 {
        if row == 0 {
            self.item_height + 2.0 * self.spacing
        } else {
            self.item_height + self.spacing
        }
    }

    /// Whether items in `row` are vertically centered within the band.
    #[must_use]
    pub const fn is_row_centered(row: usize) -> bool {
        row == 0
    }
}

fn is_length(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
