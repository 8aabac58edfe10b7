use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Statistic;

/// Sub-blocks per tile edge; a tile spans `DEFAULT_TILE_BLOCKS * factor` cells.
pub const DEFAULT_TILE_BLOCKS: usize = 200;

/// Output driver name that reuses the input dataset's driver
pub const SAME_AS_INPUT_DRIVER: &str = "input";

/// Aggregation parameters suitable for config files and CLI presets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationParams {
    /// Integer reduction factor, must be greater than 1
    pub factor: usize,
    pub statistic: Statistic,
    /// Pad incomplete trailing sub-blocks with NoData instead of discarding them
    pub expand: bool,
    /// Any NoData cell in a sub-block makes the output cell NoData
    pub propagate_no_data: bool,
    /// Tile edge length in sub-blocks; bounds peak memory
    pub tile_blocks: usize,
    /// GDAL driver for the output, or "input" to reuse the input's driver
    pub driver: String,
}

impl Default for AggregationParams {
    fn default() -> Self {
        Self {
            factor: 2,
            statistic: Statistic::Avg,
            expand: false,
            propagate_no_data: false,
            tile_blocks: DEFAULT_TILE_BLOCKS,
            driver: "GTiff".to_string(),
        }
    }
}

impl AggregationParams {
    pub fn new(factor: usize, statistic: Statistic) -> Self {
        Self {
            factor,
            statistic,
            ..Self::default()
        }
    }

    pub fn with_expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    pub fn with_propagate_no_data(mut self, propagate: bool) -> Self {
        self.propagate_no_data = propagate;
        self
    }

    pub fn with_tile_blocks(mut self, tile_blocks: usize) -> Self {
        self.tile_blocks = tile_blocks;
        self
    }

    /// Tile edge in cells, always a multiple of `factor`.
    pub fn tile_size(&self) -> usize {
        self.tile_blocks * self.factor
    }

    /// Reject malformed parameters before any I/O happens.
    pub fn validate(&self) -> Result<()> {
        if self.factor <= 1 {
            return Err(Error::invalid_argument("factor", self.factor));
        }
        if self.tile_blocks == 0 {
            return Err(Error::invalid_argument("tile_blocks", self.tile_blocks));
        }
        if self.tile_blocks.checked_mul(self.factor).is_none() {
            return Err(Error::invalid_argument(
                "tile_blocks",
                format!("{} (tile size overflows with factor {})", self.tile_blocks, self.factor),
            ));
        }
        if self.driver.trim().is_empty() {
            return Err(Error::invalid_argument("driver", "<empty>"));
        }
        Ok(())
    }
}
