use crate::types::{GridMetadata, OutputGrid};

/// Output length along one axis: `ceil(len / factor)` when expanding,
/// `floor(len / factor)` when shrinking.
pub fn output_len(len: usize, factor: usize, expand: bool) -> usize {
    if expand {
        len.div_ceil(factor)
    } else {
        len / factor
    }
}

/// Output grid for `input`: scaled dimensions, pixel sizes multiplied by
/// `factor`, projection carried over, NoData defaulted when undeclared.
pub fn plan_output(input: &GridMetadata, factor: usize, expand: bool) -> OutputGrid {
    let gt = input.geotransform;
    let f = factor as f64;
    OutputGrid {
        rows: output_len(input.rows, factor, expand),
        cols: output_len(input.cols, factor, expand),
        no_data: input.effective_no_data(),
        geotransform: [gt[0], gt[1] * f, gt[2], gt[3], gt[4], gt[5] * f],
        projection: input.projection.clone(),
    }
}

/// One I/O window of the input grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub row_offset: usize,
    pub col_offset: usize,
    pub rows: usize,
    pub cols: usize,
}

impl Tile {
    /// Offset of this tile in the output grid as (row, col).
    pub fn output_offset(&self, factor: usize) -> (usize, usize) {
        (self.row_offset / factor, self.col_offset / factor)
    }
}

/// Row-major iterator over tiles of at most `tile_size x tile_size` cells that
/// exactly partition a `rows x cols` grid. Only the last tile in each axis may
/// be smaller.
#[derive(Debug, Clone)]
pub struct TilePlan {
    rows: usize,
    cols: usize,
    tile_size: usize,
    next_row: usize,
    next_col: usize,
}

impl TilePlan {
    pub fn new(rows: usize, cols: usize, tile_size: usize) -> Self {
        Self {
            rows,
            cols,
            tile_size: tile_size.max(1),
            next_row: 0,
            next_col: 0,
        }
    }

    /// Number of tiles in the plan.
    pub fn tile_count(&self) -> usize {
        self.rows.div_ceil(self.tile_size) * self.cols.div_ceil(self.tile_size)
    }
}

impl Iterator for TilePlan {
    type Item = Tile;

    fn next(&mut self) -> Option<Tile> {
        if self.next_row >= self.rows || self.cols == 0 {
            return None;
        }
        let tile = Tile {
            row_offset: self.next_row,
            col_offset: self.next_col,
            rows: self.tile_size.min(self.rows - self.next_row),
            cols: self.tile_size.min(self.cols - self.next_col),
        };
        self.next_col += self.tile_size;
        if self.next_col >= self.cols {
            self.next_col = 0;
            self.next_row += self.tile_size;
        }
        Some(tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(rows: usize, cols: usize, no_data: Option<f64>) -> GridMetadata {
        GridMetadata {
            rows,
            cols,
            no_data,
            geotransform: [100.0, 10.0, 0.0, 500.0, 0.0, -10.0],
            projection: "EPSG:32633".to_string(),
        }
    }

    #[test]
    fn exact_multiples_agree_in_both_modes() {
        for (len, factor) in [(4, 2), (9, 3), (1200, 4), (10, 5)] {
            assert_eq!(output_len(len, factor, true), len / factor);
            assert_eq!(output_len(len, factor, false), len / factor);
        }
    }

    #[test]
    fn remainders_round_up_or_down() {
        assert_eq!(output_len(5, 2, true), 3);
        assert_eq!(output_len(5, 2, false), 2);
        assert_eq!(output_len(1, 3, true), 1);
        assert_eq!(output_len(1, 3, false), 0);
    }

    #[test]
    fn output_geotransform_scales_pixel_sizes_only() {
        let out = plan_output(&meta(5, 7, Some(-1.0)), 2, true);
        assert_eq!((out.rows, out.cols), (3, 4));
        assert_eq!(out.geotransform, [100.0, 20.0, 0.0, 500.0, 0.0, -20.0]);
        assert_eq!(out.projection, "EPSG:32633");
        assert_eq!(out.no_data, -1.0);
    }

    #[test]
    fn output_defaults_no_data() {
        let out = plan_output(&meta(4, 4, None), 2, false);
        assert_eq!(out.no_data, crate::types::DEFAULT_NO_DATA);
    }

    #[test]
    fn tiles_partition_grid_row_major() {
        let tiles: Vec<Tile> = TilePlan::new(5, 7, 4).collect();
        let expected = vec![
            Tile { row_offset: 0, col_offset: 0, rows: 4, cols: 4 },
            Tile { row_offset: 0, col_offset: 4, rows: 4, cols: 3 },
            Tile { row_offset: 4, col_offset: 0, rows: 1, cols: 4 },
            Tile { row_offset: 4, col_offset: 4, rows: 1, cols: 3 },
        ];
        assert_eq!(tiles, expected);
        assert_eq!(TilePlan::new(5, 7, 4).tile_count(), 4);
    }

    #[test]
    fn tiles_cover_every_cell_once() {
        let (rows, cols) = (23, 41);
        let mut hits = vec![0u8; rows * cols];
        for tile in TilePlan::new(rows, cols, 6) {
            for r in tile.row_offset..tile.row_offset + tile.rows {
                for c in tile.col_offset..tile.col_offset + tile.cols {
                    hits[r * cols + c] += 1;
                }
            }
        }
        assert!(hits.iter().all(|&h| h == 1));
    }

    #[test]
    fn single_tile_when_grid_is_small() {
        let tiles: Vec<Tile> = TilePlan::new(3, 3, 400).collect();
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].output_offset(2), (0, 0));
    }

    #[test]
    fn output_offsets_follow_tile_offsets() {
        let tile = Tile { row_offset: 8, col_offset: 12, rows: 4, cols: 4 };
        assert_eq!(tile.output_offset(4), (2, 3));
    }
}
