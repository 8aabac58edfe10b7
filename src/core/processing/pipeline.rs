use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::params::AggregationParams;
use crate::core::processing::normalize::to_working_buffer;
use crate::core::processing::reduce::{reduce_blocks, to_output_tile};
use crate::core::processing::stats::reducer;
use crate::core::processing::tiling::{TilePlan, plan_output};
use crate::error::Result;
use crate::io::raster::{RasterSink, RasterSource};
use crate::types::{OutputGrid, Statistic};

/// Summary of a completed aggregation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationReport {
    pub input_rows: usize,
    pub input_cols: usize,
    pub output_rows: usize,
    pub output_cols: usize,
    pub factor: usize,
    pub statistic: Statistic,
    pub expand: bool,
    pub propagate_no_data: bool,
    /// NoData sentinel used for detection and declared on the output
    pub no_data: f64,
    pub tile_size: usize,
    pub tiles_read: usize,
    pub tiles_written: usize,
    pub elapsed_ms: u64,
}

/// Aggregate band `source` into a new sink obtained from `create_sink`.
///
/// Parameters are validated before any I/O. The sink is created once the output
/// grid is known, georeferenced, then filled tile by tile in row-major order;
/// each tile is read, normalized, reduced and written before the next is read.
/// Source and sink failures propagate unchanged and leave the output incomplete.
pub fn aggregate<S, K, F>(
    source: &S,
    create_sink: F,
    params: &AggregationParams,
) -> Result<AggregationReport>
where
    S: RasterSource + ?Sized,
    K: RasterSink,
    F: FnOnce(&OutputGrid) -> Result<K>,
{
    params.validate()?;
    let started = Instant::now();

    let input = source.metadata();
    let factor = params.factor;
    let output = plan_output(input, factor, params.expand);
    let no_data = output.no_data;
    let tile_size = params.tile_size();
    let reduce = reducer(params.statistic, params.propagate_no_data);

    info!(
        "Aggregating {}x{} -> {}x{} (factor={}, statistic={}, expand={}, propagate_no_data={})",
        input.rows,
        input.cols,
        output.rows,
        output.cols,
        factor,
        params.statistic,
        params.expand,
        params.propagate_no_data
    );
    if input.no_data.is_none() {
        info!("Source declares no NoData value; using {:e}", no_data);
    }

    let mut sink = create_sink(&output)?;
    sink.set_geo_transform(&output.geotransform)?;
    sink.set_projection(&output.projection)?;
    sink.set_no_data_value(no_data)?;

    let plan = TilePlan::new(input.rows, input.cols, tile_size);
    info!("Tile size {}x{} ({} tiles)", tile_size, tile_size, plan.tile_count());

    let mut tiles_read = 0;
    let mut tiles_written = 0;
    for tile in plan {
        let raw = source.read_block(tile.row_offset, tile.col_offset, tile.rows, tile.cols)?;
        tiles_read += 1;

        let working = to_working_buffer(raw, no_data, factor, params.expand);
        if working.is_empty() {
            debug!(
                "Tile at ({}, {}) {}x{} has no complete sub-block; skipping",
                tile.row_offset, tile.col_offset, tile.rows, tile.cols
            );
            continue;
        }

        let reduced = reduce_blocks(&working, factor, reduce);
        let out_tile = to_output_tile(&reduced, no_data);
        let (out_row, out_col) = tile.output_offset(factor);
        debug!(
            "Tile at ({}, {}) {}x{} -> output ({}, {}) {}x{}",
            tile.row_offset,
            tile.col_offset,
            tile.rows,
            tile.cols,
            out_row,
            out_col,
            out_tile.nrows(),
            out_tile.ncols()
        );
        sink.write_block(&out_tile, out_col, out_row)?;
        tiles_written += 1;
    }

    sink.close()?;

    let report = AggregationReport {
        input_rows: input.rows,
        input_cols: input.cols,
        output_rows: output.rows,
        output_cols: output.cols,
        factor,
        statistic: params.statistic,
        expand: params.expand,
        propagate_no_data: params.propagate_no_data,
        no_data,
        tile_size,
        tiles_read,
        tiles_written,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };
    info!(
        "Aggregation complete: {} tiles read, {} written in {} ms",
        report.tiles_read, report.tiles_written, report.elapsed_ms
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::io::memory::{MemoryRaster, MemorySink};
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};
    use std::cell::Cell;

    const ND: f64 = -9999.0;

    fn run(raster: &MemoryRaster, params: &AggregationParams) -> (MemorySink, AggregationReport) {
        let grid = plan_output(raster.metadata(), params.factor, params.expand);
        let mut sink = MemorySink::for_grid(&grid);
        let sink_ref = &mut sink;
        let report = aggregate(raster, move |_| Ok(sink_ref), params).unwrap();
        (sink, report)
    }

    fn one_to(rows: usize, cols: usize) -> Array2<f64> {
        Array2::from_shape_fn((rows, cols), |(r, c)| (r * cols + c + 1) as f64)
    }

    #[test]
    fn sums_four_by_four_grid() {
        let raster = MemoryRaster::new(one_to(4, 4), None);
        let (sink, report) = run(&raster, &AggregationParams::new(2, Statistic::Sum));
        assert_eq!(sink.data, array![[14.0f32, 22.0], [46.0, 54.0]]);
        assert_eq!((report.output_rows, report.output_cols), (2, 2));
        assert!(sink.closed);
    }

    #[test]
    fn averages_four_by_four_grid() {
        let raster = MemoryRaster::new(one_to(4, 4), None);
        let (sink, _) = run(&raster, &AggregationParams::new(2, Statistic::Avg));
        assert_eq!(sink.data, array![[3.5f32, 5.5], [11.5, 13.5]]);
    }

    #[test]
    fn aligned_grids_have_same_shape_in_both_modes() {
        let raster = MemoryRaster::new(one_to(6, 9), None);
        for expand in [false, true] {
            let params = AggregationParams::new(3, Statistic::Max).with_expand(expand);
            let (sink, _) = run(&raster, &params);
            assert_eq!(sink.data.dim(), (2, 3));
            assert!(sink.data.iter().all(|v| !v.is_nan()));
        }
    }

    #[test]
    fn constant_grid_reduces_to_constant() {
        let raster = MemoryRaster::new(Array2::from_elem((6, 6), 4.5), None);
        let expected = [
            (Statistic::Avg, 4.5f32),
            (Statistic::Min, 4.5),
            (Statistic::Max, 4.5),
            (Statistic::Sum, 4.5 * 9.0),
            (Statistic::Std, 0.0),
        ];
        for (stat, want) in expected {
            let (sink, _) = run(&raster, &AggregationParams::new(3, stat));
            for v in sink.data.iter() {
                assert_relative_eq!(*v, want);
            }
        }
    }

    #[test]
    fn single_no_data_cell_propagates_or_is_ignored() {
        let mut data = one_to(4, 4);
        data[[0, 1]] = ND;
        let raster = MemoryRaster::new(data, Some(ND));

        let params = AggregationParams::new(2, Statistic::Avg).with_propagate_no_data(true);
        let (sink, _) = run(&raster, &params);
        assert_eq!(sink.data[[0, 0]], ND as f32);
        assert_eq!(sink.data[[0, 1]], 5.5);

        let params = AggregationParams::new(2, Statistic::Avg).with_propagate_no_data(false);
        let (sink, _) = run(&raster, &params);
        assert_relative_eq!(sink.data[[0, 0]], 4.0); // (1 + 5 + 6) / 3
        assert_eq!(sink.no_data, Some(ND));
    }

    #[test]
    fn all_no_data_sub_block_is_no_data_regardless_of_policy() {
        let mut data = one_to(4, 4);
        for (r, c) in [(2, 2), (2, 3), (3, 2), (3, 3)] {
            data[[r, c]] = ND;
        }
        let raster = MemoryRaster::new(data, Some(ND));
        for propagate in [true, false] {
            for stat in [Statistic::Sum, Statistic::Std, Statistic::Min] {
                let params = AggregationParams::new(2, stat).with_propagate_no_data(propagate);
                let (sink, _) = run(&raster, &params);
                assert_eq!(sink.data[[1, 1]], ND as f32);
            }
        }
    }

    #[test]
    fn expand_on_five_by_five_pads_with_no_data() {
        let raster = MemoryRaster::new(one_to(5, 5), None);
        let params = AggregationParams::new(2, Statistic::Sum).with_expand(true);
        let (sink, report) = run(&raster, &params);
        assert_eq!(sink.data.dim(), (3, 3));
        // last column: 5+10, 15+20, 25 alone
        assert_eq!(sink.data[[0, 2]], 15.0);
        assert_eq!(sink.data[[1, 2]], 35.0);
        assert_eq!(sink.data[[2, 2]], 25.0);
        // last row: 21+22, 23+24
        assert_eq!(sink.data[[2, 0]], 43.0);
        assert_eq!(sink.data[[2, 1]], 47.0);
        assert_eq!(report.no_data, crate::types::DEFAULT_NO_DATA);
    }

    #[test]
    fn expand_with_propagation_turns_padded_blocks_into_no_data() {
        let raster = MemoryRaster::new(one_to(5, 5), None);
        let params = AggregationParams::new(2, Statistic::Avg)
            .with_expand(true)
            .with_propagate_no_data(true);
        let (sink, _) = run(&raster, &params);
        assert_eq!(sink.data[[2, 2]], f32::MIN);
        assert_eq!(sink.data[[0, 2]], f32::MIN);
        assert_eq!(sink.data[[0, 0]], 4.0);
    }

    #[test]
    fn shrink_on_five_by_five_discards_trailing_cells() {
        let raster = MemoryRaster::new(one_to(5, 5), None);
        let (sink, _) = run(&raster, &AggregationParams::new(2, Statistic::Sum));
        assert_eq!(sink.data, array![[16.0f32, 24.0], [56.0, 64.0]]);
    }

    #[test]
    fn multi_tile_run_matches_single_tile_run() {
        let data = Array2::from_shape_fn((23, 17), |(r, c)| ((r * 31 + c * 7) % 13) as f64);
        let raster = MemoryRaster::new(data, Some(0.0));
        for expand in [false, true] {
            for stat in [Statistic::Avg, Statistic::Std, Statistic::Max] {
                let base = AggregationParams::new(3, stat).with_expand(expand);
                let (whole, _) = run(&raster, &base);
                let (tiled, report) = run(&raster, &base.clone().with_tile_blocks(2));
                assert!(report.tiles_read > 1);
                assert_eq!(whole.data.dim(), tiled.data.dim());
                for (a, b) in whole.data.iter().zip(tiled.data.iter()) {
                    assert_relative_eq!(*a, *b);
                }
                assert!(tiled.data.iter().all(|v| !v.is_nan()));
            }
        }
    }

    #[test]
    fn tiles_are_written_in_row_major_order() {
        let raster = MemoryRaster::new(one_to(8, 8), None);
        let params = AggregationParams::new(2, Statistic::Min).with_tile_blocks(2);
        let (sink, report) = run(&raster, &params);
        assert_eq!(
            sink.writes,
            vec![(0, 0, 2, 2), (0, 2, 2, 2), (2, 0, 2, 2), (2, 2, 2, 2)]
        );
        assert_eq!(report.tiles_written, 4);
    }

    #[test]
    fn shrink_skips_tiles_without_complete_sub_blocks() {
        // tile edge 4: the last tile row holds a single input row
        let raster = MemoryRaster::new(one_to(9, 8), None);
        let params = AggregationParams::new(2, Statistic::Avg).with_tile_blocks(2);
        let (sink, report) = run(&raster, &params);
        assert_eq!(sink.data.dim(), (4, 4));
        assert_eq!(report.tiles_read, 6);
        assert_eq!(report.tiles_written, 4);
        assert!(sink.writes.iter().all(|&(row, _, _, _)| row < 4));
    }

    #[test]
    fn georeference_is_scaled_and_passed_through() {
        let raster = MemoryRaster::new(one_to(4, 4), Some(-1.0))
            .with_georeference([10.0, 0.5, 0.0, 20.0, 0.0, -0.5], "EPSG:4326");
        let (sink, _) = run(&raster, &AggregationParams::new(2, Statistic::Avg));
        assert_eq!(sink.geotransform, Some([10.0, 1.0, 0.0, 20.0, 0.0, -1.0]));
        assert_eq!(sink.projection.as_deref(), Some("EPSG:4326"));
        assert_eq!(sink.no_data, Some(-1.0));
    }

    #[test]
    fn invalid_factor_fails_before_any_io() {
        let raster = MemoryRaster::new(one_to(4, 4), None);
        let created = Cell::new(false);
        let err = aggregate(
            &raster,
            |grid| {
                created.set(true);
                Ok(MemorySink::for_grid(grid))
            },
            &AggregationParams::new(1, Statistic::Avg),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "factor", .. }));
        assert!(!created.get());
    }

    struct FailingSource(MemoryRaster);

    impl RasterSource for FailingSource {
        fn metadata(&self) -> &crate::types::GridMetadata {
            self.0.metadata()
        }

        fn read_block(&self, row: usize, _: usize, _: usize, _: usize) -> Result<Array2<f64>> {
            Err(Error::source_read(format!("bad read at row {}", row)))
        }
    }

    #[test]
    fn source_failure_propagates_unchanged() {
        let source = FailingSource(MemoryRaster::new(one_to(4, 4), None));
        let err = aggregate(
            &source,
            |grid| Ok(MemorySink::for_grid(grid)),
            &AggregationParams::new(2, Statistic::Sum),
        )
        .unwrap_err();
        assert!(matches!(err, Error::SourceRead(ref msg) if msg == "bad read at row 0"));
    }

    #[test]
    fn sink_creation_failure_propagates() {
        let raster = MemoryRaster::new(one_to(4, 4), None);
        let err = aggregate(
            &raster,
            |_| -> Result<MemorySink> { Err(Error::sink_write("disk full")) },
            &AggregationParams::new(2, Statistic::Sum),
        )
        .unwrap_err();
        assert!(matches!(err, Error::SinkWrite(_)));
    }
}
