//! High-level, ergonomic library API: aggregate raster files through GDAL or
//! in-memory arrays, and load/store parameter files and run reports. Prefer
//! these entrypoints over the low-level processing modules when integrating rasagg.
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use ndarray::Array2;
use tracing::info;

use crate::core::params::{AggregationParams, SAME_AS_INPUT_DRIVER};
use crate::core::processing::pipeline::{AggregationReport, aggregate};
use crate::core::processing::tiling::plan_output;
use crate::error::Result;
use crate::io::gdal::{GdalRasterSink, GdalRasterSource};
use crate::io::memory::{MemoryRaster, MemorySink};
use crate::io::raster::RasterSource;

/// Aggregate band 1 of the raster at `input` into a new Float32 raster at `output`.
pub fn aggregate_path_to_path(
    input: &Path,
    output: &Path,
    params: &AggregationParams,
) -> Result<AggregationReport> {
    params.validate()?;

    let source = GdalRasterSource::open(input)?;
    let driver = if params.driver.eq_ignore_ascii_case(SAME_AS_INPUT_DRIVER) {
        source.driver_name()
    } else {
        params.driver.clone()
    };
    info!("Aggregating {:?} -> {:?} ({})", input, output, driver);

    aggregate(
        &source,
        |grid| GdalRasterSink::create(output, &driver, grid),
        params,
    )
}

/// Aggregate an in-memory band. Cells equal to `no_data` (or the default
/// sentinel when `None`) are missing; missing output cells carry that sentinel.
pub fn aggregate_array(
    data: &Array2<f64>,
    no_data: Option<f64>,
    params: &AggregationParams,
) -> Result<Array2<f32>> {
    params.validate()?;

    let source = MemoryRaster::new(data.to_owned(), no_data);
    let grid = plan_output(source.metadata(), params.factor, params.expand);
    let mut sink = MemorySink::for_grid(&grid);
    let sink_ref = &mut sink;
    aggregate(&source, move |_| Ok(sink_ref), params)?;
    Ok(sink.data)
}

/// Load aggregation parameters from a JSON file. Missing fields take defaults.
pub fn load_params(path: &Path) -> Result<AggregationParams> {
    let reader = BufReader::new(File::open(path)?);
    let params: AggregationParams = serde_json::from_reader(reader)?;
    Ok(params)
}

/// Write a run report as pretty-printed JSON.
pub fn write_report(path: &Path, report: &AggregationReport) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
