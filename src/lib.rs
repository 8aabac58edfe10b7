#![doc = r#"
rasagg — block-streaming raster aggregation.

Reduces the resolution of a single-band raster by an integer factor `F > 1`: every
output cell summarizes an `F x F` block of input cells with the mean, minimum,
maximum, sum or population standard deviation. NoData cells are either ignored or
propagated, and grids whose size is not a multiple of `F` are either expanded
(trailing blocks padded with NoData) or shrunk (trailing cells dropped).

The input is streamed in tiles of `200·F` cells per edge, so peak memory stays bounded
regardless of raster size. Output is always a single-band Float32 raster.

Requirements
------------
- GDAL development headers and runtime available on your system.
- Rust 2024 edition toolchain.

Quick start: aggregate a file
-----------------------------
```rust,no_run
use std::path::Path;
use rasagg::{aggregate_path_to_path, AggregationParams, Statistic};

fn main() -> rasagg::Result<()> {
    let params = AggregationParams::new(4, Statistic::Avg).with_expand(true);
    let report = aggregate_path_to_path(
        Path::new("/data/dem_10m.tif"),
        Path::new("/out/dem_40m.tif"),
        &params,
    )?;
    println!("{}x{} -> {}x{}", report.input_rows, report.input_cols, report.output_rows, report.output_cols);
    Ok(())
}
```

Aggregate in memory
-------------------
```rust
use ndarray::array;
use rasagg::{aggregate_array, AggregationParams, Statistic};

let data = array![
    [1.0, 2.0, 3.0, 4.0],
    [5.0, 6.0, 7.0, 8.0],
    [9.0, 10.0, 11.0, 12.0],
    [13.0, 14.0, 15.0, 16.0],
];
let out = aggregate_array(&data, None, &AggregationParams::new(2, Statistic::Sum)).unwrap();
assert_eq!(out, array![[14.0f32, 22.0], [46.0, 54.0]]);
```

Custom sources and sinks
------------------------
Implement [`RasterSource`] / [`RasterSink`] and call [`aggregate`] directly; the
sink is created from the planned [`OutputGrid`] once parameters have been validated.

Error handling
--------------
All public functions return `rasagg::Result<T>`:

```rust,no_run
use std::path::Path;
use rasagg::{aggregate_path_to_path, AggregationParams, Error, Statistic};

fn main() {
    let params = AggregationParams::new(3, Statistic::Max);
    match aggregate_path_to_path(Path::new("/bad/input.tif"), Path::new("/out.tif"), &params) {
        Ok(_) => {}
        Err(Error::InvalidArgument { arg, value }) => eprintln!("bad {arg}: {value}"),
        Err(Error::SourceRead(e)) => eprintln!("cannot read input: {e}"),
        Err(Error::SinkWrite(e)) => eprintln!("cannot write output: {e}"),
        Err(other) => eprintln!("Other error: {other}"),
    }
}
```

Useful modules
--------------
- [`api`] — high-level, ergonomic entry points.
- [`core`] — parameters, statistics, edge normalization, tiling and the pipeline.
- [`io`] — raster collaborator traits, GDAL and in-memory implementations.
- [`types`] — `Statistic`, grid metadata and the planned output grid.
- [`error`] — crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
pub use crate::core::params::AggregationParams;
pub use crate::core::processing::pipeline::{AggregationReport, aggregate};
pub use error::{Error, Result};
pub use types::{DEFAULT_NO_DATA, GeoTransform, GridMetadata, OutputGrid, Statistic};

pub use io::{
    GdalError, GdalRasterSink, GdalRasterSource, MemoryRaster, MemorySink, RasterSink,
    RasterSource,
};

pub use api::{aggregate_array, aggregate_path_to_path, load_params, write_report};
