//! I/O layer: the `raster` collaborator traits the aggregator reads and writes
//! through, a GDAL-backed implementation in `gdal`, and in-memory rasters in `memory`.
pub mod raster;
pub use raster::{RasterSink, RasterSource};

pub mod gdal;
pub use gdal::{GdalError, GdalRasterSink, GdalRasterSource};

pub mod memory;
pub use memory::{MemoryRaster, MemorySink};
