//! Collaborator seams between the aggregation core and concrete raster formats.
use ndarray::Array2;

use crate::error::Result;
use crate::types::{GeoTransform, GridMetadata};

/// Single-band raster that can be read window by window
pub trait RasterSource {
    fn metadata(&self) -> &GridMetadata;

    /// Read a `num_rows x num_cols` window starting at (`row_offset`, `col_offset`)
    /// as a row-major array of shape (num_rows, num_cols).
    fn read_block(
        &self,
        row_offset: usize,
        col_offset: usize,
        num_rows: usize,
        num_cols: usize,
    ) -> Result<Array2<f64>>;
}

/// Single-band Float32 raster being written window by window
pub trait RasterSink {
    fn set_geo_transform(&mut self, geotransform: &GeoTransform) -> Result<()>;

    fn set_projection(&mut self, projection: &str) -> Result<()>;

    fn set_no_data_value(&mut self, no_data: f64) -> Result<()>;

    /// Write `block` with its top-left corner at (`col_offset`, `row_offset`).
    fn write_block(&mut self, block: &Array2<f32>, col_offset: usize, row_offset: usize)
    -> Result<()>;

    /// Flush and release the output.
    fn close(self) -> Result<()>;
}
