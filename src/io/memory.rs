//! In-memory raster collaborators, for embedding the aggregator on arrays that
//! are already loaded and for exercising it without touching the filesystem.
use ndarray::{Array2, s};

use crate::error::{Error, Result};
use crate::io::raster::{RasterSink, RasterSource};
use crate::types::{GeoTransform, GridMetadata, OutputGrid};

/// Identity geotransform used when an array carries no georeferencing
pub const IDENTITY_GEOTRANSFORM: GeoTransform = [0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

/// A whole band held in memory
#[derive(Debug, Clone)]
pub struct MemoryRaster {
    data: Array2<f64>,
    metadata: GridMetadata,
}

impl MemoryRaster {
    pub fn new(data: Array2<f64>, no_data: Option<f64>) -> Self {
        let (rows, cols) = data.dim();
        Self {
            data,
            metadata: GridMetadata {
                rows,
                cols,
                no_data,
                geotransform: IDENTITY_GEOTRANSFORM,
                projection: String::new(),
            },
        }
    }

    pub fn with_georeference(mut self, geotransform: GeoTransform, projection: &str) -> Self {
        self.metadata.geotransform = geotransform;
        self.metadata.projection = projection.to_string();
        self
    }
}

impl RasterSource for MemoryRaster {
    fn metadata(&self) -> &GridMetadata {
        &self.metadata
    }

    fn read_block(
        &self,
        row_offset: usize,
        col_offset: usize,
        num_rows: usize,
        num_cols: usize,
    ) -> Result<Array2<f64>> {
        let (rows, cols) = self.data.dim();
        if row_offset + num_rows > rows || col_offset + num_cols > cols {
            return Err(Error::source_read(format!(
                "window {}x{} at ({}, {}) outside {}x{} raster",
                num_rows, num_cols, row_offset, col_offset, rows, cols
            )));
        }
        Ok(self
            .data
            .slice(s![row_offset..row_offset + num_rows, col_offset..col_offset + num_cols])
            .to_owned())
    }
}

/// Output band assembled in memory; keeps a log of written windows
#[derive(Debug, Clone)]
pub struct MemorySink {
    pub data: Array2<f32>,
    pub geotransform: Option<GeoTransform>,
    pub projection: Option<String>,
    pub no_data: Option<f64>,
    /// (row_offset, col_offset, rows, cols) of each write, in order
    pub writes: Vec<(usize, usize, usize, usize)>,
    pub closed: bool,
}

impl MemorySink {
    /// Cells start at NaN so unwritten areas are detectable.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), f32::NAN),
            geotransform: None,
            projection: None,
            no_data: None,
            writes: Vec::new(),
            closed: false,
        }
    }

    pub fn for_grid(grid: &OutputGrid) -> Self {
        Self::new(grid.rows, grid.cols)
    }
}

impl RasterSink for MemorySink {
    fn set_geo_transform(&mut self, geotransform: &GeoTransform) -> Result<()> {
        self.geotransform = Some(*geotransform);
        Ok(())
    }

    fn set_projection(&mut self, projection: &str) -> Result<()> {
        self.projection = Some(projection.to_string());
        Ok(())
    }

    fn set_no_data_value(&mut self, no_data: f64) -> Result<()> {
        self.no_data = Some(no_data);
        Ok(())
    }

    fn write_block(
        &mut self,
        block: &Array2<f32>,
        col_offset: usize,
        row_offset: usize,
    ) -> Result<()> {
        let (rows, cols) = block.dim();
        let (out_rows, out_cols) = self.data.dim();
        if row_offset + rows > out_rows || col_offset + cols > out_cols {
            return Err(Error::sink_write(format!(
                "block {}x{} at ({}, {}) outside {}x{} output",
                rows, cols, row_offset, col_offset, out_rows, out_cols
            )));
        }
        self.data
            .slice_mut(s![row_offset..row_offset + rows, col_offset..col_offset + cols])
            .assign(block);
        self.writes.push((row_offset, col_offset, rows, cols));
        Ok(())
    }

    fn close(self) -> Result<()> {
        Ok(())
    }
}

impl RasterSink for &mut MemorySink {
    fn set_geo_transform(&mut self, geotransform: &GeoTransform) -> Result<()> {
        (**self).set_geo_transform(geotransform)
    }

    fn set_projection(&mut self, projection: &str) -> Result<()> {
        (**self).set_projection(projection)
    }

    fn set_no_data_value(&mut self, no_data: f64) -> Result<()> {
        (**self).set_no_data_value(no_data)
    }

    fn write_block(
        &mut self,
        block: &Array2<f32>,
        col_offset: usize,
        row_offset: usize,
    ) -> Result<()> {
        (**self).write_block(block, col_offset, row_offset)
    }

    fn close(self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
