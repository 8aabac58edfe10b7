use gdal::raster::Buffer;
use gdal::{Dataset, DriverManager, errors::GdalError as GdalCrateError};
use ndarray::Array2;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use thiserror::Error;

use crate::error::{Error, Result};
use crate::io::raster::{RasterSink, RasterSource};
use crate::types::{GeoTransform, GridMetadata, OutputGrid};

/// Errors encountered when talking to GDAL
#[derive(Debug, Error)]
pub enum GdalError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] GdalCrateError),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Dimension mismatch: expected {0}x{1}, got {2}")]
    DimensionMismatch(usize, usize, usize),
}

/// Register all GDAL drivers. Idempotent; called before any dataset is opened or created.
pub fn init_drivers() {
    DriverManager::register_all();
}

/// Band 1 of a GDAL-supported dataset (GeoTIFF, ENVI, HFA, ...)
pub struct GdalRasterSource {
    pub dataset: Dataset,
    pub metadata: GridMetadata,
    path: PathBuf,
}

impl GdalRasterSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_inner(path.as_ref()).map_err(|e| {
            Error::source_read(format!("{}: {}", path.as_ref().display(), e))
        })
    }

    fn open_inner(path: &Path) -> std::result::Result<Self, GdalError> {
        init_drivers();
        let dataset = Dataset::open(path)?;
        let (cols, rows) = dataset.raster_size();
        let bands = dataset.raster_count() as usize;
        if bands == 0 {
            return Err(GdalError::UnsupportedFormat("No raster bands found".into()));
        }
        if bands > 1 {
            warn!(
                "{:?} has {} bands; only band 1 is aggregated",
                path, bands
            );
        }
        let geotransform = match dataset.geo_transform() {
            Ok(gt) => gt,
            Err(_) => [0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        };
        let projection = dataset.projection();
        let no_data = dataset.rasterband(1)?.no_data_value();
        Ok(GdalRasterSource {
            dataset,
            metadata: GridMetadata {
                rows,
                cols,
                no_data,
                geotransform,
                projection,
            },
            path: path.to_path_buf(),
        })
    }

    /// Short name of the driver that opened the input (e.g. "GTiff")
    pub fn driver_name(&self) -> String {
        self.dataset.driver().short_name()
    }

    fn read_window(
        &self,
        row_offset: usize,
        col_offset: usize,
        num_rows: usize,
        num_cols: usize,
    ) -> std::result::Result<Array2<f64>, GdalError> {
        let band = self.dataset.rasterband(1)?;
        let window = (num_cols, num_rows);
        let buf = band.read_as::<f64>(
            (col_offset as isize, row_offset as isize),
            window,
            window,
            None,
        )?;
        let data_vec = buf.data().to_vec();
        let got = data_vec.len();
        Array2::from_shape_vec((num_rows, num_cols), data_vec)
            .map_err(|_| GdalError::DimensionMismatch(num_rows, num_cols, got))
    }
}

impl RasterSource for GdalRasterSource {
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
        self.read_window(row_offset, col_offset, num_rows, num_cols)
            .map_err(|e| Error::source_read(format!("{}: {}", self.path.display(), e)))
    }
}

/// Single-band Float32 output dataset
pub struct GdalRasterSink {
    dataset: Dataset,
    path: PathBuf,
}

impl GdalRasterSink {
    /// Create `path` with the named driver, sized for `grid`.
    pub fn create<P: AsRef<Path>>(path: P, driver: &str, grid: &OutputGrid) -> Result<Self> {
        let path = path.as_ref();
        Self::create_inner(path, driver, grid.rows, grid.cols)
            .map_err(|e| Error::sink_write(format!("{}: {}", path.display(), e)))
    }

    fn create_inner(
        path: &Path,
        driver: &str,
        rows: usize,
        cols: usize,
    ) -> std::result::Result<Self, GdalError> {
        init_drivers();
        let driver = DriverManager::get_driver_by_name(driver)?;
        debug!(
            "Creating {}x{} Float32 output {:?} with driver {}",
            rows,
            cols,
            path,
            driver.short_name()
        );
        let dataset = driver.create_with_band_type::<f32, _>(path, cols, rows, 1)?;
        Ok(GdalRasterSink {
            dataset,
            path: path.to_path_buf(),
        })
    }

    fn wrap<T>(&self, r: std::result::Result<T, GdalCrateError>) -> Result<T> {
        r.map_err(|e| Error::sink_write(format!("{}: {}", self.path.display(), e)))
    }
}

impl RasterSink for GdalRasterSink {
    fn set_geo_transform(&mut self, geotransform: &GeoTransform) -> Result<()> {
        let r = self.dataset.set_geo_transform(geotransform);
        self.wrap(r)
    }

    fn set_projection(&mut self, projection: &str) -> Result<()> {
        if projection.is_empty() {
            return Ok(());
        }
        let r = self.dataset.set_projection(projection);
        self.wrap(r)
    }

    fn set_no_data_value(&mut self, no_data: f64) -> Result<()> {
        let r = self
            .dataset
            .rasterband(1)
            .and_then(|mut band| band.set_no_data_value(Some(no_data)));
        self.wrap(r)
    }

    fn write_block(
        &mut self,
        block: &Array2<f32>,
        col_offset: usize,
        row_offset: usize,
    ) -> Result<()> {
        let (rows, cols) = block.dim();
        let mut buf = Buffer::new((cols, rows), block.iter().copied().collect());
        let r = self.dataset.rasterband(1).and_then(|mut band| {
            band.write(
                (col_offset as isize, row_offset as isize),
                (cols, rows),
                &mut buf,
            )
        });
        self.wrap(r)
    }

    fn close(self) -> Result<()> {
        let path = self.path;
        self.dataset
            .close()
            .map_err(|e| Error::sink_write(format!("{}: {}", path.display(), e)))
    }
}
