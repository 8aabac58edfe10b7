use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use rasagg::Statistic;

#[derive(Parser, Debug)]
#[command(
    name = "rasagg",
    version,
    about = "Reduce the resolution of a raster by aggregating cellfactor x cellfactor blocks of cells"
)]
pub struct CliArgs {
    /// Input raster file
    pub input: PathBuf,

    /// Output raster file (single band, Float32)
    pub output: PathBuf,

    /// Factor of cell multiplication (output cell is `cell_factor` times larger than input cell)
    pub cell_factor: usize,

    /// Aggregation technique: AVG (default), SUM, MAX, MIN or STD
    #[arg(long = "at", value_enum, ignore_case = true)]
    pub statistic: Option<Statistic>,

    /// Expand the output to cover incomplete trailing blocks, otherwise the output is reduced
    #[arg(short = 'e', long = "expand", default_value_t = false)]
    pub expand: bool,

    /// Propagate NoData in cell computation, otherwise NoData cells are ignored
    #[arg(long = "nd", visible_alias = "propagate-nodata", default_value_t = false)]
    pub propagate_no_data: bool,

    /// JSON parameter file providing defaults for the options above
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Output GDAL driver (e.g. GTiff, HFA), or "input" to reuse the input's driver
    #[arg(long)]
    pub driver: Option<String>,

    /// Tile edge in aggregation blocks (tile = tile_blocks x cell_factor cells)
    #[arg(long)]
    pub tile_blocks: Option<usize>,

    /// Write a JSON run report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}

/// Rewrite the single-dash multi-letter flags `-at` and `-nd` to their long forms.
pub fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some("-at") => OsString::from("--at"),
            Some("-nd") => OsString::from("--nd"),
            Some(s) if s.starts_with("-at=") => OsString::from(format!("-{}", s)),
            _ => arg,
        })
        .collect()
}

impl CliArgs {
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_legacy_flags(std::env::args_os()))
    }
}
