//! Shared types used across rasagg.
//! Includes the `Statistic` enumeration, grid metadata and the planned output grid.
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// NoData sentinel used when the source declares none (the lowest finite `f32`).
pub const DEFAULT_NO_DATA: f64 = -3.4028234663852886e38;

/// Affine geotransform coefficients
/// ([origin_x, pixel_width, rot_x, origin_y, rot_y, pixel_height])
pub type GeoTransform = [f64; 6];

#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Debug, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Statistic {
    #[value(name = "MAX")]
    Max,
    #[value(name = "MIN")]
    Min,
    #[default]
    #[value(name = "AVG")]
    Avg,
    #[value(name = "SUM")]
    Sum,
    #[value(name = "STD")]
    Std,
}

impl std::fmt::Display for Statistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Statistic::Max => "MAX",
            Statistic::Min => "MIN",
            Statistic::Avg => "AVG",
            Statistic::Sum => "SUM",
            Statistic::Std => "STD",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Statistic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MAX" => Ok(Statistic::Max),
            "MIN" => Ok(Statistic::Min),
            "AVG" | "MEAN" => Ok(Statistic::Avg),
            "SUM" => Ok(Statistic::Sum),
            "STD" => Ok(Statistic::Std),
            _ => Err(Error::invalid_argument("statistic", s)),
        }
    }
}

/// Metadata of the single band being aggregated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridMetadata {
    pub rows: usize,
    pub cols: usize,
    /// NoData value as declared by the source, if any
    pub no_data: Option<f64>,
    pub geotransform: GeoTransform,
    /// Projection descriptor, passed through untouched
    pub projection: String,
}

impl GridMetadata {
    /// The sentinel used for detection and declared on the output.
    pub fn effective_no_data(&self) -> f64 {
        self.no_data.unwrap_or(DEFAULT_NO_DATA)
    }
}

/// Shape and georeferencing of the aggregated output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputGrid {
    pub rows: usize,
    pub cols: usize,
    pub no_data: f64,
    pub geotransform: GeoTransform,
    pub projection: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistic_parses_case_insensitively() {
        assert_eq!("avg".parse::<Statistic>().unwrap(), Statistic::Avg);
        assert_eq!("Mean".parse::<Statistic>().unwrap(), Statistic::Avg);
        assert_eq!(" STD ".parse::<Statistic>().unwrap(), Statistic::Std);
        assert_eq!("max".parse::<Statistic>().unwrap(), Statistic::Max);
    }

    #[test]
    fn unknown_statistic_is_invalid_argument() {
        let err = "median".parse::<Statistic>().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArgument { arg: "statistic", ref value } if value == "median"
        ));
    }

    #[test]
    fn statistic_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Statistic::Sum).unwrap(), "\"SUM\"");
        let parsed: Statistic = serde_json::from_str("\"MIN\"").unwrap();
        assert_eq!(parsed, Statistic::Min);
        assert_eq!(Statistic::Std.to_string(), "STD");
    }

    #[test]
    fn missing_no_data_falls_back_to_default() {
        let meta = GridMetadata {
            rows: 1,
            cols: 1,
            no_data: None,
            geotransform: [0.0, 1.0, 0.0, 0.0, 0.0, -1.0],
            projection: String::new(),
        };
        assert_eq!(meta.effective_no_data(), DEFAULT_NO_DATA);
        assert_eq!(DEFAULT_NO_DATA as f32, f32::MIN);
    }
}
