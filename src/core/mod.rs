//! Core aggregation building blocks: parameters, reduction statistics, edge
//! normalization, sub-block reduction, tiling and the block-streaming pipeline.
//! The high-level `api` module wires these to concrete raster collaborators.
pub mod params;
pub mod processing;
