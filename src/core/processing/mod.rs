pub mod normalize;
pub mod pipeline;
pub mod reduce;
pub mod stats;
pub mod tiling;
