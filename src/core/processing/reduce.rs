use ndarray::{Array2, Zip};

use crate::core::processing::stats::ReduceFn;

/// Reduce every non-overlapping `factor x factor` sub-block of a normalized
/// working buffer to one value. Output shape is `(rows / factor, cols / factor)`;
/// trailing cells that do not fill a sub-block are ignored, so callers
/// normalize edges first.
pub fn reduce_blocks(data: &Array2<f64>, factor: usize, reduce: ReduceFn) -> Array2<f64> {
    let out_shape = (data.nrows() / factor, data.ncols() / factor);
    let mut result = Array2::<f64>::zeros(out_shape);
    let mut scratch = Vec::with_capacity(factor * factor);

    Zip::from(&mut result)
        .and(data.exact_chunks((factor, factor)))
        .for_each(|res, block| {
            scratch.clear();
            scratch.extend(block.iter().copied());
            *res = reduce(&scratch);
        });
    result
}

/// Narrow reduced values to the Float32 output, replacing NaN with `no_data`.
pub fn to_output_tile(reduced: &Array2<f64>, no_data: f64) -> Array2<f32> {
    let no_data = no_data as f32;
    reduced.mapv(|v| if v.is_nan() { no_data } else { v as f32 })
}
