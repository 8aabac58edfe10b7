use ndarray::{Array2, Axis, concatenate, s};
use tracing::debug;

/// Replace every cell equal to `no_data` with NaN, in place.
pub fn mask_no_data(block: &mut Array2<f64>, no_data: f64) {
    block.mapv_inplace(|v| if v == no_data { f64::NAN } else { v });
}

/// Bring one axis of `data` to a multiple of `factor`: pad with NaN when
/// `expand`, otherwise drop the trailing remainder.
fn normalize_axis(data: Array2<f64>, axis: Axis, factor: usize, expand: bool) -> Array2<f64> {
    let len = data.len_of(axis);
    let remainder = len % factor;
    if remainder == 0 {
        return data;
    }

    if expand {
        let missing = factor - remainder;
        let pad_shape = match axis {
            Axis(0) => (missing, data.ncols()),
            _ => (data.nrows(), missing),
        };
        let pad = Array2::from_elem(pad_shape, f64::NAN);
        match concatenate(axis, &[data.view(), pad.view()]) {
            Ok(padded) => padded,
            // shapes agree on the other axis by construction
            Err(_) => unreachable!("padding shape mismatch"),
        }
    } else {
        let keep = len - remainder;
        match axis {
            Axis(0) => data.slice(s![..keep, ..]).to_owned(),
            _ => data.slice(s![.., ..keep]).to_owned(),
        }
    }
}

/// Normalize a raw tile into a working buffer whose dimensions are multiples
/// of `factor`. Rows are handled first, then columns on the row-adjusted buffer.
/// In shrink mode an axis may end up empty.
pub fn normalize_edges(data: Array2<f64>, factor: usize, expand: bool) -> Array2<f64> {
    let (rows, cols) = data.dim();
    let data = normalize_axis(data, Axis(0), factor, expand);
    let data = normalize_axis(data, Axis(1), factor, expand);
    if data.dim() != (rows, cols) {
        debug!(
            "Edge normalization ({}): {}x{} -> {}x{}",
            if expand { "expand" } else { "shrink" },
            rows,
            cols,
            data.nrows(),
            data.ncols()
        );
    }
    data
}

/// Working buffer for one tile: NoData substitution followed by edge normalization.
pub fn to_working_buffer(
    mut raw: Array2<f64>,
    no_data: f64,
    factor: usize,
    expand: bool,
) -> Array2<f64> {
    mask_no_data(&mut raw, no_data);
    normalize_edges(raw, factor, expand)
}
