use crate::types::Statistic;

/// Reduces the values of one sub-block to a single scalar. NaN marks missing data.
pub type ReduceFn = fn(&[f64]) -> f64;

/// Resolve the reduction for a run. With `propagate_no_data` any NaN in the
/// sub-block yields NaN; otherwise NaNs are skipped and only an all-NaN
/// sub-block yields NaN.
pub fn reducer(statistic: Statistic, propagate_no_data: bool) -> ReduceFn {
    match (statistic, propagate_no_data) {
        (Statistic::Max, true) => max,
        (Statistic::Min, true) => min,
        (Statistic::Avg, true) => mean,
        (Statistic::Sum, true) => sum,
        (Statistic::Std, true) => std_dev,
        (Statistic::Max, false) => nan_max,
        (Statistic::Min, false) => nan_min,
        (Statistic::Avg, false) => nan_mean,
        (Statistic::Sum, false) => nan_sum,
        (Statistic::Std, false) => nan_std_dev,
    }
}

#[inline]
fn has_nan(values: &[f64]) -> bool {
    values.iter().any(|v| v.is_nan())
}

/// Valid values plus their count; `None` when nothing is valid.
#[inline]
fn valid_sum(values: &[f64]) -> Option<(f64, usize)> {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), &v| (s + v, n + 1));
    (count > 0).then_some((sum, count))
}

pub fn max(values: &[f64]) -> f64 {
    if values.is_empty() || has_nan(values) {
        return f64::NAN;
    }
    nan_max(values)
}

pub fn min(values: &[f64]) -> f64 {
    if values.is_empty() || has_nan(values) {
        return f64::NAN;
    }
    nan_min(values)
}

pub fn sum(values: &[f64]) -> f64 {
    if values.is_empty() || has_nan(values) {
        return f64::NAN;
    }
    values.iter().sum()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() || has_nan(values) {
        return f64::NAN;
    }
    nan_mean(values)
}

/// Population standard deviation (divides by N).
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() || has_nan(values) {
        return f64::NAN;
    }
    nan_std_dev(values)
}

pub fn nan_max(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
        .unwrap_or(f64::NAN)
}

pub fn nan_min(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.min(v))))
        .unwrap_or(f64::NAN)
}

pub fn nan_sum(values: &[f64]) -> f64 {
    valid_sum(values).map_or(f64::NAN, |(s, _)| s)
}

pub fn nan_mean(values: &[f64]) -> f64 {
    valid_sum(values).map_or(f64::NAN, |(s, n)| s / n as f64)
}

pub fn nan_std_dev(values: &[f64]) -> f64 {
    let Some((s, n)) = valid_sum(values) else {
        return f64::NAN;
    };
    let mean = s / n as f64;
    let sq: f64 = values
        .iter()
        .filter(|v| !v.is_nan())
        .map(|&v| (v - mean) * (v - mean))
        .sum();
    (sq / n as f64).sqrt()
}
