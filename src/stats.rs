//! Descriptive statistics over series values, always computed in `f64`.
//!
//! None of these guard against empty input: the mean of an empty series is
//! `0 / 0`, i.e. `NaN`. Check [`TimeSeries::is_empty`] first.

use crate::series::TimeSeries;
use crate::value::Value;

/// Arithmetic mean of the values.
///
/// # Examples
///
/// ```rust
/// use aligned_timeseries::{stats, TimeSeries};
///
/// let series = TimeSeries::from_epoch_seconds(vec![(1, 1), (2, -3), (3, 6), (4, 6), (5, 6), (6, 8)]).unwrap();
/// assert_eq!(stats::mean(&series), 4.0);
/// assert!((stats::stddev(&series) - 3.78594).abs() < 1e-4);
/// ```
pub fn mean<V: Value>(series: &TimeSeries<V>) -> f64 {
    let sum: f64 = series.values().iter().map(|v| v.to_f64()).sum();
    sum / series.len() as f64
}

/// Population variance of the values.
pub fn variance<V: Value>(series: &TimeSeries<V>) -> f64 {
    let mean = mean(series);
    let sum_sq: f64 = series
        .values()
        .iter()
        .map(|v| (v.to_f64() - mean).powi(2))
        .sum();
    sum_sq / series.len() as f64
}

/// Population standard deviation of the values.
pub fn stddev<V: Value>(series: &TimeSeries<V>) -> f64 {
    variance(series).sqrt()
}

/// Population covariance of two value sequences, paired by position over
/// their common prefix. Timestamps are ignored; align the series first
/// (for example with [`TimeSeries::join`]) if they are not already.
pub fn covariance<V: Value, W: Value>(a: &TimeSeries<V>, b: &TimeSeries<W>) -> f64 {
    let n = a.len().min(b.len());
    let xs: Vec<f64> = a.values()[..n].iter().map(|v| v.to_f64()).collect();
    let ys: Vec<f64> = b.values()[..n].iter().map(|v| v.to_f64()).collect();
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;
    xs.iter()
        .zip(&ys)
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum::<f64>()
        / n as f64
}

/// Pearson correlation over the common prefix of two value sequences.
pub fn correlation<V: Value, W: Value>(a: &TimeSeries<V>, b: &TimeSeries<W>) -> f64 {
    let n = a.len().min(b.len());
    let a = TimeSeries::new(a.index()[..n].to_vec(), a.values()[..n].to_vec());
    let b = TimeSeries::new(b.index()[..n].to_vec(), b.values()[..n].to_vec());
    covariance(&a, &b) / (stddev(&a) * stddev(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series<V: Copy>(values: &[V]) -> TimeSeries<V> {
        TimeSeries::from_epoch_seconds(values.iter().copied().enumerate().map(|(i, v)| (i as i64, v)))
            .unwrap()
    }

    #[test]
    fn mean_and_stddev_of_known_values() {
        let ts = series(&[1, -3, 6, 6, 6, 8]);
        assert!((mean(&ts) - 4.0).abs() < 1e-12);
        assert!((variance(&ts) - 86.0 / 6.0).abs() < 1e-12);
        assert!((stddev(&ts) - 3.78594).abs() < 1e-4);
    }

    #[test]
    fn statistics_of_unsigned_values() {
        let ts = series(&[2u8, 4, 4, 4, 5, 5, 7, 9]);
        assert_eq!(mean(&ts), 5.0);
        assert_eq!(stddev(&ts), 2.0);
    }

    #[test]
    fn empty_series_mean_is_nan() {
        assert!(mean(&TimeSeries::<f64>::empty()).is_nan());
    }

    #[test]
    fn covariance_and_correlation() {
        let a = series(&[1.0, 2.0, 3.0, 4.0]);
        let b = series(&[2.0, 4.0, 6.0, 8.0, 100.0]);
        assert!((covariance(&a, &b) - 2.5).abs() < 1e-12);
        assert!((correlation(&a, &b) - 1.0).abs() < 1e-12);

        let c = a.map_values(|v| -v);
        assert!((correlation(&a, &c) + 1.0).abs() < 1e-12);
    }
}
