//! Ready-made reducers for [`TimeSeries::group_by_time`] and
//! [`TimeSeries::rolling_window`].
//!
//! Every reducer returns zero for an empty slice.
//!
//! [`TimeSeries::group_by_time`]: crate::TimeSeries::group_by_time
//! [`TimeSeries::rolling_window`]: crate::TimeSeries::rolling_window

use crate::value::{Fractional, Value};

/// Sum of the values.
pub fn sum<V: Value>(values: &[V]) -> V {
    values.iter().fold(V::zero(), |acc, v| acc + *v)
}

/// Smallest value. Incomparable values (NaN) never replace the current minimum.
pub fn min<V: Value>(values: &[V]) -> V {
    let mut iter = values.iter().copied();
    let first = iter.next().unwrap_or_else(V::zero);
    iter.fold(first, |acc, v| if v < acc { v } else { acc })
}

/// Largest value. Incomparable values (NaN) never replace the current maximum.
pub fn max<V: Value>(values: &[V]) -> V {
    let mut iter = values.iter().copied();
    let first = iter.next().unwrap_or_else(V::zero);
    iter.fold(first, |acc, v| if v > acc { v } else { acc })
}

/// Earliest value of the slice.
pub fn first<V: Value>(values: &[V]) -> V {
    values.first().copied().unwrap_or_else(V::zero)
}

/// Latest value of the slice.
pub fn last<V: Value>(values: &[V]) -> V {
    values.last().copied().unwrap_or_else(V::zero)
}

/// Arithmetic mean in the series' own value type.
///
/// # Examples
///
/// ```rust
/// use aligned_timeseries::reduce;
///
/// assert_eq!(reduce::mean(&[1.0, 2.0, 6.0]), 3.0);
/// assert_eq!(reduce::mean::<f32>(&[]), 0.0);
/// ```
pub fn mean<V: Fractional>(values: &[V]) -> V {
    if values.is_empty() {
        return V::zero();
    }
    sum(values) / V::from_f64(values.len() as f64)
}
