use core::cmp::Ordering;

use crate::error::Result;
use crate::time::{instant_from_epoch_seconds, Instant};
use crate::value::Value;

/// An immutable sequence of timestamped values.
///
/// A `TimeSeries` pairs a list of instants with a list of values of equal
/// length. Every operation returns a new series; nothing mutates an existing
/// one, so a series can be shared freely between threads.
///
/// Timestamps are not required to be sorted, but every transform assumes
/// non-decreasing order. Use [`TimeSeries::is_sorted`] and
/// [`TimeSeries::sort_by_time`] when the input order is not known.
///
/// # Type Parameters
///
/// * `V` - The value type. Most transforms require it to implement [`Value`].
///
/// # Examples
///
/// ```rust
/// use aligned_timeseries::TimeSeries;
///
/// let series = TimeSeries::from_epoch_seconds(vec![(1, 10.0), (2, 12.5), (4, 11.0)]).unwrap();
///
/// assert_eq!(series.len(), 3);
/// assert_eq!(series.values(), &[10.0, 12.5, 11.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<V> {
    index: Vec<Instant>,
    values: Vec<V>,
}

impl<V> Default for TimeSeries<V> {
    fn default() -> Self {
        TimeSeries::empty()
    }
}

impl<V> TimeSeries<V> {
    /// Builds a series from parallel timestamp and value vectors.
    ///
    /// This is the only raw constructor. When the two vectors differ in
    /// length, both are silently truncated to the shorter one; the mismatch is
    /// logged at `warn` level but never rejected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use aligned_timeseries::TimeSeries;
    /// use aligned_timeseries::time::instant_from_epoch_seconds;
    ///
    /// let index = vec![
    ///     instant_from_epoch_seconds(1).unwrap(),
    ///     instant_from_epoch_seconds(2).unwrap(),
    ///     instant_from_epoch_seconds(3).unwrap(),
    /// ];
    /// let series = TimeSeries::new(index, vec![1, 2]);
    /// assert_eq!(series.len(), 2);
    /// ```
    pub fn new(mut index: Vec<Instant>, mut values: Vec<V>) -> TimeSeries<V> {
        if index.len() != values.len() {
            let len = index.len().min(values.len());
            log::warn!(
                "truncating series to {} points ({} timestamps, {} values)",
                len,
                index.len(),
                values.len()
            );
            index.truncate(len);
            values.truncate(len);
        }
        TimeSeries { index, values }
    }

    /// Creates a series with no points.
    pub const fn empty() -> TimeSeries<V> {
        TimeSeries {
            index: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Builds a series from `(instant, value)` pairs, keeping their order.
    pub fn from_points<P>(points: P) -> TimeSeries<V>
    where
        P: IntoIterator<Item = (Instant, V)>,
    {
        points.into_iter().collect()
    }

    /// Builds a series from `(seconds since the Unix epoch, value)` pairs.
    ///
    /// Fails only if a timestamp lies outside the representable range.
    pub fn from_epoch_seconds<P>(pairs: P) -> Result<TimeSeries<V>>
    where
        P: IntoIterator<Item = (i64, V)>,
    {
        pairs
            .into_iter()
            .map(|(seconds, value)| instant_from_epoch_seconds(seconds).map(|t| (t, value)))
            .collect()
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the series has no points.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The timestamps, in storage order.
    pub fn index(&self) -> &[Instant] {
        &self.index
    }

    /// The values, in storage order.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Returns `true` if the timestamps are non-decreasing.
    pub fn is_sorted(&self) -> bool {
        self.index.windows(2).all(|w| w[0] <= w[1])
    }
}

impl<V: Copy> TimeSeries<V> {
    /// Iterates over `(instant, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Instant, V)> + '_ {
        self.index.iter().copied().zip(self.values.iter().copied())
    }

    /// Returns the first point, or `None` for an empty series.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use aligned_timeseries::TimeSeries;
    ///
    /// let series = TimeSeries::from_epoch_seconds(vec![(5, 1.0), (8, 2.0)]).unwrap();
    /// assert_eq!(series.head().map(|(t, _)| t.timestamp()), Some(5));
    ///
    /// let empty: TimeSeries<f64> = TimeSeries::empty();
    /// assert_eq!(empty.head(), None);
    /// ```
    pub fn head(&self) -> Option<(Instant, V)> {
        Some((*self.index.first()?, *self.values.first()?))
    }

    /// Returns the last point, or `None` for an empty series.
    pub fn last(&self) -> Option<(Instant, V)> {
        Some((*self.index.last()?, *self.values.last()?))
    }

    /// Keeps the points for which `predicate` holds.
    pub fn filter<F>(&self, mut predicate: F) -> TimeSeries<V>
    where
        F: FnMut(Instant, V) -> bool,
    {
        self.iter().filter(|(t, v)| predicate(*t, *v)).collect()
    }

    /// Replaces every value with `f(instant, value)`, keeping the timestamps.
    pub fn map<W, F>(&self, mut f: F) -> TimeSeries<W>
    where
        F: FnMut(Instant, V) -> W,
    {
        let values = self.iter().map(|(t, v)| f(t, v)).collect();
        TimeSeries::new(self.index.clone(), values)
    }

    /// Replaces every value with `f(value)`, keeping the timestamps.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use aligned_timeseries::TimeSeries;
    ///
    /// let series = TimeSeries::from_epoch_seconds(vec![(1, 2), (2, 3)]).unwrap();
    /// assert_eq!(series.map_values(|v| v * 10).values(), &[20, 30]);
    /// ```
    pub fn map_values<W, F>(&self, f: F) -> TimeSeries<W>
    where
        F: FnMut(V) -> W,
    {
        let values = self.values.iter().copied().map(f).collect();
        TimeSeries::new(self.index.clone(), values)
    }

    /// Returns the points with `start <= t < end`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use aligned_timeseries::TimeSeries;
    /// use aligned_timeseries::time::instant_from_epoch_seconds;
    ///
    /// let series = TimeSeries::from_epoch_seconds(vec![(1, 1), (2, 2), (3, 3), (4, 4)]).unwrap();
    /// let start = instant_from_epoch_seconds(2).unwrap();
    /// let end = instant_from_epoch_seconds(4).unwrap();
    ///
    /// assert_eq!(series.slice(start, end).values(), &[2, 3]);
    /// ```
    pub fn slice(&self, start: Instant, end: Instant) -> TimeSeries<V> {
        self.filter(|t, _| t >= start && t < end)
    }

    /// Returns a copy ordered by timestamp. Points with equal timestamps keep
    /// their relative order.
    pub fn sort_by_time(&self) -> TimeSeries<V> {
        let mut points: Vec<(Instant, V)> = self.iter().collect();
        points.sort_by_key(|(t, _)| *t);
        points.into_iter().collect()
    }

    /// Pairs the values of two sorted series at the timestamps present in both.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use aligned_timeseries::TimeSeries;
    ///
    /// let a = TimeSeries::from_epoch_seconds(vec![(1, 1), (2, 2), (3, 3)]).unwrap();
    /// let b = TimeSeries::from_epoch_seconds(vec![(2, 20.0), (3, 30.0), (4, 40.0)]).unwrap();
    ///
    /// assert_eq!(a.join(&b).values(), &[(2, 20.0), (3, 30.0)]);
    /// ```
    pub fn join<W: Copy>(&self, other: &TimeSeries<W>) -> TimeSeries<(V, W)> {
        let mut points = Vec::with_capacity(self.len().min(other.len()));
        let (mut i, mut j) = (0, 0);
        while i < self.len() && j < other.len() {
            match self.index[i].cmp(&other.index[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    points.push((self.index[i], (self.values[i], other.values[j])));
                    i += 1;
                    j += 1;
                }
            }
        }
        TimeSeries::from_points(points)
    }

    /// Keeps every timestamp of `self`, pairing it with the value of `other`
    /// at the same timestamp, or `default` when `other` has none.
    pub fn join_left<W: Copy>(&self, other: &TimeSeries<W>, default: W) -> TimeSeries<(V, W)> {
        let mut j = 0;
        let values = self
            .iter()
            .map(|(t, v)| {
                while j < other.len() && other.index[j] < t {
                    j += 1;
                }
                match other.index.get(j) {
                    Some(ot) if *ot == t => (v, other.values[j]),
                    _ => (v, default),
                }
            })
            .collect();
        TimeSeries::new(self.index.clone(), values)
    }

    /// Pairs two sorted series over the union of their timestamps, filling the
    /// missing side with the given defaults.
    pub fn join_outer<W: Copy>(
        &self,
        other: &TimeSeries<W>,
        left_default: V,
        right_default: W,
    ) -> TimeSeries<(V, W)> {
        let mut points = Vec::with_capacity(self.len().max(other.len()));
        let (mut i, mut j) = (0, 0);
        loop {
            let next = match (self.index.get(i), other.index.get(j)) {
                (None, None) => break,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(l), Some(r)) => l.cmp(r),
            };
            match next {
                Ordering::Less => {
                    points.push((self.index[i], (self.values[i], right_default)));
                    i += 1;
                }
                Ordering::Greater => {
                    points.push((other.index[j], (left_default, other.values[j])));
                    j += 1;
                }
                Ordering::Equal => {
                    points.push((self.index[i], (self.values[i], other.values[j])));
                    i += 1;
                    j += 1;
                }
            }
        }
        TimeSeries::from_points(points)
    }

    /// Combines two sorted series into one sorted series. Where both have a
    /// point at the same timestamp, the value from `self` is kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use aligned_timeseries::TimeSeries;
    ///
    /// let a = TimeSeries::from_epoch_seconds(vec![(1, 1), (3, 3)]).unwrap();
    /// let b = TimeSeries::from_epoch_seconds(vec![(2, 20), (3, 30), (4, 40)]).unwrap();
    ///
    /// assert_eq!(a.merge(&b).values(), &[1, 20, 3, 40]);
    /// ```
    pub fn merge(&self, other: &TimeSeries<V>) -> TimeSeries<V> {
        let mut points = Vec::with_capacity(self.len() + other.len());
        let (mut i, mut j) = (0, 0);
        while i < self.len() || j < other.len() {
            let take_left = match (self.index.get(i), other.index.get(j)) {
                (Some(l), Some(r)) => {
                    if l == r {
                        j += 1;
                    }
                    l <= r
                }
                (Some(_), None) => true,
                _ => false,
            };
            if take_left {
                points.push((self.index[i], self.values[i]));
                i += 1;
            } else {
                points.push((other.index[j], other.values[j]));
                j += 1;
            }
        }
        TimeSeries::from_points(points)
    }
}

impl<V: Value> TimeSeries<V> {
    /// Returns the value at position `i`, or zero when `i` is out of range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use aligned_timeseries::TimeSeries;
    ///
    /// let series = TimeSeries::from_epoch_seconds(vec![(1, 7), (2, 9)]).unwrap();
    /// assert_eq!(series.get(1), 9);
    /// assert_eq!(series.get(5), 0);
    /// ```
    pub fn get(&self, i: usize) -> V {
        self.values.get(i).copied().unwrap_or_else(V::zero)
    }
}

impl<V> FromIterator<(Instant, V)> for TimeSeries<V> {
    fn from_iter<T: IntoIterator<Item = (Instant, V)>>(iter: T) -> Self {
        let (index, values) = iter.into_iter().unzip();
        TimeSeries { index, values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[(i64, i32)]) -> TimeSeries<i32> {
        TimeSeries::from_epoch_seconds(points.iter().copied()).unwrap()
    }

    fn at(seconds: i64) -> Instant {
        instant_from_epoch_seconds(seconds).unwrap()
    }

    #[test]
    fn should_truncate_longer_values() {
        let ts = TimeSeries::new(vec![at(1), at(2)], vec![1, 2, 3, 4]);
        assert_eq!(ts.len(), 2);
        assert_eq!(ts.values(), &[1, 2]);
    }

    #[test]
    fn should_truncate_longer_index() {
        let ts = TimeSeries::new(vec![at(1), at(2), at(3)], vec![7]);
        assert_eq!(ts.index(), &[at(1)]);
        assert_eq!(ts.values(), &[7]);
    }

    #[test]
    fn get_out_of_range_is_zero() {
        let ts = series(&[(1, 4), (2, 5)]);
        assert_eq!(ts.get(0), 4);
        assert_eq!(ts.get(2), 0);
        assert_eq!(TimeSeries::<f64>::empty().get(0), 0.0);
    }

    #[test]
    fn head_and_last() {
        let ts = series(&[(1, 4), (2, 5), (3, 6)]);
        assert_eq!(ts.head(), Some((at(1), 4)));
        assert_eq!(ts.last(), Some((at(3), 6)));
        assert_eq!(TimeSeries::<i32>::empty().last(), None);
    }

    #[test]
    fn filter_always_true_is_identity() {
        let ts = series(&[(1, 4), (2, 5), (2, 6), (7, -1)]);
        assert_eq!(ts.filter(|_, _| true), ts);
    }

    #[test]
    fn filter_by_value() {
        let ts = series(&[(1, 4), (2, 5), (3, 6)]);
        assert_eq!(ts.filter(|_, v| v % 2 == 0), series(&[(1, 4), (3, 6)]));
    }

    #[test]
    fn map_sees_timestamps() {
        let ts = series(&[(1, 4), (2, 5)]);
        let mapped = ts.map(|t, v| t.timestamp() as i32 + v);
        assert_eq!(mapped, series(&[(1, 5), (2, 7)]));
        // source untouched
        assert_eq!(ts.values(), &[4, 5]);
    }

    #[test]
    fn slice_is_half_open() {
        let ts = series(&[(1, 1), (2, 2), (3, 3), (4, 4)]);
        assert_eq!(ts.slice(at(2), at(4)), series(&[(2, 2), (3, 3)]));
        assert!(ts.slice(at(5), at(9)).is_empty());
    }

    #[test]
    fn slice_over_full_range_keeps_everything() {
        let ts = series(&[(1, 1), (1, 2), (3, 3), (4, 4)]);
        let (first, _) = ts.head().unwrap();
        let (last, _) = ts.last().unwrap();
        let end = last + chrono::Duration::nanoseconds(1);
        assert_eq!(ts.slice(first, end), ts);
    }

    #[test]
    fn sort_by_time_is_stable() {
        let ts = series(&[(3, 1), (1, 2), (3, 3), (2, 4)]);
        assert!(!ts.is_sorted());
        let sorted = ts.sort_by_time();
        assert!(sorted.is_sorted());
        assert_eq!(sorted, series(&[(1, 2), (2, 4), (3, 1), (3, 3)]));
    }

    #[test]
    fn join_left_fills_default() {
        let a = series(&[(1, 1), (2, 2), (3, 3)]);
        let b = series(&[(2, 20), (4, 40)]);
        assert_eq!(a.join_left(&b, 0).values(), &[(1, 0), (2, 20), (3, 0)]);
    }

    #[test]
    fn join_outer_covers_union() {
        let a = series(&[(1, 1), (3, 3)]);
        let b = series(&[(2, 20), (3, 30), (5, 50)]);
        let joined = a.join_outer(&b, -1, -2);
        assert_eq!(joined.index(), &[at(1), at(2), at(3), at(5)]);
        assert_eq!(joined.values(), &[(1, -2), (-1, 20), (3, 30), (-1, 50)]);
    }

    #[test]
    fn merge_prefers_self() {
        let a = series(&[(1, 1), (3, 3)]);
        let b = series(&[(0, 0), (3, 30), (4, 40)]);
        assert_eq!(a.merge(&b), series(&[(0, 0), (1, 1), (3, 3), (4, 40)]));
        assert_eq!(TimeSeries::empty().merge(&b), b);
    }

    #[test]
    fn empty_is_default() {
        let ts: TimeSeries<f64> = TimeSeries::default();
        assert!(ts.is_empty());
        assert_eq!(ts, TimeSeries::from_points(Vec::new()));
    }
}
