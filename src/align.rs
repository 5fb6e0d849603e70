//! Alignment of irregular samples against regular time grids.
//!
//! [`TimeSeries::resample`] is the general two-cursor merge;
//! [`TimeSeries::fill_missing`] and [`TimeSeries::interpolate`] are
//! resamples with a fixed combinator. [`TimeSeries::group_by_time`] and
//! [`TimeSeries::rolling_window`] reduce runs and trailing windows of samples.
//!
//! All of them assume the series is sorted by timestamp.

use core::cmp::Ordering;

use crate::series::TimeSeries;
use crate::time::{distance, duration_secs_f64, Duration, Grid, Instant};
use crate::value::{Fractional, Value};

impl<V: Value> TimeSeries<V> {
    /// Projects the series onto the grid `head, head + delta, ...` ending at
    /// the last grid point not after the final sample.
    ///
    /// Grid points that coincide with a sample take its value. For any other
    /// grid point `t`, the value is `f(next, prev, t)` where `next` is the
    /// first sample after `t` and `prev` is the latest point seen so far
    /// (either a sample or a value already synthesized for the grid). Samples
    /// that fall between grid points only update `prev`.
    ///
    /// Returns an empty series when the input is empty or `delta` is not
    /// positive.
    ///
    /// # Parameters
    ///
    /// * `delta` - Spacing of the target grid
    /// * `f` - Combinator `(next sample, previous point, grid instant) -> value`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use aligned_timeseries::TimeSeries;
    /// use aligned_timeseries::time::Duration;
    ///
    /// let series = TimeSeries::from_epoch_seconds(vec![(0, 1), (3, 4)]).unwrap();
    ///
    /// // carry the previous value forward
    /// let resampled = series.resample(Duration::seconds(1), |_, (_, prev), _| prev);
    /// assert_eq!(resampled.values(), &[1, 1, 1, 4]);
    /// ```
    pub fn resample<F>(&self, delta: Duration, mut f: F) -> TimeSeries<V>
    where
        F: FnMut((Instant, V), (Instant, V), Instant) -> V,
    {
        let (Some((start, _)), Some((end, _))) = (self.head(), self.last()) else {
            return TimeSeries::empty();
        };
        if delta <= Duration::zero() {
            log::warn!("ignoring resample with non-positive step {}", delta);
            return TimeSeries::empty();
        }

        let mut grid = Grid::new(start, end, delta).peekable();
        let mut index = Vec::new();
        let mut values = Vec::new();
        let mut prev = (start, V::zero());
        let mut cursor = 0;

        while let Some(&t) = grid.peek() {
            let Some(&x) = self.index().get(cursor) else {
                // only reachable when the input is not sorted
                break;
            };
            let v = self.values()[cursor];
            match t.cmp(&x) {
                Ordering::Equal => {
                    index.push(t);
                    values.push(v);
                    prev = (x, v);
                    cursor += 1;
                    grid.next();
                }
                Ordering::Less => {
                    let synthesized = f((x, v), prev, t);
                    index.push(t);
                    values.push(synthesized);
                    prev = (t, synthesized);
                    grid.next();
                }
                Ordering::Greater => {
                    prev = (x, v);
                    cursor += 1;
                }
            }
        }

        log::debug!(
            "resampled {} points onto {} grid points (step {})",
            self.len(),
            index.len(),
            delta
        );
        TimeSeries::new(index, values)
    }

    /// Resamples onto a regular grid, using `default` for every grid point
    /// that has no sample at exactly that instant.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use aligned_timeseries::TimeSeries;
    /// use aligned_timeseries::time::Duration;
    ///
    /// let series = TimeSeries::from_epoch_seconds(vec![(1, 1), (2, 2), (5, 5)]).unwrap();
    /// let filled = series.fill_missing(Duration::seconds(1), -1);
    ///
    /// assert_eq!(filled.values(), &[1, 2, -1, -1, 5]);
    /// ```
    pub fn fill_missing(&self, delta: Duration, default: V) -> TimeSeries<V> {
        self.resample(delta, |_, _, _| default)
    }

    /// Splits the series into runs of consecutive samples whose bucket
    /// `g(t)` is equal, and reduces each run with `f`.
    ///
    /// Buckets are not merged across the series: a key that reappears after
    /// a different one starts a new run. The output is one point per run,
    /// timestamped with the bucket key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use aligned_timeseries::{reduce, TimeSeries};
    /// use aligned_timeseries::time::{truncate, Duration};
    ///
    /// let series = TimeSeries::from_epoch_seconds(vec![(0, 1), (30, 2), (60, 3), (61, 4), (130, 5)]).unwrap();
    /// let per_minute = series.group_by_time(|t| truncate(t, Duration::minutes(1)), reduce::sum);
    ///
    /// assert_eq!(per_minute.values(), &[3, 7, 5]);
    /// ```
    pub fn group_by_time<G, F>(&self, mut g: G, mut f: F) -> TimeSeries<V>
    where
        G: FnMut(Instant) -> Instant,
        F: FnMut(&[V]) -> V,
    {
        let mut index = Vec::new();
        let mut values = Vec::new();
        let mut key: Option<Instant> = None;
        let mut run_start = 0;

        for (i, t) in self.index().iter().enumerate() {
            let bucket = g(*t);
            if key == Some(bucket) {
                continue;
            }
            if let Some(current) = key {
                log::trace!("bucket {} holds {} samples", current, i - run_start);
                index.push(current);
                values.push(f(&self.values()[run_start..i]));
            }
            key = Some(bucket);
            run_start = i;
        }
        if let Some(current) = key {
            index.push(current);
            values.push(f(&self.values()[run_start..]));
        }

        TimeSeries::new(index, values)
    }

    /// Reduces, for every sample at `t`, all values with timestamps in
    /// `(t - window, t]`.
    ///
    /// The output keeps the input timestamps one to one. Samples sharing the
    /// timestamp `t` all belong to the window ending at `t`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use aligned_timeseries::{reduce, TimeSeries};
    /// use aligned_timeseries::time::Duration;
    ///
    /// let series = TimeSeries::from_epoch_seconds(vec![(1, 1), (2, 2), (3, 3), (4, 4), (5, 5)]).unwrap();
    /// let rolled = series.rolling_window(Duration::seconds(2), reduce::sum);
    ///
    /// assert_eq!(rolled.values(), &[1, 3, 5, 7, 9]);
    /// ```
    pub fn rolling_window<F>(&self, window: Duration, mut f: F) -> TimeSeries<V>
    where
        F: FnMut(&[V]) -> V,
    {
        let index = self.index();
        let values = self.values();
        let mut rolled = Vec::with_capacity(self.len());
        // both bounds only move backwards as t decreases
        let mut end = index.len();
        let mut start = index.len();

        for &t in index.iter().rev() {
            while end > 0 && index[end - 1] > t {
                end -= 1;
            }
            let lower = t.checked_sub_signed(window).unwrap_or(Instant::MIN_UTC);
            while start > 0 && index[start - 1] > lower {
                start -= 1;
            }
            rolled.push(f(&values[start.min(end)..end]));
        }
        rolled.reverse();

        TimeSeries::new(index.to_vec(), rolled)
    }
}

impl<V: Fractional> TimeSeries<V> {
    /// Resamples onto a regular grid, filling each missing grid point by
    /// linear interpolation in time between the surrounding points.
    ///
    /// Grid points that coincide with a sample keep the sample's value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use aligned_timeseries::TimeSeries;
    /// use aligned_timeseries::time::Duration;
    ///
    /// let series = TimeSeries::from_epoch_seconds(vec![(0, 0.0), (2, 4.0), (3, 1.0)]).unwrap();
    /// let interpolated = series.interpolate(Duration::seconds(1));
    ///
    /// assert_eq!(interpolated.values(), &[0.0, 2.0, 4.0, 1.0]);
    /// ```
    pub fn interpolate(&self, delta: Duration) -> TimeSeries<V> {
        self.resample(delta, interpolate_between)
    }
}

fn interpolate_between<V: Fractional>(
    (x1, v1): (Instant, V),
    (x2, v2): (Instant, V),
    t: Instant,
) -> V {
    let d1 = duration_secs_f64(distance(t, x1));
    let d2 = duration_secs_f64(distance(t, x2));
    let total = d1 + d2;
    if total == 0.0 {
        return v1;
    }
    v1 * V::from_f64(d2 / total) + v2 * V::from_f64(d1 / total)
}
