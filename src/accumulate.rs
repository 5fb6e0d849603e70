//! Single-pass cumulative, differential and re-tiling transforms.

use crate::series::TimeSeries;
use crate::time::{duration_nanos, Duration, Instant};
use crate::value::Value;

impl<V: Value> TimeSeries<V> {
    /// Differences of consecutive values, timestamped with the later sample.
    ///
    /// Series with fewer than two points yield an empty series. For unsigned
    /// value types a decreasing pair underflows; use
    /// [`TimeSeries::diff_overflow`] for wrapping counters.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use aligned_timeseries::TimeSeries;
    ///
    /// let series = TimeSeries::from_epoch_seconds(vec![(1, 1), (2, 4), (3, 9)]).unwrap();
    /// let diff = series.differentiate();
    ///
    /// assert_eq!(diff.values(), &[3, 5]);
    /// assert_eq!(diff.index(), &series.index()[1..]);
    /// ```
    pub fn differentiate(&self) -> TimeSeries<V> {
        if self.len() < 2 {
            return TimeSeries::empty();
        }
        let values = self.values().windows(2).map(|w| w[1] - w[0]).collect();
        TimeSeries::new(self.index()[1..].to_vec(), values)
    }

    /// Differences of a counter that wraps around at `overflow`.
    ///
    /// A decreasing pair `(a, b)` is read as a wraparound and yields
    /// `(b + overflow) - a`; otherwise the plain difference `b - a`. Unlike
    /// [`TimeSeries::differentiate`], each difference keeps the timestamp of
    /// the *earlier* sample of its pair.
    ///
    /// The wrapped difference is computed as `overflow - (a - b)`, so no
    /// intermediate exceeds `overflow` and unsigned counters near their
    /// type's maximum do not overflow.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use aligned_timeseries::TimeSeries;
    ///
    /// let counter = TimeSeries::from_epoch_seconds(vec![(1, 250u32), (2, 254), (3, 3)]).unwrap();
    /// let diff = counter.diff_overflow(256);
    ///
    /// assert_eq!(diff.values(), &[4, 5]);
    /// assert_eq!(diff.index(), &counter.index()[..2]);
    /// ```
    pub fn diff_overflow(&self, overflow: V) -> TimeSeries<V> {
        let values: Vec<V> = self
            .values()
            .windows(2)
            .map(|w| {
                if w[1] < w[0] {
                    overflow - (w[0] - w[1])
                } else {
                    w[1] - w[0]
                }
            })
            .collect();
        // leading timestamps, the last one has no pair
        let index = self.index()[..values.len()].to_vec();
        TimeSeries::new(index, values)
    }

    /// Running sum of the values, keeping every timestamp.
    ///
    /// The output has the same length and index as the input (`output[0]` is
    /// the first value), not one point fewer. With this definition
    /// `integrate` undoes [`TimeSeries::differentiate`] up to the first value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use aligned_timeseries::TimeSeries;
    ///
    /// let series = TimeSeries::from_epoch_seconds(vec![(1, 1), (2, 2), (3, 3), (4, 4)]).unwrap();
    /// assert_eq!(series.integrate().values(), &[1, 3, 6, 10]);
    /// ```
    pub fn integrate(&self) -> TimeSeries<V> {
        let mut acc = V::zero();
        let values = self
            .values()
            .iter()
            .map(|v| {
                acc = acc + *v;
                acc
            })
            .collect();
        TimeSeries::new(self.index().to_vec(), values)
    }

    /// Running sum that restarts at every window boundary.
    ///
    /// Windows are `window` long and anchored at the first timestamp, so the
    /// sample at `t` belongs to window `floor((t - head) / window)`. Each
    /// output value is the sum of its window's samples up to and including
    /// the current one. A non-positive `window` yields an empty series.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use aligned_timeseries::TimeSeries;
    /// use aligned_timeseries::time::Duration;
    ///
    /// let rain = TimeSeries::from_epoch_seconds(vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]).unwrap();
    /// let totals = rain.integrate_by_time(Duration::seconds(2));
    ///
    /// assert_eq!(totals.values(), &[1, 3, 3, 7, 5]);
    /// ```
    pub fn integrate_by_time(&self, window: Duration) -> TimeSeries<V> {
        let Some((start, _)) = self.head() else {
            return TimeSeries::empty();
        };
        let width = duration_nanos(window);
        if width <= 0 {
            log::warn!("ignoring integration with non-positive window {}", window);
            return TimeSeries::empty();
        }

        let mut current = None;
        let mut acc = V::zero();
        let values = self
            .iter()
            .map(|(t, v)| {
                let bucket = duration_nanos(t - start).div_euclid(width);
                if current != Some(bucket) {
                    current = Some(bucket);
                    acc = V::zero();
                }
                acc = acc + v;
                acc
            })
            .collect();
        TimeSeries::new(self.index().to_vec(), values)
    }

    /// Takes the points in `[start, start + duration)` and tiles copies of
    /// them, each shifted by a further `duration`, while the first timestamp
    /// of the next copy is before `end`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use aligned_timeseries::TimeSeries;
    /// use aligned_timeseries::time::{instant_from_epoch_seconds, Duration};
    ///
    /// let day = TimeSeries::from_epoch_seconds(vec![(0, 1), (1, 2), (2, 3), (5, 9)]).unwrap();
    /// let start = instant_from_epoch_seconds(0).unwrap();
    /// let end = instant_from_epoch_seconds(7).unwrap();
    ///
    /// let tiled = day.repeat(start, end, Duration::seconds(3));
    /// assert_eq!(tiled.values(), &[1, 2, 3, 1, 2, 3, 1, 2, 3]);
    /// assert_eq!(tiled.last().map(|(t, _)| t.timestamp()), Some(8));
    /// ```
    pub fn repeat(&self, start: Instant, end: Instant, duration: Duration) -> TimeSeries<V> {
        let tile_end = start.checked_add_signed(duration).unwrap_or(Instant::MAX_UTC);
        let tile = self.slice(start, tile_end);
        let Some((first, _)) = tile.head() else {
            return TimeSeries::empty();
        };

        let mut points = Vec::new();
        let mut offset = Duration::zero();
        loop {
            match first.checked_add_signed(offset) {
                Some(tile_start) if tile_start < end => {}
                _ => break,
            }
            for (t, v) in tile.iter() {
                if let Some(shifted) = t.checked_add_signed(offset) {
                    points.push((shifted, v));
                }
            }
            offset = match offset.checked_add(&duration) {
                Some(next) => next,
                None => break,
            };
        }

        log::debug!("repeated {} points into {} points", tile.len(), points.len());
        TimeSeries::from_points(points)
    }

    /// Moves every timestamp `duration` later (`forward`) or earlier.
    ///
    /// Timestamps that would leave the representable range saturate at its
    /// bound.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use aligned_timeseries::TimeSeries;
    /// use aligned_timeseries::time::Duration;
    ///
    /// let series = TimeSeries::from_epoch_seconds(vec![(10, 1), (20, 2)]).unwrap();
    /// let earlier = series.shift_time(Duration::seconds(5), false);
    ///
    /// assert_eq!(earlier, TimeSeries::from_epoch_seconds(vec![(5, 1), (15, 2)]).unwrap());
    /// ```
    pub fn shift_time(&self, duration: Duration, forward: bool) -> TimeSeries<V> {
        let offset = if forward { duration } else { -duration };
        let bound = if offset > Duration::zero() {
            Instant::MAX_UTC
        } else {
            Instant::MIN_UTC
        };
        let index = self
            .index()
            .iter()
            .map(|t| t.checked_add_signed(offset).unwrap_or(bound))
            .collect();
        TimeSeries::new(index, self.values().to_vec())
    }
}
