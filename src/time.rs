//! The time axis: instants, durations and regular grids.
//!
//! All instants are absolute UTC points with nanosecond resolution. Because
//! they are integer nanoseconds, grid arithmetic is exact and the inclusive
//! end of a grid can never be lost to rounding.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{Error, Result};

/// An absolute point on the time axis.
pub type Instant = DateTime<Utc>;

/// A signed amount of elapsed time.
pub type Duration = chrono::Duration;

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Converts whole seconds since the Unix epoch into an [`Instant`].
///
/// # Examples
///
/// ```rust
/// use aligned_timeseries::time::instant_from_epoch_seconds;
///
/// let t = instant_from_epoch_seconds(86_400).unwrap();
/// assert_eq!(t.to_rfc3339(), "1970-01-02T00:00:00+00:00");
/// ```
pub fn instant_from_epoch_seconds(seconds: i64) -> Result<Instant> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .ok_or(Error::TimestampOutOfRange(seconds))
}

/// Absolute elapsed time between two instants.
pub fn distance(a: Instant, b: Instant) -> Duration {
    let d = a - b;
    if d < Duration::zero() {
        -d
    } else {
        d
    }
}

/// A duration expressed in (fractional) seconds.
pub fn duration_secs_f64(d: Duration) -> f64 {
    duration_nanos(d) as f64 / NANOS_PER_SEC as f64
}

pub(crate) fn duration_nanos(d: Duration) -> i128 {
    let secs = d.num_seconds();
    let rest = (d - Duration::seconds(secs)).num_nanoseconds().unwrap_or(0);
    secs as i128 * NANOS_PER_SEC + rest as i128
}

fn instant_nanos(t: Instant) -> i128 {
    t.timestamp() as i128 * NANOS_PER_SEC + t.timestamp_subsec_nanos() as i128
}

/// Floors `t` to a multiple of `width` counted from the Unix epoch.
///
/// A non-positive `width` leaves `t` unchanged.
///
/// # Examples
///
/// ```rust
/// use aligned_timeseries::time::{instant_from_epoch_seconds, truncate, Duration};
///
/// let t = instant_from_epoch_seconds(125).unwrap();
/// let bucket = truncate(t, Duration::minutes(1));
/// assert_eq!(bucket, instant_from_epoch_seconds(120).unwrap());
/// ```
pub fn truncate(t: Instant, width: Duration) -> Instant {
    let width = duration_nanos(width);
    if width <= 0 {
        return t;
    }
    let floored = instant_nanos(t).div_euclid(width) * width;
    let secs = floored.div_euclid(NANOS_PER_SEC);
    let nanos = floored.rem_euclid(NANOS_PER_SEC);
    i64::try_from(secs)
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, nanos as u32).single())
        .unwrap_or(t)
}

/// Floors `t` to midnight UTC.
pub fn truncate_to_day(t: Instant) -> Instant {
    truncate(t, Duration::days(1))
}

/// Floors `t` to the start of its hour.
pub fn truncate_to_hour(t: Instant) -> Instant {
    truncate(t, Duration::hours(1))
}

/// Regular sequence of instants `start, start + step, ...` up to and
/// including `end`.
///
/// The grid is empty when `step` is not positive or `start > end`, and it ends
/// early if the next instant would overflow the representable range.
///
/// # Examples
///
/// ```rust
/// use aligned_timeseries::time::{instant_from_epoch_seconds, Duration, Grid};
///
/// let start = instant_from_epoch_seconds(0).unwrap();
/// let end = instant_from_epoch_seconds(10).unwrap();
///
/// let grid: Vec<_> = Grid::new(start, end, Duration::seconds(5)).collect();
/// assert_eq!(grid.len(), 3);
/// assert_eq!(grid[2], end);
/// ```
#[derive(Debug, Clone)]
pub struct Grid {
    next: Option<Instant>,
    end: Instant,
    step: Duration,
}

impl Grid {
    /// Grid from `start` to `end` inclusive, `step` apart.
    pub fn new(start: Instant, end: Instant, step: Duration) -> Grid {
        let next = if step > Duration::zero() && start <= end {
            Some(start)
        } else {
            None
        };
        Grid { next, end, step }
    }
}

impl Iterator for Grid {
    type Item = Instant;

    fn next(&mut self) -> Option<Instant> {
        let current = self.next?;
        self.next = current
            .checked_add_signed(self.step)
            .filter(|candidate| *candidate <= self.end);
        Some(current)
    }
}
