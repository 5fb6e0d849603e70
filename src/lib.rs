#![deny(unsafe_code)]

//! An immutable time series type with time-aligned transformations.
//!
//! A [`TimeSeries`] pairs timestamps with numeric values. It can be projected
//! onto a regular grid, bucketed, rolled, differenced and re-accumulated,
//! always producing a new series and leaving its input untouched.
//!
//! # Features
//!
//! - **Grid alignment**: [`TimeSeries::resample`] with a custom combinator,
//!   [`TimeSeries::fill_missing`] and [`TimeSeries::interpolate`]
//! - **Aggregation**: [`TimeSeries::group_by_time`] over consecutive buckets and
//!   [`TimeSeries::rolling_window`] over trailing windows
//! - **Accumulation**: differences (with counter wraparound), running sums and
//!   windowed running sums
//! - **Generic values**: any type implementing [`Value`]; operations that
//!   divide require [`Fractional`] and therefore reject integer series at
//!   compile time
//! - **CSV codec**: sparse multi-column tables in and out, see [`codec`]
//!
//! Every transform assumes timestamps are in non-decreasing order. An empty
//! series is a valid input everywhere and yields an empty output.
//!
//! # Example
//!
//! ```rust
//! use aligned_timeseries::{reduce, stats, TimeSeries};
//! use aligned_timeseries::time::Duration;
//!
//! // Irregular samples, one per few seconds
//! let series = TimeSeries::from_epoch_seconds(vec![(0, 1.0), (2, 3.0), (3, 4.0), (6, 1.0)]).unwrap();
//!
//! // Regular one-second grid, gaps filled by linear interpolation
//! let regular = series.interpolate(Duration::seconds(1));
//! assert_eq!(regular.len(), 7);
//! assert_eq!(regular.get(1), 2.0);
//!
//! // Sum over a trailing two-second window
//! let rolled = regular.rolling_window(Duration::seconds(2), reduce::sum);
//! assert_eq!(rolled.get(1), 3.0);
//!
//! assert!(stats::mean(&series) > 0.0);
//! ```

pub mod codec;
pub mod error;
pub mod reduce;
pub mod stats;
pub mod time;

mod accumulate;
mod align;
mod series;
mod value;

pub use error::{Error, Result};
pub use series::TimeSeries;
pub use time::{Duration, Instant};
pub use value::{Fractional, Value};
