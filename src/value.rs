use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Sub};

/// Numeric element type of a [`TimeSeries`](crate::TimeSeries).
///
/// Transforms need a zero element, the ring operations and an ordering (for
/// counter overflow detection). `to_f64` feeds the descriptive statistics,
/// which are always computed in floating point.
///
/// # Examples
///
/// ```rust
/// use aligned_timeseries::Value;
///
/// assert_eq!(i32::zero(), 0);
/// assert_eq!(7u8.to_f64(), 7.0);
/// ```
pub trait Value:
    Copy + PartialOrd + Debug + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self>
{
    /// The additive identity.
    fn zero() -> Self;

    /// Lossy conversion used by the statistics.
    fn to_f64(self) -> f64;
}

/// A [`Value`] with true division.
///
/// Only floating point types implement this, so operations that divide
/// (such as interpolation) do not compile for integer series.
pub trait Fractional: Value + Div<Output = Self> {
    /// Nearest representable value.
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_value {
    ($($t:ty => $zero:expr),* $(,)?) => {
        $(
            impl Value for $t {
                fn zero() -> Self {
                    $zero
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_value!(
    i8 => 0, i16 => 0, i32 => 0, i64 => 0, i128 => 0, isize => 0,
    u8 => 0, u16 => 0, u32 => 0, u64 => 0, u128 => 0, usize => 0,
    f32 => 0.0, f64 => 0.0,
);

impl Fractional for f32 {
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Fractional for f64 {
    fn from_f64(value: f64) -> Self {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_additive_identity() {
        assert_eq!(5i64 + i64::zero(), 5);
        assert_eq!(2.5f32 + f32::zero(), 2.5);
    }

    #[test]
    fn fractional_round_trips_through_f64() {
        assert_eq!(f32::from_f64(0.25), 0.25f32);
        assert_eq!(f64::from_f64(0.25).to_f64(), 0.25);
    }
}
