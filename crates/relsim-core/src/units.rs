//! Unit safety for the quantities the simulation mixes.
//!
//! Capacities and demand are megawatts; transition rates arrive as events
//! per year and are consumed as events per hour. Keeping them in distinct
//! newtypes stops a yearly rate from leaking into a sojourn-time draw
//! unconverted.
//!
//! ```
//! use relsim_core::units::{AnnualRate, Megawatts};
//!
//! let unit = Megawatts(75.0);
//! let two_units = unit + Megawatts(75.0);
//! assert_eq!(two_units.value(), 150.0);
//!
//! let rate = AnnualRate(8760.0);
//! assert_eq!(rate.per_hour(), 1.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Hours in a (non-leap) simulated year.
pub const HOURS_PER_YEAR: f64 = 8760.0;

macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<$type> for $type {
            type Output = f64;
            fn div(self, rhs: $type) -> Self::Output {
                self.0 / rhs.0
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{} {}", self.0, $unit_name)
            }
        }

        impl $type {
            /// Create a new value
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Check if value is finite
            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// Minimum of two values
            #[inline]
            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }
    };
}

/// Active power in megawatts (MW)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Megawatts(pub f64);

impl_unit_ops!(Megawatts, "MW");

/// Transition rate in events per year
///
/// Configuration carries rates per year; entities sample sojourn times in
/// hours, so every rate passes through [`AnnualRate::per_hour`] exactly once.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct AnnualRate(pub f64);

impl_unit_ops!(AnnualRate, "/yr");

impl AnnualRate {
    /// Events per hour.
    #[inline]
    pub fn per_hour(self) -> f64 {
        self.0 / HOURS_PER_YEAR
    }
}
