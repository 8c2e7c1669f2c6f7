//! Unit-safe wrappers for capacities reported by the aggregators.
//!
//! Power capacity of links, generators and storage units is in MW; the energy
//! capacity of stores is in MWh. Both end up in carrier-keyed tables, and
//! keeping them as distinct types up to that point prevents a store's MWh
//! from being added to a link's MW by accident.
//!
//! ```
//! use roi_core::units::{Megawatts, MegawattHours};
//!
//! let p = Megawatts(100.0) + Megawatts(20.0);
//! assert_eq!(p.value(), 120.0);
//!
//! let e = MegawattHours(40.0);
//! // let wrong = p + e;  // Error: cannot add MegawattHours to Megawatts
//! assert_eq!(e.value(), 40.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

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

        impl Neg for $type {
            type Output = Self;
            fn neg(self) -> Self::Output {
                Self(-self.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.4} {}", self.0, $unit_name)
            }
        }

        impl $type {
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            pub const ZERO: Self = Self(0.0);
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }

        impl<'a> std::iter::Sum<&'a $type> for $type {
            fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }
    };
}

/// Power capacity in megawatts (MW)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Megawatts(pub f64);

impl_unit_ops!(Megawatts, "MW");

/// Energy capacity in megawatt-hours (MWh)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MegawattHours(pub f64);

impl_unit_ops!(MegawattHours, "MWh");

/// Dimensionless per-unit factor (e.g. a line's thermal limit factor `s_max_pu`)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct PerUnit(pub f64);

impl_unit_ops!(PerUnit, "pu");

impl PerUnit {
    pub const ONE: Self = Self(1.0);
}

/// Unit of a capacity value once it has been flattened into a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapacityUnit {
    #[serde(rename = "MW")]
    Power,
    #[serde(rename = "MWh")]
    Energy,
}

impl CapacityUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapacityUnit::Power => "MW",
            CapacityUnit::Energy => "MWh",
        }
    }
}
