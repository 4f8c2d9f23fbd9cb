//! # Scalars and coordinates
//!
//! Every structure in this crate is generic over one [`Scalar`] type `S`.
//! A [`Coordinate`] is any value that can be read as a short run of `S`
//! parts ("common representation"):
//!
//! | Coordinate | Parts | Layout |
//! |---|---|---|
//! | `Complex<S>` | 2 | `[re, im]` |
//! | `S` (`f32`, `f64`) | 1 | `[value]` |
//!
//! Because the common type is an associated type, a structure mixing
//! coordinates with different common types does not type-check.

use std::fmt::{Debug, Display};
use std::str::FromStr;

use num_complex::Complex;
use num_traits::Float;

// ─────────────────────────────────────────────
// Scalar
// ─────────────────────────────────────────────

/// Real scalar type shared by every slot of a structure.
///
/// A scalar is itself a one-part [`Coordinate`] whose common type is itself.
pub trait Scalar:
    Float + Default + Debug + Display + FromStr + Send + Sync + 'static + Coordinate<Common = Self>
{
    /// Default comparison tolerance for this precision.
    fn tolerance() -> Self;

    /// Lossy conversion from `f64`.
    fn lift(value: f64) -> Self;

    /// Lossless (or widening) conversion to `f64`.
    fn widen(self) -> f64;
}

impl Scalar for f64 {
    #[inline]
    fn tolerance() -> Self {
        1e-9
    }

    #[inline]
    fn lift(value: f64) -> Self {
        value
    }

    #[inline]
    fn widen(self) -> f64 {
        self
    }
}

impl Scalar for f32 {
    #[inline]
    fn tolerance() -> Self {
        1e-4
    }

    #[inline]
    fn lift(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn widen(self) -> f64 {
        self as f64
    }
}

// ─────────────────────────────────────────────
// Coordinate
// ─────────────────────────────────────────────

/// A value exposing its real/imaginary parts through a common scalar type.
pub trait Coordinate: Copy + Default + Debug + PartialEq {
    /// Scalar type of every part.
    type Common: Scalar;

    /// Number of scalar parts this coordinate contributes to a slot list.
    const PARTS: usize;

    /// Read part `index` (`0 ≤ index < PARTS`).
    fn part(&self, index: usize) -> Self::Common;

    /// Mutable access to part `index` (`0 ≤ index < PARTS`).
    fn part_mut(&mut self, index: usize) -> &mut Self::Common;
}

impl<S: Scalar> Coordinate for Complex<S> {
    type Common = S;
    const PARTS: usize = 2;

    #[inline]
    fn part(&self, index: usize) -> S {
        debug_assert!(index < Self::PARTS, "complex part {index} out of range");
        if index == 0 {
            self.re
        } else {
            self.im
        }
    }

    #[inline]
    fn part_mut(&mut self, index: usize) -> &mut S {
        debug_assert!(index < Self::PARTS, "complex part {index} out of range");
        if index == 0 {
            &mut self.re
        } else {
            &mut self.im
        }
    }
}

macro_rules! real_coordinate {
    ($($t:ty),*) => {$(
        impl Coordinate for $t {
            type Common = $t;
            const PARTS: usize = 1;

            #[inline]
            fn part(&self, index: usize) -> $t {
                debug_assert_eq!(index, 0, "real coordinate has a single part");
                *self
            }

            #[inline]
            fn part_mut(&mut self, index: usize) -> &mut $t {
                debug_assert_eq!(index, 0, "real coordinate has a single part");
                self
            }
        }
    )*};
}

real_coordinate!(f32, f64);

/// Tolerance-aware scalar equality: `|a − b| ≤ tol`.
#[inline]
pub fn approx_eq<S: Scalar>(a: S, b: S, tol: S) -> bool {
    (a - b).abs() <= tol
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
