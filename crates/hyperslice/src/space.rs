//! Bounding regions to be discretised.
//!
//! A [`Space`] is a product of one [`Interval`] per Heisenberg slot plus a
//! height interval. Only the Heisenberg axes are gridded; slice points sit
//! at the lower height bound.

use serde::{Deserialize, Serialize};

use crate::coordinate::Scalar;

/// Closed interval `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval<S> {
    pub lower: S,
    pub upper: S,
}

impl<S: Scalar> Interval<S> {
    pub fn new(lower: S, upper: S) -> Self {
        Self { lower, upper }
    }

    /// `[0, 1]`.
    pub fn unit() -> Self {
        Self::new(S::zero(), S::one())
    }

    #[inline]
    pub fn length(&self) -> S {
        self.upper - self.lower
    }

    /// Inclusive containment with slack `tol` at both ends.
    #[inline]
    pub fn contains(&self, value: S, tol: S) -> bool {
        value >= self.lower - tol && value <= self.upper + tol
    }
}

/// A box over the Heisenberg slots plus a height range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space<S> {
    /// One interval per Heisenberg slot, in slot order.
    pub axes: Vec<Interval<S>>,
    pub height: Interval<S>,
}

impl<S: Scalar> Space<S> {
    pub fn new(axes: Vec<Interval<S>>, height: Interval<S>) -> Self {
        Self { axes, height }
    }

    /// `[0, 1]` on every one of `axis_count` axes, height `[0, 1]`.
    pub fn unit(axis_count: usize) -> Self {
        Self::new(vec![Interval::unit(); axis_count], Interval::unit())
    }

    /// Same interval on every axis.
    pub fn uniform(axis_count: usize, axis: Interval<S>, height: Interval<S>) -> Self {
        Self::new(vec![axis; axis_count], height)
    }

    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    /// Product of the axis lengths (height excluded).
    pub fn measure(&self) -> S {
        self.axes
            .iter()
            .fold(S::one(), |acc, axis| acc * axis.length())
    }
}
