//! # Incrementors
//!
//! An [`Incrementor`] moves one Heisenberg slot of a point by a fixed stride
//! and keeps the dependent coordinate consistent without recomputing it.
//! A slice owns four per-axis families, differing only in stride:
//!
//! | Kind | Stride | Used for |
//! |---|---|---|
//! | [`Forward`](IncrementorKind::Forward) | `+s` | step to the next cell |
//! | [`Reverse`](IncrementorKind::Reverse) | `−s` | step to the previous cell |
//! | [`Reset`](IncrementorKind::Reset) | `−(k−1)·s` | return to the first cell of an axis |
//! | [`RReset`](IncrementorKind::RReset) | `+(k−1)·s` | jump to the last cell of an axis |
//!
//! where `s` is the axis stride and `k` its sub-resolution.

use num_complex::Complex;

use crate::coordinate::Scalar;
use crate::dimension::Dimension;
use crate::hypercube::Hypercube;
use crate::point::{shift_dependent, Point};
use crate::structure::Slot;

/// Which of the four per-axis families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncrementorKind {
    Forward,
    Reverse,
    Reset,
    RReset,
}

impl IncrementorKind {
    pub const ALL: [IncrementorKind; 4] = [
        IncrementorKind::Forward,
        IncrementorKind::Reverse,
        IncrementorKind::Reset,
        IncrementorKind::RReset,
    ];
}

/// A fixed-stride move along one Heisenberg slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Incrementor<S: Scalar> {
    slot: Slot,
    stride: S,
}

impl<S: Scalar> Incrementor<S> {
    /// Incrementors are built by [`Incrementors::from_axes`], which only
    /// names slots that exist for the dimension.
    pub(crate) fn new(slot: Slot, stride: S) -> Self {
        debug_assert!(slot.is_heisenberg(), "incrementors move Heisenberg slots only");
        Self { slot, stride }
    }

    #[inline]
    pub fn slot(&self) -> Slot {
        self.slot
    }

    #[inline]
    pub fn stride(&self) -> S {
        self.stride
    }

    /// The same axis, stride negated.
    pub fn inverse(&self) -> Self {
        Self::new(self.slot, -self.stride)
    }

    /// Change to `dependent` implied by moving a slot whose current value
    /// is `old`, i.e. before [`Self::apply_scalar`] runs.
    #[inline]
    pub fn apply_dependent(&self, dependent: &mut Complex<S>, old: S) {
        shift_dependent(dependent, self.slot, old, self.stride);
    }

    /// Move the scalar itself.
    #[inline]
    pub fn apply_scalar(&self, scalar: &mut S) {
        *scalar = *scalar + self.stride;
    }

    /// Move one point and its dependent coordinate.
    #[inline]
    pub fn apply<D: Dimension>(&self, point: &mut Point<D, S>) {
        point.shift(self.slot, self.stride);
    }

    /// Move every vertex of a cube.
    #[inline]
    pub fn apply_cube<D: Dimension>(&self, cube: &mut Hypercube<D, S>) {
        for vertex in cube.vertices_mut() {
            self.apply(vertex);
        }
    }
}

/// Per-axis forward, reverse, reset and rreset incrementors of a slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Incrementors<S: Scalar> {
    forward: Vec<Incrementor<S>>,
    reverse: Vec<Incrementor<S>>,
    reset: Vec<Incrementor<S>>,
    rreset: Vec<Incrementor<S>>,
}

impl<S: Scalar> Incrementors<S> {
    /// Derive all four families from `(stride, sub_resolution)` per axis.
    pub fn from_axes<D: Dimension>(axes: impl IntoIterator<Item = (S, usize)>) -> Self {
        let mut set = Self::default();
        for (index, (stride, sub_resolution)) in axes.into_iter().enumerate() {
            let slot = match Slot::locate::<D>(index) {
                Some(slot) if slot.is_heisenberg() => slot,
                _ => break,
            };
            let span = stride * S::lift(sub_resolution.saturating_sub(1) as f64);
            let forward = Incrementor::new(slot, stride);
            let reset = Incrementor::new(slot, -span);
            set.forward.push(forward);
            set.reverse.push(forward.inverse());
            set.reset.push(reset);
            set.rreset.push(reset.inverse());
        }
        set
    }

    pub fn family(&self, kind: IncrementorKind) -> &[Incrementor<S>] {
        match kind {
            IncrementorKind::Forward => &self.forward,
            IncrementorKind::Reverse => &self.reverse,
            IncrementorKind::Reset => &self.reset,
            IncrementorKind::RReset => &self.rreset,
        }
    }

    pub fn get(&self, kind: IncrementorKind, axis: usize) -> Option<&Incrementor<S>> {
        self.family(kind).get(axis)
    }

    pub fn axis_count(&self) -> usize {
        self.forward.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::{D1, D2};

    #[test]
    fn split_application_matches_shift() {
        let base = Point::<D2, f64>::from_slots(&[0.3, -0.7, 1.1, 2.0]).unwrap();
        for index in 0..D2::HEISENBERG_SIZE {
            let slot = Slot::locate::<D2>(index).unwrap();
            let inc = Incrementor::new(slot, 0.25);

            let mut via_shift = base;
            inc.apply(&mut via_shift);

            let mut dependent = base.dependent();
            let mut scalar = base.field(slot);
            inc.apply_dependent(&mut dependent, scalar);
            inc.apply_scalar(&mut scalar);

            assert_eq!(via_shift.dependent(), dependent);
            assert_eq!(via_shift.field(slot), scalar);
            assert!(via_shift.is_consistent());
        }
    }

    #[test]
    fn families_follow_stride_and_sub_resolution() {
        let set = Incrementors::<f64>::from_axes::<D2>(vec![(0.5, 2), (0.25, 4), (1.0, 1)]);
        assert_eq!(set.axis_count(), 3);

        let fwd = set.get(IncrementorKind::Forward, 1).unwrap();
        assert_eq!(fwd.slot(), Slot::Im(0));
        assert_eq!(fwd.stride(), 0.25);
        assert_eq!(set.get(IncrementorKind::Reverse, 1).unwrap().stride(), -0.25);
        assert_eq!(set.get(IncrementorKind::Reset, 1).unwrap().stride(), -0.75);
        assert_eq!(set.get(IncrementorKind::RReset, 1).unwrap().stride(), 0.75);

        // A single-cell axis never moves on reset.
        assert_eq!(set.get(IncrementorKind::Reset, 2).unwrap().stride(), 0.0);
        assert_eq!(set.get(IncrementorKind::Forward, 2).unwrap().slot(), Slot::R);
        assert!(set.get(IncrementorKind::Forward, 3).is_none());
    }

    #[test]
    fn extra_axes_never_name_missing_slots() {
        // D1 has one Heisenberg slot (r); the rest have no field to move.
        let set = Incrementors::<f64>::from_axes::<D1>(vec![(0.5, 2), (0.5, 2), (0.5, 2)]);
        assert_eq!(set.axis_count(), D1::HEISENBERG_SIZE);
        assert_eq!(set.get(IncrementorKind::Forward, 0).unwrap().slot(), Slot::R);

        let set = Incrementors::<f64>::from_axes::<D2>(vec![(0.5, 2); 6]);
        assert_eq!(set.axis_count(), D2::HEISENBERG_SIZE);
        for kind in [
            IncrementorKind::Forward,
            IncrementorKind::Reverse,
            IncrementorKind::Reset,
            IncrementorKind::RReset,
        ] {
            assert!(set.family(kind).iter().all(|inc| inc.slot().is_heisenberg()));
        }
    }

    #[test]
    fn forward_then_reset_returns_to_start() {
        let set = Incrementors::<f64>::from_axes::<D2>(vec![(0.1, 5), (0.1, 5), (0.1, 5)]);
        let start = Point::<D2, f64>::from_slots(&[0.0, 0.0, 0.0, 1.0]).unwrap();
        let mut p = start;
        for _ in 0..4 {
            set.get(IncrementorKind::Forward, 0).unwrap().apply(&mut p);
        }
        set.get(IncrementorKind::Reset, 0).unwrap().apply(&mut p);
        assert!(p.approx_eq(&start, 1e-12));
        assert!(p.is_consistent());
    }
}
