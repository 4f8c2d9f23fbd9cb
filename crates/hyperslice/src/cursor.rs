//! # Odometer cursors
//!
//! A [`Cursor`] walks a [`Slice`] in grid-index order, carrying a
//! materialised [`Point`] or [`Hypercube`] and updating it incrementally:
//!
//! ```text
//! increment:  for axis a = 0, 1, …
//!               digit_a + 1 < k_a  →  digit_a += 1, apply forward[a], stop
//!               otherwise          →  digit_a  = 0, apply reset[a], carry
//! ```
//!
//! Decrement mirrors this with `reverse` and `rreset`. Each step costs one
//! incrementor application per carried axis, so a full sweep of `R` cells
//! costs `O(R)` amortised instead of `O(R · d)` recomputations.
//!
//! Each moved slot is then pinned to its exact grid value
//! `lower + stride · digit`, so the scalars of a cursor's payload equal those
//! of [`Slice::point_at`] bit for bit and [`Slice::location_at`] finds the
//! cursor's own index. Only the dependent coordinate accumulates rounding,
//! and every [`SliceConfig::refresh_interval`](crate::config::SliceConfig)
//! steps the payload is rebuilt from the grid index.
//!
//! ## Ends
//!
//! Index `R` is one-past-the-end. Incrementing there does nothing; the
//! payload stays at cell 0 but [`Cursor::get`] returns `None`. Decrementing
//! from `0` or from the end wraps to `R − 1`.
//!
//! Cursors do not borrow their slice. Every stepping call takes `&Slice`,
//! and after the slice is refitted a cursor must be re-anchored with
//! [`Cursor::update`]. Debug builds assert this via the slice generation.

use std::iter::FusedIterator;

use tracing::{debug, trace};

use crate::coordinate::Scalar;
use crate::dimension::Dimension;
use crate::error::GridError;
use crate::hypercube::Hypercube;
use crate::incrementor::{Incrementor, IncrementorKind};
use crate::point::Point;
use crate::slice::Slice;

/// Something a cursor can carry across the grid.
pub trait Materialize: Sized {
    type Dim: Dimension;
    type Scalar: Scalar;

    /// Build the payload for `index` from scratch. `index < resolution`.
    fn materialize(slice: &Slice<Self::Dim, Self::Scalar>, index: usize) -> Self;

    /// Move by one incrementor.
    fn advance(&mut self, step: &Incrementor<Self::Scalar>);

    /// Set the anchor's `forward` slot to exactly `value`, and every vertex
    /// offset along that axis to `value + forward.stride()`.
    fn settle(&mut self, value: Self::Scalar, forward: &Incrementor<Self::Scalar>);

    /// The point whose grid location identifies this payload.
    fn anchor(&self) -> &Point<Self::Dim, Self::Scalar>;
}

impl<D: Dimension, S: Scalar> Materialize for Point<D, S> {
    type Dim = D;
    type Scalar = S;

    fn materialize(slice: &Slice<D, S>, index: usize) -> Self {
        slice.point_at_unchecked(index)
    }

    #[inline]
    fn advance(&mut self, step: &Incrementor<S>) {
        step.apply(self);
    }

    #[inline]
    fn settle(&mut self, value: S, forward: &Incrementor<S>) {
        self.place(forward.slot(), value);
    }

    fn anchor(&self) -> &Point<D, S> {
        self
    }
}

impl<D: Dimension, S: Scalar> Materialize for Hypercube<D, S> {
    type Dim = D;
    type Scalar = S;

    fn materialize(slice: &Slice<D, S>, index: usize) -> Self {
        slice.cube_at_unchecked(index)
    }

    #[inline]
    fn advance(&mut self, step: &Incrementor<S>) {
        step.apply_cube(self);
    }

    fn settle(&mut self, value: S, forward: &Incrementor<S>) {
        let slot = forward.slot();
        let bit = slot.index::<D>();
        let far = value + forward.stride();
        for (i, vertex) in self.vertices_mut().iter_mut().enumerate() {
            vertex.place(slot, if i & (1 << bit) != 0 { far } else { value });
        }
    }

    fn anchor(&self) -> &Point<D, S> {
        self.front()
    }
}

/// Odometer over the cells of a slice.
#[derive(Debug, Clone)]
pub struct Cursor<C: Materialize> {
    index: usize,
    len: usize,
    digits: Vec<usize>,
    steps: u64,
    generation: u64,
    payload: Option<C>,
}

/// Cursor carrying the grid point of each cell.
pub type PointCursor<D, S> = Cursor<Point<D, S>>;

/// Cursor carrying the whole cell.
pub type CubeCursor<D, S> = Cursor<Hypercube<D, S>>;

impl<C: Materialize> Cursor<C> {
    /// Cursor at cell 0.
    pub fn begin(slice: &Slice<C::Dim, C::Scalar>) -> Self {
        Self::anchored(slice, 0, Some(C::materialize(slice, 0)))
    }

    /// One-past-the-end cursor. Its payload is built lazily on the first
    /// decrement.
    pub fn end(slice: &Slice<C::Dim, C::Scalar>) -> Self {
        Self::anchored(slice, slice.resolution(), None)
    }

    /// Cursor at `index`; `index == resolution` yields [`Self::end`].
    pub fn at(slice: &Slice<C::Dim, C::Scalar>, index: usize) -> Result<Self, GridError> {
        match index.cmp(&slice.resolution()) {
            std::cmp::Ordering::Less => Ok(Self::anchored(slice, index, Some(C::materialize(slice, index)))),
            std::cmp::Ordering::Equal => Ok(Self::end(slice)),
            std::cmp::Ordering::Greater => Err(GridError::IndexOutOfRange {
                index,
                len: slice.resolution(),
            }),
        }
    }

    fn anchored(slice: &Slice<C::Dim, C::Scalar>, index: usize, payload: Option<C>) -> Self {
        Self {
            index,
            len: slice.resolution(),
            digits: slice.digits_of(index),
            steps: 0,
            generation: slice.generation(),
            payload,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Per-axis digits of [`Self::index`], axis 0 first. All zero at the end.
    #[inline]
    pub fn digits(&self) -> &[usize] {
        &self.digits
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.index >= self.len
    }

    /// The current cell's payload, `None` at the end.
    #[inline]
    pub fn get(&self) -> Option<&C> {
        if self.is_end() {
            None
        } else {
            self.payload.as_ref()
        }
    }

    /// Whether `slice` was refitted since this cursor last synced.
    pub fn is_stale(&self, slice: &Slice<C::Dim, C::Scalar>) -> bool {
        self.generation != slice.generation()
    }

    /// Advance one cell. No-op at the end.
    pub fn increment(&mut self, slice: &Slice<C::Dim, C::Scalar>) {
        debug_assert!(!self.is_stale(slice), "cursor used after slice refit without update()");
        if self.is_end() {
            return;
        }
        let incremental = self.begin_step(slice);
        let forward = slice.incrementors().family(IncrementorKind::Forward);
        let reset = slice.incrementors().family(IncrementorKind::Reset);

        for (axis, digit) in self.digits.iter_mut().enumerate() {
            let grid = &slice.axes()[axis];
            let carry = *digit + 1 >= grid.sub_resolution;
            let step = if carry {
                *digit = 0;
                &reset[axis]
            } else {
                *digit += 1;
                &forward[axis]
            };
            if incremental {
                if let Some(payload) = self.payload.as_mut() {
                    payload.advance(step);
                    payload.settle(grid.value_at(*digit), &forward[axis]);
                }
            }
            if !carry {
                break;
            }
        }

        self.index += 1;
        if !incremental {
            self.refresh(slice);
        }
    }

    /// Step back one cell, wrapping from `0` or the end to `R − 1`.
    pub fn decrement(&mut self, slice: &Slice<C::Dim, C::Scalar>) {
        debug_assert!(!self.is_stale(slice), "cursor used after slice refit without update()");
        let incremental = self.begin_step(slice);
        let reverse = slice.incrementors().family(IncrementorKind::Reverse);
        let rreset = slice.incrementors().family(IncrementorKind::RReset);
        let forward = slice.incrementors().family(IncrementorKind::Forward);

        let mut wrapped = true;
        for (axis, digit) in self.digits.iter_mut().enumerate() {
            let grid = &slice.axes()[axis];
            let borrow = *digit == 0;
            let step = if borrow {
                *digit = grid.sub_resolution - 1;
                &rreset[axis]
            } else {
                *digit -= 1;
                &reverse[axis]
            };
            if incremental {
                if let Some(payload) = self.payload.as_mut() {
                    payload.advance(step);
                    payload.settle(grid.value_at(*digit), &forward[axis]);
                }
            }
            if !borrow {
                wrapped = false;
                break;
            }
        }

        if wrapped {
            if self.index == 0 {
                debug!(resolution = self.len, "cursor wrapped below cell 0");
            }
            self.index = self.len - 1;
        } else {
            self.index -= 1;
        }
        if !incremental {
            self.refresh(slice);
        }
    }

    /// Count a step; `false` means the payload must be rebuilt afterwards.
    fn begin_step(&mut self, slice: &Slice<C::Dim, C::Scalar>) -> bool {
        self.steps += 1;
        self.payload.is_some() && self.steps < slice.config().refresh_interval
    }

    /// Rebuild the payload from the index. The end carries cell 0.
    fn refresh(&mut self, slice: &Slice<C::Dim, C::Scalar>) {
        let cell = if self.is_end() { 0 } else { self.index };
        self.payload = Some(C::materialize(slice, cell));
        self.steps = 0;
        debug_assert_eq!(self.digits, slice.digits_of(self.index), "odometer digits out of sync");
        trace!(index = self.index, "cursor payload refreshed");
    }

    /// Re-anchor after `slice` was refitted.
    ///
    /// The cursor moves to the cell of the new grid containing its old
    /// payload's anchor point (cell 0 if that point left the grid). An end
    /// cursor stays at the new end.
    pub fn update(&mut self, slice: &Slice<C::Dim, C::Scalar>) {
        let located = match self.get() {
            Some(payload) => Some(slice.location_at(payload.anchor())),
            None => None,
        };
        let previous = self.index;
        *self = match located {
            Some(index) => Self::anchored(slice, index, Some(C::materialize(slice, index))),
            None => Self::end(slice),
        };
        debug!(
            from = previous,
            to = self.index,
            generation = self.generation,
            "cursor re-anchored"
        );
    }
}

impl<C: Materialize> PartialEq for Cursor<C> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<C: Materialize> Eq for Cursor<C> {}

// ─────────────────────────────────────────────
// Iterator adaptor
// ─────────────────────────────────────────────

/// Every grid point of a slice in index order; see [`Slice::points`].
#[derive(Debug, Clone)]
pub struct Points<'a, D: Dimension, S: Scalar> {
    slice: &'a Slice<D, S>,
    cursor: PointCursor<D, S>,
}

impl<'a, D: Dimension, S: Scalar> Points<'a, D, S> {
    pub(crate) fn new(slice: &'a Slice<D, S>) -> Self {
        Self {
            slice,
            cursor: PointCursor::begin(slice),
        }
    }
}

impl<D: Dimension, S: Scalar> Iterator for Points<'_, D, S> {
    type Item = Point<D, S>;

    fn next(&mut self) -> Option<Point<D, S>> {
        let point = *self.cursor.get()?;
        self.cursor.increment(self.slice);
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.slice.resolution().saturating_sub(self.cursor.index());
        (remaining, Some(remaining))
    }
}

impl<D: Dimension, S: Scalar> ExactSizeIterator for Points<'_, D, S> {}
impl<D: Dimension, S: Scalar> FusedIterator for Points<'_, D, S> {}
