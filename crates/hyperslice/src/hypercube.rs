//! # Hypercubes
//!
//! A grid cell with `2^(2N−1)` vertices. Vertex `i` is vertex 0 moved one
//! forward stride along Heisenberg axis `b` for every set bit `b` of `i`:
//!
//! ```text
//! i = 0b101  →  front + stride₀ (axis 0) + stride₂ (axis 2)
//! ```
//!
//! Vertex 0 is the *front*, the last vertex is the *back*; two cubes are
//! equal when their fronts and backs are.

use crate::coordinate::Scalar;
use crate::dimension::Dimension;
use crate::error::GridError;
use crate::incrementor::Incrementor;
use crate::point::Point;
use crate::structure::Structure;

#[derive(Debug, Clone)]
pub struct Hypercube<D: Dimension, S: Scalar> {
    vertices: Vec<Point<D, S>>,
}

impl<D: Dimension, S: Scalar> Hypercube<D, S> {
    /// Fill every vertex with `base`, then apply `forward[b]` to vertex `i`
    /// for each set bit `b` of `i`, low bit first.
    ///
    /// # Panics
    ///
    /// Debug-panics unless `forward` has one incrementor per Heisenberg slot.
    pub fn from_base(base: &Point<D, S>, forward: &[Incrementor<S>]) -> Self {
        debug_assert_eq!(forward.len(), D::HEISENBERG_SIZE, "one forward incrementor per axis");
        let mut vertices = vec![*base; D::HYPERCUBE_VERTEX_COUNT];
        for (i, vertex) in vertices.iter_mut().enumerate() {
            for (bit, inc) in forward.iter().enumerate() {
                if i & (1 << bit) != 0 {
                    inc.apply(vertex);
                }
            }
        }
        Self { vertices }
    }

    #[inline]
    pub fn front(&self) -> &Point<D, S> {
        &self.vertices[0]
    }

    #[inline]
    pub fn back(&self) -> &Point<D, S> {
        &self.vertices[D::HYPERCUBE_VERTEX_COUNT - 1]
    }

    /// Bounds-checked vertex access.
    pub fn vertex(&self, index: usize) -> Result<&Point<D, S>, GridError> {
        self.vertices.get(index).ok_or(GridError::IndexOutOfRange {
            index,
            len: D::HYPERCUBE_VERTEX_COUNT,
        })
    }

    #[inline]
    pub fn vertices(&self) -> &[Point<D, S>] {
        &self.vertices
    }

    #[inline]
    pub(crate) fn vertices_mut(&mut self) -> &mut [Point<D, S>] {
        &mut self.vertices
    }

    /// Per-slot mean of front and back, at the front's height.
    pub fn midpoint(&self) -> Point<D, S> {
        Point::midpoint(self.front(), self.back())
    }

    /// Minimum and maximum of `f` over the vertices.
    pub fn bounds<F>(&self, mut f: F) -> (S, S)
    where
        F: FnMut(&Point<D, S>) -> S,
    {
        self.vertices.iter().fold(
            (S::infinity(), S::neg_infinity()),
            |(lo, hi), vertex| {
                let value = f(vertex);
                (lo.min(value), hi.max(value))
            },
        )
    }

    /// Whether every Heisenberg slot of `point` lies between front and back,
    /// inclusive, with slack `tol`.
    pub fn contains(&self, point: &Point<D, S>, tol: S) -> bool {
        let front = self.front().structure().heisenberg();
        let back = self.back().structure().heisenberg();
        point
            .heisenberg_slots()
            .zip(front.slots().zip(back.slots()))
            .all(|(x, (a, b))| {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                x >= lo - tol && x <= hi + tol
            })
    }
}

impl<D: Dimension, S: Scalar> PartialEq for Hypercube<D, S> {
    fn eq(&self, other: &Self) -> bool {
        self.front() == other.front() && self.back() == other.back()
    }
}
