//! # Slices
//!
//! A [`Slice`] lays a regular grid over the Heisenberg axes of a [`Space`].
//!
//! ## Resolution fitting
//!
//! Given a requested cell count `R` over `d = 2N − 1` axes:
//!
//! ```text
//! t      = measure^(1/d) / R^(1/d)          target stride
//! k_a    = max(1, ⌊L_a / t⌋)                per-axis sub-resolution
//! while Π k_a < R:  k_c += 1                c = axis with the largest stride
//! ```
//!
//! The realised resolution `Π k_a` is at least `R` and usually not equal to
//! it: most `R` have no factorisation into `d` near-equal integers. Callers
//! must read [`Slice::resolution`] after fitting. For every axis at least
//! `t` long, the fitted strides end within a factor of two of each other.
//!
//! ## Grid index
//!
//! A grid index is a mixed-radix number, axis 0 least significant:
//!
//! ```text
//! digit_a = index mod k_a;  index /= k_a
//! ```
//!
//! Cursors keep the same digit order, so [`Slice::digits_of`] and the
//! cursor's own digits always agree.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SliceConfig;
use crate::coordinate::Scalar;
use crate::cursor::{CubeCursor, PointCursor, Points};
use crate::dimension::Dimension;
use crate::error::GridError;
use crate::hypercube::Hypercube;
use crate::incrementor::{Incrementor, IncrementorKind, Incrementors};
use crate::point::Point;
use crate::space::Space;
use crate::structure::{HyperbolicStructure, Structure};

/// Fitted grid parameters of one Heisenberg axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis<S> {
    /// Lower bound of the axis interval; digit 0 sits here.
    pub lower: S,
    /// Distance between neighbouring grid points.
    pub stride: S,
    /// Number of grid points along this axis.
    pub sub_resolution: usize,
}

impl<S: Scalar> Axis<S> {
    /// Coordinate of grid point `digit` along this axis.
    ///
    /// Every grid point, whether built from an index or reached by a cursor,
    /// takes its slot values from here, so equal digits give bit-equal slots.
    #[inline]
    pub fn value_at(&self, digit: usize) -> S {
        self.lower + self.stride * S::lift(digit as f64)
    }
}

/// A gridded space plus the incrementors that walk it.
#[derive(Debug, Clone)]
pub struct Slice<D: Dimension, S: Scalar> {
    space: Space<S>,
    requested: usize,
    axes: Vec<Axis<S>>,
    resolution: usize,
    incrementors: Incrementors<S>,
    config: SliceConfig,
    generation: u64,
    _dimension: PhantomData<D>,
}

impl<D: Dimension, S: Scalar> Slice<D, S> {
    /// Fit a grid of at least `resolution` cells over `space`.
    ///
    /// # Errors
    ///
    /// - [`GridError::DimensionMismatch`] if `space` does not have `2N − 1` axes
    /// - [`GridError::ZeroResolution`] if `resolution == 0`
    /// - [`GridError::DegenerateSpace`] if an axis length is not positive and finite
    /// - [`GridError::ResolutionOverflow`] if the fitted cell count overflows `usize`
    pub fn new(space: Space<S>, resolution: usize, config: SliceConfig) -> Result<Self, GridError> {
        let mut slice = Self {
            space,
            requested: resolution,
            axes: Vec::new(),
            resolution: 0,
            incrementors: Incrementors::default(),
            config,
            generation: 0,
            _dimension: PhantomData,
        };
        slice.refit()?;
        Ok(slice)
    }

    /// Request a new resolution and refit. On error the slice is unchanged.
    pub fn set_resolution(&mut self, resolution: usize) -> Result<(), GridError> {
        let previous = std::mem::replace(&mut self.requested, resolution);
        self.refit().map_err(|e| {
            self.requested = previous;
            e
        })
    }

    /// Replace the bounding space and refit. On error the slice is unchanged.
    pub fn set_space(&mut self, space: Space<S>) -> Result<(), GridError> {
        let previous = std::mem::replace(&mut self.space, space);
        self.refit().map_err(|e| {
            self.space = previous;
            e
        })
    }

    /// Replace the config and refit (the tolerance enters the fit).
    pub fn set_config(&mut self, config: SliceConfig) -> Result<(), GridError> {
        let previous = std::mem::replace(&mut self.config, config);
        self.refit().map_err(|e| {
            self.config = previous;
            e
        })
    }

    fn refit(&mut self) -> Result<(), GridError> {
        let subs = fit_sub_resolutions::<S>(&self.space, self.requested, D::HEISENBERG_SIZE, self.config.tolerance)?;

        let resolution = subs
            .iter()
            .try_fold(1usize, |acc, &k| acc.checked_mul(k))
            .ok_or(GridError::ResolutionOverflow)?;

        let axes: Vec<Axis<S>> = self
            .space
            .axes
            .iter()
            .zip(&subs)
            .map(|(interval, &k)| Axis {
                lower: interval.lower,
                stride: interval.length() / S::lift(k as f64),
                sub_resolution: k,
            })
            .collect();

        self.incrementors =
            Incrementors::from_axes::<D>(axes.iter().map(|a| (a.stride, a.sub_resolution)));
        self.axes = axes;
        self.resolution = resolution;
        self.generation += 1;

        debug!(
            requested = self.requested,
            resolution,
            sub_resolutions = ?subs,
            generation = self.generation,
            "slice fitted"
        );
        Ok(())
    }

    // ── Accessors ──────────────────────────────

    pub fn space(&self) -> &Space<S> {
        &self.space
    }

    pub fn config(&self) -> &SliceConfig {
        &self.config
    }

    /// The resolution most recently asked for.
    pub fn requested_resolution(&self) -> usize {
        self.requested
    }

    /// The realised cell count, `Π k_a ≥ requested`.
    #[inline]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    #[inline]
    pub fn axes(&self) -> &[Axis<S>] {
        &self.axes
    }

    pub fn axis(&self, index: usize) -> Result<&Axis<S>, GridError> {
        self.axes.get(index).ok_or(GridError::IndexOutOfRange {
            index,
            len: self.axes.len(),
        })
    }

    /// Bumped on every successful refit. Cursors compare it to detect staleness.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Height shared by every grid point: the lower height bound.
    #[inline]
    pub fn height(&self) -> S {
        self.space.height.lower
    }

    #[inline]
    pub fn incrementors(&self) -> &Incrementors<S> {
        &self.incrementors
    }

    pub fn incrementor(&self, kind: IncrementorKind, axis: usize) -> Result<&Incrementor<S>, GridError> {
        self.incrementors
            .get(kind, axis)
            .ok_or(GridError::IndexOutOfRange {
                index: axis,
                len: self.axes.len(),
            })
    }

    // ── Index arithmetic ───────────────────────

    /// Mixed-radix digits of `index`, axis 0 first.
    pub fn digits_of(&self, index: usize) -> Vec<usize> {
        let mut rest = index;
        self.axes
            .iter()
            .map(|axis| {
                let digit = rest % axis.sub_resolution;
                rest /= axis.sub_resolution;
                digit
            })
            .collect()
    }

    /// Inverse of [`Self::digits_of`].
    pub fn index_of(&self, digits: &[usize]) -> Result<usize, GridError> {
        if digits.len() != self.axes.len() {
            return Err(GridError::DimensionMismatch {
                expected: self.axes.len(),
                got: digits.len(),
            });
        }
        let mut index = 0;
        let mut scale = 1;
        for (&digit, axis) in digits.iter().zip(&self.axes) {
            if digit >= axis.sub_resolution {
                return Err(GridError::IndexOutOfRange {
                    index: digit,
                    len: axis.sub_resolution,
                });
            }
            index += digit * scale;
            scale *= axis.sub_resolution;
        }
        Ok(index)
    }

    fn check_index(&self, index: usize) -> Result<(), GridError> {
        if index < self.resolution {
            Ok(())
        } else {
            Err(GridError::IndexOutOfRange {
                index,
                len: self.resolution,
            })
        }
    }

    // ── Materialisation ────────────────────────

    /// The grid point with grid index `index`, computed from scratch.
    pub fn point_at(&self, index: usize) -> Result<Point<D, S>, GridError> {
        self.check_index(index)?;
        Ok(self.point_at_unchecked(index))
    }

    pub(crate) fn point_at_unchecked(&self, index: usize) -> Point<D, S> {
        let mut structure = HyperbolicStructure::<D, S>::default();
        let mut rest = index;
        for (a, axis) in self.axes.iter().enumerate() {
            let digit = rest % axis.sub_resolution;
            rest /= axis.sub_resolution;
            if let Some(slot) = structure.get_slot_mut(a) {
                *slot = axis.value_at(digit);
            }
        }
        structure.set_height(self.height());
        Point::from_structure(structure)
    }

    /// The cell anchored at grid index `index`.
    pub fn cube_at(&self, index: usize) -> Result<Hypercube<D, S>, GridError> {
        self.check_index(index)?;
        Ok(self.cube_at_unchecked(index))
    }

    pub(crate) fn cube_at_unchecked(&self, index: usize) -> Hypercube<D, S> {
        self.cube_at_point(&self.point_at_unchecked(index))
    }

    /// A cell of this slice's strides anchored at an arbitrary point.
    pub fn cube_at_point(&self, base: &Point<D, S>) -> Hypercube<D, S> {
        Hypercube::from_base(base, self.incrementors.family(IncrementorKind::Forward))
    }

    /// Grid index of the cell containing `point`.
    ///
    /// Each axis digit is `⌊(x − lower) / stride + slack⌋`. The slack, in
    /// strides, is the configured tolerance plus the rounding error of the
    /// scalar type at the magnitude of `x`:
    ///
    /// ```text
    /// slack = tolerance + 4·ε·(|x| + |lower|) / stride
    /// ```
    ///
    /// so a grid point computed a few ulps under its grid line still lands
    /// in its own cell, for `f32` as well as `f64`. A point outside
    /// the gridded region, including one on the upper boundary, maps to
    /// index 0 rather than an error, so callers can query virtual
    /// sub-regions freely.
    pub fn location_at(&self, point: &Point<D, S>) -> usize {
        let tol = S::lift(self.config.tolerance);
        let ulps = S::lift(4.0) * S::epsilon();
        let mut index = 0;
        let mut scale = 1;
        for (a, axis) in self.axes.iter().enumerate() {
            let x = match point.structure().get_slot(a) {
                Some(x) => x,
                None => return 0,
            };
            let slack = tol + ulps * (x.abs() + axis.lower.abs()) / axis.stride;
            let offset = ((x - axis.lower) / axis.stride + slack).floor();
            // Also rejects NaN.
            if !(offset >= S::zero()) {
                return 0;
            }
            let digit = offset.widen() as usize;
            if digit >= axis.sub_resolution {
                return 0;
            }
            index += digit * scale;
            scale *= axis.sub_resolution;
        }
        index
    }

    // ── Traversal ──────────────────────────────

    /// Every grid point in index order.
    pub fn points(&self) -> Points<'_, D, S> {
        Points::new(self)
    }

    /// Visit every cell in index order, reusing one cube.
    pub fn for_each_cube<F>(&self, mut f: F)
    where
        F: FnMut(usize, &Hypercube<D, S>),
    {
        let mut cursor = CubeCursor::begin(self);
        while let Some(cube) = cursor.get() {
            f(cursor.index(), cube);
            cursor.increment(self);
        }
    }

    pub fn point_cursor(&self) -> PointCursor<D, S> {
        PointCursor::begin(self)
    }

    pub fn cube_cursor(&self) -> CubeCursor<D, S> {
        CubeCursor::begin(self)
    }
}

// ─────────────────────────────────────────────
// Fitting
// ─────────────────────────────────────────────

/// Per-axis sub-resolutions for `requested` cells over `space`.
fn fit_sub_resolutions<S: Scalar>(
    space: &Space<S>,
    requested: usize,
    axis_count: usize,
    tolerance: f64,
) -> Result<Vec<usize>, GridError> {
    if space.axis_count() != axis_count {
        return Err(GridError::DimensionMismatch {
            expected: axis_count,
            got: space.axis_count(),
        });
    }
    if requested == 0 {
        return Err(GridError::ZeroResolution);
    }

    let lengths: Vec<f64> = space.axes.iter().map(|a| a.length().widen()).collect();
    let measure = space.measure().widen();
    if lengths.iter().any(|l| !(l.is_finite() && *l > 0.0)) || !measure.is_finite() {
        return Err(GridError::DegenerateSpace { measure });
    }

    // Axis lengths carry the rounding of `S`, not of f64.
    let ulps = 4.0 * S::epsilon().widen();
    let inv_d = 1.0 / axis_count as f64;
    let target = measure.powf(inv_d) / (requested as f64).powf(inv_d);

    let mut subs: Vec<usize> = lengths
        .iter()
        .map(|&l| {
            let steps = l / target;
            let k = (steps + tolerance + ulps * steps).floor();
            if k >= usize::MAX as f64 {
                usize::MAX
            } else {
                (k as usize).max(1)
            }
        })
        .collect();

    // Refine the coarsest axis until the product reaches the request.
    loop {
        let product = subs.iter().try_fold(1usize, |acc, &k| acc.checked_mul(k));
        match product {
            Some(p) if p >= requested => break,
            None => return Err(GridError::ResolutionOverflow),
            Some(_) => {}
        }
        let coarsest = lengths
            .iter()
            .zip(&subs)
            .map(|(l, &k)| l / k as f64)
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (a, stride)| {
                if stride > best.1 {
                    (a, stride)
                } else {
                    best
                }
            })
            .0;
        subs[coarsest] += 1;
    }

    Ok(subs)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
