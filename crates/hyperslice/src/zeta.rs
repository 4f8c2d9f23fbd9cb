//! Free-coordinate container ("zeta array").
//!
//! Holds the `N − 1` complex coordinates ζᵢ of a structure. Its slot view
//! interleaves real and imaginary parts:
//!
//! ```text
//! slot  0    1    2    3   …  2(N−1)−1
//!       Re ζ₀ Im ζ₀ Re ζ₁ Im ζ₁ … Im ζ_{N−2}
//! ```

use num_complex::Complex;

use crate::coordinate::{Coordinate, Scalar};
use crate::dimension::Dimension;
use crate::error::GridError;
use crate::structure::Structure;

/// The free coordinates ζ₀ … ζ_{N−2}.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FreeCoordinates<D: Dimension, S: Scalar> {
    zeta: D::Zeta<S>,
}

impl<D: Dimension, S: Scalar> FreeCoordinates<D, S> {
    /// All coordinates zero.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build from exactly `N − 1` complex values.
    pub fn from_slice(values: &[Complex<S>]) -> Result<Self, GridError> {
        if values.len() != D::FREE_COUNT {
            return Err(GridError::DimensionMismatch {
                expected: D::FREE_COUNT,
                got: values.len(),
            });
        }
        let mut free = Self::default();
        free.zeta.as_mut().copy_from_slice(values);
        Ok(free)
    }

    #[inline]
    pub fn as_slice(&self) -> &[Complex<S>] {
        self.zeta.as_ref()
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Complex<S>] {
        self.zeta.as_mut()
    }

    /// ζᵢ, or `None` past the end.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Complex<S>> {
        self.as_slice().get(index).copied()
    }

    /// Hermitian form Q(ζ) = Σ |ζᵢ|².
    #[inline]
    pub fn norm_sqr(&self) -> S {
        self.as_slice()
            .iter()
            .fold(S::zero(), |acc, z| acc + z.norm_sqr())
    }

    /// Re⟨ζ, τ⟩ = Σ (Re ζᵢ · Re τᵢ + Im ζᵢ · Im τᵢ).
    #[inline]
    pub fn real_inner(&self, other: &Self) -> S {
        self.as_slice()
            .iter()
            .zip(other.as_slice())
            .fold(S::zero(), |acc, (a, b)| acc + a.re * b.re + a.im * b.im)
    }
}

impl<D: Dimension, S: Scalar> Structure for FreeCoordinates<D, S> {
    type Scalar = S;
    const SLOT_COUNT: usize = 2 * D::FREE_COUNT;

    #[inline]
    fn get_slot(&self, index: usize) -> Option<S> {
        let parts = <Complex<S> as Coordinate>::PARTS;
        self.as_slice()
            .get(index / parts)
            .map(|z| z.part(index % parts))
    }

    #[inline]
    fn get_slot_mut(&mut self, index: usize) -> Option<&mut S> {
        let parts = <Complex<S> as Coordinate>::PARTS;
        self.as_mut_slice()
            .get_mut(index / parts)
            .map(|z| z.part_mut(index % parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::{D1, D3};

    #[test]
    fn slots_interleave_real_and_imaginary() {
        let free = FreeCoordinates::<D3, f64>::from_slice(&[
            Complex::new(1.0, 2.0),
            Complex::new(3.0, 4.0),
        ])
        .unwrap();
        let slots: Vec<f64> = free.slots().collect();
        assert_eq!(slots, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(free.norm_sqr(), 30.0);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = FreeCoordinates::<D3, f64>::from_slice(&[Complex::new(1.0, 0.0)]).unwrap_err();
        assert_eq!(err, GridError::DimensionMismatch { expected: 2, got: 1 });
    }

    #[test]
    fn real_plane_has_no_free_slots() {
        let free = FreeCoordinates::<D1, f64>::zero();
        assert_eq!(free.slots().count(), 0);
        assert_eq!(free.norm_sqr(), 0.0);
        assert!(free.slot(0).is_err());
    }

    #[test]
    fn slot_mut_writes_through() {
        let mut free = FreeCoordinates::<D3, f64>::zero();
        *free.slot_mut(3).unwrap() = 7.0;
        assert_eq!(free.get(1), Some(Complex::new(0.0, 7.0)));
    }

    #[test]
    fn real_inner_matches_expansion() {
        let a = FreeCoordinates::<D3, f64>::from_slice(&[
            Complex::new(1.0, -1.0),
            Complex::new(0.5, 2.0),
        ])
        .unwrap();
        let b = FreeCoordinates::<D3, f64>::from_slice(&[
            Complex::new(2.0, 3.0),
            Complex::new(-4.0, 1.0),
        ])
        .unwrap();
        // 1·2 + (−1)·3 + 0.5·(−4) + 2·1
        assert_eq!(a.real_inner(&b), -1.0);
    }
}
