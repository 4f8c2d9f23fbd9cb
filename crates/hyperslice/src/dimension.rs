//! # Dimension constants
//!
//! A Heisenberg slice of complex hyperbolic N-space has
//!
//! ```text
//! free coordinates     N − 1        (complex ζ₀ … ζ_{N−2})
//! heisenberg slots     2N − 1       (Re ζᵢ, Im ζᵢ, r)
//! hyperbolic slots     2N           (… + height)
//! hypercube vertices   2^(2N − 1)
//! ```
//!
//! [`Dimension`] carries these as associated constants on zero-sized
//! markers ([`D1`] … [`D4`]); [`DimensionSpec`] computes them at runtime for
//! any `N ≥ 1`.

use std::fmt::Debug;
use std::hash::Hash;

use num_complex::Complex;

use crate::coordinate::Scalar;

// ─────────────────────────────────────────────
// Runtime spec
// ─────────────────────────────────────────────

/// Sizes derived from the complex dimension `N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DimensionSpec {
    n: usize,
}

impl DimensionSpec {
    /// Returns `None` for `n == 0` or when the vertex count would overflow.
    pub const fn new(n: usize) -> Option<Self> {
        if n == 0 || n > usize::BITS as usize / 2 {
            None
        } else {
            Some(Self { n })
        }
    }

    pub const fn n(&self) -> usize {
        self.n
    }

    pub const fn free_count(&self) -> usize {
        self.n - 1
    }

    pub const fn heisenberg_size(&self) -> usize {
        2 * self.n - 1
    }

    pub const fn hyperbolic_size(&self) -> usize {
        2 * self.n
    }

    pub const fn hypercube_vertex_count(&self) -> usize {
        1 << self.heisenberg_size()
    }
}

// ─────────────────────────────────────────────
// Compile-time markers
// ─────────────────────────────────────────────

/// Fixed-size storage for the free coordinates of one structure.
pub trait ZetaStorage<S: Scalar>:
    Copy + Default + Debug + PartialEq + AsRef<[Complex<S>]> + AsMut<[Complex<S>]>
{
}

impl<S: Scalar, const K: usize> ZetaStorage<S> for [Complex<S>; K] where [Complex<S>; K]: Default {}

/// Compile-time dimension marker.
pub trait Dimension: Debug + Clone + Copy + Default + PartialEq + Eq + Hash + Send + Sync + 'static {
    /// Complex dimension of the ambient hyperbolic space.
    const N: usize;

    const FREE_COUNT: usize = Self::N - 1;
    const HEISENBERG_SIZE: usize = 2 * Self::N - 1;
    const HYPERBOLIC_SIZE: usize = 2 * Self::N;
    const HYPERCUBE_VERTEX_COUNT: usize = 1 << (2 * Self::N - 1);

    /// `[Complex<S>; N − 1]`.
    type Zeta<S: Scalar>: ZetaStorage<S>;

    /// Runtime view of the same constants.
    fn spec() -> DimensionSpec {
        DimensionSpec { n: Self::N }
    }
}

macro_rules! dimension {
    ($($(#[$doc:meta])* $name:ident = $n:literal;)*) => {$(
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl Dimension for $name {
            const N: usize = $n;
            type Zeta<S: Scalar> = [Complex<S>; $n - 1];
        }
    )*};
}

dimension! {
    /// Real hyperbolic plane: no free coordinates, one Heisenberg slot.
    D1 = 1;
    /// Complex hyperbolic plane: one free coordinate, three Heisenberg slots.
    D2 = 2;
    /// Complex hyperbolic 3-space: five Heisenberg slots.
    D3 = 3;
    /// Complex hyperbolic 4-space: seven Heisenberg slots.
    D4 = 4;
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
