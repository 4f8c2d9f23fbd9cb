//! # hyperslice
//!
//! Grid discretisation of Heisenberg slices of complex hyperbolic space
//! `H^N_ℂ`, with cheap incremental traversal.
//!
//! A point carries `N − 1` free complex coordinates `ζ`, a real coordinate
//! `r` and a height `h`, plus a *dependent* coordinate that is a closed-form
//! function of the rest:
//!
//! ```text
//! dependent = (Q(ζ) − h/2)  +  i·r        Q(ζ) = Σ |ζᵢ|²
//! ```
//!
//! Every mutation updates the dependent coordinate incrementally instead of
//! recomputing `Q`, which is what makes walking millions of grid cells cheap.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |---|---|
//! | [`dimension`] | Compile-time dimension markers `D1`..`D4` and derived sizes |
//! | [`coordinate`] | [`Scalar`] and [`Coordinate`]: real and complex parts |
//! | [`zeta`] | Free coordinates `ζ` |
//! | [`structure`] | Layered Heisenberg / hyperbolic slot access |
//! | [`point`] | [`Point`]: structure plus the dependent coordinate |
//! | [`hypercube`] | Grid cells with `2^(2N−1)` vertices |
//! | [`space`] | Bounding intervals of a region |
//! | [`slice`] | Resolution fitting, grid index ↔ point |
//! | [`incrementor`] | Fixed-stride moves along one axis |
//! | [`cursor`] | Odometer traversal of points and cells |
//!
//! ## Example
//!
//! ```
//! use hyperslice::{D2, Slice, SliceConfig, Space};
//!
//! let slice = Slice::<D2, f64>::new(Space::unit(3), 8, SliceConfig::default()).unwrap();
//! assert_eq!(slice.resolution(), 8);
//!
//! let mut cells = 0;
//! slice.for_each_cube(|_, cube| {
//!     assert!(cube.front().is_consistent());
//!     cells += 1;
//! });
//! assert_eq!(cells, 8);
//! ```
//!
//! Points, structures and coordinates print and parse in a bracketed form,
//! e.g. a `D2` point is `[[[[[x,y]],r],h],[dre,dim]]`.

pub mod config;
pub mod coordinate;
pub mod cursor;
pub mod dimension;
pub mod error;
pub mod hypercube;
pub mod incrementor;
pub mod point;
pub mod slice;
pub mod space;
pub mod structure;
pub mod zeta;

mod format;

pub use config::SliceConfig;
pub use coordinate::{Coordinate, Scalar};
pub use cursor::{CubeCursor, Cursor, Materialize, PointCursor, Points};
pub use dimension::{Dimension, DimensionSpec, D1, D2, D3, D4};
pub use error::{GridError, ParseError};
pub use hypercube::Hypercube;
pub use incrementor::{Incrementor, IncrementorKind, Incrementors};
pub use point::Point;
pub use slice::{Axis, Slice};
pub use space::{Interval, Space};
pub use structure::{HeisenbergStructure, HyperbolicStructure, Slot, Structure};
pub use zeta::FreeCoordinates;

pub use num_complex::Complex;
