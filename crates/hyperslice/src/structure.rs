//! # Structure layers
//!
//! Each layer owns the layer beneath it and adds one real scalar:
//!
//! | Layer | Owns | Adds | Slot count |
//! |---|---|---|---|
//! | [`FreeCoordinates`] | ζ₀ … ζ_{N−2} | — | 2N − 2 |
//! | [`HeisenbergStructure`] | free coordinates | `r` | 2N − 1 |
//! | [`HyperbolicStructure`] | Heisenberg structure | `height` | 2N |
//!
//! The flat slot view of a layer lists the slots of every layer beneath it
//! first, then its own. Iterating [`Structure::slots`] on a given layer
//! stops at that layer's end, so `hyperbolic.heisenberg().slots()` visits
//! only the Heisenberg slots.

use std::iter::FusedIterator;

use crate::coordinate::{Coordinate, Scalar};
use crate::dimension::Dimension;
use crate::error::GridError;
use crate::zeta::FreeCoordinates;

// ─────────────────────────────────────────────
// Slot selector
// ─────────────────────────────────────────────

/// Field selector for one scalar slot of a hyperbolic structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Real part of free coordinate `i`.
    Re(usize),
    /// Imaginary part of free coordinate `i`.
    Im(usize),
    /// The Heisenberg `r` coordinate.
    R,
    /// The hyperbolic height.
    Height,
}

impl Slot {
    /// Map a flat slot index to its field, or `None` past the hyperbolic end.
    #[inline]
    pub fn locate<D: Dimension>(index: usize) -> Option<Self> {
        let free = 2 * D::FREE_COUNT;
        if index < free {
            Some(if index % 2 == 0 {
                Slot::Re(index / 2)
            } else {
                Slot::Im(index / 2)
            })
        } else if index == free {
            Some(Slot::R)
        } else if index == free + 1 {
            Some(Slot::Height)
        } else {
            None
        }
    }

    /// Inverse of [`Slot::locate`].
    #[inline]
    pub fn index<D: Dimension>(self) -> usize {
        match self {
            Slot::Re(i) => 2 * i,
            Slot::Im(i) => 2 * i + 1,
            Slot::R => 2 * D::FREE_COUNT,
            Slot::Height => 2 * D::FREE_COUNT + 1,
        }
    }

    /// Whether this slot is one of the Heisenberg slots.
    #[inline]
    pub fn is_heisenberg(self) -> bool {
        !matches!(self, Slot::Height)
    }
}

// ─────────────────────────────────────────────
// Structure trait
// ─────────────────────────────────────────────

/// Uniform flat access to the scalar slots of a layer.
pub trait Structure {
    type Scalar: Scalar;

    /// Number of slots this layer spans, its own and all beneath it.
    const SLOT_COUNT: usize;

    /// Slot `index`, or `None` past this layer's end.
    fn get_slot(&self, index: usize) -> Option<Self::Scalar>;

    /// Mutable slot `index`, or `None` past this layer's end.
    fn get_slot_mut(&mut self, index: usize) -> Option<&mut Self::Scalar>;

    /// Bounds-checked read.
    fn slot(&self, index: usize) -> Result<Self::Scalar, GridError> {
        self.get_slot(index).ok_or(GridError::IndexOutOfRange {
            index,
            len: Self::SLOT_COUNT,
        })
    }

    /// Bounds-checked write access.
    fn slot_mut(&mut self, index: usize) -> Result<&mut Self::Scalar, GridError> {
        self.get_slot_mut(index).ok_or(GridError::IndexOutOfRange {
            index,
            len: Self::SLOT_COUNT,
        })
    }

    /// Iterate this layer's slots in order.
    fn slots(&self) -> Slots<'_, Self>
    where
        Self: Sized,
    {
        Slots {
            structure: self,
            front: 0,
        }
    }
}

/// Iterator over the slots of one layer; see [`Structure::slots`].
#[derive(Debug, Clone)]
pub struct Slots<'a, T: Structure> {
    structure: &'a T,
    front: usize,
}

impl<T: Structure> Iterator for Slots<'_, T> {
    type Item = T::Scalar;

    #[inline]
    fn next(&mut self) -> Option<T::Scalar> {
        let value = self.structure.get_slot(self.front)?;
        self.front += 1;
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = T::SLOT_COUNT.saturating_sub(self.front);
        (remaining, Some(remaining))
    }
}

impl<T: Structure> ExactSizeIterator for Slots<'_, T> {}
impl<T: Structure> FusedIterator for Slots<'_, T> {}

// ─────────────────────────────────────────────
// Heisenberg layer
// ─────────────────────────────────────────────

/// Free coordinates plus the real `r` coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeisenbergStructure<D: Dimension, S: Scalar> {
    free: FreeCoordinates<D, S>,
    r: S,
}

impl<D: Dimension, S: Scalar> HeisenbergStructure<D, S> {
    pub fn new(free: FreeCoordinates<D, S>, r: S) -> Self {
        Self { free, r }
    }

    #[inline]
    pub fn free(&self) -> &FreeCoordinates<D, S> {
        &self.free
    }

    #[inline]
    pub fn free_mut(&mut self) -> &mut FreeCoordinates<D, S> {
        &mut self.free
    }

    #[inline]
    pub fn r(&self) -> S {
        self.r
    }

    #[inline]
    pub fn set_r(&mut self, r: S) {
        self.r = r;
    }
}

impl<D: Dimension, S: Scalar> Structure for HeisenbergStructure<D, S> {
    type Scalar = S;
    const SLOT_COUNT: usize = <FreeCoordinates<D, S> as Structure>::SLOT_COUNT + <S as Coordinate>::PARTS;

    #[inline]
    fn get_slot(&self, index: usize) -> Option<S> {
        let beneath = <FreeCoordinates<D, S> as Structure>::SLOT_COUNT;
        if index < beneath {
            self.free.get_slot(index)
        } else if index == beneath {
            Some(self.r.part(0))
        } else {
            None
        }
    }

    #[inline]
    fn get_slot_mut(&mut self, index: usize) -> Option<&mut S> {
        let beneath = <FreeCoordinates<D, S> as Structure>::SLOT_COUNT;
        if index < beneath {
            self.free.get_slot_mut(index)
        } else if index == beneath {
            Some(self.r.part_mut(0))
        } else {
            None
        }
    }
}

// ─────────────────────────────────────────────
// Hyperbolic layer
// ─────────────────────────────────────────────

/// Heisenberg structure plus the real height coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HyperbolicStructure<D: Dimension, S: Scalar> {
    heisenberg: HeisenbergStructure<D, S>,
    height: S,
}

impl<D: Dimension, S: Scalar> HyperbolicStructure<D, S> {
    pub fn new(heisenberg: HeisenbergStructure<D, S>, height: S) -> Self {
        Self { heisenberg, height }
    }

    /// Build from a flat slot list of length `2N`.
    pub fn from_slots(slots: &[S]) -> Result<Self, GridError> {
        if slots.len() != D::HYPERBOLIC_SIZE {
            return Err(GridError::DimensionMismatch {
                expected: D::HYPERBOLIC_SIZE,
                got: slots.len(),
            });
        }
        let mut structure = Self::default();
        for (index, &value) in slots.iter().enumerate() {
            *structure.slot_mut(index)? = value;
        }
        Ok(structure)
    }

    #[inline]
    pub fn heisenberg(&self) -> &HeisenbergStructure<D, S> {
        &self.heisenberg
    }

    #[inline]
    pub fn heisenberg_mut(&mut self) -> &mut HeisenbergStructure<D, S> {
        &mut self.heisenberg
    }

    #[inline]
    pub fn free(&self) -> &FreeCoordinates<D, S> {
        self.heisenberg.free()
    }

    #[inline]
    pub fn r(&self) -> S {
        self.heisenberg.r()
    }

    #[inline]
    pub fn height(&self) -> S {
        self.height
    }

    #[inline]
    pub fn set_height(&mut self, height: S) {
        self.height = height;
    }

    /// Read a slot by field selector. Public callers go through the
    /// bounds-checked [`Structure::slot`].
    ///
    /// # Panics
    ///
    /// Panics if a `Re`/`Im` selector names a free coordinate past `N − 2`.
    #[inline]
    pub(crate) fn field(&self, slot: Slot) -> S {
        match slot {
            Slot::Re(i) => self.heisenberg.free.as_slice()[i].re,
            Slot::Im(i) => self.heisenberg.free.as_slice()[i].im,
            Slot::R => self.heisenberg.r,
            Slot::Height => self.height,
        }
    }

    /// Mutable slot by field selector. Same panics as [`Self::field`].
    #[inline]
    pub(crate) fn field_mut(&mut self, slot: Slot) -> &mut S {
        match slot {
            Slot::Re(i) => &mut self.heisenberg.free.as_mut_slice()[i].re,
            Slot::Im(i) => &mut self.heisenberg.free.as_mut_slice()[i].im,
            Slot::R => &mut self.heisenberg.r,
            Slot::Height => &mut self.height,
        }
    }
}

impl<D: Dimension, S: Scalar> Structure for HyperbolicStructure<D, S> {
    type Scalar = S;
    const SLOT_COUNT: usize = <HeisenbergStructure<D, S> as Structure>::SLOT_COUNT + <S as Coordinate>::PARTS;

    #[inline]
    fn get_slot(&self, index: usize) -> Option<S> {
        let beneath = <HeisenbergStructure<D, S> as Structure>::SLOT_COUNT;
        if index < beneath {
            self.heisenberg.get_slot(index)
        } else if index == beneath {
            Some(self.height.part(0))
        } else {
            None
        }
    }

    #[inline]
    fn get_slot_mut(&mut self, index: usize) -> Option<&mut S> {
        let beneath = <HeisenbergStructure<D, S> as Structure>::SLOT_COUNT;
        if index < beneath {
            self.heisenberg.get_slot_mut(index)
        } else if index == beneath {
            Some(self.height.part_mut(0))
        } else {
            None
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
