//! # Points and the dependent coordinate
//!
//! A [`Point`] is a hyperbolic structure plus one *dependent* complex
//! coordinate fixed by the defining quadratic form of the space:
//!
//! ```text
//! dependent.re = Q(ζ) − height / 2        Q(ζ) = Σ |ζᵢ|²
//! dependent.im = r
//! ```
//!
//! [`Point::initialize`] recomputes it from scratch in O(N). Every other
//! mutator updates it with the closed-form change implied by re-expanding Q:
//!
//! | Mutation | Dependent update |
//! |---|---|
//! | `ζᵢ` part `x → x + δ` | `re += δ(2x + δ)` |
//! | `r → r + δ` | `im += δ` |
//! | `height → height + δ` | `re −= δ/2` |
//! | translate by τ | `re += 2·Re⟨ζ,τ⟩ + τ.dep.re`, `im += τ.dep.im` |
//! | negate (Heisenberg slots) | `im = −im` |
//! | scale by k (height by k²) | `re *= k²`, `im *= k` |
//!
//! The incremental path must stay equivalent to calling `initialize()`
//! again; debug builds assert this after each whole-point mutator.

use std::cmp::Ordering;

use num_complex::Complex;

use crate::coordinate::Scalar;
use crate::dimension::Dimension;
use crate::error::GridError;
use crate::structure::{HeisenbergStructure, HyperbolicStructure, Slot, Slots, Structure};
use crate::zeta::FreeCoordinates;

/// A hyperbolic structure together with its dependent coordinate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Point<D: Dimension, S: Scalar> {
    structure: HyperbolicStructure<D, S>,
    dependent: Complex<S>,
}

impl<D: Dimension, S: Scalar> Point<D, S> {
    /// The origin. All slots and the dependent coordinate are zero.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Wrap raw scalars and compute the dependent coordinate.
    pub fn from_structure(structure: HyperbolicStructure<D, S>) -> Self {
        let mut point = Self {
            structure,
            dependent: Complex::new(S::zero(), S::zero()),
        };
        point.initialize();
        point
    }

    /// Build from `N − 1` free coordinates, `r` and `height`.
    pub fn new(zeta: &[Complex<S>], r: S, height: S) -> Result<Self, GridError> {
        let free = FreeCoordinates::from_slice(zeta)?;
        Ok(Self::from_structure(HyperbolicStructure::new(
            HeisenbergStructure::new(free, r),
            height,
        )))
    }

    /// Build from a flat list of `2N` hyperbolic slots.
    pub fn from_slots(slots: &[S]) -> Result<Self, GridError> {
        HyperbolicStructure::from_slots(slots).map(Self::from_structure)
    }

    // ── Accessors ──────────────────────────────

    #[inline]
    pub fn structure(&self) -> &HyperbolicStructure<D, S> {
        &self.structure
    }

    pub fn into_structure(self) -> HyperbolicStructure<D, S> {
        self.structure
    }

    #[inline]
    pub fn zeta(&self) -> &[Complex<S>] {
        self.structure.free().as_slice()
    }

    #[inline]
    pub fn r(&self) -> S {
        self.structure.r()
    }

    #[inline]
    pub fn height(&self) -> S {
        self.structure.height()
    }

    #[inline]
    pub fn dependent(&self) -> Complex<S> {
        self.dependent
    }

    /// Read a slot by field selector. Public callers go through the
    /// bounds-checked [`Structure::slot`].
    ///
    /// # Panics
    ///
    /// Panics if a `Re`/`Im` selector names a free coordinate past `N − 2`.
    #[inline]
    pub(crate) fn field(&self, slot: Slot) -> S {
        self.structure.field(slot)
    }

    /// The `2N − 1` Heisenberg slots.
    pub fn heisenberg_slots(&self) -> Slots<'_, HeisenbergStructure<D, S>> {
        self.structure.heisenberg().slots()
    }

    /// All `2N` hyperbolic slots.
    pub fn slots(&self) -> Slots<'_, HyperbolicStructure<D, S>> {
        self.structure.slots()
    }

    // ── Invariant ──────────────────────────────

    /// Recompute the dependent coordinate from the current scalars.
    pub fn initialize(&mut self) {
        self.dependent = self.expected_dependent();
    }

    /// The dependent coordinate a fresh `initialize()` would produce.
    #[inline]
    pub fn expected_dependent(&self) -> Complex<S> {
        let half = S::lift(0.5);
        Complex::new(
            self.structure.free().norm_sqr() - self.height() * half,
            self.r(),
        )
    }

    /// Absolute gap between the stored and recomputed dependent coordinate.
    pub fn drift(&self) -> S {
        let expected = self.expected_dependent();
        (self.dependent.re - expected.re)
            .abs()
            .max((self.dependent.im - expected.im).abs())
    }

    /// Whether [`Self::drift`] is within the scalar tolerance, relative to the
    /// point's magnitude.
    pub fn is_consistent(&self) -> bool {
        self.drift() <= S::tolerance() * self.magnitude()
    }

    fn magnitude(&self) -> S {
        S::one() + self.structure.free().norm_sqr() + self.height().abs() + self.r().abs()
    }

    /// Drift carried into a mutation; zero in release builds.
    #[inline]
    fn carried_drift(&self) -> S {
        if cfg!(debug_assertions) {
            self.drift()
        } else {
            S::zero()
        }
    }

    #[inline]
    fn debug_check(&self, carried: S, op: &str) {
        if cfg!(debug_assertions) {
            let allowed = carried + S::tolerance() * self.magnitude();
            assert!(
                self.drift() <= allowed,
                "{op}: dependent coordinate drifted by {} (allowed {})",
                self.drift(),
                allowed
            );
        }
    }

    // ── Mutators ───────────────────────────────

    /// Add `delta` to one slot and update the dependent coordinate.
    ///
    /// This is the hot path used by incrementors; it does not assert.
    /// Public callers go through [`Self::set_slot`].
    ///
    /// # Panics
    ///
    /// Panics if a `Re`/`Im` selector names a free coordinate past `N − 2`.
    #[inline]
    pub(crate) fn shift(&mut self, slot: Slot, delta: S) {
        let field = self.structure.field_mut(slot);
        let old = *field;
        *field = old + delta;
        shift_dependent(&mut self.dependent, slot, old, delta);
    }

    /// Write `value` into one slot exactly and update the dependent
    /// coordinate by the difference. Same panics as [`Self::shift`].
    #[inline]
    pub(crate) fn place(&mut self, slot: Slot, value: S) {
        let field = self.structure.field_mut(slot);
        let old = *field;
        *field = value;
        shift_dependent(&mut self.dependent, slot, old, value - old);
    }

    /// Bounds-checked write of hyperbolic slot `index`.
    pub fn set_slot(&mut self, index: usize, value: S) -> Result<(), GridError> {
        let slot = Slot::locate::<D>(index).ok_or(GridError::IndexOutOfRange {
            index,
            len: D::HYPERBOLIC_SIZE,
        })?;
        self.place(slot, value);
        Ok(())
    }

    /// Translate every hyperbolic slot by the matching slot of `by`.
    pub fn translate(&mut self, by: &Self) {
        let carried = self.carried_drift() + by.carried_drift();

        let cross = self.structure.free().real_inner(by.structure.free());
        self.dependent.re = self.dependent.re + cross + cross + by.dependent.re;
        self.dependent.im = self.dependent.im + by.dependent.im;

        let heisenberg = self.structure.heisenberg_mut();
        for (z, t) in heisenberg
            .free_mut()
            .as_mut_slice()
            .iter_mut()
            .zip(by.zeta())
        {
            *z = *z + *t;
        }
        let r = heisenberg.r() + by.r();
        heisenberg.set_r(r);
        let height = self.height() + by.height();
        self.structure.set_height(height);

        self.debug_check(carried, "translate");
    }

    /// Negate the Heisenberg slots. The height is left unchanged.
    pub fn negate(&mut self) {
        let carried = self.carried_drift();

        let heisenberg = self.structure.heisenberg_mut();
        for z in heisenberg.free_mut().as_mut_slice() {
            *z = -*z;
        }
        let r = -heisenberg.r();
        heisenberg.set_r(r);
        self.dependent.im = -self.dependent.im;

        self.debug_check(carried, "negate");
    }

    /// Scale the Heisenberg slots by `k` and the height by `k²`.
    pub fn scale(&mut self, k: S) {
        let k2 = k * k;
        let carried = self.carried_drift() * k2.max(k.abs());

        let heisenberg = self.structure.heisenberg_mut();
        for z in heisenberg.free_mut().as_mut_slice() {
            *z = z.scale(k);
        }
        let r = heisenberg.r() * k;
        heisenberg.set_r(r);
        let height = self.height() * k2;
        self.structure.set_height(height);

        // Q scales by k² and the height term moves by (k² − 1)·height/2.
        self.dependent.re = self.dependent.re * k2;
        self.dependent.im = self.dependent.im * k;

        self.debug_check(carried, "scale");
    }

    pub fn set_height(&mut self, height: S) {
        let carried = self.carried_drift();
        let delta = height - self.height();
        self.shift(Slot::Height, delta);
        self.debug_check(carried, "set_height");
    }

    pub fn set_r(&mut self, r: S) {
        let carried = self.carried_drift();
        self.structure.heisenberg_mut().set_r(r);
        self.dependent.im = r;
        self.debug_check(carried, "set_r");
    }

    // ── Comparison ─────────────────────────────

    /// Slot-wise comparison of the hyperbolic slots within `tol`.
    pub fn approx_eq(&self, other: &Self, tol: S) -> bool {
        self.slots()
            .zip(other.slots())
            .all(|(a, b)| (a - b).abs() <= tol)
    }

    /// Per-slot mean of the Heisenberg slots of `a` and `b`, at `a`'s height.
    pub fn midpoint(a: &Self, b: &Self) -> Self {
        let half = S::lift(0.5);
        let mut structure = *a.structure();
        for index in 0..D::HEISENBERG_SIZE {
            if let (Some(slot), Some(other)) = (
                structure.get_slot_mut(index),
                b.structure().get_slot(index),
            ) {
                *slot = (*slot + other) * half;
            }
        }
        Self::from_structure(structure)
    }
}

/// Closed-form change of `dependent` when `slot` moves from `old` to
/// `old + delta`.
#[inline]
pub(crate) fn shift_dependent<S: Scalar>(dependent: &mut Complex<S>, slot: Slot, old: S, delta: S) {
    match slot {
        Slot::Re(_) | Slot::Im(_) => {
            dependent.re = dependent.re + delta * (old + old + delta);
        }
        Slot::R => dependent.im = dependent.im + delta,
        Slot::Height => dependent.re = dependent.re - delta * S::lift(0.5),
    }
}

// ─────────────────────────────────────────────
// Ordering
// ─────────────────────────────────────────────
//
// Lexicographic over the hyperbolic slots, treating slots within the scalar
// tolerance as equal. The order has no geometric meaning; it exists so points
// can live in ordered sets. Tolerant equality is not transitive, so chains of
// nearly-equal points may order inconsistently.

impl<D: Dimension, S: Scalar> Point<D, S> {
    fn tolerant_cmp(&self, other: &Self) -> Ordering {
        let tol = S::tolerance();
        for (a, b) in self.slots().zip(other.slots()) {
            if (a - b).abs() <= tol {
                continue;
            }
            return a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        }
        Ordering::Equal
    }
}

impl<D: Dimension, S: Scalar> PartialEq for Point<D, S> {
    fn eq(&self, other: &Self) -> bool {
        self.tolerant_cmp(other) == Ordering::Equal
    }
}

impl<D: Dimension, S: Scalar> Eq for Point<D, S> {}

impl<D: Dimension, S: Scalar> PartialOrd for Point<D, S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<D: Dimension, S: Scalar> Ord for Point<D, S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tolerant_cmp(other)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::{D1, D2, D3};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeSet;

    fn random_point<D: Dimension>(rng: &mut StdRng) -> Point<D, f64> {
        let slots: Vec<f64> = (0..D::HYPERBOLIC_SIZE)
            .map(|_| rng.gen_range(-3.0..3.0))
            .collect();
        Point::from_slots(&slots).unwrap()
    }

    fn assert_dependent_matches(p: &Point<D3, f64>) {
        let fresh = Point::from_structure(*p.structure());
        let got = p.dependent();
        let want = fresh.dependent();
        assert!(
            (got.re - want.re).abs() < 1e-9 && (got.im - want.im).abs() < 1e-9,
            "incremental {got} vs recomputed {want}"
        );
    }

    #[test]
    fn initialize_uses_quadratic_form() {
        let p = Point::<D2, f64>::new(&[Complex::new(3.0, 4.0)], 1.5, 2.0).unwrap();
        // |3+4i|² − 2/2 = 24
        assert_eq!(p.dependent(), Complex::new(24.0, 1.5));
        assert!(p.is_consistent());
    }

    #[test]
    fn real_plane_dependent_has_no_quadratic_part() {
        let p = Point::<D1, f64>::from_slots(&[0.25, 3.0]).unwrap();
        assert_eq!(p.dependent(), Complex::new(-1.5, 0.25));
    }

    #[test]
    fn shift_matches_recompute_for_every_slot() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let mut p = random_point::<D3>(&mut rng);
            let index = rng.gen_range(0..D3::HYPERBOLIC_SIZE);
            let delta = rng.gen_range(-2.0..2.0);
            p.shift(Slot::locate::<D3>(index).unwrap(), delta);
            assert_dependent_matches(&p);
        }
    }

    #[test]
    fn translate_matches_recompute() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let mut p = random_point::<D3>(&mut rng);
            let by = random_point::<D3>(&mut rng);
            let before = p;
            p.translate(&by);
            assert_dependent_matches(&p);
            for ((a, b), c) in p.slots().zip(before.slots()).zip(by.slots()) {
                assert!((a - (b + c)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn negate_matches_recompute_and_keeps_height() {
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..100 {
            let mut p = random_point::<D3>(&mut rng);
            let height = p.height();
            p.negate();
            assert_dependent_matches(&p);
            assert_eq!(p.height(), height);
        }
    }

    #[test]
    fn scale_matches_recompute() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..200 {
            let mut p = random_point::<D3>(&mut rng);
            let k = rng.gen_range(-4.0..4.0);
            p.scale(k);
            assert_dependent_matches(&p);
        }
    }

    #[test]
    fn setters_match_recompute() {
        let mut rng = StdRng::seed_from_u64(19);
        for _ in 0..100 {
            let mut p = random_point::<D3>(&mut rng);
            p.set_height(rng.gen_range(0.0..5.0));
            assert_dependent_matches(&p);
            p.set_r(rng.gen_range(-5.0..5.0));
            assert_dependent_matches(&p);
            let index = rng.gen_range(0..D3::HYPERBOLIC_SIZE);
            p.set_slot(index, rng.gen_range(-5.0..5.0)).unwrap();
            assert_dependent_matches(&p);
        }
    }

    #[test]
    fn set_slot_rejects_out_of_range() {
        let mut p = Point::<D2, f64>::zero();
        assert_eq!(
            p.set_slot(4, 1.0),
            Err(GridError::IndexOutOfRange { index: 4, len: 4 })
        );
    }

    #[test]
    fn checked_writes_reject_missing_free_slots() {
        // D1 has no free coordinates: flat slots 0 and 1 are r and height.
        let mut p = Point::<D1, f64>::zero();
        p.set_slot(0, 0.5).unwrap();
        p.set_slot(1, 0.25).unwrap();
        assert_eq!(p.r(), 0.5);
        assert_eq!(p.height(), 0.25);
        assert_eq!(
            p.set_slot(2, 1.0),
            Err(GridError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert!(p.structure().slot(2).is_err());
        assert!(p.is_consistent());
    }

    #[test]
    fn set_slot_writes_the_exact_value() {
        let mut p = Point::<D2, f64>::from_slots(&[1000.3, 1000.7, 1000.1, 0.5]).unwrap();
        for (index, value) in [1000.3 + 0.0007 * 3.0, 1000.9, 1000.0 + 1e-7].into_iter().enumerate() {
            p.set_slot(index, value).unwrap();
            assert_eq!(p.structure().slot(index).unwrap(), value);
        }
        assert!(p.is_consistent());
    }

    #[test]
    fn long_shift_chain_stays_close() {
        let mut p = Point::<D3, f64>::zero();
        for step in 0..10_000 {
            let slot = Slot::locate::<D3>(step % D3::HEISENBERG_SIZE).unwrap();
            p.shift(slot, 0.001);
        }
        assert!(p.drift() < 1e-9, "drift = {}", p.drift());
    }

    #[test]
    fn midpoint_averages_heisenberg_slots() {
        let a = Point::<D2, f64>::from_slots(&[0.0, 0.0, 0.0, 1.0]).unwrap();
        let b = Point::<D2, f64>::from_slots(&[1.0, 2.0, 4.0, 9.0]).unwrap();
        let m = Point::midpoint(&a, &b);
        assert_eq!(m.slots().collect::<Vec<_>>(), vec![0.5, 1.0, 2.0, 1.0]);
        assert!(m.is_consistent());
    }

    #[test]
    fn tolerant_order_supports_sets() {
        let a = Point::<D2, f64>::from_slots(&[0.0, 1.0, 0.0, 1.0]).unwrap();
        let a_noisy = Point::<D2, f64>::from_slots(&[1e-12, 1.0, 0.0, 1.0]).unwrap();
        let b = Point::<D2, f64>::from_slots(&[0.0, 2.0, 0.0, 1.0]).unwrap();
        assert_eq!(a, a_noisy);
        assert!(a < b);

        let set: BTreeSet<_> = [b, a, a_noisy].into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}
