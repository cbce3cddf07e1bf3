//! One-dimensional affine phase-space optics and its lifted two-dimensional
//! product, per the affine-group algebra at the core of the transport.

use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};

use crate::{Result, TransportError};

/// Tolerance below which a determinant is considered singular.
const DET_TOLERANCE: f64 = 1e-12;

/// A one-dimensional affine phase-space map `(p, a) -> (p', a')`:
///
/// ```text
/// p' = pp*p + pa*a + cp
/// a' = ap*p + aa*a + ca
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Optics1D {
    pub pp: f64,
    pub pa: f64,
    pub ap: f64,
    pub aa: f64,
    pub cp: f64,
    pub ca: f64,
}

impl Optics1D {
    /// The neutral element: linear part is the identity, no translation.
    pub fn identity() -> Self {
        Self {
            pp: 1.,
            pa: 0.,
            ap: 0.,
            aa: 1.,
            cp: 0.,
            ca: 0.,
        }
    }

    /// Free-space propagation by distance `q`.
    pub fn translation(q: f64) -> Self {
        Self {
            pp: 1.,
            pa: q,
            ap: 0.,
            aa: 1.,
            cp: 0.,
            ca: 0.,
        }
    }

    /// A thin lens of focal length `f` centred at `c`. `f` must be non-zero.
    pub fn refraction(f: f64, c: f64) -> Result<Self> {
        if f == 0. {
            return Err(TransportError::DegenerateOptics(
                "refraction focal length is zero".to_string(),
            ));
        }
        Ok(Self {
            pp: 1.,
            pa: 0.,
            ap: -1. / f,
            aa: 1.,
            cp: 0.,
            ca: c / f,
        })
    }

    /// Evaluates the map at phase-space point `(p, a)`.
    pub fn apply(&self, p: f64, a: f64) -> (f64, f64) {
        (
            self.pp * p + self.pa * a + self.cp,
            self.ap * p + self.aa * a + self.ca,
        )
    }

    /// The determinant of the linear part.
    pub fn det(&self) -> f64 {
        self.pp * self.aa - self.pa * self.ap
    }

    /// Composes `self` after `rhs`: `compose(self, rhs).apply(x) ==
    /// self.apply(rhs.apply(x))` for every phase-space point `x`.
    ///
    /// The linear part is the 2x2 matrix product of the two linear parts;
    /// the translation is `self`'s linear part applied to `rhs`'s
    /// translation, plus `self`'s own translation. Aliasing-safe: reads
    /// both operands into locals before writing `self`/`rhs` back out, so
    /// `rhs` (or `self`) may be the same binding as the result.
    pub fn compose(&self, rhs: &Self) -> Self {
        let (l, r) = (*self, *rhs);
        let (cp, ca) = l.apply(r.cp, r.ca);
        Self {
            pp: l.pp * r.pp + l.pa * r.ap,
            pa: l.pp * r.pa + l.pa * r.aa,
            ap: l.ap * r.pp + l.aa * r.ap,
            aa: l.ap * r.pa + l.aa * r.aa,
            cp,
            ca,
        }
    }

    /// The inverse map. Fails if the linear part is singular.
    pub fn invert(&self) -> Result<Self> {
        let d = self.det();
        if d.abs() < DET_TOLERANCE {
            return Err(TransportError::DegenerateOptics(format!(
                "singular optics element, determinant = {d}"
            )));
        }
        let pp = self.aa / d;
        let pa = -self.pa / d;
        let ap = -self.ap / d;
        let aa = self.pp / d;
        let cp = -(pp * self.cp + pa * self.ca);
        let ca = -(ap * self.cp + aa * self.ca);
        Ok(Self {
            pp,
            pa,
            ap,
            aa,
            cp,
            ca,
        })
    }

    /// The linear part as a `nalgebra` 2x2 matrix, used by callers that
    /// need the matrix machinery (e.g. the adjoint property test).
    pub fn linear_matrix(&self) -> Matrix2<f64> {
        Matrix2::new(self.pp, self.pa, self.ap, self.aa)
    }
}

/// The two-axis lifted form used at the transport API boundary: two
/// independent 1-D elements, one per axis, with decoupled translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Optics2D {
    pub s: Optics1D,
    pub t: Optics1D,
}

impl Optics2D {
    pub fn identity() -> Self {
        Self {
            s: Optics1D::identity(),
            t: Optics1D::identity(),
        }
    }

    pub fn apply(&self, ps: f64, as_: f64, pt: f64, at: f64) -> (f64, f64, f64, f64) {
        let (ps, as_) = self.s.apply(ps, as_);
        let (pt, at) = self.t.apply(pt, at);
        (ps, as_, pt, at)
    }

    /// Block-diagonal composition: each axis composes independently.
    pub fn compose(&self, rhs: &Self) -> Self {
        Self {
            s: self.s.compose(&rhs.s),
            t: self.t.compose(&rhs.t),
        }
    }

    /// Block-diagonal inversion: each axis inverts independently.
    pub fn invert(&self) -> Result<Self> {
        Ok(Self {
            s: self.s.invert()?,
            t: self.t.invert()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-5, "{a} != {b}");
    }

    fn approx_eq(a: &Optics1D, b: &Optics1D) {
        approx(a.pp, b.pp);
        approx(a.pa, b.pa);
        approx(a.ap, b.ap);
        approx(a.aa, b.aa);
        approx(a.cp, b.cp);
        approx(a.ca, b.ca);
    }

    #[test]
    fn identity_is_neutral() {
        let x = Optics1D::translation(2.5).compose(&Optics1D::refraction(3., 0.1).unwrap());
        approx_eq(&Optics1D::identity().compose(&x), &x);
        approx_eq(&x.compose(&Optics1D::identity()), &x);
    }

    #[test]
    fn identity_is_neutral_with_nonzero_centre() {
        // a refraction with nonzero centre has ca != 0; the identity law
        // must still hold (this pins down the compose semantics against
        // the original reference's column-application phrasing, which
        // would break this law for ca != 0 if taken as literal full
        // affine applies on the linear columns).
        let lens = Optics1D::refraction(1., 2.).unwrap();
        approx_eq(&lens.compose(&Optics1D::identity()), &lens);
        approx_eq(&Optics1D::identity().compose(&lens), &lens);
    }

    #[test]
    fn associativity() {
        let a = Optics1D::translation(1.2);
        let b = Optics1D::refraction(0.8, -0.3).unwrap();
        let c = Optics1D::translation(-0.4);
        approx_eq(
            &a.compose(&b).compose(&c),
            &a.compose(&b.compose(&c)),
        );
    }

    #[test]
    fn inverse_round_trip() {
        let x = Optics1D::translation(1.2).compose(&Optics1D::refraction(0.8, -0.3).unwrap());
        let inv = x.invert().unwrap();
        approx_eq(&x.compose(&inv), &Optics1D::identity());
        approx_eq(&inv.compose(&x), &Optics1D::identity());
    }

    #[test]
    fn action_matches_compose() {
        let a = Optics1D::translation(0.7);
        let b = Optics1D::refraction(1.3, 0.2).unwrap();
        let (p, ang) = (0.33, -0.12);
        let direct = a.apply({ let (p, _) = b.apply(p, ang); p }, { let (_, a) = b.apply(p, ang); a });
        let composed = a.compose(&b).apply(p, ang);
        approx(direct.0, composed.0);
        approx(direct.1, composed.1);
    }

    #[test]
    fn translation_group() {
        let composed = Optics1D::translation(1.1).compose(&Optics1D::translation(2.4));
        approx_eq(&composed, &Optics1D::translation(3.5));
    }

    #[test]
    fn free_space_round_trip() {
        let x = Optics1D::translation(2.5);
        let inv = x.invert().unwrap();
        approx(inv.pp, 1.);
        approx(inv.pa, -2.5);
        approx(inv.ap, 0.);
        approx(inv.aa, 1.);
        let (p, a) = x.apply(1., 0.);
        approx(p, 1.);
        approx(a, 0.);
        let (p, a) = x.apply(0., 1.);
        approx(p, 2.5);
        approx(a, 1.);
    }

    #[test]
    fn thin_lens_at_focal_distance() {
        let lens = Optics1D::refraction(1., 0.).unwrap();
        let (p, a) = lens.apply(0., 1.);
        approx(p, 0.);
        approx(a, 1.);
        let (p, a) = lens.apply(1., 0.);
        approx(p, 1.);
        approx(a, -1.);
    }

    #[test]
    fn four_f_system() {
        let system = Optics1D::translation(1.).compose(
            &Optics1D::refraction(1., 0.)
                .unwrap()
                .compose(&Optics1D::translation(1.)),
        );
        approx(system.pp, 0.);
        approx(system.pa, 1.);
        approx(system.ap, -1.);
        approx(system.aa, 0.);
    }

    #[test]
    fn lens_symmetry_collimation() {
        let d = 1.7;
        let system = Optics1D::translation(d)
            .compose(&Optics1D::refraction(d, 0.).unwrap())
            .compose(&Optics1D::translation(d));
        approx(system.pp, 0.);
        approx(system.pa, d);
        approx(system.ap, -1. / d);
        approx(system.aa, 0.);
    }

    #[test]
    fn refraction_requires_nonzero_focal_length() {
        assert!(Optics1D::refraction(0., 0.).is_err());
    }

    #[test]
    fn invert_fails_on_singular_element() {
        let degenerate = Optics1D {
            pp: 1.,
            pa: 1.,
            ap: 1.,
            aa: 1.,
            cp: 0.,
            ca: 0.,
        };
        assert!(degenerate.invert().is_err());
    }

    #[test]
    fn optics2d_is_block_diagonal() {
        let a = Optics2D {
            s: Optics1D::translation(1.),
            t: Optics1D::refraction(2., 0.).unwrap(),
        };
        let b = Optics2D::identity();
        let composed = a.compose(&b);
        approx_eq(&composed.s, &a.s);
        approx_eq(&composed.t, &a.t);
    }
}
