//! Closed-form phase-space cell ("lixel") volume, used as a normalisation
//! weight in the transport integral. One formula per `(basis,
//! parameterisation)` pair; exhaustively matched rather than dispatched on
//! an OR-ed flag (spec's `LFLixel_volume` switches on `type | coordinate`).

use crate::{AngularBasis, AngularPlane, Optics1D, Parameterisation, PlaneGeometry};

fn dirac_spatial(plane: &PlaneGeometry, angular: &AngularPlane, ox: &Optics1D, oy: &Optics1D) -> f64 {
    let vx = (angular.du / ox.pa).abs() * plane.ds;
    let vy = (angular.dv / oy.pa).abs() * plane.dt;
    vx * vy
}

fn dirac_angular(plane: &PlaneGeometry, angular: &AngularPlane, ox: &Optics1D, oy: &Optics1D) -> f64 {
    let vx = (angular.du / ox.aa).abs() * plane.ds;
    let vy = (angular.dv / oy.aa).abs() * plane.dt;
    vx * vy
}

/// The `(M, h)` pair from §4.D's Pillbox derivation for one axis. `p` is
/// `Ox.pa`/`Ox.aa` and `q` is `Ox.pp`/`Ox.ap` depending on
/// [`Parameterisation`]; shared by the lixel volume and by the
/// transport's Pillbox tap construction, which needs `M`/`h` individually
/// rather than their `4*M*h` product.
pub(crate) fn pillbox_m_h(du: f64, ds: f64, p: f64, q: f64) -> (f64, f64) {
    let m = (du / (2. * p.abs())).max(ds / 2. * (q / p).abs());
    let h = ds.min(du / q.abs());
    (m, h)
}

fn pillbox_axis(du: f64, ds: f64, p: f64, q: f64) -> f64 {
    let (m, h) = pillbox_m_h(du, ds, p, q);
    4. * m * h
}

fn pillbox_spatial(plane: &PlaneGeometry, angular: &AngularPlane, ox: &Optics1D, oy: &Optics1D) -> f64 {
    let x = pillbox_axis(angular.du, plane.ds, ox.pa, ox.pp);
    let y = pillbox_axis(angular.dv, plane.dt, oy.pa, oy.pp);
    x * y
}

/// `(M, h)` for the s-axis, matching the `p`/`q` convention
/// [`lixel_volume`] would use given the angular plane's parameterisation.
pub(crate) fn pillbox_s_widths(plane: &PlaneGeometry, angular: &AngularPlane, o_s: &Optics1D) -> (f64, f64) {
    match angular.parameterisation() {
        Parameterisation::Spatial => pillbox_m_h(angular.du, plane.ds, o_s.pa, o_s.pp),
        Parameterisation::Angular => pillbox_m_h(angular.du, plane.ds, o_s.aa, o_s.ap),
    }
}

/// `(M, h)` for the t-axis; see [`pillbox_s_widths`].
pub(crate) fn pillbox_t_widths(plane: &PlaneGeometry, angular: &AngularPlane, o_t: &Optics1D) -> (f64, f64) {
    match angular.parameterisation() {
        Parameterisation::Spatial => pillbox_m_h(angular.dv, plane.dt, o_t.pa, o_t.pp),
        Parameterisation::Angular => pillbox_m_h(angular.dv, plane.dt, o_t.aa, o_t.ap),
    }
}

fn pillbox_angular(plane: &PlaneGeometry, angular: &AngularPlane, ox: &Optics1D, oy: &Optics1D) -> f64 {
    let x = pillbox_axis(angular.du, plane.ds, ox.aa, ox.ap);
    let y = pillbox_axis(angular.dv, plane.dt, oy.aa, oy.ap);
    x * y
}

/// The phase-space cell volume for the configured `(basis,
/// parameterisation)` combination, or `NaN` if `angular` is still
/// [`AngularBasis::Uninit`].
pub fn lixel_volume(
    plane: &PlaneGeometry,
    angular: &AngularPlane,
    ox: &Optics1D,
    oy: &Optics1D,
) -> f64 {
    match (angular.basis(), angular.parameterisation()) {
        (AngularBasis::Dirac, Parameterisation::Spatial) => dirac_spatial(plane, angular, ox, oy),
        (AngularBasis::Dirac, Parameterisation::Angular) => dirac_angular(plane, angular, ox, oy),
        (AngularBasis::Pillbox, Parameterisation::Spatial) => {
            pillbox_spatial(plane, angular, ox, oy)
        }
        (AngularBasis::Pillbox, Parameterisation::Angular) => {
            pillbox_angular(plane, angular, ox, oy)
        }
        (AngularBasis::Uninit, _) => f64::NAN,
    }
}
