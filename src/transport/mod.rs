//! Binds a source plane, a destination plane, an angular plane, and the
//! four 1-D optics relating each image plane to a shared root frame; for
//! each view produces per-axis kernel parameters and dispatches the
//! two-pass separable resample.

pub(crate) mod kernel;

use crate::environment::{AxisWindow, TapShape};
use crate::{AngularBasis, AngularPlane, Optics1D, Parameterisation, PlaneGeometry, Result, TransportError};
use kernel::{filter_s, filter_t};

/// `Transport`'s lifecycle state. Construction always yields
/// [`TransportState::Configured`] — Rust's ownership model makes the
/// C reference's `Uninitialised` state unreachable through the type
/// system, so only the explicit-teardown half of spec's state machine
/// needs representing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Configured,
    Destroyed,
}

/// Binds borrowed plane/optics/angular-plane references and owns the
/// precomputed source-to-destination and destination-to-source composed
/// optics. Borrowed inputs must outlive the `Transport`; the borrow
/// checker enforces this statically instead of the reference
/// implementation's runtime discipline.
pub struct Transport<'a> {
    src_plane: &'a PlaneGeometry,
    dst_plane: &'a PlaneGeometry,
    angular: &'a AngularPlane,
    src_to_root_s: &'a Optics1D,
    src_to_root_t: &'a Optics1D,
    dst_to_root_s: &'a Optics1D,
    dst_to_root_t: &'a Optics1D,
    src_to_dst_s: Optics1D,
    src_to_dst_t: Optics1D,
    dst_to_src_s: Optics1D,
    dst_to_src_t: Optics1D,
    scale: f64,
    state: TransportState,
}

impl<'a> Transport<'a> {
    /// Precomputes `src_to_dst_{s,t} = (dst_to_root)^-1 . src_to_root` and
    /// its inverse `dst_to_src_{s,t}` for each axis.
    pub fn new(
        src_plane: &'a PlaneGeometry,
        dst_plane: &'a PlaneGeometry,
        angular: &'a AngularPlane,
        src_to_root_s: &'a Optics1D,
        src_to_root_t: &'a Optics1D,
        dst_to_root_s: &'a Optics1D,
        dst_to_root_t: &'a Optics1D,
    ) -> Result<Self> {
        let src_to_dst_s = dst_to_root_s.invert()?.compose(src_to_root_s);
        let src_to_dst_t = dst_to_root_t.invert()?.compose(src_to_root_t);
        let dst_to_src_s = src_to_root_s.invert()?.compose(dst_to_root_s);
        let dst_to_src_t = src_to_root_t.invert()?.compose(dst_to_root_t);
        Ok(Self {
            src_plane,
            dst_plane,
            angular,
            src_to_root_s,
            src_to_root_t,
            dst_to_root_s,
            dst_to_root_t,
            src_to_dst_s,
            src_to_dst_t,
            dst_to_src_s,
            dst_to_src_t,
            scale: 1.,
            state: TransportState::Configured,
        })
    }

    /// Sets the global amplitude multiplier applied to every computed
    /// sample. Defaults to `1.0`.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    /// Size the scratch buffer passed to [`Transport::forw_view`] /
    /// [`Transport::back_view`] must have: `dst_nt * src_ns`.
    pub fn tmp_size(&self) -> usize {
        self.dst_plane.nt * self.src_plane.ns
    }

    /// Recomputes `src_to_dst_{s,t}`/`dst_to_src_{s,t}` from the current
    /// borrowed inputs. Calling this twice with unchanged inputs yields
    /// bitwise-equal results (setup idempotence, spec §8).
    pub fn resetup(&mut self) -> Result<()> {
        self.src_to_dst_s = self.dst_to_root_s.invert()?.compose(self.src_to_root_s);
        self.src_to_dst_t = self.dst_to_root_t.invert()?.compose(self.src_to_root_t);
        self.dst_to_src_s = self.src_to_root_s.invert()?.compose(self.dst_to_root_s);
        self.dst_to_src_t = self.src_to_root_t.invert()?.compose(self.dst_to_root_t);
        Ok(())
    }

    /// Tears the transport down: no further view may be computed. No
    /// state outlives this call.
    pub fn destroy(&mut self) {
        self.state = TransportState::Destroyed;
    }

    fn check_configured(&self) -> Result<()> {
        match self.state {
            TransportState::Configured => Ok(()),
            TransportState::Destroyed => Err(TransportError::InvariantViolation(
                "transport has been destroyed".to_string(),
            )),
        }
    }

    fn check_view_index(&self, i: usize) -> Result<()> {
        if i >= self.angular.num_points() {
            return Err(TransportError::ProgrammingError(format!(
                "view index {i} out of range (0..{})",
                self.angular.num_points()
            )));
        }
        Ok(())
    }

    /// Computes forward view `i`: resamples `src` (on the source
    /// geometry) into `dst` (on the destination geometry), using `tmp`
    /// (at least [`Transport::tmp_size`] samples) as scratch.
    pub fn forw_view(&self, i: usize, src: &[f64], dst: &mut [f64], tmp: &mut [f64]) -> Result<()> {
        self.compute(
            i,
            src,
            dst,
            tmp,
            self.src_plane,
            self.dst_plane,
            self.src_to_root_s,
            self.src_to_root_t,
            &self.src_to_dst_s,
            &self.src_to_dst_t,
            self.dst_to_root_s,
            self.dst_to_root_t,
        )
    }

    /// Computes backward view `i`: the adjoint operator, resampling
    /// `dst` back onto `src`, using the `dst_to_src` optics.
    pub fn back_view(&self, i: usize, dst: &[f64], src: &mut [f64], tmp: &mut [f64]) -> Result<()> {
        self.compute(
            i,
            dst,
            src,
            tmp,
            self.dst_plane,
            self.src_plane,
            self.dst_to_root_s,
            self.dst_to_root_t,
            &self.dst_to_src_s,
            &self.dst_to_src_t,
            self.src_to_root_s,
            self.src_to_root_t,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn compute(
        &self,
        i: usize,
        input: &[f64],
        output: &mut [f64],
        tmp: &mut [f64],
        in_plane: &PlaneGeometry,
        out_plane: &PlaneGeometry,
        rp_s: &Optics1D,
        rp_t: &Optics1D,
        rprime_s: &Optics1D,
        rprime_t: &Optics1D,
        rq_s: &Optics1D,
        rq_t: &Optics1D,
    ) -> Result<()> {
        self.check_configured()?;
        self.check_view_index(i)?;
        if self.angular.basis() == AngularBasis::Uninit {
            return Err(TransportError::InvariantViolation(
                "angular plane is uninitialised".to_string(),
            ));
        }
        if input.len() != in_plane.len() {
            return Err(TransportError::ProgrammingError(format!(
                "input buffer has {} samples, expected {}",
                input.len(),
                in_plane.len()
            )));
        }
        if output.len() != out_plane.len() {
            return Err(TransportError::ProgrammingError(format!(
                "output buffer has {} samples, expected {}",
                output.len(),
                out_plane.len()
            )));
        }
        let required_tmp = out_plane.nt * in_plane.ns;
        if tmp.len() < required_tmp {
            return Err(TransportError::ProgrammingError(format!(
                "scratch buffer has {} samples, need at least {required_tmp}",
                tmp.len()
            )));
        }

        let u = self.angular.u()[i];
        let v = self.angular.v()[i];
        let weight = self.angular.w()[i];
        let param = self.angular.parameterisation();

        let (alpha_s, beta_s) = axis_alpha_beta(rp_s, rprime_s, u, param);
        let (alpha_t, beta_t) = axis_alpha_beta(rp_t, rprime_t, v, param);
        let h_s = axis_h(rq_s, self.angular.du, out_plane.ds, param);
        let h_t = axis_h(rq_t, self.angular.dv, out_plane.dt, param);

        let window_t = axis_window(alpha_t, beta_t, out_plane.dt, h_t)?;
        let window_s = axis_window(alpha_s, beta_s, out_plane.ds, h_s)?;

        let shape_t = tap_shape(self.angular, out_plane, rq_s, rq_t, false);
        let shape_s = tap_shape(self.angular, out_plane, rq_s, rq_t, true);

        filter_t(input, in_plane, out_plane, &window_t, &shape_t, &mut tmp[..required_tmp]);
        filter_s(
            &tmp[..required_tmp],
            in_plane.ns,
            in_plane.ds,
            in_plane.w_s(),
            out_plane,
            &window_s,
            &shape_s,
            output,
        );

        // `weight` is the view's own integration weight (spec §3's `w[i]`);
        // `self.scale` is the transport-wide amplitude multiplier. Both
        // apply symmetrically to `forw_view`/`back_view` for the same view
        // index, so the adjoint property (spec §4.E.5) is unaffected.
        let total_scale = self.scale * weight;
        if total_scale != 1. {
            output.iter_mut().for_each(|x| *x *= total_scale);
        }
        Ok(())
    }
}

/// §4.E.2's `(alpha, beta)` derivation for one axis.
///
/// `rp.pa` (or `rp.aa` under [`Parameterisation::Angular`]) is zero exactly
/// when the source/destination plane coincides with the root frame: its
/// position there is independent of view angle, so the correction term's
/// `0/0` limit is the uncorrected direct map (`alpha = rprime.pp`, `beta =
/// 0`) rather than an ill-posed view. Spec §8 scenario 7 exercises this
/// directly — all four optics identity has `rp.pa == 0` on every axis — and
/// requires a successful sample-for-sample round trip, not a failure.
fn axis_alpha_beta(rp: &Optics1D, rprime: &Optics1D, coord: f64, param: Parameterisation) -> (f64, f64) {
    match param {
        Parameterisation::Spatial => {
            if rp.pa == 0. {
                (rprime.pp, 0.)
            } else {
                (
                    rprime.pp - rp.pp * rprime.pa / rp.pa,
                    rprime.pa * (coord - rp.cp) / rp.pa,
                )
            }
        }
        Parameterisation::Angular => {
            if rp.aa == 0. {
                (rprime.pp, 0.)
            } else {
                (
                    rprime.pp - rp.ap * rprime.pa / rp.aa,
                    rprime.pa * (coord - rp.ca) / rp.aa,
                )
            }
        }
    }
}

/// §4.E.2's `h` derivation for one axis: the kernel amplitude, unit-
/// normalised energy per reference angular cell. In the non-degenerate
/// case this is exactly the Dirac lixel volume's per-axis factor (§4.D)
/// divided by the plane pitch — the two-pass kernel multiplies `h` back by
/// the source pitch (see `kernel::filter_t`/`filter_s`), reconstituting
/// that volume as the per-sample normalisation weight.
///
/// `rq.pa`/`rq.aa` being zero is the destination-at-root counterpart of
/// [`axis_alpha_beta`]'s degenerate case: the angular aperture at the
/// destination collapses onto a single point regardless of view angle, so
/// the raw `|d / 0|` formula's divergence is resolved to the limit that
/// keeps an aligned single-tap window at unit gain (`h = 1 / d_dst`),
/// which is what spec §8 scenario 7's all-identity round trip requires.
fn axis_h(rq: &Optics1D, d: f64, d_dst: f64, param: Parameterisation) -> f64 {
    let divisor = match param {
        Parameterisation::Spatial => rq.pa,
        Parameterisation::Angular => rq.aa,
    };
    if divisor == 0. {
        1. / d_dst
    } else {
        (d / divisor).abs()
    }
}

fn axis_window(alpha: f64, beta: f64, d_dst: f64, h: f64) -> Result<AxisWindow> {
    if alpha == 0. {
        return Err(TransportError::DegenerateOptics(
            "view is ill-posed: per-axis coordinate scale alpha is zero".to_string(),
        ));
    }
    let raw0 = d_dst / 2. - beta;
    let raw1 = -d_dst / 2. - beta;
    let (tau0, tau1) = if raw0 <= raw1 { (raw0, raw1) } else { (raw1, raw0) };
    Ok(AxisWindow {
        coord_scale: 1. / alpha,
        tau0,
        tau1,
        h,
    })
}

fn tap_shape(
    angular: &AngularPlane,
    plane: &PlaneGeometry,
    rq_s: &Optics1D,
    rq_t: &Optics1D,
    along_s: bool,
) -> TapShape {
    match angular.basis() {
        AngularBasis::Pillbox => {
            let (m, h) = if along_s {
                crate::lixel::pillbox_s_widths(plane, angular, rq_s)
            } else {
                crate::lixel::pillbox_t_widths(plane, angular, rq_t)
            };
            TapShape::Pillbox { m, h }
        }
        _ => TapShape::Dirac,
    }
}
