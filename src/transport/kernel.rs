//! The separable two-pass resample kernel: per-axis tap window (the
//! Dirac rect, or the Pillbox trapezoid derived from §4.D's `M`/`h`
//! lixel widths) and the box-accumulation passes along `t` then `s`.
//!
//! This is the host-side reference realisation of the two named
//! kernels (`filter_t`, `filter_s`) the external interface in
//! [`crate::environment`] describes; a real accelerator backend would
//! compile and dispatch the same two kernels on a `ComputeDevice`
//! instead of running this code directly.

use crate::environment::{AxisWindow, TapShape};
use crate::PlaneGeometry;

fn tap_weight(x: f64, window: &AxisWindow, shape: &TapShape) -> f64 {
    let centred = x - window.tau_mid();
    match shape {
        TapShape::Dirac => {
            if centred.abs() <= window.tau_width() / 2. {
                1.
            } else {
                0.
            }
        }
        TapShape::Pillbox { m, h } => {
            let (w1, w2) = (2. * m.abs(), h.abs());
            let (wlo, whi) = if w1 < w2 { (w1, w2) } else { (w2, w1) };
            let half_base = whi / 2. + wlo / 2.;
            let half_top = (whi - wlo) / 2.;
            let d = centred.abs();
            if d >= half_base {
                0.
            } else if d <= half_top {
                wlo
            } else {
                wlo * (half_base - d) / (half_base - half_top)
            }
        }
    }
}

/// Pass 1: filters along `t`, producing `tmp[s_src, t_dst]` (row-major,
/// `t_dst` slow, `s_src` fast — extent `dst.nt x src.ns`). `s_src` is
/// preserved unchanged; `src` is the full `src.ns x src.nt` source image.
pub(crate) fn filter_t(
    src: &[f64],
    src_geom: &PlaneGeometry,
    dst_geom: &PlaneGeometry,
    window: &AxisWindow,
    shape: &TapShape,
    tmp: &mut [f64],
) {
    for t_dst in 0..dst_geom.nt {
        let t_dst_coord = dst_geom.t_coord(t_dst);
        for s_src in 0..src_geom.ns {
            let mut acc = 0.;
            for t_src in 0..src_geom.nt {
                let x = src_geom.t_coord(t_src) * window.coord_scale - t_dst_coord;
                let w = tap_weight(x, window, shape);
                if w != 0. {
                    acc += w * src[t_src * src_geom.ns + s_src];
                }
            }
            tmp[t_dst * src_geom.ns + s_src] = window.h * src_geom.dt * acc;
        }
    }
}

/// Pass 2: filters along `s`, producing `dst[s_dst, t_dst]` (row-major,
/// extent `dst.nt x dst.ns`) from `tmp[s_src, t_dst]`.
pub(crate) fn filter_s(
    tmp: &[f64],
    src_ns: usize,
    src_ds: f64,
    src_ws: f64,
    dst_geom: &PlaneGeometry,
    window: &AxisWindow,
    shape: &TapShape,
    dst: &mut [f64],
) {
    for t_dst in 0..dst_geom.nt {
        for s_dst in 0..dst_geom.ns {
            let s_dst_coord = (s_dst as f64 - dst_geom.w_s()) * dst_geom.ds;
            let mut acc = 0.;
            for s_src in 0..src_ns {
                let s_src_coord = (s_src as f64 - src_ws) * src_ds;
                let x = s_src_coord * window.coord_scale - s_dst_coord;
                let w = tap_weight(x, window, shape);
                if w != 0. {
                    acc += w * tmp[t_dst * src_ns + s_src];
                }
            }
            dst[t_dst * dst_geom.ns + s_dst] = window.h * src_ds * acc;
        }
    }
}
