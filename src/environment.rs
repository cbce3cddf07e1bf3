//! The external compute-device boundary (spec §6): the two named kernels
//! `filter_t`/`filter_s` are owned by whatever device compiles and runs
//! them. GPU device lifecycle, kernel compilation/caching, and camera
//! geometry stay outside this crate's scope; this module only narrows
//! that boundary to a trait a caller can implement against a real
//! accelerator.

use crate::transport::kernel;
use crate::{PlaneGeometry, Result};

/// The per-axis window derived from the composed optics and the view's
/// `(u, v)` sample, per spec §4.E.2. Part of the [`ComputeDevice`]
/// boundary: an accelerator backend receives this instead of the
/// composed optics themselves.
#[derive(Debug, Clone, Copy)]
pub struct AxisWindow {
    pub coord_scale: f64,
    pub tau0: f64,
    pub tau1: f64,
    pub h: f64,
}

impl AxisWindow {
    pub fn tau_mid(&self) -> f64 {
        (self.tau0 + self.tau1) / 2.
    }

    pub fn tau_width(&self) -> f64 {
        self.tau1 - self.tau0
    }
}

/// The tap footprint used to weight each accepted source sample.
#[derive(Debug, Clone, Copy)]
pub enum TapShape {
    /// A unit-height rect of width `tau_width`.
    Dirac,
    /// The trapezoid obtained by convolving two rects of width `2*m` and
    /// `h` (§4.D's Pillbox `M`, `h`), peak height `min(2*m, h)`.
    Pillbox { m: f64, h: f64 },
}

/// A device capable of running the transport's two named kernels. The
/// reference implementation ([`HostDevice`]) runs them on the calling
/// thread; a GPU-backed implementation would instead compile and dispatch
/// them on a device context it owns.
pub trait ComputeDevice {
    #[doc(hidden)]
    fn filter_t(
        &self,
        src: &[f64],
        src_geom: &PlaneGeometry,
        dst_geom: &PlaneGeometry,
        window: &AxisWindow,
        shape: &TapShape,
        tmp: &mut [f64],
    ) -> Result<()>;

    #[doc(hidden)]
    #[allow(clippy::too_many_arguments)]
    fn filter_s(
        &self,
        tmp: &[f64],
        src_ns: usize,
        src_ds: f64,
        src_ws: f64,
        dst_geom: &PlaneGeometry,
        window: &AxisWindow,
        shape: &TapShape,
        dst: &mut [f64],
    ) -> Result<()>;
}

/// Runs both passes on the calling thread using plain `f64` slices. This
/// is the only [`ComputeDevice`] this crate ships; it exists so
/// [`Transport`](crate::Transport) has a device to call even when no
/// accelerator is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostDevice;

impl ComputeDevice for HostDevice {
    fn filter_t(
        &self,
        src: &[f64],
        src_geom: &PlaneGeometry,
        dst_geom: &PlaneGeometry,
        window: &AxisWindow,
        shape: &TapShape,
        tmp: &mut [f64],
    ) -> Result<()> {
        kernel::filter_t(src, src_geom, dst_geom, window, shape, tmp);
        Ok(())
    }

    fn filter_s(
        &self,
        tmp: &[f64],
        src_ns: usize,
        src_ds: f64,
        src_ws: f64,
        dst_geom: &PlaneGeometry,
        window: &AxisWindow,
        shape: &TapShape,
        dst: &mut [f64],
    ) -> Result<()> {
        kernel::filter_s(tmp, src_ns, src_ds, src_ws, dst_geom, window, shape, dst);
        Ok(())
    }
}

/// Owns the device a [`Transport`](crate::Transport) dispatches its
/// kernels to. Defaults to [`HostDevice`]; with the `gpu` feature enabled
/// a caller can supply its own [`ComputeDevice`] backed by a real
/// accelerator context instead.
pub struct Environment {
    device: Box<dyn ComputeDevice>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            device: Box::new(HostDevice),
        }
    }
}

impl Environment {
    pub fn new(device: impl ComputeDevice + 'static) -> Self {
        Self {
            device: Box::new(device),
        }
    }

    pub fn device(&self) -> &dyn ComputeDevice {
        self.device.as_ref()
    }
}
