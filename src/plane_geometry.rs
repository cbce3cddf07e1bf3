use serde::{Deserialize, Serialize};

/// Discrete sampling lattice on an image plane.
///
/// `ns`/`nt` are the sample counts along the fast (`s`) and slow (`t`)
/// axes, `ds`/`dt` their pitch in plane units, and `offset_s`/`offset_t`
/// a fractional-sample shift of the lattice origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneGeometry {
    pub ns: usize,
    pub nt: usize,
    pub ds: f64,
    pub dt: f64,
    pub offset_s: f64,
    pub offset_t: f64,
}

impl PlaneGeometry {
    /// Creates a geometry with zero fractional offset.
    pub fn new(ns: usize, nt: usize, ds: f64, dt: f64) -> Self {
        Self {
            ns,
            nt,
            ds,
            dt,
            offset_s: 0.,
            offset_t: 0.,
        }
    }

    pub fn with_offsets(self, offset_s: f64, offset_t: f64) -> Self {
        Self {
            offset_s,
            offset_t,
            ..self
        }
    }

    /// Continuous coordinate of the lattice centre along `s`.
    pub fn w_s(&self) -> f64 {
        (self.ns as f64 - 1.) / 2. + self.offset_s
    }

    /// Continuous coordinate of the lattice centre along `t`.
    pub fn w_t(&self) -> f64 {
        (self.nt as f64 - 1.) / 2. + self.offset_t
    }

    /// Number of samples in the plane (`ns * nt`).
    pub fn len(&self) -> usize {
        self.ns * self.nt
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Continuous `s` coordinate of sample index `i`.
    pub fn s_coord(&self, i: usize) -> f64 {
        (i as f64 - self.w_s()) * self.ds
    }

    /// Continuous `t` coordinate of sample index `j`.
    pub fn t_coord(&self, j: usize) -> f64 {
        (j as f64 - self.w_t()) * self.dt
    }
}
