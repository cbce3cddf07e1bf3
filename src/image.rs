//! Dense image buffers. Row-major with `t` as the slow axis and `s` as the
//! fast axis, matching [`PlaneGeometry`]'s coordinate convention.

use crate::{PlaneGeometry, Result, TransportError};

/// A dense, owned image sampled on a [`PlaneGeometry`] lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    geometry: PlaneGeometry,
    data: Vec<f64>,
}

impl Image {
    /// A zero-filled image on `geometry`.
    pub fn zeros(geometry: PlaneGeometry) -> Self {
        Self {
            geometry,
            data: vec![0.; geometry.len()],
        }
    }

    /// Wraps `data` as an image on `geometry`. Fails if the buffer length
    /// does not match `geometry.len()`.
    pub fn from_vec(geometry: PlaneGeometry, data: Vec<f64>) -> Result<Self> {
        if data.len() != geometry.len() {
            return Err(TransportError::ProgrammingError(format!(
                "buffer has {} samples, geometry expects {}",
                data.len(),
                geometry.len()
            )));
        }
        Ok(Self { geometry, data })
    }

    pub fn geometry(&self) -> PlaneGeometry {
        self.geometry
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Sample at row-major index `(s, t)`.
    pub fn get(&self, s: usize, t: usize) -> f64 {
        self.data[t * self.geometry.ns + s]
    }

    pub fn set(&mut self, s: usize, t: usize, value: f64) {
        self.data[t * self.geometry.ns + s] = value;
    }
}
