//! The angular sampling plane: a finite set of view directions with
//! integration weights, tagged by basis and parameterisation.

use serde::{Deserialize, Serialize};

use crate::{Result, TransportError};

/// The assumed sample footprint in the phase-space cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngularBasis {
    /// No basis has been configured yet.
    Uninit,
    /// Point-like sample footprint.
    Dirac,
    /// Square-support sample footprint.
    Pillbox,
}

/// Whether the angular plane's coordinates index position or angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parameterisation {
    Spatial,
    Angular,
}

/// A finite set of sampled view directions `{(u_i, v_i, w_i)}`.
///
/// Owns its point arrays: [`AngularPlane::setup`] deep-copies the caller's
/// slices, releasing any previously-owned arrays first. The plane starts
/// (and [`AngularPlane::reset`] returns it to) the `Uninit` state, in
/// which `u`, `v`, `w` are empty and `basis` is [`AngularBasis::Uninit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngularPlane {
    pub du: f64,
    pub dv: f64,
    basis: AngularBasis,
    parameterisation: Parameterisation,
    u: Vec<f64>,
    v: Vec<f64>,
    w: Vec<f64>,
}

impl Default for AngularPlane {
    fn default() -> Self {
        Self {
            du: f64::NAN,
            dv: f64::NAN,
            basis: AngularBasis::Uninit,
            parameterisation: Parameterisation::Spatial,
            u: Vec::new(),
            v: Vec::new(),
            w: Vec::new(),
        }
    }
}

impl AngularPlane {
    pub fn basis(&self) -> AngularBasis {
        self.basis
    }

    pub fn parameterisation(&self) -> Parameterisation {
        self.parameterisation
    }

    pub fn num_points(&self) -> usize {
        self.u.len()
    }

    pub fn u(&self) -> &[f64] {
        &self.u
    }

    pub fn v(&self) -> &[f64] {
        &self.v
    }

    pub fn w(&self) -> &[f64] {
        &self.w
    }

    /// Deep-copies `u`, `v`, `w` (which must have equal, non-zero length)
    /// and configures `du`, `dv`, the basis, and the parameterisation.
    /// Any previously-owned arrays are released before the new ones are
    /// stored. On failure the plane is left in a safely-destructible
    /// state (still usable, previous data discarded).
    pub fn setup(
        &mut self,
        du: f64,
        dv: f64,
        basis: AngularBasis,
        parameterisation: Parameterisation,
        u: &[f64],
        v: &[f64],
        w: &[f64],
    ) -> Result<()> {
        if u.len() != v.len() || u.len() != w.len() {
            self.reset();
            return Err(TransportError::InvariantViolation(
                "angular plane u/v/w arrays must have equal length".to_string(),
            ));
        }
        if u.is_empty() {
            self.reset();
            return Err(TransportError::InvariantViolation(
                "angular plane must have at least one point".to_string(),
            ));
        }
        self.du = du;
        self.dv = dv;
        self.basis = basis;
        self.parameterisation = parameterisation;
        self.u = u.to_vec();
        self.v = v.to_vec();
        self.w = w.to_vec();
        Ok(())
    }

    /// Releases owned arrays and resets the basis to `Uninit`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
