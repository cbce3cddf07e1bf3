//! # Light-field transport engine
//!
//! Resamples a four-dimensional light field — a plenoptic function
//! discretised on a source image plane, a destination image plane, and a
//! shared angular sampling plane — from one optical configuration to
//! another. The hard core is the affine optics algebra ([`optics`]), the
//! view-indexed separable resampling kernel ([`transport`]), and the
//! lixel-volume calculus ([`lixel`]) used to normalise the integral.
//!
//! # Example
//! ```
//! use lightfield_transport::{
//!     AngularBasis, AngularPlane, Optics1D, Parameterisation, PlaneGeometry, Transport,
//! };
//!
//! let geom = PlaneGeometry::new(8, 8, 0.1, 0.1);
//! let identity = Optics1D::identity();
//! let mut angular = AngularPlane::default();
//! angular
//!     .setup(0.05, 0.05, AngularBasis::Dirac, Parameterisation::Spatial, &[0.], &[0.], &[1.])
//!     .unwrap();
//!
//! let transport = Transport::new(
//!     &geom, &geom, &angular, &identity, &identity, &identity, &identity,
//! )
//! .unwrap();
//! let src = vec![0f64; geom.len()];
//! let mut dst = vec![0f64; geom.len()];
//! let mut tmp = vec![0f64; transport.tmp_size()];
//! transport.forw_view(0, &src, &mut dst, &mut tmp).unwrap();
//! ```

mod angular_plane;
mod environment;
mod image;
mod lixel;
mod optics;
mod plane_geometry;
mod transport;

pub use angular_plane::{AngularBasis, AngularPlane, Parameterisation};
pub use environment::{AxisWindow, ComputeDevice, Environment, HostDevice, TapShape};
pub use image::Image;
pub use lixel::lixel_volume;
pub use optics::{Optics1D, Optics2D};
pub use plane_geometry::PlaneGeometry;
pub use transport::{Transport, TransportState};

use std::{
    env,
    fs::File,
    marker::PhantomData,
    path::{Path, PathBuf},
};
use serde::{de::DeserializeOwned, Serialize};

/// Errors returned by every operation in this crate. No operation unwinds;
/// all failures are reported through this enum and leave the receiver in
/// its pre-call state, except [`AngularPlane::setup`] which always leaves
/// the plane destructible.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// A required invariant was violated: a null/empty input, an
    /// uninitialised transport, or an angular plane still tagged
    /// [`AngularBasis::Uninit`] at compute time.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    /// The optics are numerically degenerate: a singular matrix at
    /// inversion time, or a zero divisor while deriving per-view
    /// parameters.
    #[error("degenerate optics: {0}")]
    DegenerateOptics(String),
    /// Allocation or device-submission failure.
    #[error("resource failure: {0}")]
    Resource(String),
    /// An out-of-range view index or undersized buffer.
    #[error("programming error: {0}")]
    ProgrammingError(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Checkpointing a configuration value into a [bincode] file, the way the
/// teacher crate dumps/loads `OpticalSensitivities`.
pub trait Bin: Sized {
    fn dump<P: AsRef<Path>>(&self, path: P) -> Result<()>;
    fn load<P: AsRef<Path>>(path: P) -> Result<Self>;
}

impl<T: Serialize + DeserializeOwned> Bin for T {
    fn dump<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)
            .map_err(|e| TransportError::Resource(format!("create checkpoint file: {e}")))?;
        bincode::serialize_into(file, self)
            .map_err(|e| TransportError::Resource(format!("serialize checkpoint: {e}")))
    }

    fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| TransportError::Resource(format!("open checkpoint file: {e}")))?;
        bincode::deserialize_from(file)
            .map_err(|e| TransportError::Resource(format!("deserialize checkpoint: {e}")))
    }
}

/// A configuration loader: resolves a directory (from the
/// `LIGHTFIELD_TRANSPORT_HOME` environment variable, falling back to the
/// current directory) and a file name, then loads a [Bin] checkpoint from
/// the joined path. Mirrors the teacher crate's `Loader<T>`.
pub struct Loader<T> {
    path: PathBuf,
    filename: String,
    phantom: PhantomData<T>,
}

/// [Loader] loading interface, one impl per loadable type.
pub trait LoaderTrait<T> {
    fn load(self) -> Result<T>;
}

impl<T> Loader<T> {
    /// Overrides the loading directory.
    pub fn path<P: AsRef<Path>>(self, path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..self
        }
    }

    /// Overrides the loaded file name.
    pub fn filename(self, filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            ..self
        }
    }
}

impl Default for Loader<PlaneGeometry> {
    /// Default loader for [PlaneGeometry], expecting `plane_geometry.bin`
    /// under `$LIGHTFIELD_TRANSPORT_HOME` (or the current directory).
    fn default() -> Self {
        let path = env::var("LIGHTFIELD_TRANSPORT_HOME").unwrap_or_else(|_| ".".to_string());
        Self {
            path: Path::new(&path).to_path_buf(),
            filename: "plane_geometry.bin".to_string(),
            phantom: PhantomData,
        }
    }
}

impl LoaderTrait<PlaneGeometry> for Loader<PlaneGeometry> {
    fn load(self) -> Result<PlaneGeometry> {
        log::debug!("loading plane geometry from {:?}", self.path.join(&self.filename));
        PlaneGeometry::load(self.path.join(self.filename))
    }
}

impl Default for Loader<AngularPlane> {
    /// Default loader for [AngularPlane], expecting `angular_plane.bin`
    /// under `$LIGHTFIELD_TRANSPORT_HOME` (or the current directory).
    fn default() -> Self {
        let path = env::var("LIGHTFIELD_TRANSPORT_HOME").unwrap_or_else(|_| ".".to_string());
        Self {
            path: Path::new(&path).to_path_buf(),
            filename: "angular_plane.bin".to_string(),
            phantom: PhantomData,
        }
    }
}

impl LoaderTrait<AngularPlane> for Loader<AngularPlane> {
    fn load(self) -> Result<AngularPlane> {
        log::debug!("loading angular plane from {:?}", self.path.join(&self.filename));
        AngularPlane::load(self.path.join(self.filename))
    }
}
