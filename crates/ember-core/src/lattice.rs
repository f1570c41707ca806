//! Lattice primitives: coordinates, periodic boxes and the reference spin lattice.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::errors::{EmberError, ErrorInfo};
use crate::rng::RngHandle;
use crate::SpinField;

/// Integer lattice coordinate `(ix, iy, iz)`.
pub type Coord = [usize; 3];

/// Relative neighbour offset, possibly negative.
pub type Offset = [i64; 3];

/// Classical spin orientation on the unit sphere.
pub type Spin = [f64; 3];

/// Nearest-neighbour offsets of the simple-cubic lattice.
pub const SIMPLE_CUBIC_NEIGHBOURS: [Offset; 6] = [
    [1, 0, 0],
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
];

/// Lattice-type tag declared by a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LatticeType {
    /// Simple cubic, three dimensions.
    #[serde(rename = "SC_n3")]
    SimpleCubic,
    /// Body-centred cubic, three dimensions.
    #[serde(rename = "BCC_n3")]
    BodyCentredCubic,
    /// Face-centred cubic, three dimensions.
    #[serde(rename = "FCC_n3")]
    FaceCentredCubic,
    /// Square lattice, two dimensions.
    #[serde(rename = "SQ_n2")]
    Square,
}

impl LatticeType {
    /// Returns the serialized tag of the lattice type.
    pub fn as_str(&self) -> &'static str {
        match self {
            LatticeType::SimpleCubic => "SC_n3",
            LatticeType::BodyCentredCubic => "BCC_n3",
            LatticeType::FaceCentredCubic => "FCC_n3",
            LatticeType::Square => "SQ_n2",
        }
    }
}

/// Axis-aligned periodic box with positive integer extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BoxShape([usize; 3]);

impl BoxShape {
    /// Creates a box, rejecting zero extents and boxes whose site count or
    /// extents do not fit the signed offset arithmetic used by [`Self::wrap`].
    pub fn new(extents: [usize; 3]) -> Result<Self, EmberError> {
        if extents.iter().any(|&extent| extent == 0) {
            return Err(EmberError::InvalidHamiltonianShape(
                ErrorInfo::new("invalid-box", "box extents must be positive")
                    .with_context("extents", format!("{extents:?}")),
            ));
        }
        let sites = extents
            .iter()
            .try_fold(1usize, |acc, &extent| acc.checked_mul(extent))
            .filter(|&sites| i64::try_from(sites).is_ok());
        if sites.is_none() {
            return Err(EmberError::InvalidHamiltonianShape(
                ErrorInfo::new("invalid-box", "box site count overflows")
                    .with_context("extents", format!("{extents:?}")),
            ));
        }
        Ok(Self(extents))
    }

    /// Returns the per-axis extents.
    pub fn extents(&self) -> [usize; 3] {
        self.0
    }

    /// Total number of lattice sites.
    pub fn sites(&self) -> usize {
        self.0.iter().product()
    }

    /// Whether `coord` lies inside `[0, extent)` on every axis.
    pub fn contains(&self, coord: Coord) -> bool {
        coord.iter().zip(self.0.iter()).all(|(c, e)| c < e)
    }

    /// Applies `offset` to `coord` and wraps the result back into the box.
    pub fn wrap(&self, coord: Coord, offset: Offset) -> Coord {
        let mut wrapped = [0usize; 3];
        for axis in 0..3 {
            let extent = self.0[axis] as i64;
            wrapped[axis] = (coord[axis] as i64 + offset[axis]).rem_euclid(extent) as usize;
        }
        wrapped
    }

    /// Row-major linear index of an in-bounds coordinate.
    pub fn linear_index(&self, coord: Coord) -> usize {
        (coord[0] * self.0[1] + coord[1]) * self.0[2] + coord[2]
    }

    /// Iterates over all coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let [nx, ny, nz] = self.0;
        (0..nx).flat_map(move |ix| {
            (0..ny).flat_map(move |iy| (0..nz).map(move |iz| [ix, iy, iz]))
        })
    }
}

/// Largest distance from a whole number accepted for a box diagonal entry.
pub const EXTENT_TOLERANCE: f64 = 1e-9;

/// Construction-time description of a lattice configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeDescriptor {
    /// Declared lattice type.
    pub latt_type: LatticeType,
    /// Box matrix; only the diagonal is used.
    #[serde(rename = "box")]
    pub box_matrix: [[f64; 3]; 3],
}

impl LatticeDescriptor {
    /// Builds a descriptor with a diagonal box of the given extents.
    pub fn diagonal(latt_type: LatticeType, extents: [usize; 3]) -> Self {
        let mut box_matrix = [[0.0; 3]; 3];
        for axis in 0..3 {
            box_matrix[axis][axis] = extents[axis] as f64;
        }
        Self {
            latt_type,
            box_matrix,
        }
    }

    /// Derives the integer box extents from the diagonal of the box matrix.
    ///
    /// Each diagonal entry must be a positive whole number of cells, up to a
    /// rounding slack of [`EXTENT_TOLERANCE`].
    pub fn box_shape(&self) -> Result<BoxShape, EmberError> {
        let mut extents = [0usize; 3];
        for axis in 0..3 {
            let value = self.box_matrix[axis][axis];
            let rounded = value.round();
            let valid = value.is_finite()
                && rounded >= 1.0
                && rounded < i64::MAX as f64
                && (value - rounded).abs() <= EXTENT_TOLERANCE;
            if !valid {
                return Err(EmberError::InvalidHamiltonianShape(
                    ErrorInfo::new("invalid-box", "box diagonal must be a positive whole number")
                        .with_context("axis", axis.to_string())
                        .with_context("value", value.to_string()),
                ));
            }
            extents[axis] = rounded as usize;
        }
        BoxShape::new(extents)
    }
}

/// Draws a spin uniformly distributed on the unit sphere.
///
/// Uses the area-preserving parametrisation: `sz` uniform in `[-1, 1]` and an
/// independent azimuth uniform in `[0, 2π)`.
pub fn uniform_on_sphere(rng: &mut RngHandle) -> Spin {
    let sz = 2.0 * rng.unit() - 1.0;
    let st = (1.0 - sz * sz).max(0.0).sqrt();
    let phi = 2.0 * PI * rng.unit();
    [st * phi.sin(), st * phi.cos(), sz]
}

/// Dense spin configuration on a periodic box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpinLattice {
    shape: BoxShape,
    spins: Vec<Spin>,
    site_indices: Vec<usize>,
}

impl SpinLattice {
    /// Creates a fully polarised lattice with every spin along `+z`.
    pub fn new(shape: BoxShape) -> Self {
        let sites = shape.sites();
        Self {
            shape,
            spins: vec![[0.0, 0.0, 1.0]; sites],
            site_indices: (0..sites).collect(),
        }
    }

    /// Creates a lattice with independent uniformly random spins.
    pub fn random(shape: BoxShape, rng: &mut RngHandle) -> Self {
        let mut lattice = Self::new(shape);
        for spin in lattice.spins.iter_mut() {
            *spin = uniform_on_sphere(rng);
        }
        lattice
    }

    /// Installs a custom site-index map, stored in row-major coordinate order.
    pub fn with_site_indices(mut self, site_indices: Vec<usize>) -> Result<Self, EmberError> {
        if site_indices.len() != self.shape.sites() {
            return Err(EmberError::InvalidHamiltonianShape(
                ErrorInfo::new("site-map-length", "site index map does not cover the box")
                    .with_context("expected", self.shape.sites().to_string())
                    .with_context("actual", site_indices.len().to_string()),
            ));
        }
        self.site_indices = site_indices;
        Ok(self)
    }

    /// Returns the periodic box of the lattice.
    pub fn shape(&self) -> BoxShape {
        self.shape
    }

    /// Number of sites.
    pub fn len(&self) -> usize {
        self.spins.len()
    }

    /// Whether the lattice has no sites. Always false for a valid box.
    pub fn is_empty(&self) -> bool {
        self.spins.is_empty()
    }

    /// Mean spin vector over all sites.
    pub fn magnetisation(&self) -> Spin {
        let mut total = [0.0; 3];
        for spin in &self.spins {
            for axis in 0..3 {
                total[axis] += spin[axis];
            }
        }
        let n = self.spins.len().max(1) as f64;
        total.map(|component| component / n)
    }
}

impl SpinField for SpinLattice {
    fn spin(&self, coord: Coord) -> Spin {
        debug_assert!(self.shape.contains(coord), "coordinate outside the box");
        self.spins[self.shape.linear_index(coord)]
    }

    fn set_spin(&mut self, coord: Coord, spin: Spin) {
        debug_assert!(self.shape.contains(coord), "coordinate outside the box");
        let idx = self.shape.linear_index(coord);
        self.spins[idx] = spin;
    }

    fn site_index(&self, coord: Coord) -> usize {
        debug_assert!(self.shape.contains(coord), "coordinate outside the box");
        self.site_indices[self.shape.linear_index(coord)]
    }
}
