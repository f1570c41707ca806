#![deny(missing_docs)]
#![doc = "Core traits and lattice types for the Ember Metropolis move engine."]

pub mod errors;
pub mod lattice;
pub mod rng;

pub use errors::{EmberError, ErrorInfo};
pub use lattice::{
    uniform_on_sphere, BoxShape, Coord, LatticeDescriptor, LatticeType, Offset, Spin, SpinLattice,
    SIMPLE_CUBIC_NEIGHBOURS,
};
pub use rng::{derive_substream_seed, RngHandle};

/// Read/write access to a spin configuration addressed by lattice coordinate.
///
/// Implementations may assume coordinates are in bounds; the move engine only
/// hands out coordinates drawn inside the selector's box.
pub trait SpinField {
    /// Returns the spin stored at `coord`.
    fn spin(&self, coord: Coord) -> Spin;

    /// Overwrites the spin stored at `coord`.
    fn set_spin(&mut self, coord: Coord, spin: Spin);

    /// Returns the stable site index used to address per-site accumulators.
    fn site_index(&self, coord: Coord) -> usize;
}

/// Borrowed view of a Hamiltonian's energy bookkeeping for a single accept.
///
/// `dui` holds the self term at index 0 followed by one entry per offset in
/// `nbrlist`, valid only for the most recently evaluated event.
#[derive(Debug)]
pub struct LedgerMut<'a> {
    /// Neighbour offsets coupled to a site.
    pub nbrlist: &'a [Offset],
    /// Energy deltas of the pending proposal.
    pub dui: &'a [f64],
    /// Per-site energy accumulators indexed by site index.
    pub energy_i: &'a mut [f64],
    /// Total energy of the configuration.
    pub energy_total: &'a mut f64,
}

/// Capability required from a Hamiltonian by move accept functions.
pub trait EnergyLedger {
    /// Hands out exclusive access to the accumulators for one accept.
    fn ledger_mut(&mut self) -> LedgerMut<'_>;
}
