#![deny(missing_docs)]

//! Move proposal and acceptance engine for Metropolis spin-lattice sampling.

/// Reference Metropolis chain driving the engine end to end.
pub mod chain;
/// YAML configuration schema and defaults.
pub mod config;
/// Deterministic seed derivation helpers.
pub mod determinism;
/// Before/after snapshots exchanged between propose and accept.
pub mod event;
/// Reference nearest-neighbour Heisenberg Hamiltonian.
pub mod hamiltonian;
/// Move kinds and the shared propose/accept interface.
pub mod moves;
/// Weighted move selection and the token-based accept protocol.
pub mod selector;
/// Uniform spin reorientation move.
pub mod spin_flip;

pub use chain::{run, Chain, ChainSummary, SweepStats};
pub use config::{HamiltonianConfig, InitialState, MoveWeights, RunConfig, SeedPolicy};
pub use event::{Event, SiteState};
pub use hamiltonian::HeisenbergHamiltonian;
pub use moves::{Move, MoveKind};
pub use selector::{CumulativeTable, MoveSelector, MoveToken, Proposal};
pub use spin_flip::SpinFlip;
