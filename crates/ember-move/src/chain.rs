use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use ember_core::errors::ErrorInfo;
use ember_core::{EmberError, RngHandle, Spin, SpinLattice};
use serde::{Deserialize, Serialize};

use crate::config::{InitialState, RunConfig};
use crate::determinism;
use crate::hamiltonian::HeisenbergHamiltonian;
use crate::moves::MoveKind;
use crate::selector::MoveSelector;

/// Counters for a single sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepStats {
    /// Zero-based sweep index.
    pub sweep: usize,
    /// Proposals issued during the sweep.
    pub proposed: usize,
    /// Proposals that passed the Boltzmann test.
    pub accepted: usize,
    /// Tracked total energy at the end of the sweep.
    pub energy_total: f64,
}

/// Summary returned to callers after a run completes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChainSummary {
    /// Sweeps executed.
    pub sweeps: usize,
    /// Total proposals issued.
    pub proposals: usize,
    /// Total proposals accepted.
    pub accepted: usize,
    /// Acceptance rate per move identifier.
    pub acceptance_rates: BTreeMap<String, f64>,
    /// Incrementally tracked total energy.
    pub energy_total: f64,
    /// Total energy divided by the number of sites.
    pub energy_per_site: f64,
    /// Mean spin vector of the final configuration.
    pub magnetisation: Spin,
    /// Master seed the chain was driven with.
    pub master_seed: u64,
    /// Optional seed label captured from the configuration.
    pub seed_label: Option<String>,
}

impl ChainSummary {
    /// Writes the summary to a JSON file.
    pub fn write(&self, path: &Path) -> Result<(), EmberError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                EmberError::Io(
                    ErrorInfo::new("summary-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            EmberError::Config(
                ErrorInfo::new("summary-serialize", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        fs::write(path, json).map_err(|err| {
            EmberError::Io(
                ErrorInfo::new("summary-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}

/// Single Metropolis chain over the reference lattice and Hamiltonian.
#[derive(Debug)]
pub struct Chain {
    beta: f64,
    master_seed: u64,
    seed_label: Option<String>,
    total_sweeps: usize,
    sweeps_done: usize,
    selector: MoveSelector,
    lattice: SpinLattice,
    hamiltonian: HeisenbergHamiltonian,
    proposed: BTreeMap<MoveKind, usize>,
    accepted: BTreeMap<MoveKind, usize>,
}

impl Chain {
    /// Builds the selector, initial spin field and energy ledger from `config`.
    pub fn new(config: &RunConfig) -> Result<Self, EmberError> {
        config.validate()?;
        let selector = MoveSelector::new(&config.moves, &config.lattice)?;
        let shape = selector.shape();
        let master_seed = config.seed_policy.master_seed;
        let lattice = match config.initial_state {
            InitialState::Random => {
                let mut rng = RngHandle::from_seed(determinism::lattice_seed(master_seed));
                SpinLattice::random(shape, &mut rng)
            }
            InitialState::Polarised => SpinLattice::new(shape),
        };
        let mut hamiltonian = HeisenbergHamiltonian::new(&config.hamiltonian, shape)?;
        hamiltonian.initialise(&lattice)?;
        Ok(Self {
            beta: config.beta,
            master_seed,
            seed_label: config.seed_policy.label.clone(),
            total_sweeps: config.sweeps,
            sweeps_done: 0,
            selector,
            lattice,
            hamiltonian,
            proposed: BTreeMap::new(),
            accepted: BTreeMap::new(),
        })
    }

    /// Performs one sweep: one proposal per lattice site.
    pub fn sweep(&mut self) -> Result<SweepStats, EmberError> {
        let sweep = self.sweeps_done;
        let mut rng = RngHandle::from_seed(determinism::sweep_seed(self.master_seed, sweep));
        let mut accepted = 0usize;
        let proposals = self.lattice.len();
        for _ in 0..proposals {
            let proposal = self.selector.propose(&self.lattice, &mut rng);
            let delta = self.hamiltonian.evaluate(&self.lattice, &proposal.event);
            let acceptance = (-self.beta * delta).exp().min(1.0);
            let kind = proposal.token.kind();
            *self.proposed.entry(kind).or_insert(0) += 1;
            if rng.unit() < acceptance {
                self.selector.accept(
                    proposal.token,
                    &mut self.lattice,
                    &proposal.event,
                    &mut self.hamiltonian,
                )?;
                *self.accepted.entry(kind).or_insert(0) += 1;
                accepted += 1;
            } else {
                self.selector.discard();
            }
        }
        self.sweeps_done += 1;
        let stats = SweepStats {
            sweep,
            proposed: proposals,
            accepted,
            energy_total: self.hamiltonian.energy_total(),
        };
        log::debug!(
            "sweep {} accepted {}/{} energy {:.6}",
            stats.sweep,
            stats.accepted,
            stats.proposed,
            stats.energy_total
        );
        Ok(stats)
    }

    /// Runs the remaining configured sweeps and summarises the chain.
    pub fn run(&mut self) -> Result<ChainSummary, EmberError> {
        log::info!(
            "running {} sweeps on box {:?} at beta {}",
            self.total_sweeps.saturating_sub(self.sweeps_done),
            self.selector.shape().extents(),
            self.beta
        );
        while self.sweeps_done < self.total_sweeps {
            self.sweep()?;
        }
        let summary = self.summary();
        log::info!(
            "finished {} sweeps: energy/site {:.6}, acceptance {:?}",
            summary.sweeps,
            summary.energy_per_site,
            summary.acceptance_rates
        );
        Ok(summary)
    }

    /// Snapshot of the counters and observables so far.
    pub fn summary(&self) -> ChainSummary {
        let energy_total = self.hamiltonian.energy_total();
        ChainSummary {
            sweeps: self.sweeps_done,
            proposals: self.proposed.values().sum(),
            accepted: self.accepted.values().sum(),
            acceptance_rates: self.acceptance_rates(),
            energy_total,
            energy_per_site: energy_total / self.lattice.len().max(1) as f64,
            magnetisation: self.lattice.magnetisation(),
            master_seed: self.master_seed,
            seed_label: self.seed_label.clone(),
        }
    }

    fn acceptance_rates(&self) -> BTreeMap<String, f64> {
        self.proposed
            .iter()
            .map(|(kind, &proposed)| {
                let accepted = self.accepted.get(kind).copied().unwrap_or(0);
                let rate = if proposed == 0 {
                    0.0
                } else {
                    accepted as f64 / proposed as f64
                };
                (kind.as_str().to_string(), rate)
            })
            .collect()
    }

    /// Current spin configuration.
    pub fn lattice(&self) -> &SpinLattice {
        &self.lattice
    }

    /// Current energy ledger.
    pub fn hamiltonian(&self) -> &HeisenbergHamiltonian {
        &self.hamiltonian
    }
}

/// Runs a chain from scratch with the provided configuration.
pub fn run(config: &RunConfig) -> Result<ChainSummary, EmberError> {
    Chain::new(config)?.run()
}
