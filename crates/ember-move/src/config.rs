use std::fs;
use std::path::Path;

use ember_core::errors::ErrorInfo;
use ember_core::{EmberError, LatticeDescriptor, LatticeType, Spin};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Relative move weights keyed by move identifier, in the order supplied.
pub type MoveWeights = IndexMap<String, f64>;

/// YAML-configurable parameters governing a Metropolis chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of sweeps to execute; one sweep is one proposal per site.
    #[serde(default = "default_sweeps")]
    pub sweeps: usize,
    /// Inverse temperature used by the Boltzmann test.
    #[serde(default = "default_beta")]
    pub beta: f64,
    /// Relative weights of the registered move kinds.
    #[serde(default = "default_moves")]
    pub moves: MoveWeights,
    /// Lattice descriptor (type tag and box).
    #[serde(default = "default_lattice")]
    pub lattice: LatticeDescriptor,
    /// Couplings of the reference Heisenberg Hamiltonian.
    #[serde(default)]
    pub hamiltonian: HamiltonianConfig,
    /// How the spin field is initialised before the first sweep.
    #[serde(default)]
    pub initial_state: InitialState,
    /// Master seed and substream policy.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
}

fn default_sweeps() -> usize {
    32
}

fn default_beta() -> f64 {
    1.0
}

fn default_moves() -> MoveWeights {
    let mut moves = MoveWeights::new();
    moves.insert("spin_flip_3d".to_string(), 1.0);
    moves
}

fn default_lattice() -> LatticeDescriptor {
    LatticeDescriptor::diagonal(LatticeType::SimpleCubic, [4, 4, 4])
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            sweeps: default_sweeps(),
            beta: default_beta(),
            moves: default_moves(),
            lattice: default_lattice(),
            hamiltonian: HamiltonianConfig::default(),
            initial_state: InitialState::default(),
            seed_policy: SeedPolicy::default(),
        }
    }
}

impl RunConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, EmberError> {
        let config: RunConfig = serde_yaml::from_str(yaml).map_err(|err| {
            EmberError::Config(ErrorInfo::new("config-parse", err.to_string()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, EmberError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            EmberError::Io(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_yaml_str(&contents).map_err(|err| match err {
            EmberError::Config(info) => {
                EmberError::Config(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })
    }

    /// Checks scalar parameters that serde cannot constrain.
    pub fn validate(&self) -> Result<(), EmberError> {
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(EmberError::Config(
                ErrorInfo::new("invalid-beta", "inverse temperature must be finite and >= 0")
                    .with_context("beta", self.beta.to_string()),
            ));
        }
        if !self.hamiltonian.coupling.is_finite()
            || self.hamiltonian.field.iter().any(|h| !h.is_finite())
        {
            return Err(EmberError::Config(ErrorInfo::new(
                "invalid-coupling",
                "hamiltonian couplings must be finite",
            )));
        }
        Ok(())
    }
}

/// Couplings of the nearest-neighbour Heisenberg model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HamiltonianConfig {
    /// Exchange coupling `J`; positive favours alignment.
    #[serde(default = "default_coupling")]
    pub coupling: f64,
    /// Uniform external field `h`.
    #[serde(default)]
    pub field: Spin,
}

fn default_coupling() -> f64 {
    1.0
}

impl Default for HamiltonianConfig {
    fn default() -> Self {
        Self {
            coupling: default_coupling(),
            field: [0.0; 3],
        }
    }
}

/// Initial spin field of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InitialState {
    /// Independent uniformly random orientations.
    #[default]
    Random,
    /// Every spin along `+z`.
    Polarised,
}

/// Deterministic seeding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed used for the run.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label recorded alongside run summaries.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    0x05EE_D5EE_DD15_5EED_u64
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}
