use ember_core::errors::ErrorInfo;
use ember_core::{
    BoxShape, EmberError, EnergyLedger, LedgerMut, Offset, Spin, SpinField, SIMPLE_CUBIC_NEIGHBOURS,
};

use crate::config::HamiltonianConfig;
use crate::event::Event;

fn dot(a: Spin, b: Spin) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Nearest-neighbour classical Heisenberg model on the simple-cubic lattice.
///
/// `E = -J Σ_<ij> s_i·s_j - h·Σ_i s_i`. Each bond is split evenly between its
/// two sites in `energy_i`; the Zeeman term belongs to its own site.
#[derive(Debug, Clone, PartialEq)]
pub struct HeisenbergHamiltonian {
    coupling: f64,
    field: Spin,
    shape: BoxShape,
    nbrlist: Vec<Offset>,
    dui: Vec<f64>,
    energy_i: Vec<f64>,
    energy_total: f64,
}

impl HeisenbergHamiltonian {
    /// Creates the model for `shape`. Every extent must be at least 2.
    pub fn new(config: &HamiltonianConfig, shape: BoxShape) -> Result<Self, EmberError> {
        if shape.extents().iter().any(|&extent| extent < 2) {
            return Err(EmberError::InvalidHamiltonianShape(
                ErrorInfo::new("box-too-small", "a site may not neighbour itself")
                    .with_context("extents", format!("{:?}", shape.extents())),
            ));
        }
        let nbrlist = SIMPLE_CUBIC_NEIGHBOURS.to_vec();
        Ok(Self {
            coupling: config.coupling,
            field: config.field,
            shape,
            dui: vec![0.0; nbrlist.len() + 1],
            nbrlist,
            energy_i: vec![0.0; shape.sites()],
            energy_total: 0.0,
        })
    }

    /// Fills the per-site energies and the total from scratch.
    pub fn initialise<F: SpinField>(&mut self, config: &F) -> Result<(), EmberError> {
        self.energy_i.iter_mut().for_each(|e| *e = 0.0);
        for coord in self.shape.coords() {
            let i = config.site_index(coord);
            if i >= self.energy_i.len() {
                return Err(EmberError::InvalidHamiltonianShape(
                    ErrorInfo::new("site-index-out-of-range", "site index exceeds energy_i")
                        .with_context("index", i.to_string())
                        .with_context("sites", self.energy_i.len().to_string()),
                ));
            }
            let energy = self.site_energy(config, coord);
            self.energy_i[i] += energy;
        }
        self.energy_total = self.energy_i.iter().sum();
        Ok(())
    }

    /// Computes `dui` for `event` and returns the total energy change.
    pub fn evaluate<F: SpinField>(&mut self, config: &F, event: &Event) -> f64 {
        let position = event.after.position;
        let ds = [
            event.after.spin[0] - event.before.spin[0],
            event.after.spin[1] - event.before.spin[1],
            event.after.spin[2] - event.before.spin[2],
        ];
        self.dui[0] = -dot(self.field, ds);
        for (k, nbr) in self.nbrlist.iter().enumerate() {
            let neighbour = config.spin(self.shape.wrap(position, *nbr));
            self.dui[k + 1] = -self.coupling * dot(ds, neighbour);
        }
        self.dui.iter().sum()
    }

    /// Recomputes the total energy without using the cached accumulators.
    pub fn full_energy<F: SpinField>(&self, config: &F) -> f64 {
        self.shape
            .coords()
            .map(|coord| self.site_energy(config, coord))
            .sum()
    }

    fn site_energy<F: SpinField>(&self, config: &F, coord: [usize; 3]) -> f64 {
        let s = config.spin(coord);
        let bonds: f64 = self
            .nbrlist
            .iter()
            .map(|nbr| -self.coupling * dot(s, config.spin(self.shape.wrap(coord, *nbr))))
            .sum();
        -dot(self.field, s) + 0.5 * bonds
    }

    /// Energy deltas of the last evaluated event.
    pub fn dui(&self) -> &[f64] {
        &self.dui
    }

    /// Per-site energy accumulators.
    pub fn site_energies(&self) -> &[f64] {
        &self.energy_i
    }

    /// Incrementally tracked total energy.
    pub fn energy_total(&self) -> f64 {
        self.energy_total
    }
}

impl EnergyLedger for HeisenbergHamiltonian {
    fn ledger_mut(&mut self) -> LedgerMut<'_> {
        LedgerMut {
            nbrlist: &self.nbrlist,
            dui: &self.dui,
            energy_i: &mut self.energy_i,
            energy_total: &mut self.energy_total,
        }
    }
}
