use ember_core::errors::ErrorInfo;
use ember_core::{BoxShape, EmberError, LatticeType, LedgerMut, RngHandle, SpinField};
use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::spin_flip::SpinFlip;

/// Propose/accept pair implemented by every move kind.
pub trait Move {
    /// Draws a candidate move without touching the configuration.
    fn propose(&self, shape: BoxShape, config: &dyn SpinField, rng: &mut RngHandle) -> Event;

    /// Commits `event` to the configuration and updates the energy ledger.
    ///
    /// Implementations validate the ledger before mutating anything, so an
    /// error leaves both the configuration and the ledger untouched.
    fn accept(
        &self,
        shape: BoxShape,
        config: &mut dyn SpinField,
        event: &Event,
        ledger: LedgerMut<'_>,
    ) -> Result<(), EmberError>;
}

/// Kind of move the selector can register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// Uniform spin reorientation on the simple-cubic lattice.
    #[serde(rename = "spin_flip_3d")]
    SpinFlip3d,
}

impl MoveKind {
    /// Every move kind the engine knows how to run.
    pub const SUPPORTED: [MoveKind; 1] = [MoveKind::SpinFlip3d];

    /// Configuration identifier of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveKind::SpinFlip3d => "spin_flip_3d",
        }
    }

    /// Resolves a configuration identifier.
    pub fn from_identifier(identifier: &str) -> Result<Self, EmberError> {
        Self::SUPPORTED
            .iter()
            .copied()
            .find(|kind| kind.as_str() == identifier)
            .ok_or_else(|| {
                let supported: Vec<&str> = Self::SUPPORTED.iter().map(|k| k.as_str()).collect();
                EmberError::UnsupportedMoveKind(
                    ErrorInfo::new("unknown-move", format!("move type {identifier} not supported"))
                        .with_context("move", identifier)
                        .with_hint(format!("supported moves: {}", supported.join(", "))),
                )
            })
    }

    /// Lattice type the kind's geometry is written for.
    pub fn required_lattice(&self) -> LatticeType {
        match self {
            MoveKind::SpinFlip3d => LatticeType::SimpleCubic,
        }
    }

    fn behaviour(&self) -> &'static dyn Move {
        match self {
            MoveKind::SpinFlip3d => &SpinFlip,
        }
    }
}

impl Move for MoveKind {
    fn propose(&self, shape: BoxShape, config: &dyn SpinField, rng: &mut RngHandle) -> Event {
        self.behaviour().propose(shape, config, rng)
    }

    fn accept(
        &self,
        shape: BoxShape,
        config: &mut dyn SpinField,
        event: &Event,
        ledger: LedgerMut<'_>,
    ) -> Result<(), EmberError> {
        self.behaviour().accept(shape, config, event, ledger)
    }
}
