use std::sync::atomic::{AtomicU64, Ordering};

use ember_core::errors::ErrorInfo;
use ember_core::{BoxShape, EmberError, EnergyLedger, LatticeDescriptor, RngHandle, SpinField};

use crate::config::MoveWeights;
use crate::event::Event;
use crate::moves::{Move, MoveKind};

static NEXT_SELECTOR_ID: AtomicU64 = AtomicU64::new(1);

/// Normalised cumulative distribution over a fixed list of entries.
///
/// `cumulative[i]` is the sum of the first `i + 1` weights divided by the total;
/// the last entry is exactly `1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeTable<K> {
    entries: Vec<K>,
    cumulative: Vec<f64>,
}

impl<K> CumulativeTable<K> {
    /// Builds the table from `(entry, weight)` pairs in the order given.
    pub fn from_weights<I>(weights: I) -> Result<Self, EmberError>
    where
        I: IntoIterator<Item = (K, f64)>,
    {
        let mut entries = Vec::new();
        let mut cumulative = Vec::new();
        let mut running = 0.0;
        for (entry, weight) in weights {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(EmberError::Config(
                    ErrorInfo::new("invalid-weight", "move weights must be positive and finite")
                        .with_context("index", entries.len().to_string())
                        .with_context("weight", weight.to_string()),
                ));
            }
            running += weight;
            entries.push(entry);
            cumulative.push(running);
        }
        if entries.is_empty() {
            return Err(EmberError::Config(
                ErrorInfo::new("no-moves", "at least one move kind is required")
                    .with_hint("add e.g. `spin_flip_3d: 1.0` under `moves`"),
            ));
        }
        for value in cumulative.iter_mut() {
            *value /= running;
        }
        if let Some(last) = cumulative.last_mut() {
            *last = 1.0;
        }
        Ok(Self {
            entries,
            cumulative,
        })
    }

    /// Registered entries in table order.
    pub fn entries(&self) -> &[K] {
        &self.entries
    }

    /// Cumulative probabilities aligned with [`entries`](Self::entries).
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty. Never true for a constructed table.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Smallest index whose cumulative probability reaches `u`.
    pub fn index_for(&self, u: f64) -> usize {
        let idx = self.cumulative.partition_point(|&c| c < u);
        idx.min(self.entries.len() - 1)
    }

    /// Draws an index by inverse-CDF sampling.
    pub fn sample(&self, rng: &mut RngHandle) -> usize {
        self.index_for(rng.unit())
    }
}

/// Handle tying an accept call to the proposal it commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveToken {
    selector: u64,
    sequence: u64,
    kind: MoveKind,
}

impl MoveToken {
    /// Move kind selected for the proposal.
    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    /// Per-selector proposal counter.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Candidate move returned by [`MoveSelector::propose`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proposal {
    /// Token to hand back to [`MoveSelector::accept`].
    pub token: MoveToken,
    /// Before/after snapshot of the move.
    pub event: Event,
}

/// Weighted selector over the registered move kinds.
#[derive(Debug)]
pub struct MoveSelector {
    id: u64,
    table: CumulativeTable<MoveKind>,
    shape: BoxShape,
    next_sequence: u64,
    pending: Option<(MoveToken, Event)>,
}

impl MoveSelector {
    /// Registers the requested move kinds against a lattice descriptor.
    pub fn new(weights: &MoveWeights, lattice: &LatticeDescriptor) -> Result<Self, EmberError> {
        let mut kinds = Vec::with_capacity(weights.len());
        for (identifier, &weight) in weights {
            let kind = MoveKind::from_identifier(identifier)?;
            if kind.required_lattice() != lattice.latt_type {
                return Err(EmberError::LatticeMismatch(
                    ErrorInfo::new("lattice-mismatch", "move does not match the lattice")
                        .with_context("move", kind.as_str())
                        .with_context("required", kind.required_lattice().as_str())
                        .with_context("declared", lattice.latt_type.as_str()),
                ));
            }
            kinds.push((kind, weight));
        }
        let table = CumulativeTable::from_weights(kinds)?;
        let shape = lattice.box_shape()?;
        log::debug!(
            "registered moves {:?} with cumulative {:?} on box {:?}",
            table.entries(),
            table.cumulative(),
            shape.extents()
        );
        Ok(Self {
            id: NEXT_SELECTOR_ID.fetch_add(1, Ordering::Relaxed),
            table,
            shape,
            next_sequence: 0,
            pending: None,
        })
    }

    /// Periodic box used for sampling and wrapping.
    pub fn shape(&self) -> BoxShape {
        self.shape
    }

    /// Cumulative selection table over the registered kinds.
    pub fn table(&self) -> &CumulativeTable<MoveKind> {
        &self.table
    }

    /// Token of the proposal awaiting accept, if any.
    pub fn pending(&self) -> Option<MoveToken> {
        self.pending.map(|(token, _)| token)
    }

    /// Picks a move kind and asks it for a candidate move.
    ///
    /// Any earlier proposal that was never accepted is superseded.
    pub fn propose<F: SpinField>(&mut self, config: &F, rng: &mut RngHandle) -> Proposal {
        let kind = self.table.entries()[self.table.sample(rng)];
        let event = kind.propose(self.shape, config, rng);
        let token = MoveToken {
            selector: self.id,
            sequence: self.next_sequence,
            kind,
        };
        self.next_sequence += 1;
        self.pending = Some((token, event));
        log::trace!("proposed {} at {:?}", kind.as_str(), event.after.position);
        Proposal { token, event }
    }

    /// Commits the pending proposal identified by `token`.
    ///
    /// `event` must be the one returned alongside `token`.
    pub fn accept<F: SpinField, H: EnergyLedger>(
        &mut self,
        token: MoveToken,
        config: &mut F,
        event: &Event,
        hamiltonian: &mut H,
    ) -> Result<(), EmberError> {
        let (pending, proposed) = self.pending.ok_or_else(|| {
            EmberError::ProtocolViolation(
                ErrorInfo::new("no-pending-move", "accept called without a pending proposal")
                    .with_context("sequence", token.sequence.to_string()),
            )
        })?;
        if token.selector != self.id {
            return Err(EmberError::ProtocolViolation(
                ErrorInfo::new("foreign-token", "token was issued by another selector")
                    .with_context("selector", self.id.to_string())
                    .with_context("token-selector", token.selector.to_string()),
            ));
        }
        if token != pending {
            return Err(EmberError::ProtocolViolation(
                ErrorInfo::new("stale-token", "token does not match the pending proposal")
                    .with_context("pending", pending.sequence.to_string())
                    .with_context("token", token.sequence.to_string()),
            ));
        }
        if !self.shape.contains(event.after.position) {
            return Err(EmberError::ProtocolViolation(
                ErrorInfo::new("event-out-of-box", "event position lies outside the box")
                    .with_context("position", format!("{:?}", event.after.position))
                    .with_context("box", format!("{:?}", self.shape.extents())),
            ));
        }
        if *event != proposed {
            return Err(EmberError::ProtocolViolation(
                ErrorInfo::new("foreign-event", "event differs from the pending proposal")
                    .with_context("pending", format!("{:?}", proposed.after.position))
                    .with_context("event", format!("{:?}", event.after.position))
                    .with_context("sequence", token.sequence.to_string()),
            ));
        }
        token
            .kind
            .accept(self.shape, config, event, hamiltonian.ledger_mut())?;
        self.pending = None;
        log::trace!("accepted {} at {:?}", token.kind.as_str(), event.after.position);
        Ok(())
    }

    /// Drops the pending proposal, typically after a rejected Boltzmann test.
    pub fn discard(&mut self) {
        self.pending = None;
    }
}
