use ember_core::{Coord, Spin};
use serde::{Deserialize, Serialize};

/// Position and orientation of one lattice site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteState {
    /// Lattice coordinate of the site.
    pub position: Coord,
    /// Spin orientation at that coordinate.
    pub spin: Spin,
}

/// Before/after snapshot of a proposed move.
///
/// Produced by a propose function and consumed by the matching accept; never
/// retained beyond one propose/accept round trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// State of the site before the move.
    #[serde(rename = "initial")]
    pub before: SiteState,
    /// State of the site if the move is committed.
    #[serde(rename = "final")]
    pub after: SiteState,
}
