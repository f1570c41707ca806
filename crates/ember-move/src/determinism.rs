use ember_core::derive_substream_seed;

const LATTICE_STREAM: u64 = 0x1A77_1CE0;

/// Derives the seed used to draw the initial spin field.
pub fn lattice_seed(master_seed: u64) -> u64 {
    derive_substream_seed(master_seed, LATTICE_STREAM)
}

/// Derives the deterministic seed for all proposals and Boltzmann draws of a sweep.
pub fn sweep_seed(master_seed: u64, sweep: usize) -> u64 {
    derive_substream_seed(master_seed ^ 0xA5A5_A5A5_A5A5_A5A5, sweep as u64)
}
