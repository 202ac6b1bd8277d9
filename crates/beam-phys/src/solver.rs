//! Black-box solver traits consumed by the error-aware wrappers.

use beam_core::{BeamError, Lattice, RefPoints};

use crate::results::{OpticsResult, OrbitResult, TrackingResult};

/// Closed-orbit search engine.
pub trait OrbitSolver {
    /// Finds the closed orbit of `lattice` and reports it at the resolved
    /// reference points.
    fn find_orbit(&self, lattice: &Lattice, refpts: &RefPoints)
        -> Result<OrbitResult, BeamError>;
}

/// Linear optics analysis engine.
pub trait OpticsSolver {
    /// Computes linear optics functions of `lattice` at the resolved
    /// reference points.
    fn get_optics(&self, lattice: &Lattice, refpts: &RefPoints)
        -> Result<OpticsResult, BeamError>;
}

/// Multi-turn particle tracking engine.
pub trait TrackingSolver {
    /// Tracks `r_in` through `lattice` for `nturns` turns, recording the
    /// coordinates at the resolved reference points on every turn.
    fn track(
        &self,
        lattice: &Lattice,
        r_in: &[[f64; 6]],
        nturns: usize,
        refpts: &RefPoints,
    ) -> Result<TrackingResult, BeamError>;
}
