//! Error-aware entry points around the three physics solvers.
//!
//! Each wrapper enables the selected errors on a private copy of the
//! machine, runs the black-box solver on the perturbed copy, then rewrites
//! the results located at monitor reference points through the monitor
//! transfer functions of the caller's lattice (monitor parameters are not
//! altered by enabling). The caller's lattice is never mutated.

use beam_core::{BeamError, Lattice, RefPoints};
use beam_phys::{
    OpticsResult, OpticsSolver, OrbitResult, OrbitSolver, TrackingResult, TrackingSolver,
};

use crate::enable::{enable_errors, EnableFlags};
use crate::monitor::{apply_monitor_errors, apply_monitor_errors_tracking};

/// Finds the closed orbit of the machine with errors.
pub fn find_orbit_err<S: OrbitSolver>(
    solver: &S,
    ring: &Lattice,
    refpts: &RefPoints,
    flags: &EnableFlags,
) -> Result<OrbitResult, BeamError> {
    let perturbed = enable_errors(ring, flags);
    let mut result = solver.find_orbit(perturbed.ring(), refpts)?;
    apply_monitor_errors(ring, refpts, &mut result.orbit)?;
    Ok(result)
}

/// Computes the linear optics of the machine with errors.
///
/// Only the per-point closed-orbit field is rewritten by the monitor
/// transfer functions; the optics functions themselves are those of the
/// perturbed machine.
pub fn get_optics_err<S: OpticsSolver>(
    solver: &S,
    ring: &Lattice,
    refpts: &RefPoints,
    flags: &EnableFlags,
) -> Result<OpticsResult, BeamError> {
    let perturbed = enable_errors(ring, flags);
    let mut result = solver.get_optics(perturbed.ring(), refpts)?;
    let mut orbits: Vec<[f64; 6]> = result
        .elements
        .iter()
        .map(|local| local.closed_orbit)
        .collect();
    apply_monitor_errors(ring, refpts, &mut orbits)?;
    for (local, orbit) in result.elements.iter_mut().zip(orbits) {
        local.closed_orbit = orbit;
    }
    Ok(result)
}

/// Tracks particles through the machine with errors.
pub fn track_err<S: TrackingSolver>(
    solver: &S,
    ring: &Lattice,
    r_in: &[[f64; 6]],
    nturns: usize,
    refpts: &RefPoints,
    flags: &EnableFlags,
) -> Result<TrackingResult, BeamError> {
    let perturbed = enable_errors(ring, flags);
    let mut result = solver.track(perturbed.ring(), r_in, nturns, refpts)?;
    apply_monitor_errors_tracking(ring, refpts, &mut result)?;
    Ok(result)
}
