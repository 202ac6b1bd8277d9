#![deny(missing_docs)]

//! Solver boundary for accelerator lattice error studies.
//!
//! Declares the result shapes and black-box traits for the three physics
//! entry points (closed orbit, linear optics, multi-turn tracking), plus a
//! deterministic thin-lens [`LinearModel`] used by tests and benches.

mod linear;
mod results;
mod solver;

pub use linear::LinearModel;
pub use results::{LocalOptics, OpticsResult, OrbitResult, RingOptics, TrackingResult};
pub use solver::{OpticsSolver, OrbitSolver, TrackingSolver};
