#![deny(missing_docs)]

//! Error injection and monitor distortion for accelerator lattices.
//!
//! The pipeline has three stages. [`assign_errors`] samples systematic plus
//! random error values and stores them as descriptors on selected elements.
//! [`enable_errors`] folds the stored magnet descriptors into the field
//! expansions and placements of a perturbed copy of the machine, leaving the
//! input untouched. The error-aware wrappers ([`find_orbit_err`],
//! [`get_optics_err`], [`track_err`]) run a black-box physics solver on the
//! perturbed machine and rewrite the results at monitor locations through
//! each monitor's tilt/gain/offset transfer function.

/// Error amplitude descriptors and broadcast rules.
pub mod amplitude;
/// Assignment of sampled descriptors onto elements.
pub mod assign;
/// Conversion of stored descriptors into effective magnet changes.
pub mod enable;
/// Names and metadata of the assignable attributes.
pub mod fields;
/// Monitor transfer functions applied to computed coordinates.
pub mod monitor;
/// Truncated-Gaussian sampling.
pub mod sampler;
/// Summary statistics over assigned descriptors.
pub mod stats;
/// Error-aware solver entry points.
pub mod wrappers;

pub use amplitude::{ErrorAmplitude, ErrorSpec};
pub use assign::{assign_errors, AssignOptions, ErrorTable};
pub use enable::{enable_errors, EnableFlags, PerturbedLattice};
pub use fields::ErrorField;
pub use monitor::{apply_monitor_errors, apply_monitor_errors_tracking};
pub use sampler::sample_values;
pub use stats::error_stats;
pub use wrappers::{find_orbit_err, get_optics_err, track_err};
