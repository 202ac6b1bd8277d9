//! Monitor transfer functions applied to computed beam coordinates.

use beam_core::{BeamError, Element, ErrorInfo, Lattice, RefPoints};
use beam_phys::TrackingResult;

/// Rotation convention used for monitor tilts, applied uniformly:
/// `[[cos, sin], [-sin, cos]]`.
fn rotation_matrix(theta: f64) -> [[f64; 2]; 2] {
    let (sin, cos) = theta.sin_cos();
    [[cos, sin], [-sin, cos]]
}

/// Rewrites the transverse planes of one sample as seen by the monitor:
/// tilt rotation first, then gain scaling, then offset shift. A missing
/// parameter means identity for that sub-transform. Longitudinal planes are
/// untouched.
fn distort_reading(element: &Element, sample: &mut [f64; 6]) {
    let mut x = sample[0];
    let mut y = sample[2];
    if let Some(theta) = element.bpm_tilt {
        let matrix = rotation_matrix(theta);
        let rotated_x = matrix[0][0] * x + matrix[0][1] * y;
        let rotated_y = matrix[1][0] * x + matrix[1][1] * y;
        x = rotated_x;
        y = rotated_y;
    }
    if let Some(gain) = element.bpm_gain {
        x *= gain[0];
        y *= gain[1];
    }
    if let Some(offset) = element.bpm_offset {
        x += offset[0];
        y += offset[1];
    }
    sample[0] = x;
    sample[2] = y;
}

fn sample_count_error(expected: usize, got: usize) -> BeamError {
    BeamError::Shape(
        ErrorInfo::new(
            "monitor-samples",
            format!("{got} sample(s) supplied for {expected} reference point(s)"),
        )
        .with_hint("pass the same refpts used to compute the result"),
    )
}

/// Applies the monitor transfer functions to an orbit-like result, in place.
///
/// `orbit` must hold one 6-D sample per resolved reference point, in the
/// same order. Only samples whose element carries a monitor parameter are
/// rewritten; end-of-line points and bare elements pass through unchanged.
pub fn apply_monitor_errors(
    ring: &Lattice,
    refpts: &RefPoints,
    orbit: &mut [[f64; 6]],
) -> Result<(), BeamError> {
    let elements = ring.refpts_elements(refpts)?;
    if elements.len() != orbit.len() {
        return Err(sample_count_error(elements.len(), orbit.len()));
    }
    for (slot, element) in elements.into_iter().enumerate() {
        if let Some(element) = element {
            distort_reading(element, &mut orbit[slot]);
        }
    }
    Ok(())
}

/// Applies the monitor transfer functions to a tracking result, in place.
///
/// The per-monitor transform is applied independently to every particle and
/// every turn's sample at that monitor.
pub fn apply_monitor_errors_tracking(
    ring: &Lattice,
    refpts: &RefPoints,
    result: &mut TrackingResult,
) -> Result<(), BeamError> {
    let elements = ring.refpts_elements(refpts)?;
    if elements.len() != result.refpts {
        return Err(sample_count_error(elements.len(), result.refpts));
    }
    for (slot, element) in elements.into_iter().enumerate() {
        let Some(element) = element else { continue };
        if !element.has_monitor_errors() {
            continue;
        }
        for particle in 0..result.particles {
            for turn in 0..result.turns {
                distort_reading(element, result.at_mut(particle, slot, turn)?);
            }
        }
    }
    Ok(())
}
