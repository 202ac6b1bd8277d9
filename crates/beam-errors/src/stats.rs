//! Summary statistics over assigned error descriptors.

use beam_core::{BeamError, Element, ElementSelector, Lattice};

use crate::fields::ErrorField;

fn component(element: &Element, field: ErrorField, index: usize) -> f64 {
    match field {
        ErrorField::BpmGain => element.bpm_gain.map_or(0.0, |v| v[index.min(1)]),
        ErrorField::BpmOffset => element.bpm_offset.map_or(0.0, |v| v[index.min(1)]),
        ErrorField::BpmTilt => element.bpm_tilt.unwrap_or(0.0),
        ErrorField::ShiftErr => element.shift_err.map_or(0.0, |v| v[index.min(1)]),
        ErrorField::RotationErr => element.rotation_err.map_or(0.0, |v| v[index.min(2)]),
        ErrorField::PolynomAErr => element
            .polynom_a_err
            .as_ref()
            .and_then(|v| v.get(index))
            .copied()
            .unwrap_or(0.0),
        ErrorField::PolynomBErr => element
            .polynom_b_err
            .as_ref()
            .and_then(|v| v.get(index))
            .copied()
            .unwrap_or(0.0),
    }
}

/// Mean and standard deviation of one component of an error attribute over
/// the selected elements. An absent attribute reads as zero, so the summary
/// reflects the whole selection, not only the elements that carry errors.
pub fn error_stats(
    ring: &Lattice,
    selector: &ElementSelector,
    field: ErrorField,
    index: usize,
) -> Result<(f64, f64), BeamError> {
    let indices = ring.get_elements(selector)?;
    if indices.is_empty() {
        return Ok((0.0, 0.0));
    }
    let values: Vec<f64> = indices
        .iter()
        .map(|&idx| component(ring.element(idx), field, index))
        .collect();
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    Ok((mean, variance.sqrt()))
}
