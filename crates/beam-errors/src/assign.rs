//! Assignment of sampled error descriptors onto lattice elements.

use serde::{Deserialize, Serialize};

use beam_core::{BeamError, Element, ElementSelector, Lattice, RngHandle};

use crate::amplitude::ErrorSpec;
use crate::fields::ErrorField;
use crate::sampler::sample_values;

/// Error specifications per assignable attribute.
///
/// Every field is independently optional; an absent field assigns nothing.
/// Gains are stored exactly as sampled, so a calibration scattered around
/// unity is expressed with a systematic part of one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorTable {
    /// Monitor gain per transverse plane.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm_gain: Option<ErrorSpec>,
    /// Monitor offset per transverse plane.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm_offset: Option<ErrorSpec>,
    /// Monitor rotation angle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm_tilt: Option<ErrorSpec>,
    /// Magnet transverse shift error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_err: Option<ErrorSpec>,
    /// Magnet rotation error (tilt, pitch, yaw).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_err: Option<ErrorSpec>,
    /// Additive skew multipole error vector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polynom_a_err: Option<ErrorSpec>,
    /// Additive normal multipole error vector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polynom_b_err: Option<ErrorSpec>,
}

impl ErrorTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the monitor gain specification.
    pub fn bpm_gain(mut self, spec: impl Into<ErrorSpec>) -> Self {
        self.bpm_gain = Some(spec.into());
        self
    }

    /// Sets the monitor offset specification.
    pub fn bpm_offset(mut self, spec: impl Into<ErrorSpec>) -> Self {
        self.bpm_offset = Some(spec.into());
        self
    }

    /// Sets the monitor tilt specification.
    pub fn bpm_tilt(mut self, spec: impl Into<ErrorSpec>) -> Self {
        self.bpm_tilt = Some(spec.into());
        self
    }

    /// Sets the magnet shift specification.
    pub fn shift_err(mut self, spec: impl Into<ErrorSpec>) -> Self {
        self.shift_err = Some(spec.into());
        self
    }

    /// Sets the magnet rotation specification.
    pub fn rotation_err(mut self, spec: impl Into<ErrorSpec>) -> Self {
        self.rotation_err = Some(spec.into());
        self
    }

    /// Sets the skew multipole error specification.
    pub fn polynom_a_err(mut self, spec: impl Into<ErrorSpec>) -> Self {
        self.polynom_a_err = Some(spec.into());
        self
    }

    /// Sets the normal multipole error specification.
    pub fn polynom_b_err(mut self, spec: impl Into<ErrorSpec>) -> Self {
        self.polynom_b_err = Some(spec.into());
        self
    }

    fn entry(&self, field: ErrorField) -> Option<&ErrorSpec> {
        match field {
            ErrorField::BpmGain => self.bpm_gain.as_ref(),
            ErrorField::BpmOffset => self.bpm_offset.as_ref(),
            ErrorField::BpmTilt => self.bpm_tilt.as_ref(),
            ErrorField::ShiftErr => self.shift_err.as_ref(),
            ErrorField::RotationErr => self.rotation_err.as_ref(),
            ErrorField::PolynomAErr => self.polynom_a_err.as_ref(),
            ErrorField::PolynomBErr => self.polynom_b_err.as_ref(),
        }
    }
}

/// Options shared by every field of one assignment call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssignOptions {
    /// Truncation of the Gaussian distribution at +/- `truncation` sigma.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncation: Option<f64>,
    /// Master seed; each attribute samples from its own derived substream.
    pub seed: u64,
}

fn default_master_seed() -> u64 {
    0x0E44_0E44_5EED_0E44_u64
}

impl Default for AssignOptions {
    fn default() -> Self {
        Self {
            truncation: None,
            seed: default_master_seed(),
        }
    }
}

/// Expands a sampled row to the stored attribute layout.
fn replicate2(row: &[f64]) -> [f64; 2] {
    if row.len() == 1 {
        [row[0], row[0]]
    } else {
        [row[0], row[1]]
    }
}

fn store(element: &mut Element, field: ErrorField, row: &[f64]) {
    match field {
        ErrorField::BpmGain => element.bpm_gain = Some(replicate2(row)),
        ErrorField::BpmOffset => element.bpm_offset = Some(replicate2(row)),
        ErrorField::BpmTilt => element.bpm_tilt = Some(row[0]),
        ErrorField::ShiftErr => element.shift_err = Some(replicate2(row)),
        // A scalar rotation is a tilt error with no pitch nor yaw.
        ErrorField::RotationErr => {
            element.rotation_err = Some(if row.len() == 1 {
                [row[0], 0.0, 0.0]
            } else {
                [row[0], row[1], row[2]]
            })
        }
        ErrorField::PolynomAErr => element.polynom_a_err = Some(row.to_vec()),
        ErrorField::PolynomBErr => element.polynom_b_err = Some(row.to_vec()),
    }
}

/// Samples the populated fields of `table` and stores the results as error
/// descriptors on the elements matched by `selector`, in element order.
///
/// This is the only operation of the pipeline that mutates the lattice it is
/// given: it stores unapplied descriptors and never touches the elements'
/// field expansion, placement or readout. Every populated field is validated
/// and sampled before the first attribute write, so a shape failure leaves
/// the lattice untouched.
pub fn assign_errors(
    ring: &mut Lattice,
    selector: &ElementSelector,
    table: &ErrorTable,
    options: &AssignOptions,
) -> Result<(), BeamError> {
    let indices = ring.get_elements(selector)?;
    let mut staged = Vec::new();
    for field in ErrorField::ALL {
        if let Some(spec) = table.entry(field) {
            let mut rng = RngHandle::for_substream(options.seed, field.substream());
            let values = sample_values(
                field.name(),
                spec,
                indices.len(),
                field.planes(),
                options.truncation,
                &mut rng,
            )?;
            staged.push((field, values));
        }
    }
    for (field, values) in staged {
        for (row, &index) in values.iter().zip(&indices) {
            store(ring.element_mut(index), field, row);
        }
    }
    Ok(())
}
