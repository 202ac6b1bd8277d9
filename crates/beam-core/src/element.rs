//! Beamline element model and geometry primitives.

use serde::{Deserialize, Serialize};

/// Classification of a beamline element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// Field-free straight section.
    Drift,
    /// Zero-length marker.
    Marker,
    /// Beam position monitor.
    Monitor,
    /// Bending magnet.
    Dipole,
    /// Focusing/defocusing magnet.
    Quadrupole,
    /// Chromaticity-correcting magnet.
    Sextupole,
    /// Steering magnet.
    Corrector,
    /// Accelerating cavity.
    RfCavity,
}

/// One beamline component with its field expansion, effective placement and
/// optional calibration/error descriptors.
///
/// The `*_err` fields hold *sampled but unapplied* error descriptors: they
/// have no effect on the element's field expansion or placement until error
/// enabling converts them into changes of `polynom_a`/`polynom_b`, `shift`
/// and `rotation`. The `bpm_*` fields are monitor transfer-function
/// parameters consumed at readout time; an absent field means identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Family name of the element.
    pub name: String,
    /// Element classification.
    pub kind: ElementKind,
    /// Physical length in metres.
    pub length: f64,
    /// Skew multipole expansion coefficients.
    #[serde(default)]
    pub polynom_a: Vec<f64>,
    /// Normal multipole expansion coefficients.
    #[serde(default)]
    pub polynom_b: Vec<f64>,
    /// Highest multipole order retained by the integrator.
    #[serde(default)]
    pub max_order: usize,
    /// Effective transverse displacement (x, y) in metres.
    #[serde(default)]
    pub shift: [f64; 2],
    /// Effective rotation (tilt, pitch, yaw) in radians.
    #[serde(default)]
    pub rotation: [f64; 3],
    /// Monitor gain per transverse plane.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm_gain: Option<[f64; 2]>,
    /// Monitor offset per transverse plane in metres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm_offset: Option<[f64; 2]>,
    /// Monitor rotation angle in radians.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm_tilt: Option<f64>,
    /// Sampled transverse shift error (x, y), not yet applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_err: Option<[f64; 2]>,
    /// Sampled rotation error (tilt, pitch, yaw), not yet applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_err: Option<[f64; 3]>,
    /// Sampled additive skew multipole error, not yet applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polynom_a_err: Option<Vec<f64>>,
    /// Sampled additive normal multipole error, not yet applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polynom_b_err: Option<Vec<f64>>,
}

impl Element {
    /// Creates a bare element of the given kind with empty field expansion.
    pub fn new(name: impl Into<String>, kind: ElementKind, length: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            length,
            polynom_a: Vec::new(),
            polynom_b: Vec::new(),
            max_order: 0,
            shift: [0.0; 2],
            rotation: [0.0; 3],
            bpm_gain: None,
            bpm_offset: None,
            bpm_tilt: None,
            shift_err: None,
            rotation_err: None,
            polynom_a_err: None,
            polynom_b_err: None,
        }
    }

    /// Creates a field-free drift.
    pub fn drift(name: impl Into<String>, length: f64) -> Self {
        Self::new(name, ElementKind::Drift, length)
    }

    /// Creates a zero-length marker.
    pub fn marker(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Marker, 0.0)
    }

    /// Creates a zero-length beam position monitor.
    pub fn monitor(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Monitor, 0.0)
    }

    /// Creates a dipole with the given normal dipole component.
    pub fn dipole(name: impl Into<String>, length: f64, b0: f64) -> Self {
        let mut element = Self::new(name, ElementKind::Dipole, length);
        element.polynom_b = vec![b0];
        element.polynom_a = vec![0.0];
        element
    }

    /// Creates a quadrupole with the given focusing strength.
    pub fn quadrupole(name: impl Into<String>, length: f64, k1: f64) -> Self {
        let mut element = Self::new(name, ElementKind::Quadrupole, length);
        element.polynom_b = vec![0.0, k1];
        element.polynom_a = vec![0.0, 0.0];
        element.max_order = 1;
        element
    }

    /// Creates a sextupole with the given strength.
    pub fn sextupole(name: impl Into<String>, length: f64, k2: f64) -> Self {
        let mut element = Self::new(name, ElementKind::Sextupole, length);
        element.polynom_b = vec![0.0, 0.0, k2];
        element.polynom_a = vec![0.0, 0.0, 0.0];
        element.max_order = 2;
        element
    }

    /// Returns whether any sampled magnet error descriptor is present.
    pub fn has_magnet_errors(&self) -> bool {
        self.shift_err.is_some()
            || self.rotation_err.is_some()
            || self.polynom_a_err.is_some()
            || self.polynom_b_err.is_some()
    }

    /// Returns whether any monitor calibration parameter is present.
    pub fn has_monitor_errors(&self) -> bool {
        self.bpm_gain.is_some() || self.bpm_offset.is_some() || self.bpm_tilt.is_some()
    }
}

/// Displaces an element transversely.
///
/// In relative mode the displacement accumulates onto the current placement;
/// otherwise it replaces it.
pub fn shift_element(element: &mut Element, dx: f64, dy: f64, relative: bool) {
    if relative {
        element.shift[0] += dx;
        element.shift[1] += dy;
    } else {
        element.shift = [dx, dy];
    }
}

/// Rotates an element around its centre.
///
/// `tilt` is the rotation around the beam axis, `pitch` around the horizontal
/// transverse axis and `yaw` around the vertical axis. In relative mode the
/// angles accumulate onto the current placement; otherwise they replace it.
pub fn rotate_element(element: &mut Element, tilt: f64, pitch: f64, yaw: f64, relative: bool) {
    if relative {
        element.rotation[0] += tilt;
        element.rotation[1] += pitch;
        element.rotation[2] += yaw;
    } else {
        element.rotation = [tilt, pitch, yaw];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_geometry_accumulates() {
        let mut quad = Element::quadrupole("qf", 0.3, 1.2);
        shift_element(&mut quad, 1e-4, -2e-4, true);
        shift_element(&mut quad, 1e-4, 0.0, true);
        assert_eq!(quad.shift, [2e-4, -2e-4]);

        rotate_element(&mut quad, 1e-3, 0.0, 5e-4, true);
        rotate_element(&mut quad, 0.0, 2e-4, 0.0, false);
        assert_eq!(quad.rotation, [0.0, 2e-4, 0.0]);
    }

    #[test]
    fn fresh_elements_carry_no_error_descriptors() {
        let bpm = Element::monitor("bpm1");
        assert!(!bpm.has_monitor_errors());
        assert!(!bpm.has_magnet_errors());
    }
}
