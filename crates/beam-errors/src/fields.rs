//! Names and broadcast metadata of the assignable error attributes.

use serde::{Deserialize, Serialize};

/// The error attributes that [`assign_errors`](crate::assign_errors) knows
/// how to sample and store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ErrorField {
    /// Monitor gain per transverse plane.
    BpmGain,
    /// Monitor offset per transverse plane.
    BpmOffset,
    /// Monitor rotation angle.
    BpmTilt,
    /// Magnet transverse shift error.
    ShiftErr,
    /// Magnet rotation error (tilt, pitch, yaw).
    RotationErr,
    /// Additive skew multipole error vector.
    PolynomAErr,
    /// Additive normal multipole error vector.
    PolynomBErr,
}

impl ErrorField {
    /// Every assignable field, in the order assignments are processed.
    pub const ALL: [ErrorField; 7] = [
        ErrorField::BpmGain,
        ErrorField::BpmOffset,
        ErrorField::BpmTilt,
        ErrorField::ShiftErr,
        ErrorField::RotationErr,
        ErrorField::PolynomAErr,
        ErrorField::PolynomBErr,
    ];

    /// Attribute name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorField::BpmGain => "BPMGain",
            ErrorField::BpmOffset => "BPMOffset",
            ErrorField::BpmTilt => "BPMTilt",
            ErrorField::ShiftErr => "ShiftErr",
            ErrorField::RotationErr => "RotationErr",
            ErrorField::PolynomAErr => "PolynomAErr",
            ErrorField::PolynomBErr => "PolynomBErr",
        }
    }

    /// Number of coordinate components of the attribute; `None` for the
    /// multipole vectors, whose length is set by the supplied amplitudes.
    pub(crate) fn planes(&self) -> Option<usize> {
        match self {
            ErrorField::BpmGain | ErrorField::BpmOffset | ErrorField::ShiftErr => Some(2),
            ErrorField::BpmTilt => Some(1),
            ErrorField::RotationErr => Some(3),
            ErrorField::PolynomAErr | ErrorField::PolynomBErr => None,
        }
    }

    /// Stable substream identifier for seed derivation. Each field samples
    /// from its own substream, so assignments never perturb each other.
    pub(crate) fn substream(&self) -> u64 {
        match self {
            ErrorField::BpmGain => 0,
            ErrorField::BpmOffset => 1,
            ErrorField::BpmTilt => 2,
            ErrorField::ShiftErr => 3,
            ErrorField::RotationErr => 4,
            ErrorField::PolynomAErr => 5,
            ErrorField::PolynomBErr => 6,
        }
    }
}
