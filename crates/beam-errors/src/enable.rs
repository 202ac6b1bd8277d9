//! Conversion of stored error descriptors into effective magnet changes.

use serde::{Deserialize, Serialize};

use beam_core::{rotate_element, shift_element, Lattice};

/// Selection of which assigned error kinds become effective.
///
/// `all` sets the default for every kind flag; each `Option` overrides it
/// for one kind. The per-axis flags refine an enabled kind and default to
/// `true`. The index fields restrict a multipole error to a single order,
/// zeroing every other order of the stored error vector before application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnableFlags {
    /// Default for every kind flag.
    pub all: bool,
    /// Enable magnet shift errors.
    pub shift_err: Option<bool>,
    /// Enable magnet rotation errors.
    pub rotation_err: Option<bool>,
    /// Enable skew multipole errors.
    pub polynom_a_err: Option<bool>,
    /// Enable normal multipole errors.
    pub polynom_b_err: Option<bool>,
    /// Apply the horizontal component of shift errors.
    pub shift_x: Option<bool>,
    /// Apply the vertical component of shift errors.
    pub shift_y: Option<bool>,
    /// Apply the tilt component of rotation errors.
    pub tilt: Option<bool>,
    /// Apply the pitch component of rotation errors.
    pub pitch: Option<bool>,
    /// Apply the yaw component of rotation errors.
    pub yaw: Option<bool>,
    /// Restrict skew multipole errors to a single order.
    pub polynom_a_index: Option<usize>,
    /// Restrict normal multipole errors to a single order.
    pub polynom_b_index: Option<usize>,
}

impl Default for EnableFlags {
    fn default() -> Self {
        Self {
            all: true,
            shift_err: None,
            rotation_err: None,
            polynom_a_err: None,
            polynom_b_err: None,
            shift_x: None,
            shift_y: None,
            tilt: None,
            pitch: None,
            yaw: None,
            polynom_a_index: None,
            polynom_b_index: None,
        }
    }
}

impl EnableFlags {
    /// Flags with every error kind disabled; individual kinds can then be
    /// switched back on through the overrides.
    pub fn none() -> Self {
        Self {
            all: false,
            ..Self::default()
        }
    }

    fn resolve(&self) -> Resolved {
        let shift_kind = self.shift_err.unwrap_or(self.all);
        let rotation_kind = self.rotation_err.unwrap_or(self.all);
        Resolved {
            shift: [
                shift_kind && self.shift_x.unwrap_or(true),
                shift_kind && self.shift_y.unwrap_or(true),
            ],
            rotation: [
                rotation_kind && self.tilt.unwrap_or(true),
                rotation_kind && self.pitch.unwrap_or(true),
                rotation_kind && self.yaw.unwrap_or(true),
            ],
            polynom_a: self.polynom_a_err.unwrap_or(self.all),
            polynom_b: self.polynom_b_err.unwrap_or(self.all),
            index_a: self.polynom_a_index,
            index_b: self.polynom_b_index,
        }
    }
}

/// Flag selection resolved once per enabling call.
struct Resolved {
    shift: [bool; 2],
    rotation: [bool; 3],
    polynom_a: bool,
    polynom_b: bool,
    index_a: Option<usize>,
    index_b: Option<usize>,
}

/// A machine whose assigned errors have been made effective.
///
/// The distinction between a pristine and a perturbed lattice is carried by
/// this type rather than by a runtime flag: errors cannot be enabled twice
/// on the same value, and the pristine machine is reachable only through the
/// lattice the wrapper was called with. Untouched elements are shared with
/// the pristine lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerturbedLattice {
    ring: Lattice,
}

impl PerturbedLattice {
    /// The perturbed machine, suitable for handing to a physics solver.
    pub fn ring(&self) -> &Lattice {
        &self.ring
    }

    /// Consumes the wrapper and returns the perturbed machine.
    pub fn into_ring(self) -> Lattice {
        self.ring
    }
}

#[derive(Clone, Copy)]
enum Polynom {
    A,
    B,
}

fn apply_polynom_errors(ring: &mut Lattice, polynom: Polynom, index: Option<usize>) {
    for idx in 0..ring.len() {
        let (stored, base_len) = {
            let element = ring.element(idx);
            match polynom {
                Polynom::A => (element.polynom_a_err.clone(), element.polynom_a.len()),
                Polynom::B => (element.polynom_b_err.clone(), element.polynom_b.len()),
            }
        };
        let Some(mut error) = stored else { continue };
        // Only elements carrying the base expansion combine its error; a
        // field-free element stays field-free.
        if base_len == 0 {
            continue;
        }
        if let Some(keep) = index {
            for (order, coefficient) in error.iter_mut().enumerate() {
                if order != keep {
                    *coefficient = 0.0;
                }
            }
        }
        let element = ring.element_mut(idx);
        {
            let base = match polynom {
                Polynom::A => &mut element.polynom_a,
                Polynom::B => &mut element.polynom_b,
            };
            if base.len() < error.len() {
                base.resize(error.len(), 0.0);
            }
            for (order, coefficient) in error.into_iter().enumerate() {
                base[order] += coefficient;
            }
        }
        // Common-length convention: both polynomials padded to the same
        // length, MaxOrder = length - 1.
        let common = element.polynom_a.len().max(element.polynom_b.len());
        element.polynom_a.resize(common, 0.0);
        element.polynom_b.resize(common, 0.0);
        element.max_order = common.saturating_sub(1);
    }
}

fn apply_alignment_errors(ring: &mut Lattice, flags: &Resolved) {
    let any_shift = flags.shift.iter().any(|&f| f);
    let any_rotation = flags.rotation.iter().any(|&f| f);
    if !any_shift && !any_rotation {
        return;
    }
    for idx in 0..ring.len() {
        let element = ring.element(idx);
        let wants_shift = any_shift && element.shift_err.is_some();
        let wants_rotation = any_rotation && element.rotation_err.is_some();
        if !wants_shift && !wants_rotation {
            continue;
        }
        let element = ring.element_mut(idx);
        if wants_shift {
            if let Some(delta) = element.shift_err {
                shift_element(
                    element,
                    if flags.shift[0] { delta[0] } else { 0.0 },
                    if flags.shift[1] { delta[1] } else { 0.0 },
                    true,
                );
            }
        }
        if wants_rotation {
            if let Some(angles) = element.rotation_err {
                rotate_element(
                    element,
                    if flags.rotation[0] { angles[0] } else { 0.0 },
                    if flags.rotation[1] { angles[1] } else { 0.0 },
                    if flags.rotation[2] { angles[2] } else { 0.0 },
                    true,
                );
            }
        }
    }
}

/// Produces a perturbed copy of `ring` where the selected stored error
/// descriptors are folded into the magnets' field expansions and placement.
///
/// The input lattice is never mutated; elements without a selected error
/// descriptor are shared between the two machines. Multipole combination
/// applies only to elements carrying the base polynomial: it zero-extends
/// the shorter of the base and the (optionally index-restricted) error
/// vector, adds them, then pads both polynomials of the magnet to a common
/// length and updates `max_order` accordingly.
/// Deterministic: enabling twice from the same pristine lattice yields
/// value-identical machines.
pub fn enable_errors(ring: &Lattice, flags: &EnableFlags) -> PerturbedLattice {
    let resolved = flags.resolve();
    let mut perturbed = ring.clone();
    if resolved.polynom_a {
        apply_polynom_errors(&mut perturbed, Polynom::A, resolved.index_a);
    }
    if resolved.polynom_b {
        apply_polynom_errors(&mut perturbed, Polynom::B, resolved.index_b);
    }
    apply_alignment_errors(&mut perturbed, &resolved);
    PerturbedLattice { ring: perturbed }
}
