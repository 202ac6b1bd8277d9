//! Thin-lens linear reference model.
//!
//! `LinearModel` implements the three solver traits from a first-order
//! single-pass propagation: drifts advance positions by the transverse
//! momenta, magnets contribute thin-lens steering kicks from quadrupole
//! feed-down when the magnet is displaced. It keeps the error-injection
//! pipeline testable without an external physics engine; it is not a
//! substitute for a real integrator.

use serde::{Deserialize, Serialize};

use beam_core::{BeamError, Element, Lattice, RefPoints};

use crate::results::{LocalOptics, OpticsResult, OrbitResult, RingOptics, TrackingResult};
use crate::solver::{OpticsSolver, OrbitSolver, TrackingSolver};

/// Deterministic first-order model of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// Beta functions assumed constant along the line, per plane.
    pub beta: [f64; 2],
    /// Betatron tunes reported by the optics analysis.
    pub tunes: [f64; 2],
}

impl Default for LinearModel {
    fn default() -> Self {
        Self {
            beta: [10.0, 5.0],
            tunes: [0.31, 0.27],
        }
    }
}

impl LinearModel {
    fn propagate(element: &Element, state: &mut [f64; 6]) {
        state[0] += state[1] * element.length;
        state[2] += state[3] * element.length;
        // Quadrupole feed-down: a displaced gradient magnet steers the beam.
        if element.polynom_b.len() > 1 {
            let k1l = element.polynom_b[1] * element.length;
            state[1] += k1l * element.shift[0];
            state[3] -= k1l * element.shift[1];
        }
        // A rolled dipole leaks part of its bend into the vertical plane.
        if let Some(&b0) = element.polynom_b.first() {
            let kick = b0 * element.length;
            state[3] += kick * element.rotation[0].sin();
        }
    }

    fn pass(
        lattice: &Lattice,
        start: &[f64; 6],
        positions: &[usize],
    ) -> (Vec<[f64; 6]>, [f64; 6]) {
        let mut state = *start;
        let mut samples = vec![[0.0; 6]; positions.len()];
        let mut cursor = 0;
        for (idx, element) in lattice.elements().enumerate() {
            while cursor < positions.len() && positions[cursor] == idx {
                samples[cursor] = state;
                cursor += 1;
            }
            Self::propagate(element, &mut state);
        }
        while cursor < positions.len() {
            samples[cursor] = state;
            cursor += 1;
        }
        (samples, state)
    }
}

impl OrbitSolver for LinearModel {
    fn find_orbit(
        &self,
        lattice: &Lattice,
        refpts: &RefPoints,
    ) -> Result<OrbitResult, BeamError> {
        let positions = refpts.resolve(lattice)?;
        let reference = [0.0; 6];
        let (orbit, _) = Self::pass(lattice, &reference, &positions);
        Ok(OrbitResult { reference, orbit })
    }
}

impl OpticsSolver for LinearModel {
    fn get_optics(
        &self,
        lattice: &Lattice,
        refpts: &RefPoints,
    ) -> Result<OpticsResult, BeamError> {
        let positions = refpts.resolve(lattice)?;
        let (orbit, _) = Self::pass(lattice, &[0.0; 6], &positions);

        let mut s_table = Vec::with_capacity(lattice.len() + 1);
        let mut s = 0.0;
        s_table.push(0.0);
        for element in lattice.elements() {
            s += element.length;
            s_table.push(s);
        }
        let circumference = lattice.circumference().max(f64::MIN_POSITIVE);

        let local = |position: usize, closed_orbit: [f64; 6]| LocalOptics {
            s_pos: s_table[position],
            alpha: [0.0; 2],
            beta: self.beta,
            mu: [
                2.0 * std::f64::consts::PI * self.tunes[0] * s_table[position] / circumference,
                2.0 * std::f64::consts::PI * self.tunes[1] * s_table[position] / circumference,
            ],
            dispersion: [0.0; 4],
            closed_orbit,
        };

        let elements = positions
            .iter()
            .zip(orbit)
            .map(|(&position, closed_orbit)| local(position, closed_orbit))
            .collect();
        Ok(OpticsResult {
            ring: RingOptics {
                tunes: self.tunes,
                chromaticities: [0.0; 2],
            },
            entrance: local(0, [0.0; 6]),
            elements,
        })
    }
}

impl TrackingSolver for LinearModel {
    fn track(
        &self,
        lattice: &Lattice,
        r_in: &[[f64; 6]],
        nturns: usize,
        refpts: &RefPoints,
    ) -> Result<TrackingResult, BeamError> {
        let positions = refpts.resolve(lattice)?;
        let mut result = TrackingResult::zeros(r_in.len(), positions.len(), nturns);
        for (particle, start) in r_in.iter().enumerate() {
            let mut state = *start;
            for turn in 0..nturns {
                let (samples, end) = Self::pass(lattice, &state, &positions);
                for (refpt, sample) in samples.into_iter().enumerate() {
                    *result.at_mut(particle, refpt, turn)? = sample;
                }
                state = end;
            }
        }
        Ok(result)
    }
}
