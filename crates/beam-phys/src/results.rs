//! Result shapes produced by the physics solvers.

use serde::{Deserialize, Serialize};

use beam_core::{BeamError, ErrorInfo};

/// Closed-orbit search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitResult {
    /// Orbit at the lattice entrance.
    pub reference: [f64; 6],
    /// One 6-D phase-space vector per resolved reference point.
    pub orbit: Vec<[f64; 6]>,
}

/// Linear optics functions at one reference point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalOptics {
    /// Path length from the lattice entrance in metres.
    pub s_pos: f64,
    /// Alpha functions per transverse plane.
    pub alpha: [f64; 2],
    /// Beta functions per transverse plane in metres.
    pub beta: [f64; 2],
    /// Betatron phase advance per transverse plane in radians.
    pub mu: [f64; 2],
    /// Dispersion (eta_x, eta'_x, eta_y, eta'_y).
    pub dispersion: [f64; 4],
    /// Closed orbit at this point.
    pub closed_orbit: [f64; 6],
}

/// Ring-wide linear optics quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingOptics {
    /// Betatron tunes per transverse plane.
    pub tunes: [f64; 2],
    /// Chromaticities per transverse plane.
    pub chromaticities: [f64; 2],
}

/// Linear optics analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpticsResult {
    /// Ring-wide quantities.
    pub ring: RingOptics,
    /// Optics at the lattice entrance.
    pub entrance: LocalOptics,
    /// Optics at every resolved reference point, in lattice order.
    pub elements: Vec<LocalOptics>,
}

/// Multi-turn tracking output.
///
/// Stores the [plane × particle × refpt × turn] coordinate array of the
/// tracking engine flattened into a vector of 6-D samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingResult {
    /// Number of tracked particles.
    pub particles: usize,
    /// Number of resolved reference points.
    pub refpts: usize,
    /// Number of tracked turns.
    pub turns: usize,
    coords: Vec<[f64; 6]>,
}

impl TrackingResult {
    /// Creates a zero-filled tracking array of the given dimensions.
    pub fn zeros(particles: usize, refpts: usize, turns: usize) -> Self {
        Self {
            particles,
            refpts,
            turns,
            coords: vec![[0.0; 6]; particles * refpts * turns],
        }
    }

    fn offset(&self, particle: usize, refpt: usize, turn: usize) -> Result<usize, BeamError> {
        if particle >= self.particles || refpt >= self.refpts || turn >= self.turns {
            return Err(BeamError::Shape(
                ErrorInfo::new(
                    "tracking-index",
                    format!("index ({particle}, {refpt}, {turn}) outside tracking array"),
                )
                .with_context(
                    "dims",
                    format!("({}, {}, {})", self.particles, self.refpts, self.turns),
                ),
            ));
        }
        Ok((turn * self.refpts + refpt) * self.particles + particle)
    }

    /// Returns the sample for one particle at one reference point and turn.
    pub fn at(&self, particle: usize, refpt: usize, turn: usize) -> Result<&[f64; 6], BeamError> {
        let offset = self.offset(particle, refpt, turn)?;
        Ok(&self.coords[offset])
    }

    /// Mutable access to the sample for one particle at one reference point
    /// and turn.
    pub fn at_mut(
        &mut self,
        particle: usize,
        refpt: usize,
        turn: usize,
    ) -> Result<&mut [f64; 6], BeamError> {
        let offset = self.offset(particle, refpt, turn)?;
        Ok(&mut self.coords[offset])
    }
}
