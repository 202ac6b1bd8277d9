//! Truncated-Gaussian sampling of error values.

use rand_distr::{Distribution, Normal};

use beam_core::{BeamError, ErrorInfo, RngHandle};

use crate::amplitude::{shape_error, ErrorSpec};

fn distribution_error(message: impl std::fmt::Display) -> BeamError {
    BeamError::Distribution(ErrorInfo::new("error-distribution", message.to_string()))
}

/// Draws a standard normal variate, rejection-truncated to `[-t, t]` when a
/// truncation bound is given.
fn standard_draw(
    normal: &Normal<f64>,
    truncation: Option<f64>,
    rng: &mut RngHandle,
) -> f64 {
    match truncation {
        None => normal.sample(rng),
        Some(bound) => loop {
            let draw = normal.sample(rng);
            if draw.abs() <= bound {
                break draw;
            }
        },
    }
}

/// Samples one error value per selected element and coordinate component.
///
/// The result has exactly `n_elements` rows; the row width is the broadcast
/// width of the systematic and random amplitudes (validated against
/// `planes`, the component count of the attribute, when bounded). Each value
/// is `systematic + z * sigma` with `z` standard normal; when the random
/// amplitude has width one, a single draw per element is shared by all
/// components, mirroring array broadcasting of the sigma vector.
///
/// All shapes are validated before any draw is taken, so a failure consumes
/// no entropy. Deterministic for a fixed RNG state.
pub fn sample_values(
    attr: &str,
    spec: &ErrorSpec,
    n_elements: usize,
    planes: Option<usize>,
    truncation: Option<f64>,
    rng: &mut RngHandle,
) -> Result<Vec<Vec<f64>>, BeamError> {
    if let Some(bound) = truncation {
        if !bound.is_finite() || bound <= 0.0 {
            return Err(distribution_error(format!(
                "truncation bound must be finite and positive, got {bound}"
            )));
        }
    }

    let random_width = spec.random.width(attr, n_elements, planes)?;
    let width = match &spec.systematic {
        None => random_width,
        Some(systematic) => {
            let systematic_width = systematic.width(attr, n_elements, planes)?;
            if systematic_width != random_width && systematic_width != 1 && random_width != 1 {
                return Err(shape_error(
                    attr,
                    format!(
                        "systematic {}, random {}",
                        systematic.summary(),
                        spec.random.summary()
                    ),
                    format!(
                        "systematic width {systematic_width} and random width {random_width} \
                         do not broadcast together"
                    ),
                ));
            }
            systematic_width.max(random_width)
        }
    };

    let normal = Normal::new(0.0, 1.0).map_err(|err| distribution_error(err))?;
    let mut values = Vec::with_capacity(n_elements);
    for element in 0..n_elements {
        let draws: Vec<f64> = (0..random_width)
            .map(|_| standard_draw(&normal, truncation, rng))
            .collect();
        let mut row = Vec::with_capacity(width);
        for plane in 0..width {
            let draw = draws[if random_width == 1 { 0 } else { plane }];
            let sigma = spec.random.value(element, plane);
            let base = spec
                .systematic
                .as_ref()
                .map_or(0.0, |systematic| systematic.value(element, plane));
            row.push(base + draw * sigma);
        }
        values.push(row);
    }
    Ok(values)
}
