//! Error amplitude descriptors and their broadcast rules.

use serde::{Deserialize, Serialize};

use beam_core::{BeamError, ErrorInfo};

/// Amplitude of one error contribution, in one of the supported shapes.
///
/// A scalar (or length-1 vector) spans all selected elements and every
/// coordinate component of the attribute; a per-plane vector spans all
/// elements with distinct per-component values; a per-element table supplies
/// one row per selected element, each row a scalar or a full per-component
/// set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ErrorAmplitude {
    /// One value for every element and component.
    Scalar(f64),
    /// One value per component, shared by all elements.
    PerPlane(Vec<f64>),
    /// One row per selected element.
    PerElement(Vec<Vec<f64>>),
}

impl ErrorAmplitude {
    /// Validates the amplitude against the selection and returns its
    /// broadcast width (number of components it supplies).
    pub(crate) fn width(
        &self,
        attr: &str,
        n_elements: usize,
        planes: Option<usize>,
    ) -> Result<usize, BeamError> {
        let supplied = self.summary();
        let check_width = |width: usize| -> Result<usize, BeamError> {
            if width == 0 {
                return Err(shape_error(attr, supplied.clone(), "empty amplitude vector"));
            }
            if let Some(planes) = planes {
                if width != 1 && width != planes {
                    return Err(shape_error(
                        attr,
                        supplied.clone(),
                        format!("width {width} does not broadcast to {planes} component(s)"),
                    ));
                }
            }
            Ok(width)
        };
        match self {
            ErrorAmplitude::Scalar(_) => Ok(1),
            ErrorAmplitude::PerPlane(values) => check_width(values.len()),
            ErrorAmplitude::PerElement(rows) => {
                if rows.len() != n_elements {
                    return Err(shape_error(
                        attr,
                        supplied.clone(),
                        format!(
                            "{} row(s) supplied for {} selected element(s)",
                            rows.len(),
                            n_elements
                        ),
                    ));
                }
                if rows.is_empty() {
                    return Ok(1);
                }
                let width = check_width(rows.first().map_or(0, Vec::len))?;
                if rows.iter().any(|row| row.len() != width) {
                    return Err(shape_error(
                        attr,
                        supplied.clone(),
                        "ragged per-element rows",
                    ));
                }
                Ok(width)
            }
        }
    }

    /// Rendering of the supplied values for shape diagnostics.
    pub(crate) fn summary(&self) -> String {
        match self {
            ErrorAmplitude::Scalar(value) => value.to_string(),
            ErrorAmplitude::PerPlane(values) => format!("{values:?}"),
            ErrorAmplitude::PerElement(rows) => format!("{rows:?}"),
        }
    }

    /// Broadcast lookup of the value for one element and component.
    pub(crate) fn value(&self, element: usize, plane: usize) -> f64 {
        match self {
            ErrorAmplitude::Scalar(value) => *value,
            ErrorAmplitude::PerPlane(values) => values[plane.min(values.len() - 1)],
            ErrorAmplitude::PerElement(rows) => {
                let row = &rows[element];
                row[plane.min(row.len() - 1)]
            }
        }
    }
}

pub(crate) fn shape_error(
    attr: &str,
    supplied: impl Into<String>,
    message: impl std::fmt::Display,
) -> BeamError {
    BeamError::Shape(
        ErrorInfo::new("error-shape", message.to_string())
            .with_context("attribute", attr)
            .with_context("supplied", supplied),
    )
}

impl From<f64> for ErrorAmplitude {
    fn from(value: f64) -> Self {
        ErrorAmplitude::Scalar(value)
    }
}

impl From<[f64; 2]> for ErrorAmplitude {
    fn from(values: [f64; 2]) -> Self {
        ErrorAmplitude::PerPlane(values.to_vec())
    }
}

impl From<[f64; 3]> for ErrorAmplitude {
    fn from(values: [f64; 3]) -> Self {
        ErrorAmplitude::PerPlane(values.to_vec())
    }
}

impl From<Vec<f64>> for ErrorAmplitude {
    fn from(values: Vec<f64>) -> Self {
        ErrorAmplitude::PerPlane(values)
    }
}

impl From<Vec<Vec<f64>>> for ErrorAmplitude {
    fn from(rows: Vec<Vec<f64>>) -> Self {
        ErrorAmplitude::PerElement(rows)
    }
}

/// Complete specification of one error attribute: an optional systematic
/// part applied unchanged to every selected element, plus a random part
/// taken as the standard deviation of the sampled distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorSpec {
    /// Fixed contribution shared by the whole selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub systematic: Option<ErrorAmplitude>,
    /// Standard deviation of the stochastic contribution.
    pub random: ErrorAmplitude,
}

impl ErrorSpec {
    /// Purely random specification with the given standard deviation.
    pub fn random(sigma: impl Into<ErrorAmplitude>) -> Self {
        Self {
            systematic: None,
            random: sigma.into(),
        }
    }

    /// Purely systematic specification; nothing is drawn from the RNG.
    pub fn systematic(value: impl Into<ErrorAmplitude>) -> Self {
        Self {
            systematic: Some(value.into()),
            random: ErrorAmplitude::Scalar(0.0),
        }
    }

    /// Adds a systematic part to this specification.
    pub fn with_systematic(mut self, value: impl Into<ErrorAmplitude>) -> Self {
        self.systematic = Some(value.into());
        self
    }
}

impl From<f64> for ErrorSpec {
    fn from(sigma: f64) -> Self {
        ErrorSpec::random(sigma)
    }
}

impl From<[f64; 2]> for ErrorSpec {
    fn from(sigma: [f64; 2]) -> Self {
        ErrorSpec::random(sigma)
    }
}

impl From<[f64; 3]> for ErrorSpec {
    fn from(sigma: [f64; 3]) -> Self {
        ErrorSpec::random(sigma)
    }
}

impl From<Vec<f64>> for ErrorSpec {
    fn from(sigma: Vec<f64>) -> Self {
        ErrorSpec::random(sigma)
    }
}

impl<S: Into<ErrorAmplitude>, R: Into<ErrorAmplitude>> From<(S, R)> for ErrorSpec {
    fn from((systematic, random): (S, R)) -> Self {
        Self {
            systematic: Some(systematic.into()),
            random: random.into(),
        }
    }
}
