//! Ordered lattice container, element selection and reference points.

use std::sync::Arc;

use globset::Glob;
use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementKind};
use crate::errors::{BeamError, ErrorInfo};

fn selection_error(code: &str, message: impl std::fmt::Display) -> BeamError {
    BeamError::Selection(ErrorInfo::new(code, message.to_string()))
}

/// Ordered model of an accelerator beamline plus global parameters.
///
/// Elements are stored behind `Arc` so that a perturbed copy of the machine
/// can share every untouched element with the pristine one; mutation goes
/// through [`Lattice::element_mut`], which deep-copies an element only when
/// it is still shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// Name of the machine.
    pub name: String,
    /// Beam energy in eV.
    pub energy: f64,
    /// Number of identical super-periods composing the full ring.
    pub periodicity: u32,
    elements: Vec<Arc<Element>>,
}

impl Lattice {
    /// Creates a lattice from an ordered element sequence.
    pub fn new(name: impl Into<String>, energy: f64, elements: Vec<Element>) -> Self {
        Self {
            name: name.into(),
            energy,
            periodicity: 1,
            elements: elements.into_iter().map(Arc::new).collect(),
        }
    }

    /// Number of elements in one super-period.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns whether the lattice contains no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Total path length of the full ring in metres.
    pub fn circumference(&self) -> f64 {
        let period: f64 = self.elements.iter().map(|e| e.length).sum();
        period * f64::from(self.periodicity)
    }

    /// Returns the element at `index`.
    ///
    /// # Panics
    /// Panics when `index` is out of range, like slice indexing.
    pub fn element(&self, index: usize) -> &Element {
        &self.elements[index]
    }

    /// Returns a mutable reference to the element at `index`, deep-copying it
    /// first if it is still shared with another lattice.
    pub fn element_mut(&mut self, index: usize) -> &mut Element {
        Arc::make_mut(&mut self.elements[index])
    }

    /// Iterates over the elements in lattice order.
    pub fn elements(&self) -> impl ExactSizeIterator<Item = &Element> {
        self.elements.iter().map(|e| e.as_ref())
    }

    /// Returns whether the element at `index` is backed by the same
    /// allocation in both lattices (copy-on-write sharing diagnostic).
    pub fn shares_element(&self, other: &Lattice, index: usize) -> bool {
        match (self.elements.get(index), other.elements.get(index)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Resolves a selector to the ordered indices of the matching elements.
    pub fn get_elements(&self, selector: &ElementSelector) -> Result<Vec<usize>, BeamError> {
        let matcher: Box<dyn Fn(&Element) -> bool> = match selector {
            ElementSelector::All => Box::new(|_| true),
            ElementSelector::Kind(kind) => {
                let kind = *kind;
                Box::new(move |e: &Element| e.kind == kind)
            }
            ElementSelector::Name(name) => {
                let name = name.clone();
                Box::new(move |e: &Element| e.name == name)
            }
            ElementSelector::Pattern(pattern) => {
                let glob = Glob::new(pattern)
                    .map_err(|err| {
                        selection_error("selector-glob", err)
                    })?
                    .compile_matcher();
                Box::new(move |e: &Element| glob.is_match(&e.name))
            }
        };
        Ok(self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| matcher(e))
            .map(|(idx, _)| idx)
            .collect())
    }

    /// Returns the elements sitting at the resolved reference points, in
    /// lattice order. The end-of-line position carries no element and yields
    /// `None`.
    pub fn refpts_elements(&self, refpts: &RefPoints) -> Result<Vec<Option<&Element>>, BeamError> {
        let indices = refpts.resolve(self)?;
        Ok(indices
            .into_iter()
            .map(|idx| self.elements.get(idx).map(|e| e.as_ref()))
            .collect())
    }
}

/// Polymorphic element selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementSelector {
    /// Every element of the lattice.
    All,
    /// Every element of the given kind.
    Kind(ElementKind),
    /// Every element whose family name matches exactly.
    Name(String),
    /// Every element whose family name matches a Unix shell-style glob.
    Pattern(String),
}

/// Reference-point specification along the lattice.
///
/// A reference point `i < len` denotes the entrance of element `i`; the
/// index `len` denotes the exit of the last element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefPoints {
    /// Entrance of every element.
    All,
    /// Exit of the last element only.
    End,
    /// Boolean mask over positions; length `len` or `len + 1`.
    Mask(Vec<bool>),
    /// Explicit positions, strictly increasing.
    Indices(Vec<usize>),
}

impl RefPoints {
    /// Resolves the specification to ordered position indices.
    pub fn resolve(&self, lattice: &Lattice) -> Result<Vec<usize>, BeamError> {
        let n = lattice.len();
        match self {
            RefPoints::All => Ok((0..n).collect()),
            RefPoints::End => Ok(vec![n]),
            RefPoints::Mask(mask) => {
                if mask.len() != n && mask.len() != n + 1 {
                    return Err(selection_error(
                        "refpts-mask-length",
                        format!(
                            "mask of length {} does not fit a lattice of {} elements",
                            mask.len(),
                            n
                        ),
                    ));
                }
                Ok(mask
                    .iter()
                    .enumerate()
                    .filter(|(_, &flag)| flag)
                    .map(|(idx, _)| idx)
                    .collect())
            }
            RefPoints::Indices(indices) => {
                for pair in indices.windows(2) {
                    if pair[0] >= pair[1] {
                        return Err(selection_error(
                            "refpts-order",
                            format!("indices must be strictly increasing, got {pair:?}"),
                        ));
                    }
                }
                if let Some(&last) = indices.last() {
                    if last > n {
                        return Err(selection_error(
                            "refpts-bounds",
                            format!("index {last} exceeds end-of-line position {n}"),
                        ));
                    }
                }
                Ok(indices.clone())
            }
        }
    }
}
