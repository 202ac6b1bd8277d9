#![deny(missing_docs)]

//! Core data model for accelerator lattice error studies: elements, the
//! ordered lattice container, element selection, reference points, geometry
//! primitives, structured errors and deterministic RNG helpers.

pub mod element;
pub mod errors;
pub mod lattice;
pub mod rng;

pub use element::{rotate_element, shift_element, Element, ElementKind};
pub use errors::{BeamError, ErrorInfo};
pub use lattice::{ElementSelector, Lattice, RefPoints};
pub use rng::{derive_substream_seed, RngHandle};
