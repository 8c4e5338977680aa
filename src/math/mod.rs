//! Math utilities shared across the engine

pub mod transform;

pub use transform::{decompose_trs, invert_or_identity};
