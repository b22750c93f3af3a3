//! Post-processing of model output.

pub mod json;
