//! Image metadata decoded from registry manifests

pub mod provenance;

pub use provenance::{BUILD_NAME_VAR, Provenance};
