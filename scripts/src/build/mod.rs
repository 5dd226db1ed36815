//! Access to the compiled contract artifacts

/// Hardhat artifact files
mod artifact;

pub use artifact::{BuildInfo, ContractArtifact};
