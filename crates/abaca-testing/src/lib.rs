//! Testing infrastructure for abaca integration tests.
//!
//! - `TestWorld`: isolated workspace with list files, config and CLI runner
//! - `fixtures`: marketplace records in the shapes the backend returns
//! - `fakes`: in-memory fetch and mutation collaborators
//! - `assertions`: checks against `view --format json` output

pub mod assertions;
pub mod fakes;
pub mod fixtures;
pub mod world;

pub use world::{CliResult, TestWorld};
