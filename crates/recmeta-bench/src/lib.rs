//! Music library generator and benchmark utilities for recmeta.
//!
//! This crate provides deterministic generation of noisy recording
//! collections for benchmarking and invariant testing of `recmeta-core`.

pub mod correctness;
pub mod generator;

pub use generator::{GeneratedLibrary, GeneratorConfig, SizeTier, generate_library};
