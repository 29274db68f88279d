//! Shared fixtures for the PLX integration tests, benches and sample
//! generator.

pub mod fixture;
