//! # Dataset Generation
//!
//! Builds the synthetic movie dataset in memory from a fixed catalog of
//! names and titles plus a seeded RNG. Nothing here touches the store; see
//! [`crate::output::direct`] for insertion.

pub mod catalog;
pub mod engine;

pub use engine::{generate_dataset, seed_from_clock, GenerateOptions};
