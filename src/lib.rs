//! breakscan: breakout and crossover strategy evaluator over daily bars.
//!
//! Hexagonal architecture: the pure evaluation core lives in [`domain`],
//! collaborator traits in [`ports`], concrete I/O in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
