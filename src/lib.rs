//! tradelens: analytics over a historical trade log.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`]. The [`cli`] module is the
//! presentation layer.

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
