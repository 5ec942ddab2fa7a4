//! Core domain types and logic.

pub mod trade;
pub mod ledger;
pub mod filter;
pub mod metrics;
pub mod selection;
pub mod analysis;
pub mod error;
