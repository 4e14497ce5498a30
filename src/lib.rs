//! portfolio-figures: risk and return statistics for a BTC/ETH/GOLD allocation.
//!
//! Hexagonal architecture: the analytics pipeline in [`domain`], port traits in
//! [`ports`], concrete price stores, config and HTTP in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
