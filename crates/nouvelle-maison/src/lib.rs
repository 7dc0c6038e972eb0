//! Front desk for the MaNouvelleMaison listing platform.
//!
//! Property search, the notary directory, seller submissions, and the
//! simulated visit, rental, and appointment flows all live here. Nothing is
//! persisted: fixtures are embedded and every "network" call is a fixed delay.

pub mod catalog;
pub mod config;
pub mod error;
pub mod i18n;
pub mod telemetry;
pub mod workflows;
