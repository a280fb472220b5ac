//! Nabeeh Domain Layer
//!
//! Core model and scoring rules for border-port incident risk analytics.
//! Everything here is pure: no I/O, no global state, deterministic for
//! identical inputs.
//!
//! ## Key Concepts
//!
//! - **Incident**: one detected violation with a type, severity, confidence
//!   and timestamp
//! - **Port / Inspector**: immutable reference data incidents point at
//! - **Filter**: a conjunction of optional predicates over incidents
//! - **Risk score**: sum of `weight * severity multiplier * confidence`
//! - **Risk level**: the score bucketed into LOW / MEDIUM / HIGH
//!
//! ## Architecture
//!
//! - Only `chrono` and `serde` as external dependencies
//! - Storage is reached through the [`traits::IncidentStore`] trait
//! - Aggregation over the store lives in `nabeeh-analytics`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod filter;
pub mod incident;
pub mod port;
pub mod scoring;
pub mod traits;
pub mod violation;

// Re-exports for convenience
pub use filter::IncidentFilter;
pub use incident::{Incident, IncidentSource, Severity};
pub use port::{Inspector, Port};
pub use scoring::{RiskLevel, RiskScorer, ScoringConfig};
pub use traits::IncidentStore;
pub use violation::ViolationType;
