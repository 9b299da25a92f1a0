//! Bestgo - service marketplace backend
//!
//! Users open service requests, masters offer services, and each request is
//! matched against the masters offering its service. The scoring core lives
//! in [`core`]; everything around it is storage and JSON plumbing.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{calculate_priority, Matcher, MatchResult};
pub use models::{Candidate, MatchRecord, MatchWeights, ScoredCandidate, ServiceRequest};
pub use services::{MatchError, MatchOutcome, MatchRepository, MatchService};
