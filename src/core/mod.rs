// Core algorithm exports
pub mod matcher;
pub mod scoring;

pub use matcher::{Matcher, MatchResult};
pub use scoring::{calculate_priority, evaluate_criteria, priority_for};
