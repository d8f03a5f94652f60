//! Simulation engine internals: match simulation, fixture generation,
//! standings, and career progression. The orchestration layer lives in
//! [`crate::league`].

pub mod progression;
pub mod schedule;
pub mod sim;
pub mod standings;

pub use sim::{simulate_match, BestOf, MatchOutcome};
