//! Anti-repetition selection: recency ledger, weighted draw and balanced
//! batch planning.

pub mod history;
pub mod planner;
pub mod sampler;

pub use history::{HistoryStore, DEFAULT_WINDOW};
pub use planner::{BalancedBatchPlanner, BatchPlan};
pub use sampler::{SamplingPolicies, WeightPolicy, WeightedSampler};
