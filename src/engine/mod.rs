//! Pay-schedule and bill-allocation engine
//!
//! Pure computations over in-memory snapshots: date generation, bill matching,
//! rebalancing and surplus detection. Nothing in here touches storage.

pub mod calendar;
pub mod generate;
pub mod lattice;
pub mod matcher;
pub mod optimizer;
pub mod surplus;

pub use generate::{generate, occurrences};
pub use lattice::CyclicLattice;
pub use matcher::{auto_assign, AssignmentPlan, BillFailure, ExistingAssignment, MatchRequest};
pub use optimizer::{
    optimize, optimize_with_policy, MoveSuggestion, OptimizationResult, OptimizerPolicy,
};
pub use surplus::{detect_surplus, SurplusMonth, SurplusReport};
