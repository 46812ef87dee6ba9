//! Constrained giver → recipient assignment.
//!
//! Purpose
//! - Turn a participant list with per-giver exclusions into a permutation
//!   without fixed points that respects every exclusion, or report why none
//!   exists.
//!
//! Pipeline
//! - `build`: exclusion index, then the compatibility graph (deterministic).
//! - `validate`: structural checks, degree warnings, then a global
//!   feasibility test (exact Hall test for small N, heuristic above).
//! - `dfs`: randomized-order backtracking; the only correctness contract.
//! - `retry`: the old greedy retry loop, kept as a comparison baseline.
//!
//! Callers should run [`validate`] before [`draw`]; the search discovers
//! infeasibility only by exhausting the tree, which can take factorial time.
//! [`draw_validated`] bundles both.

mod build;
mod dfs;
mod retry;
mod stats;
mod types;
mod validate;

pub use build::{build_exclusion_index, build_graph, compatibility_graph};
pub use dfs::{
    draw, draw_validated, draw_with, draw_with_rng, draw_with_stats, draw_with_stats_rng, search,
};
pub use retry::{draw_naive, RetryOutcome};
pub use types::{
    Assignment, CompatibilityGraph, DrawError, DrawStats, ExclusionIndex, Pairing, RetryCfg,
    SearchCfg, ValidateCfg, ValidationResult, HALL_EXACT_CAP,
};
pub use validate::{
    hall_violation, heuristic_feasible, validate, validate_quick, validate_with, HallViolation,
    HeuristicFailure,
};

#[cfg(test)]
mod proptests;
