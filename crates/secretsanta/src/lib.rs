//! Secret Santa draw engine.
//!
//! Takes named participants with per-giver exclusions and produces a
//! giver → recipient permutation with no self-assignment and no excluded
//! pairing, or reports why none exists.
//!
//! Layout
//! - `participant`: caller-supplied records (read-only to the engine).
//! - `draw`: exclusion index, compatibility graph, validator, backtracking
//!   assigner, retry baseline and draw statistics.
//!
//! Every operation is a synchronous pure function over `&[Participant]`; the
//! result is a separate [`draw::Assignment`] table, so shared participant
//! slices can be drawn from concurrently.

pub mod draw;
pub mod participant;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use draw::{draw, draw_with_stats, validate, Assignment, DrawError, DrawStats, ValidationResult};
pub use participant::Participant;

/// Common exports for callers.
pub mod prelude {
    pub use crate::draw::{
        draw, draw_naive, draw_validated, draw_with, draw_with_rng, draw_with_stats,
        draw_with_stats_rng, validate, validate_quick, validate_with, Assignment, DrawError,
        DrawStats, Pairing, RetryCfg, RetryOutcome, SearchCfg, ValidateCfg, ValidationResult,
    };
    pub use crate::participant::Participant;
}
