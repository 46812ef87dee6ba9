//! Backtracking search producing a full assignment.
//!
//! Givers are visited in index order. At each giver a copy of its candidate
//! list is shuffled with the caller's RNG, so only the visitation order is
//! random; the graph stays fixed. Depth is bounded by N.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::participant::Participant;

use super::build::{build_exclusion_index, build_graph};
use super::types::{
    Assignment, CompatibilityGraph, DrawError, DrawStats, SearchCfg, ValidateCfg,
};
use super::validate::validate_with;

/// Draw with thread-local randomness and no step limit.
pub fn draw(participants: &[Participant]) -> Result<Assignment, DrawError> {
    draw_with_rng(participants, &mut rand::thread_rng())
}

/// Draw with an injected RNG; a seeded RNG replays the same assignment.
pub fn draw_with_rng<R: Rng + ?Sized>(
    participants: &[Participant],
    rng: &mut R,
) -> Result<Assignment, DrawError> {
    draw_with(participants, SearchCfg::default(), rng)
}

/// Draw with explicit search configuration.
pub fn draw_with<R: Rng + ?Sized>(
    participants: &[Participant],
    cfg: SearchCfg,
    rng: &mut R,
) -> Result<Assignment, DrawError> {
    let graph = build_graph(participants, &build_exclusion_index(participants));
    search(&graph, cfg, rng).0
}

/// Validate first and only search inputs the validator accepts.
pub fn draw_validated<R: Rng + ?Sized>(
    participants: &[Participant],
    vcfg: ValidateCfg,
    scfg: SearchCfg,
    rng: &mut R,
) -> Result<Assignment, DrawError> {
    let report = validate_with(participants, vcfg);
    if !report.is_valid {
        return Err(DrawError::Rejected(report));
    }
    draw_with(participants, scfg, rng)
}

/// Draw and collect diagnostics about the graph and the search.
pub fn draw_with_stats(participants: &[Participant]) -> (Result<Assignment, DrawError>, DrawStats) {
    draw_with_stats_rng(participants, SearchCfg::default(), &mut rand::thread_rng())
}

pub fn draw_with_stats_rng<R: Rng + ?Sized>(
    participants: &[Participant],
    cfg: SearchCfg,
    rng: &mut R,
) -> (Result<Assignment, DrawError>, DrawStats) {
    let graph = build_graph(participants, &build_exclusion_index(participants));
    let mut stats = DrawStats::from_graph(&graph);
    let (res, steps) = search(&graph, cfg, rng);
    stats.success = res.is_ok();
    stats.steps = steps;
    (res, stats)
}

/// Run the search over a prebuilt graph. Returns the result and the step count.
pub fn search<R: Rng + ?Sized>(
    graph: &CompatibilityGraph,
    cfg: SearchCfg,
    rng: &mut R,
) -> (Result<Assignment, DrawError>, u64) {
    let mut runner = Backtracker::new(graph, cfg, rng);
    let res = match runner.recur(0) {
        Outcome::Found => {
            let recipients = runner.assigned.into_iter().flatten().collect::<Vec<_>>();
            let assignment = Assignment { recipients };
            debug_assert!(assignment.is_valid_for(graph));
            Ok(assignment)
        }
        Outcome::Exhausted => Err(DrawError::NoValidAssignment),
        Outcome::Aborted => Err(DrawError::StepLimitExceeded {
            steps: runner.steps,
        }),
    };
    tracing::debug!(
        participants = graph.len(),
        steps = runner.steps,
        ok = res.is_ok(),
        "search"
    );
    (res, runner.steps)
}

enum Outcome {
    Found,
    Exhausted,
    Aborted,
}

/// Search state shared across recursion levels.
struct Backtracker<'a, R: ?Sized> {
    g: &'a CompatibilityGraph,
    cfg: SearchCfg,
    rng: &'a mut R,
    assigned: Vec<Option<usize>>,
    used: Vec<bool>,
    steps: u64,
}

impl<'a, R: Rng + ?Sized> Backtracker<'a, R> {
    fn new(g: &'a CompatibilityGraph, cfg: SearchCfg, rng: &'a mut R) -> Self {
        let n = g.len();
        Self {
            g,
            cfg,
            rng,
            assigned: vec![None; n],
            used: vec![false; n],
            steps: 0,
        }
    }

    fn recur(&mut self, giver: usize) -> Outcome {
        if giver == self.g.len() {
            return Outcome::Found;
        }
        let mut order = self.g.recipients(giver).to_vec();
        order.shuffle(&mut *self.rng);
        for r in order {
            if self.used[r] {
                continue;
            }
            if self.cfg.step_limit.is_some_and(|limit| self.steps >= limit) {
                return Outcome::Aborted;
            }
            self.steps += 1;
            self.assigned[giver] = Some(r);
            self.used[r] = true;
            match self.recur(giver + 1) {
                Outcome::Exhausted => {}
                done => return done,
            }
            self.used[r] = false;
            self.assigned[giver] = None;
        }
        Outcome::Exhausted
    }
}
