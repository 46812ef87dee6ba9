//! Pre-flight feasibility checks.
//!
//! Purpose
//! - Reject inputs that cannot produce an assignment before the search runs,
//!   and surface data-quality warnings without touching the participants.
//!
//! Why two feasibility tests
//! - A non-zero out-degree for every giver does not imply a perfect matching
//!   exists (two givers whose only option is the same recipient).
//! - Hall's condition is exact but enumerates 2^N giver subsets, so it only
//!   runs up to `ValidateCfg::exact_limit`. Larger inputs get a polynomial
//!   heuristic that is sound (never rejects a feasible input) but incomplete:
//!   it can pass inputs the search later fails on.

use std::collections::HashSet;

use crate::participant::Participant;

use super::build::{build_exclusion_index, build_graph};
use super::types::{CompatibilityGraph, ValidateCfg, ValidationResult, HALL_EXACT_CAP};

/// Validate with default configuration.
pub fn validate(participants: &[Participant]) -> ValidationResult {
    validate_with(participants, ValidateCfg::default())
}

/// Run every structural and feasibility check, collecting all diagnostics.
pub fn validate_with(participants: &[Participant], cfg: ValidateCfg) -> ValidationResult {
    let n = participants.len();
    let mut res = ValidationResult::new(n);

    if n == 0 {
        res.error("no participants provided");
        return res;
    }
    if n < 2 {
        res.error("need at least 2 participants");
        return res;
    }

    let mut names: HashSet<&str> = HashSet::with_capacity(n);
    for p in participants {
        if !names.insert(p.name.as_str()) {
            res.error(format!("duplicate participant name: {}", p.name));
        }
    }

    for p in participants {
        if p.contact_info.is_empty() {
            res.warn(format!("participant {} has no contact info", p.name));
        }
        for excluded in &p.exclusions {
            if !names.contains(excluded.as_str()) {
                res.warn(format!(
                    "participant {} excludes non-existent participant: {}",
                    p.name, excluded
                ));
            }
        }
    }

    let graph = build_graph(participants, &build_exclusion_index(participants));
    for (i, p) in participants.iter().enumerate() {
        if graph.out_degree(i) == 0 {
            res.participants_with_no_options.push(p.name.clone());
            res.error(format!(
                "participant {} has no valid recipients (excluded everyone or too many exclusions)",
                p.name
            ));
        }
    }

    res.min_compatibility = graph.min_degree();
    res.avg_compatibility = graph.avg_degree();

    if res.is_valid && res.min_compatibility < 2 && n > 3 {
        res.warn(format!(
            "low compatibility detected: some participants only have {} valid recipient(s)",
            res.min_compatibility
        ));
    }
    if res.is_valid && res.avg_compatibility < n as f64 / 2.0 {
        res.warn(format!(
            "low average compatibility: {:.1} out of {} possible recipients",
            res.avg_compatibility,
            n - 1
        ));
    }

    if res.is_valid {
        if n <= cfg.exact_limit.min(HALL_EXACT_CAP) {
            if let Some(v) = hall_violation(&graph) {
                let givers = names_of(participants, &v.givers);
                let recipients = names_of(participants, &v.recipients);
                res.error(format!(
                    "impossible configuration detected: constraints are too restrictive \
                     (Hall's Marriage Theorem violation: {givers} can only give to {recipients})"
                ));
            }
        } else if let Err(reason) = heuristic_feasible(&graph) {
            res.error(format!(
                "impossible configuration detected: constraints appear too restrictive ({})",
                reason.describe(participants)
            ));
        }
    }

    tracing::debug!(
        participants = n,
        valid = res.is_valid,
        errors = res.errors.len(),
        warnings = res.warnings.len(),
        "validate"
    );
    res
}

/// Cheap check: at least two participants and every giver has one option.
///
/// Passing this does not mean a draw will succeed; see [`validate`].
pub fn validate_quick(participants: &[Participant]) -> bool {
    if participants.len() < 2 {
        return false;
    }
    let index = build_exclusion_index(participants);
    participants.iter().enumerate().all(|(i, giver)| {
        participants
            .iter()
            .enumerate()
            .any(|(j, r)| i != j && !index.excludes(&giver.name, &r.name))
    })
}

/// A giver subset whose combined options are fewer than its size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HallViolation {
    pub givers: Vec<usize>,
    pub recipients: Vec<usize>,
}

/// Exhaustive Hall test over all non-empty giver subsets.
///
/// Returns the first violating subset in mask order, or `None` when a perfect
/// matching exists. Exponential; callers cap the graph size.
///
/// # Panics
///
/// If the graph has more than [`HALL_EXACT_CAP`] givers.
pub fn hall_violation(graph: &CompatibilityGraph) -> Option<HallViolation> {
    let n = graph.len();
    assert!(n <= HALL_EXACT_CAP, "exact Hall test is capped at {HALL_EXACT_CAP} participants");
    let nbr: Vec<u32> = graph
        .adj
        .iter()
        .map(|out| out.iter().fold(0u32, |m, &r| m | (1 << r)))
        .collect();
    for mask in 1u32..(1u32 << n) {
        let mut union = 0u32;
        let mut rest = mask;
        while rest != 0 {
            let i = rest.trailing_zeros() as usize;
            union |= nbr[i];
            rest &= rest - 1;
        }
        if union.count_ones() < mask.count_ones() {
            return Some(HallViolation {
                givers: bits(mask),
                recipients: bits(union),
            });
        }
    }
    None
}

/// Why the heuristic rejected an input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeuristicFailure {
    /// Fewer edges than participants.
    TooFewEdges { edges: usize, participants: usize },
    /// Nobody may give to this recipient.
    Unreachable { recipient: usize },
    /// Two recipients whose combined givers cannot cover both of them.
    SharedProvider {
        recipients: (usize, usize),
        givers: Vec<usize>,
    },
}

impl HeuristicFailure {
    fn describe(&self, participants: &[Participant]) -> String {
        match self {
            Self::TooFewEdges {
                edges,
                participants: n,
            } => format!("only {edges} allowed pairings for {n} participants"),
            Self::Unreachable { recipient } => {
                format!("nobody may give to {}", participants[*recipient].name)
            }
            Self::SharedProvider { recipients, givers } => format!(
                "{} and {} can only receive from {}",
                participants[recipients.0].name,
                participants[recipients.1].name,
                names_of(participants, givers)
            ),
        }
    }
}

/// Polynomial best-effort feasibility filter for large inputs.
///
/// Every rejection is a genuine Hall violation on the recipient side, so a
/// feasible input is never rejected; the converse does not hold.
pub fn heuristic_feasible(graph: &CompatibilityGraph) -> Result<(), HeuristicFailure> {
    let n = graph.len();
    let edges = graph.edge_count();
    if edges < n {
        return Err(HeuristicFailure::TooFewEdges {
            edges,
            participants: n,
        });
    }
    let givers_to = graph.givers_to();
    if let Some(recipient) = givers_to.iter().position(Vec::is_empty) {
        return Err(HeuristicFailure::Unreachable { recipient });
    }
    // Only recipients with at most two possible givers can collide cheaply.
    let scarce: Vec<usize> = (0..n).filter(|&j| givers_to[j].len() <= 2).collect();
    for (a, &i) in scarce.iter().enumerate() {
        for &j in &scarce[a + 1..] {
            let mut pool = givers_to[i].clone();
            for &g in &givers_to[j] {
                if !pool.contains(&g) {
                    pool.push(g);
                }
            }
            if pool.len() < 2 {
                pool.sort_unstable();
                return Err(HeuristicFailure::SharedProvider {
                    recipients: (i, j),
                    givers: pool,
                });
            }
        }
    }
    Ok(())
}

fn bits(mut mask: u32) -> Vec<usize> {
    let mut out = Vec::with_capacity(mask.count_ones() as usize);
    while mask != 0 {
        out.push(mask.trailing_zeros() as usize);
        mask &= mask - 1;
    }
    out
}

fn names_of(participants: &[Participant], idx: &[usize]) -> String {
    if idx.is_empty() {
        return "nobody".to_string();
    }
    idx.iter()
        .map(|&i| participants[i].name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
