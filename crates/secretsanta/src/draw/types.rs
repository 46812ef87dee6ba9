//! Data types for the compatibility graph, validation and search.
//!
//! Kept small and explicit to make `build`, `validate` and `dfs` easy to read.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::participant::Participant;

/// Giver name → names that giver refuses. Only givers with ≥1 exclusion appear.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExclusionIndex {
    pub(crate) map: HashMap<String, HashSet<String>>,
}

impl ExclusionIndex {
    #[inline]
    pub fn excludes(&self, giver: &str, recipient: &str) -> bool {
        self.map
            .get(giver)
            .is_some_and(|set| set.contains(recipient))
    }

    pub fn get(&self, giver: &str) -> Option<&HashSet<String>> {
        self.map.get(giver)
    }

    /// Number of givers that declare at least one exclusion.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Directed giver → recipient graph over participant positions.
///
/// `adj[i]` lists the allowed recipients of giver `i` in ascending index
/// order; the order is fixed by the input and carries no randomness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompatibilityGraph {
    pub adj: Vec<Vec<usize>>,
}

impl CompatibilityGraph {
    pub fn len(&self) -> usize {
        self.adj.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adj.is_empty()
    }

    #[inline]
    pub fn recipients(&self, giver: usize) -> &[usize] {
        &self.adj[giver]
    }

    #[inline]
    pub fn out_degree(&self, giver: usize) -> usize {
        self.adj[giver].len()
    }

    pub fn allows(&self, giver: usize, recipient: usize) -> bool {
        self.adj[giver].binary_search(&recipient).is_ok()
    }

    pub fn edge_count(&self) -> usize {
        self.adj.iter().map(Vec::len).sum()
    }

    /// Smallest out-degree; 0 for an empty graph.
    pub fn min_degree(&self) -> usize {
        self.adj.iter().map(Vec::len).min().unwrap_or(0)
    }

    /// Mean out-degree; 0.0 for an empty graph.
    pub fn avg_degree(&self) -> f64 {
        if self.adj.is_empty() {
            return 0.0;
        }
        self.edge_count() as f64 / self.adj.len() as f64
    }

    /// In-neighbour lists: `givers_to()[j]` holds every giver allowed to pick `j`.
    pub fn givers_to(&self) -> Vec<Vec<usize>> {
        let mut inv = vec![Vec::new(); self.adj.len()];
        for (giver, out) in self.adj.iter().enumerate() {
            for &r in out {
                inv[r].push(giver);
            }
        }
        inv
    }
}

/// Giver index → recipient index; always a full permutation without fixed points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub(crate) recipients: Vec<usize>,
}

/// A resolved giver/recipient pair borrowed from the participant slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pairing<'a> {
    pub giver: &'a Participant,
    pub recipient: &'a Participant,
}

impl Assignment {
    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }

    pub fn recipient_of(&self, giver: usize) -> Option<usize> {
        self.recipients.get(giver).copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.recipients
    }

    /// `(giver, recipient)` index pairs in giver order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.recipients.iter().copied().enumerate()
    }

    pub fn recipient_name<'a>(&self, participants: &'a [Participant], giver: usize) -> Option<&'a str> {
        self.recipient_of(giver)
            .and_then(|r| participants.get(r))
            .map(|p| p.name.as_str())
    }

    /// Resolve against the slice the assignment was drawn from.
    pub fn pairings<'a>(&self, participants: &'a [Participant]) -> Vec<Pairing<'a>> {
        self.iter()
            .filter_map(|(g, r)| {
                Some(Pairing {
                    giver: participants.get(g)?,
                    recipient: participants.get(r)?,
                })
            })
            .collect()
    }

    /// Full permutation, no fixed points, every edge present in `graph`.
    pub fn is_valid_for(&self, graph: &CompatibilityGraph) -> bool {
        let n = graph.len();
        if self.recipients.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        for (g, r) in self.iter() {
            if r >= n || r == g || seen[r] || !graph.allows(g, r) {
                return false;
            }
            seen[r] = true;
        }
        true
    }
}

/// Outcome of the pre-flight check. Errors make the input invalid; warnings never do.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub participants_with_no_options: Vec<String>,
    pub min_compatibility: usize,
    pub avg_compatibility: f64,
    pub total_participants: usize,
}

impl ValidationResult {
    pub(crate) fn new(total_participants: usize) -> Self {
        Self {
            is_valid: true,
            total_participants,
            ..Self::default()
        }
    }

    pub(crate) fn error(&mut self, msg: impl Into<String>) {
        self.is_valid = false;
        self.errors.push(msg.into());
    }

    pub(crate) fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
}

/// Diagnostics gathered alongside a backtracking draw.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DrawStats {
    pub total_participants: usize,
    pub avg_compatibility: f64,
    pub min_compatibility: usize,
    pub has_impossible_constraints: bool,
    pub success: bool,
    /// Tentative assignments made by the search.
    pub steps: u64,
}

/// Validator configuration.
#[derive(Clone, Copy, Debug)]
pub struct ValidateCfg {
    /// Largest N for the exact Hall test; above it the heuristic runs.
    /// Clamped to [`HALL_EXACT_CAP`] since the test enumerates 2^N subsets.
    pub exact_limit: usize,
}
impl Default for ValidateCfg {
    fn default() -> Self {
        Self { exact_limit: 10 }
    }
}

/// Upper bound on `ValidateCfg::exact_limit`.
pub const HALL_EXACT_CAP: usize = 20;

/// Backtracking search configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchCfg {
    /// Abort after this many tentative assignments. `None` searches to exhaustion,
    /// which can take factorial time on dense exclusion sets.
    pub step_limit: Option<u64>,
}

/// Legacy retry baseline configuration.
#[derive(Clone, Copy, Debug)]
pub struct RetryCfg {
    pub max_retries: usize,
}
impl Default for RetryCfg {
    fn default() -> Self {
        Self { max_retries: 1000 }
    }
}

/// Failure modes of a draw.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawError {
    /// The search exhausted every candidate at the root.
    NoValidAssignment,
    /// `SearchCfg::step_limit` was hit before a result was known.
    StepLimitExceeded { steps: u64 },
    /// `draw_validated` refused the input; the report lists why.
    Rejected(ValidationResult),
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoValidAssignment => write!(
                f,
                "no valid assignment found - constraints are too restrictive"
            ),
            Self::StepLimitExceeded { steps } => {
                write!(f, "search aborted after {steps} steps without a result")
            }
            Self::Rejected(report) => {
                write!(f, "participants failed validation: {}", report.errors.join("; "))
            }
        }
    }
}

impl std::error::Error for DrawError {}
