//! Exclusion index and compatibility graph construction.

use std::collections::{HashMap, HashSet};

use crate::participant::Participant;

use super::types::{CompatibilityGraph, ExclusionIndex};

/// Index every declared exclusion by giver name. O(N·E).
///
/// Unknown names are kept as-is; reporting them is the validator's job.
pub fn build_exclusion_index(participants: &[Participant]) -> ExclusionIndex {
    let mut map: HashMap<String, HashSet<String>> = HashMap::new();
    for p in participants {
        if p.exclusions.is_empty() {
            continue;
        }
        map.entry(p.name.clone())
            .or_default()
            .extend(p.exclusions.iter().cloned());
    }
    ExclusionIndex { map }
}

/// Build the giver → recipient adjacency over participant positions. O(N²).
pub fn build_graph(participants: &[Participant], index: &ExclusionIndex) -> CompatibilityGraph {
    let n = participants.len();
    let mut adj = Vec::with_capacity(n);
    for (i, giver) in participants.iter().enumerate() {
        let excluded = index.get(&giver.name);
        let out: Vec<usize> = participants
            .iter()
            .enumerate()
            .filter(|&(j, recipient)| {
                j != i && !excluded.is_some_and(|set| set.contains(&recipient.name))
            })
            .map(|(j, _)| j)
            .collect();
        adj.push(out);
    }
    CompatibilityGraph { adj }
}

/// Convenience: index exclusions and build the graph in one go.
pub fn compatibility_graph(participants: &[Participant]) -> CompatibilityGraph {
    build_graph(participants, &build_exclusion_index(participants))
}
