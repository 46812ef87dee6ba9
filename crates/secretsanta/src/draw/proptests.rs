//! Property tests over random exclusion matrices.

use super::*;
use crate::participant::Participant;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// `n` participants with a random (asymmetric) exclusion relation.
fn participants(max_n: usize) -> impl Strategy<Value = Vec<Participant>> {
    (2..=max_n)
        .prop_flat_map(|n| {
            (
                Just(n),
                proptest::collection::vec(proptest::bool::weighted(0.3), n * n),
            )
        })
        .prop_map(|(n, bits)| {
            (0..n)
                .map(|i| {
                    let ex = (0..n)
                        .filter(|&j| j != i && bits[i * n + j])
                        .map(|j| format!("P{j}"));
                    Participant::new(format!("P{i}"))
                        .with_contact(format!("p{i}@example.com"))
                        .with_exclusions(ex)
                })
                .collect()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn successful_draws_are_constrained_derangements(ps in participants(9), seed in any::<u64>()) {
        if let Ok(a) = draw_with_rng(&ps, &mut StdRng::seed_from_u64(seed)) {
            prop_assert_eq!(a.len(), ps.len());
            let mut seen = vec![false; ps.len()];
            for (g, r) in a.iter() {
                prop_assert_ne!(g, r);
                prop_assert!(!seen[r]);
                seen[r] = true;
                prop_assert!(!ps[g].excludes(&ps[r].name));
            }
        }
    }

    #[test]
    fn exact_validation_matches_search(ps in participants(7), seed in any::<u64>()) {
        let report = validate(&ps);
        let drawn = draw_with_rng(&ps, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(report.is_valid, drawn.is_ok(), "errors: {:?}", report.errors);
        prop_assert_eq!(
            hall_violation(&compatibility_graph(&ps)).is_none(),
            drawn.is_ok()
        );
    }

    #[test]
    fn validation_and_graph_are_deterministic(ps in participants(12)) {
        prop_assert_eq!(validate(&ps), validate(&ps));
        prop_assert_eq!(compatibility_graph(&ps), compatibility_graph(&ps));
    }

    #[test]
    fn heuristic_never_rejects_feasible_inputs(ps in participants(10)) {
        let g = compatibility_graph(&ps);
        if hall_violation(&g).is_none() {
            prop_assert!(heuristic_feasible(&g).is_ok());
        }
    }

    #[test]
    fn complete_retry_outcomes_are_valid(ps in participants(8), seed in any::<u64>()) {
        let out = draw_naive(&ps, RetryCfg { max_retries: 50 }, &mut StdRng::seed_from_u64(seed));
        if let Some(a) = out.into_assignment() {
            prop_assert!(a.is_valid_for(&compatibility_graph(&ps)));
        }
    }

    #[test]
    fn rng_only_changes_visitation_order(ps in participants(8), s1 in any::<u64>(), s2 in any::<u64>()) {
        let graph = compatibility_graph(&ps);
        let a = draw_with_rng(&ps, &mut StdRng::seed_from_u64(s1));
        let b = draw_with_rng(&ps, &mut StdRng::seed_from_u64(s2));
        prop_assert_eq!(compatibility_graph(&ps), graph.clone());
        prop_assert_eq!(a.is_ok(), b.is_ok());
        for x in [a, b].into_iter().flatten() {
            prop_assert!(x.is_valid_for(&graph));
        }
    }
}
