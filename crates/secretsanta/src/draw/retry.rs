//! Randomized-retry baseline (legacy, comparison only).
//!
//! Greedy matching over random recipient orders, repeated up to
//! `RetryCfg::max_retries` times. It is Monte-Carlo, not exhaustive: it can
//! miss assignments that exist. Use [`draw`](super::draw) for results that
//! must be correct; this path exists to measure against it.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::participant::Participant;

use super::types::{Assignment, RetryCfg};

/// Final pass of the retry baseline.
///
/// `recipients[g]` is `None` for givers the final pass could not match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryOutcome {
    pub recipients: Vec<Option<usize>>,
    /// Passes run, including the successful one.
    pub attempts: usize,
}

impl RetryOutcome {
    pub fn is_complete(&self) -> bool {
        self.recipients.iter().all(Option::is_some)
    }

    pub fn matched(&self) -> usize {
        self.recipients.iter().filter(|r| r.is_some()).count()
    }

    /// Only complete outcomes become an [`Assignment`].
    pub fn into_assignment(self) -> Option<Assignment> {
        let recipients = self.recipients.into_iter().collect::<Option<Vec<_>>>()?;
        Some(Assignment { recipients })
    }
}

/// Run the retry baseline. Never errors; check [`RetryOutcome::is_complete`].
pub fn draw_naive<R: Rng + ?Sized>(
    participants: &[Participant],
    cfg: RetryCfg,
    rng: &mut R,
) -> RetryOutcome {
    let n = participants.len();
    let mut givers: Vec<usize> = (0..n).collect();
    givers.shuffle(rng);
    let mut order: Vec<usize> = (0..n).collect();
    let mut recipients = vec![None; n];
    let mut attempts = 0;
    while attempts < cfg.max_retries.max(1) {
        attempts += 1;
        order.shuffle(rng);
        recipients.fill(None);
        let mut used = vec![false; n];
        for &g in &givers {
            let giver = &participants[g];
            let pick = order
                .iter()
                .copied()
                .find(|&r| !used[r] && giver.can_give_to(&participants[r]));
            let Some(r) = pick else { break };
            used[r] = true;
            recipients[g] = Some(r);
        }
        if recipients.iter().all(Option::is_some) {
            break;
        }
    }
    tracing::debug!(participants = n, attempts, "draw_naive");
    RetryOutcome {
        recipients,
        attempts,
    }
}
