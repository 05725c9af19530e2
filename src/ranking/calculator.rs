//! Competition ranking of participant records
//!
//! Records are stable-sorted in descending key order and assigned standard
//! competition ranks: tied keys share a rank and the next distinct key
//! resumes at its 1-based sort position, so scores `[100, 100, 90]` rank
//! as `[1, 1, 3]`.

use crate::ranking::policy::RankingPolicy;
use crate::types::{ParticipantRecord, RankedRecord, RankingMode};
use crate::utils::coerce_metric;
use std::cmp::Ordering;

/// Rank records with the default policy for `mode`
pub fn compute_ranks(records: Vec<ParticipantRecord>, mode: RankingMode) -> Vec<RankedRecord> {
    compute_ranks_with(records, &RankingPolicy::for_mode(mode))
}

/// Rank records with an explicit policy
///
/// Missing or NaN metrics are ranked as zero. The function is total: any
/// input, including an empty one, produces a ranking.
pub fn compute_ranks_with(
    records: Vec<ParticipantRecord>,
    policy: &RankingPolicy,
) -> Vec<RankedRecord> {
    let mut ranked: Vec<RankedRecord> = records
        .into_iter()
        .map(|record| RankedRecord {
            identifier: record.identifier,
            primary_metric: coerce_metric(record.primary_metric),
            secondary_metric: coerce_metric(record.secondary_metric),
            rank: 0,
        })
        .collect();

    // sort_by is stable; equal keys keep their input order
    ranked.sort_by(|a, b| compare_descending(a, b, policy));

    let mut previous: Option<(f64, f64, u32)> = None;
    for (position, record) in ranked.iter_mut().enumerate() {
        let rank = match previous {
            Some((primary, secondary, rank))
                if same_key(
                    (primary, secondary),
                    (record.primary_metric, record.secondary_metric),
                    policy,
                ) =>
            {
                rank
            }
            _ => position as u32 + 1,
        };

        record.rank = rank;
        previous = Some((record.primary_metric, record.secondary_metric, rank));
    }

    ranked
}

fn compare_descending(a: &RankedRecord, b: &RankedRecord, policy: &RankingPolicy) -> Ordering {
    let primary = b.primary_metric.total_cmp(&a.primary_metric);
    if policy.uses_secondary() {
        primary.then_with(|| b.secondary_metric.total_cmp(&a.secondary_metric))
    } else {
        primary
    }
}

fn same_key(a: (f64, f64), b: (f64, f64), policy: &RankingPolicy) -> bool {
    a.0 == b.0 && (!policy.uses_secondary() || a.1 == b.1)
}
