//! Combination planning
//!
//! Enumerates every hook/body/cta triple in a fixed nested order: hook is the
//! outer loop, body the middle, cta the inner one (cta varies fastest). The
//! order decides both processing order and the order artifacts are listed in.

use crate::domain::model::{Combination, SegmentPools};

/// Lazily enumerate all combinations. Empty when any slot is empty.
pub fn enumerate(pools: &SegmentPools) -> impl Iterator<Item = Combination> + '_ {
    pools.hook.clips().iter().flat_map(move |hook| {
        pools.body.clips().iter().flat_map(move |body| {
            pools
                .cta
                .clips()
                .iter()
                .map(move |cta| Combination::new(hook, body, cta))
        })
    })
}

/// Number of combinations `enumerate` yields
pub fn combination_count(pools: &SegmentPools) -> usize {
    pools.hook.len() * pools.body.len() * pools.cta.len()
}

/// Canonical output names in processing order
pub fn output_names(pools: &SegmentPools) -> Vec<String> {
    enumerate(pools).map(|combo| combo.output_name()).collect()
}
