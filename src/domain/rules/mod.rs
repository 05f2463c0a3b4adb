// Domain rules - Business logic and policies

use crate::domain::errors::*;
use crate::domain::model::*;


/// Business rules deciding whether a batch may start
pub struct GenerateGuard;

impl GenerateGuard {
    /// Check the generate preconditions: every slot filled, engine ready, no run in flight
    pub fn check(
        pools: &SegmentPools,
        engine_ready: bool,
        run_state: RunState,
    ) -> Result<(), DomainError> {
        if run_state.is_active() {
            return Err(DomainError::PreconditionRejected(
                "a batch run is already in progress".to_string(),
            ));
        }

        if !engine_ready {
            return Err(DomainError::PreconditionRejected(
                "encoding engine is not ready".to_string(),
            ));
        }

        let empty = pools.empty_slots();
        if !empty.is_empty() {
            let names: Vec<&str> = empty.iter().map(|slot| slot.as_str()).collect();
            return Err(DomainError::PreconditionRejected(format!(
                "empty slots: {}",
                names.join(", ")
            )));
        }

        Ok(())
    }

    /// Convenience form for affordance checks (e.g. enabling a generate button)
    pub fn can_generate(pools: &SegmentPools, engine_ready: bool, run_state: RunState) -> bool {
        Self::check(pools, engine_ready, run_state).is_ok()
    }
}

/// Progress percentage announced before processing item `index` of `total`
pub fn progress_before_item(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((index * 100) / total).min(100) as u8
}

/// Archive name for a bundle of `count` artifacts
pub fn archive_name(count: usize) -> String {
    format!("videos_{}.zip", count)
}
