use std::time::Duration;

use moka::future::Cache;
use once_cell::sync::Lazy;

use crate::advisory::burnout::BurnoutResult;

/// Burnout results are pure functions of (history, today), so a short TTL
/// plus invalidation on every leave transition keeps them honest while
/// sparing the recompute on dashboard-heavy read traffic.
pub static BURNOUT_CACHE: Lazy<Cache<u64, BurnoutResult>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(100_000)
        .time_to_live(Duration::from_secs(300))
        .build()
});

pub async fn get(employee_id: u64) -> Option<BurnoutResult> {
    BURNOUT_CACHE.get(&employee_id).await
}

pub async fn put(employee_id: u64, result: BurnoutResult) {
    BURNOUT_CACHE.insert(employee_id, result).await;
}

/// Drop the cached score after any leave transition for the employee.
pub async fn invalidate(employee_id: u64) {
    BURNOUT_CACHE.invalidate(&employee_id).await;
}

/// Batch invalidation, e.g. after a sweep touches many employees.
pub async fn invalidate_many(employee_ids: &[u64]) {
    let futures: Vec<_> = employee_ids
        .iter()
        .map(|id| BURNOUT_CACHE.invalidate(id))
        .collect();
    futures::future::join_all(futures).await;
    log::info!("invalidated {} cached burnout scores", employee_ids.len());
}
