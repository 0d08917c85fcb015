/// Workers spawned per available CPU when sizing automatically.
pub const WORKERS_PER_CPU: usize = 3;

/// Upper bound for automatic sizing, regardless of CPU count.
pub const MAX_AUTO_WORKERS: usize = 24;

/// `min(items, min(cpus * 3, 24))`.
pub fn auto_worker_count(item_count: usize, cpu_count: usize) -> usize {
    item_count.min((cpu_count * WORKERS_PER_CPU).min(MAX_AUTO_WORKERS))
}

/// Honour an explicit worker count; zero or negative means automatic sizing.
pub fn resolve_worker_count(requested: i64, item_count: usize, cpu_count: usize) -> usize {
    if requested <= 0 {
        auto_worker_count(item_count, cpu_count)
    } else {
        usize::try_from(requested).unwrap_or(usize::MAX)
    }
}
