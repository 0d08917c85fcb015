//! Boombox core: pure work-list, naming and manifest logic with no IO.
mod delivery;
mod filename;
mod manifest;
mod result;
mod sizing;
mod worklist;

pub use delivery::DeliveryTarget;
pub use filename::{disambiguated_name, sanitize_name, FALLBACK_NAME, FORBIDDEN_CHARS};
pub use manifest::{manifest_line, manifest_lines, RunSummary, MANIFEST_PREFIX};
pub use result::{TaskOutcome, TaskResult};
pub use sizing::{auto_worker_count, resolve_worker_count, MAX_AUTO_WORKERS, WORKERS_PER_CPU};
pub use worklist::{is_completed, is_sentinel, parse_work_list, ParsedWorkList, WorkItem, SENTINEL};
