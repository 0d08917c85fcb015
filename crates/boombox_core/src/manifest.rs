use crate::TaskResult;

pub const MANIFEST_PREFIX: &str = "boombox.serverurllist";

pub fn manifest_line(final_name: &str, delivery_url: &str) -> String {
    format!("{MANIFEST_PREFIX} \"{final_name},{delivery_url}\"")
}

/// One line per delivered result, in the order given; failures are left out.
pub fn manifest_lines(results: &[TaskResult]) -> Vec<String> {
    results
        .iter()
        .filter_map(|result| {
            result
                .delivery_url()
                .map(|url| manifest_line(&result.final_name, url))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_results(results: &[TaskResult]) -> Self {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        Self {
            succeeded,
            failed: results.len() - succeeded,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}
