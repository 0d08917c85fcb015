const CDN_BASE: &str = "https://cdn.jsdelivr.net/gh";

/// Repository coordinates the output directory is published from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryTarget {
    pub account: String,
    pub repo: String,
    pub branch: String,
    /// Directory inside the repository that holds the produced files.
    pub segment: String,
}

impl DeliveryTarget {
    /// Public URL of `<segment>/<name>.mp3`. The name is used verbatim.
    pub fn url_for(&self, final_name: &str) -> String {
        format!(
            "{CDN_BASE}/{account}/{repo}@{branch}/{segment}/{final_name}.mp3",
            account = self.account,
            repo = self.repo,
            branch = self.branch,
            segment = self.segment,
        )
    }
}

impl Default for DeliveryTarget {
    fn default() -> Self {
        Self {
            account: "kenny1108Xiang".to_string(),
            repo: "RustGame".to_string(),
            branch: "main".to_string(),
            segment: "music".to_string(),
        }
    }
}
