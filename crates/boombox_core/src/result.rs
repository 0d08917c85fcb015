use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Delivered {
        delivery_url: String,
        output_path: PathBuf,
    },
    Failed {
        message: String,
    },
}

/// Outcome of one fetch-and-normalize task. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    /// Sanitized (and possibly disambiguated) base name.
    pub final_name: String,
    pub outcome: TaskOutcome,
}

impl TaskResult {
    pub fn delivered(
        final_name: impl Into<String>,
        delivery_url: impl Into<String>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            final_name: final_name.into(),
            outcome: TaskOutcome::Delivered {
                delivery_url: delivery_url.into(),
                output_path: output_path.into(),
            },
        }
    }

    pub fn failed(final_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            final_name: final_name.into(),
            outcome: TaskOutcome::Failed {
                message: message.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, TaskOutcome::Delivered { .. })
    }

    pub fn delivery_url(&self) -> Option<&str> {
        match &self.outcome {
            TaskOutcome::Delivered { delivery_url, .. } => Some(delivery_url),
            TaskOutcome::Failed { .. } => None,
        }
    }

    pub fn output_path(&self) -> Option<&PathBuf> {
        match &self.outcome {
            TaskOutcome::Delivered { output_path, .. } => Some(output_path),
            TaskOutcome::Failed { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match &self.outcome {
            TaskOutcome::Delivered { .. } => "OK",
            TaskOutcome::Failed { message } => message,
        }
    }
}

/// Progress line: `[OK] <name>` or `[FAIL] <name> - <message>`.
impl fmt::Display for TaskResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            TaskOutcome::Delivered { .. } => write!(f, "[OK] {}", self.final_name),
            TaskOutcome::Failed { message } => {
                write!(f, "[FAIL] {} - {}", self.final_name, message)
            }
        }
    }
}
