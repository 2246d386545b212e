// src/probe/outcome.rs
use chrono::{DateTime, Utc};

/// Terminal result of probing one target. Exactly one is produced per
/// target per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// An HTTP response arrived before the timeout, any status code.
    /// Carries the `status` field of a JSON body when one was present.
    Running { status: Option<String> },
    /// The connection attempt failed before the timeout elapsed.
    NotRunning { error: String },
    /// No response within the timeout; the request was aborted.
    TimedOut,
}

impl CheckOutcome {
    pub fn is_running(&self) -> bool {
        matches!(self, CheckOutcome::Running { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            CheckOutcome::Running { .. } => "RUNNING",
            CheckOutcome::NotRunning { .. } => "NOT RUNNING",
            CheckOutcome::TimedOut => "TIMEOUT",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TargetReport {
    pub target_name: String,
    pub outcome: CheckOutcome,
    pub elapsed_ms: u64,
    pub checked_at: DateTime<Utc>,
}
