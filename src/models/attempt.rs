use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    InProgress,
    Submitted,
}

/// What caused an attempt to be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitTrigger {
    Next,
    Skip,
    Explicit,
    Expired,
}

impl SubmitTrigger {
    /// Status string sent to the submission endpoint.
    pub fn wire_status(self) -> &'static str {
        match self {
            SubmitTrigger::Expired => "timeout",
            _ => "completed",
        }
    }
}
