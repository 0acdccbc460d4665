use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One record of the evaluation dataset as stored on disk (JSONL, one
/// object per line). All three fields are required; records are validated
/// against the item schema before anything leaves the machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub query: String,
    pub response: String,
    pub ground_truth: String,
}

/// Handle to a dataset version in the remote store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRef {
    pub id: String,
    pub name: String,
    pub version: String,
}

/// One named scoring criterion inside an evaluation definition. Binds a
/// built-in evaluator to dataset columns via `{{item.<field>}}` templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestingCriterion {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub evaluator_name: String,
    pub initialization_parameters: serde_json::Value,
    pub data_mapping: BTreeMap<String, String>,
}

/// Remote evaluation definition, referenced by id when launching runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A remote evaluation run. Status transitions are owned entirely by the
/// platform; this side only observes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalRun {
    pub id: String,
    #[serde(default)]
    pub eval_id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EvalRun {
    pub fn run_status(&self) -> RunStatus {
        RunStatus::parse(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Queued,
    Running,
    Completed,
    Failed,
    /// Any status string this client does not recognize. Non-terminal, so
    /// new platform states keep the poll loop alive instead of crashing it.
    Other(String),
}

impl RunStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "queued" => RunStatus::Queued,
            "running" => RunStatus::Running,
            "completed" => RunStatus::Completed,
            "failed" => RunStatus::Failed,
            other => RunStatus::Other(other.to_string()),
        }
    }

    /// Only `completed` and `failed` stop the poller.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }
}

/// Per-dataset-record output fetched after a run completes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputItem {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub evaluator_outputs: Vec<EvaluatorResult>,
}

impl OutputItem {
    pub fn is_errored(&self) -> bool {
        self.status.as_deref() == Some("error")
    }
}

/// Score emitted by one evaluator for one item. `score` can be absent when
/// the evaluator produced no numeric result for the item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorResult {
    pub name: String,
    #[serde(default)]
    pub score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_is_not_terminal() {
        let s = RunStatus::parse("canceling");
        assert_eq!(s, RunStatus::Other("canceling".into()));
        assert!(!s.is_terminal());
        assert!(RunStatus::parse("completed").is_terminal());
        assert!(RunStatus::parse("failed").is_terminal());
        assert!(!RunStatus::parse("queued").is_terminal());
        assert!(!RunStatus::parse("running").is_terminal());
    }
}
