use crate::model::{DatasetRef, EvalDefinition, EvalRun, OutputItem, TestingCriterion};
use async_trait::async_trait;
use std::fmt;
use std::path::Path;

pub mod fake;
pub mod http;

/// Upload outcome the caller must distinguish: a `(name, version)` pair that
/// already exists in the store is recoverable, everything else is not.
#[derive(Debug)]
pub enum UploadError {
    /// The `(name, version)` pair was uploaded before.
    Conflict,
    Other(anyhow::Error),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::Conflict => write!(f, "dataset name/version already exists"),
            UploadError::Other(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for UploadError {}

/// Remote dataset storage.
#[async_trait]
pub trait DatasetStore: Send + Sync {
    async fn upload_file(
        &self,
        name: &str,
        version: &str,
        path: &Path,
    ) -> Result<DatasetRef, UploadError>;

    async fn get(&self, name: &str, version: &str) -> anyhow::Result<DatasetRef>;
}

/// Registry of evaluation definitions.
#[async_trait]
pub trait EvalRegistry: Send + Sync {
    async fn create_eval(
        &self,
        name: &str,
        item_schema: serde_json::Value,
        criteria: &[TestingCriterion],
    ) -> anyhow::Result<EvalDefinition>;
}

/// Remote run lifecycle: launch, observe, fetch outputs. The platform owns
/// all status transitions; this side only reads them.
#[async_trait]
pub trait RunExecutor: Send + Sync {
    async fn create_run(
        &self,
        eval_id: &str,
        run_name: &str,
        dataset_id: &str,
    ) -> anyhow::Result<EvalRun>;

    async fn retrieve_run(&self, eval_id: &str, run_id: &str) -> anyhow::Result<EvalRun>;

    async fn list_output_items(
        &self,
        eval_id: &str,
        run_id: &str,
    ) -> anyhow::Result<Vec<OutputItem>>;
}
