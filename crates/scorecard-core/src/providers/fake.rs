//! In-memory stand-ins for the remote platform. The pipeline under test is
//! the sequencing and aggregation logic, not any network behavior.

use super::{DatasetStore, EvalRegistry, RunExecutor, UploadError};
use crate::model::{DatasetRef, EvalDefinition, EvalRun, OutputItem, TestingCriterion};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Dataset store that remembers every uploaded `(name, version)` pair and
/// reports a conflict on re-upload, like the remote store does.
#[derive(Default)]
pub struct FakeDatasetStore {
    inner: Mutex<HashMap<(String, String), DatasetRef>>,
    next_id: AtomicUsize,
    uploads: AtomicUsize,
}

impl FakeDatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of upload attempts, including rejected conflicts.
    pub fn upload_attempts(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatasetStore for FakeDatasetStore {
    async fn upload_file(
        &self,
        name: &str,
        version: &str,
        _path: &Path,
    ) -> Result<DatasetRef, UploadError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        let key = (name.to_string(), version.to_string());
        let mut inner = self.inner.lock().unwrap();
        if inner.contains_key(&key) {
            return Err(UploadError::Conflict);
        }
        let id = format!("ds-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let ds = DatasetRef {
            id,
            name: name.to_string(),
            version: version.to_string(),
        };
        inner.insert(key, ds.clone());
        Ok(ds)
    }

    async fn get(&self, name: &str, version: &str) -> anyhow::Result<DatasetRef> {
        let key = (name.to_string(), version.to_string());
        self.inner
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("dataset {}:{} not found", name, version))
    }
}

/// Records definitions and hands out sequential eval ids.
#[derive(Default)]
pub struct FakeEvalRegistry {
    pub created: Mutex<Vec<(String, Vec<TestingCriterion>)>>,
}

impl FakeEvalRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EvalRegistry for FakeEvalRegistry {
    async fn create_eval(
        &self,
        name: &str,
        _item_schema: serde_json::Value,
        criteria: &[TestingCriterion],
    ) -> anyhow::Result<EvalDefinition> {
        let mut created = self.created.lock().unwrap();
        created.push((name.to_string(), criteria.to_vec()));
        Ok(EvalDefinition {
            id: format!("eval-{}", created.len()),
            name: name.to_string(),
        })
    }
}

/// Scripted run executor: each status poll serves the next entry of the
/// script, the last entry repeats. Launches are counted so the
/// run-per-launch behavior stays observable.
pub struct FakeRunExecutor {
    statuses: Vec<String>,
    items: Vec<OutputItem>,
    error: Option<String>,
    report_url: Option<String>,
    polls: AtomicUsize,
    launches: AtomicUsize,
}

impl FakeRunExecutor {
    pub fn new(statuses: &[&str], items: Vec<OutputItem>) -> Self {
        assert!(!statuses.is_empty(), "status script must not be empty");
        Self {
            statuses: statuses.iter().map(|s| s.to_string()).collect(),
            items,
            error: None,
            report_url: Some("https://project.example/runs/run-1".to_string()),
            polls: AtomicUsize::new(0),
            launches: AtomicUsize::new(0),
        }
    }

    pub fn with_error(mut self, detail: &str) -> Self {
        self.error = Some(detail.to_string());
        self
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RunExecutor for FakeRunExecutor {
    async fn create_run(
        &self,
        eval_id: &str,
        _run_name: &str,
        _dataset_id: &str,
    ) -> anyhow::Result<EvalRun> {
        let n = self.launches.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(EvalRun {
            id: format!("run-{}", n),
            eval_id: eval_id.to_string(),
            status: "queued".to_string(),
            report_url: self.report_url.clone(),
            error: None,
        })
    }

    async fn retrieve_run(&self, eval_id: &str, run_id: &str) -> anyhow::Result<EvalRun> {
        let i = self.polls.fetch_add(1, Ordering::SeqCst);
        let status = self
            .statuses
            .get(i)
            .unwrap_or_else(|| self.statuses.last().unwrap())
            .clone();
        let failed = status == "failed";
        Ok(EvalRun {
            id: run_id.to_string(),
            eval_id: eval_id.to_string(),
            status,
            report_url: self.report_url.clone(),
            error: if failed { self.error.clone() } else { None },
        })
    }

    async fn list_output_items(
        &self,
        _eval_id: &str,
        _run_id: &str,
    ) -> anyhow::Result<Vec<OutputItem>> {
        Ok(self.items.clone())
    }
}
