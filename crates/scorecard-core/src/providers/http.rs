use super::{DatasetStore, EvalRegistry, RunExecutor, UploadError};
use crate::config::ProjectConfig;
use crate::model::{DatasetRef, EvalDefinition, EvalRun, OutputItem, TestingCriterion};
use async_trait::async_trait;
use serde_json::json;
use std::path::Path;

/// HTTP client for the remote project. One instance backs all three
/// capability traits; the pipeline holds it behind trait objects so tests
/// can swap in fakes.
pub struct ProjectClient {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl ProjectClient {
    pub fn new(cfg: &ProjectConfig) -> Self {
        Self {
            endpoint: cfg.endpoint.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    fn authed(&self, rb: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        rb.header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn read_json(resp: reqwest::Response, what: &str) -> anyhow::Result<serde_json::Value> {
        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            anyhow::bail!("{} failed ({}): {}", what, status, error_text);
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl DatasetStore for ProjectClient {
    async fn upload_file(
        &self,
        name: &str,
        version: &str,
        path: &Path,
    ) -> Result<DatasetRef, UploadError> {
        let bytes = std::fs::read(path).map_err(|e| {
            UploadError::Other(anyhow::anyhow!(
                "failed to read dataset {}: {}",
                path.display(),
                e
            ))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset.jsonl".to_string());

        let form = reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(bytes)
                .file_name(file_name)
                .mime_str("application/jsonl")
                .map_err(|e| UploadError::Other(e.into()))?,
        );

        let url = self.url(&format!("/datasets/{}/versions/{}/files", name, version));
        let resp = self
            .authed(self.client.post(&url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Other(e.into()))?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            // The store refuses to overwrite an existing name/version pair.
            if status == reqwest::StatusCode::CONFLICT || error_text.contains("already exists") {
                return Err(UploadError::Conflict);
            }
            return Err(UploadError::Other(anyhow::anyhow!(
                "dataset upload failed ({}): {}",
                status,
                error_text
            )));
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| UploadError::Other(e.into()))?;
        let id = body
            .pointer("/id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                UploadError::Other(anyhow::anyhow!("upload response missing dataset id"))
            })?
            .to_string();

        tracing::debug!(dataset = name, version, id = %id, "dataset uploaded");
        Ok(DatasetRef {
            id,
            name: name.to_string(),
            version: version.to_string(),
        })
    }

    async fn get(&self, name: &str, version: &str) -> anyhow::Result<DatasetRef> {
        let url = self.url(&format!("/datasets/{}/versions/{}", name, version));
        let resp = self.authed(self.client.get(&url)).send().await?;
        let body = Self::read_json(resp, "dataset lookup").await?;

        let id = body
            .pointer("/id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("dataset lookup response missing id"))?
            .to_string();

        Ok(DatasetRef {
            id,
            name: name.to_string(),
            version: version.to_string(),
        })
    }
}

#[async_trait]
impl EvalRegistry for ProjectClient {
    async fn create_eval(
        &self,
        name: &str,
        item_schema: serde_json::Value,
        criteria: &[TestingCriterion],
    ) -> anyhow::Result<EvalDefinition> {
        let body = json!({
            "name": name,
            "data_source_config": {
                "type": "custom",
                "item_schema": item_schema,
            },
            "testing_criteria": criteria,
        });

        let resp = self
            .authed(self.client.post(self.url("/evals")))
            .json(&body)
            .send()
            .await?;
        let body = Self::read_json(resp, "evaluation definition").await?;

        let def: EvalDefinition = serde_json::from_value(body)?;
        tracing::debug!(eval_id = %def.id, "evaluation definition created");
        Ok(def)
    }
}

#[async_trait]
impl RunExecutor for ProjectClient {
    async fn create_run(
        &self,
        eval_id: &str,
        run_name: &str,
        dataset_id: &str,
    ) -> anyhow::Result<EvalRun> {
        let body = json!({
            "name": run_name,
            "data_source": {
                "type": "jsonl",
                "source": { "type": "file_id", "id": dataset_id },
            },
        });

        let url = self.url(&format!("/evals/{}/runs", eval_id));
        let resp = self.authed(self.client.post(&url)).json(&body).send().await?;
        let body = Self::read_json(resp, "run launch").await?;

        let run: EvalRun = serde_json::from_value(body)?;
        Ok(run)
    }

    async fn retrieve_run(&self, eval_id: &str, run_id: &str) -> anyhow::Result<EvalRun> {
        let url = self.url(&format!("/evals/{}/runs/{}", eval_id, run_id));
        let resp = self.authed(self.client.get(&url)).send().await?;
        let body = Self::read_json(resp, "run status").await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn list_output_items(
        &self,
        eval_id: &str,
        run_id: &str,
    ) -> anyhow::Result<Vec<OutputItem>> {
        let base = self.url(&format!("/evals/{}/runs/{}/output_items", eval_id, run_id));
        let mut items = Vec::new();
        let mut after: Option<String> = None;

        // Cursor pagination: {"data": [...], "has_more": bool, "last_id": "..."}
        loop {
            let mut req = self.authed(self.client.get(&base));
            if let Some(cursor) = &after {
                req = req.query(&[("after", cursor.as_str())]);
            }
            let resp = req.send().await?;
            let body = Self::read_json(resp, "output items").await?;

            let page: Vec<OutputItem> = body
                .get("data")
                .cloned()
                .map(serde_json::from_value)
                .transpose()?
                .unwrap_or_default();
            items.extend(page);

            let has_more = body
                .get("has_more")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            if !has_more {
                break;
            }
            after = body
                .get("last_id")
                .and_then(|v| v.as_str())
                .map(str::to_string);
            if after.is_none() {
                break;
            }
        }

        Ok(items)
    }
}
