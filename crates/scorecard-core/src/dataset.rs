use crate::model::{DatasetRecord, DatasetRef};
use crate::providers::{DatasetStore, UploadError};
use anyhow::Context;
use jsonschema::JSONSchema;
use std::path::Path;

/// Parse and validate the local JSONL dataset before any network call.
/// Every non-empty line must be a JSON object satisfying the item schema,
/// so a record missing `ground_truth` is rejected here rather than crashing
/// remote scoring later.
pub fn load_records(path: &Path) -> anyhow::Result<Vec<DatasetRecord>> {
    if !path.exists() {
        anyhow::bail!(
            "dataset not found at {} (check dataset.path in the eval spec)",
            path.display()
        );
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset {}", path.display()))?;

    let schema_json = crate::criteria::item_schema();
    let schema = JSONSchema::options()
        .compile(&schema_json)
        .map_err(|e| anyhow::anyhow!("item schema compile failed: {}", e))?;

    let mut records = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: serde_json::Value = serde_json::from_str(line).map_err(|e| {
            anyhow::anyhow!("{}:{}: invalid JSON: {}", path.display(), idx + 1, e)
        })?;

        if let Err(errors) = schema.validate(&value) {
            let error_list: Vec<String> = errors.map(|e| e.to_string()).collect();
            anyhow::bail!(
                "{}:{}: record does not match the item schema: {}",
                path.display(),
                idx + 1,
                error_list.join("; ")
            );
        }

        let record: DatasetRecord = serde_json::from_value(value)
            .with_context(|| format!("{}:{}: invalid record", path.display(), idx + 1))?;
        records.push(record);
    }

    if records.is_empty() {
        anyhow::bail!("dataset {} has no records", path.display());
    }

    Ok(records)
}

/// Upload the dataset, reusing the stored copy when this `(name, version)`
/// pair already exists. This is the one recovery behavior in the pipeline;
/// any other upload failure propagates unchanged.
pub async fn upload_or_reuse(
    store: &dyn DatasetStore,
    path: &Path,
    name: &str,
    version: &str,
) -> anyhow::Result<DatasetRef> {
    match store.upload_file(name, version, path).await {
        Ok(ds) => {
            tracing::info!(name, version, id = %ds.id, "dataset uploaded");
            Ok(ds)
        }
        Err(UploadError::Conflict) => {
            tracing::info!(name, version, "dataset version already exists, reusing");
            store.get(name, version).await
        }
        Err(UploadError::Other(e)) => Err(e),
    }
}
