use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Connection settings for the remote project. Constructed once and passed
/// explicitly into every client; nothing is read from ambient process state
/// past this point.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub endpoint: String,
    pub api_key: String,
    /// Judge model deployment used to initialize the built-in evaluators.
    pub model_deployment: String,
}

impl ProjectConfig {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model_deployment: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let endpoint = endpoint.into();
        let api_key = api_key.into();
        let model_deployment = model_deployment.into();

        if endpoint.trim().is_empty() {
            return Err(ConfigError(
                "project endpoint is empty; pass --endpoint or set PROJECT_ENDPOINT".into(),
            ));
        }
        if api_key.trim().is_empty() {
            return Err(ConfigError(
                "API key is empty; pass --api-key or set PROJECT_API_KEY".into(),
            ));
        }
        if model_deployment.trim().is_empty() {
            return Err(ConfigError("model deployment name is empty".into()));
        }

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            model_deployment,
        })
    }
}

/// What to evaluate: the local dataset and the evaluators to run over it.
/// Loaded from a small YAML file next to the project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalSpec {
    pub name: String,
    pub dataset: DatasetSpec,
    #[serde(default = "default_evaluators")]
    pub evaluators: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// JSONL file with one `{query, response, ground_truth}` object per line.
    pub path: PathBuf,
    /// `(name, version)` identifies the dataset in the remote store;
    /// re-uploading an existing pair reuses the stored copy.
    pub name: String,
    pub version: String,
}

fn default_evaluators() -> Vec<String> {
    crate::criteria::BUILTIN_EVALUATORS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn load_spec(path: &Path) -> Result<EvalSpec, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError(format!("failed to read eval spec {}: {}", path.display(), e)))?;

    let mut ignored_keys = HashSet::new();
    let deserializer = serde_yaml::Deserializer::from_str(&raw);
    let mut spec: EvalSpec = serde_ignored::deserialize(deserializer, |path| {
        ignored_keys.insert(path.to_string());
    })
    .map_err(|e| ConfigError(format!("failed to parse YAML: {}", e)))?;

    if !ignored_keys.is_empty() {
        eprintln!("WARN: ignored unknown eval spec fields: {:?}", ignored_keys);
    }

    if spec.name.trim().is_empty() {
        return Err(ConfigError("eval spec has no name".into()));
    }
    if spec.evaluators.is_empty() {
        return Err(ConfigError("eval spec lists no evaluators".into()));
    }
    crate::criteria::validate_evaluators(&spec.evaluators)?;

    // Dataset path is resolved relative to the spec file, not the cwd.
    if spec.dataset.path.is_relative() {
        if let Some(parent) = path.parent() {
            spec.dataset.path = parent.join(&spec.dataset.path);
        }
    }

    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_spec(dir: &Path, body: &str) -> PathBuf {
        let p = dir.join("eval.yaml");
        let mut f = std::fs::File::create(&p).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        p
    }

    #[test]
    fn loads_spec_and_resolves_dataset_path() {
        let dir = tempfile::tempdir().unwrap();
        let p = write_spec(
            dir.path(),
            "name: demo\ndataset:\n  path: data/eval.jsonl\n  name: demo-ds\n  version: \"1\"\n",
        );
        let spec = load_spec(&p).unwrap();
        assert_eq!(spec.name, "demo");
        assert_eq!(spec.dataset.path, dir.path().join("data/eval.jsonl"));
        // defaults to the full built-in set
        assert_eq!(
            spec.evaluators,
            vec!["intent_resolution", "relevance", "groundedness"]
        );
    }

    #[test]
    fn rejects_unknown_evaluator() {
        let dir = tempfile::tempdir().unwrap();
        let p = write_spec(
            dir.path(),
            "name: demo\ndataset:\n  path: d.jsonl\n  name: d\n  version: \"1\"\nevaluators: [sentiment]\n",
        );
        let err = load_spec(&p).unwrap_err();
        assert!(err.to_string().contains("sentiment"), "{}", err);
    }
}
