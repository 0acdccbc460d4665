use crate::errors::ConfigError;
use crate::model::TestingCriterion;
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub const INTENT_RESOLUTION: &str = "intent_resolution";
pub const RELEVANCE: &str = "relevance";
pub const GROUNDEDNESS: &str = "groundedness";

/// The built-in evaluators this pipeline knows how to wire up. The set and
/// their inputs are fixed; each takes `{query, response}` and emits a score
/// on a 1-5 scale.
pub const BUILTIN_EVALUATORS: [&str; 3] = [INTENT_RESOLUTION, RELEVANCE, GROUNDEDNESS];

/// Shape the remote store expects for each dataset record.
pub fn item_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "query":        {"type": "string"},
            "response":     {"type": "string"},
            "ground_truth": {"type": "string"},
        },
        "required": ["query", "response", "ground_truth"],
    })
}

/// `{{item.<field>}}` template binding a dataset column to an evaluator input.
pub fn item_template(field: &str) -> String {
    format!("{{{{item.{}}}}}", field)
}

/// An unknown evaluator name is a configuration error; it must abort the
/// pipeline before any remote cost is incurred.
pub fn validate_evaluators(names: &[String]) -> Result<(), ConfigError> {
    for name in names {
        if !BUILTIN_EVALUATORS.contains(&name.as_str()) {
            return Err(ConfigError(format!(
                "unknown evaluator '{}' (supported: {})",
                name,
                BUILTIN_EVALUATORS.join(", ")
            )));
        }
    }
    Ok(())
}

/// Build the testing criteria for an evaluation definition: one criterion
/// per requested evaluator, each initialized with the judge model deployment
/// and mapped onto the dataset columns.
pub fn build_criteria(
    names: &[String],
    model_deployment: &str,
) -> Result<Vec<TestingCriterion>, ConfigError> {
    validate_evaluators(names)?;

    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let mut data_mapping = BTreeMap::new();
        data_mapping.insert("query".to_string(), item_template("query"));
        data_mapping.insert("response".to_string(), item_template("response"));

        out.push(TestingCriterion {
            kind: "builtin_evaluator".to_string(),
            name: name.clone(),
            evaluator_name: format!("builtin.{}", name),
            initialization_parameters: json!({ "deployment_name": model_deployment }),
            data_mapping,
        });
    }
    Ok(out)
}
