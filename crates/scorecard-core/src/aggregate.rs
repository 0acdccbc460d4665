use crate::model::OutputItem;

/// Scores live on a 1-5 scale; at or above this value an item counts as
/// passing. Fixed for this pipeline.
pub const PASS_THRESHOLD: f64 = 3.0;

/// Scores collected for one metric across the scored items.
#[derive(Debug, Clone)]
pub struct MetricAggregate {
    pub name: String,
    pub values: Vec<f64>,
}

impl MetricAggregate {
    /// Arithmetic mean over whatever values exist; `None` when the metric
    /// received no scores.
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        let sum: f64 = self.values.iter().sum();
        Some(sum / self.values.len() as f64)
    }

    /// Fraction of values at or above `threshold`.
    pub fn pass_rate(&self, threshold: f64) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        let passing = self.values.iter().filter(|v| **v >= threshold).count();
        Some(passing as f64 / self.values.len() as f64)
    }

    pub fn n(&self) -> usize {
        self.values.len()
    }
}

/// Aggregate view of a completed run, held only for report rendering.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total: usize,
    pub errored: usize,
    pub scored: usize,
    /// One bucket per requested metric, in the configured order. A metric
    /// that received no scores keeps an empty bucket and is flagged in the
    /// report instead of being thrown as an error.
    pub metrics: Vec<MetricAggregate>,
    /// Error detail of the first errored item, for the report.
    pub first_error: Option<String>,
}

impl RunSummary {
    pub fn any_scores(&self) -> bool {
        self.metrics.iter().any(|m| !m.values.is_empty())
    }

    pub fn metric(&self, name: &str) -> Option<&MetricAggregate> {
        self.metrics.iter().find(|m| m.name == name)
    }
}

/// Partition output items into errored vs scored and collect per-metric
/// score lists from the scored items only. Scores whose evaluator name is
/// not one of the requested metrics are ignored.
pub fn summarize(items: &[OutputItem], metric_names: &[String]) -> RunSummary {
    let mut metrics: Vec<MetricAggregate> = metric_names
        .iter()
        .map(|n| MetricAggregate {
            name: n.clone(),
            values: Vec::new(),
        })
        .collect();

    let mut errored = 0usize;
    let mut first_error = None;

    for item in items {
        if item.is_errored() {
            errored += 1;
            if first_error.is_none() {
                first_error = Some(
                    item.error
                        .clone()
                        .unwrap_or_else(|| "details unavailable".to_string()),
                );
            }
            continue;
        }
        for output in &item.evaluator_outputs {
            let Some(score) = output.score else { continue };
            if let Some(bucket) = metrics.iter_mut().find(|m| m.name == output.name) {
                bucket.values.push(score);
            }
        }
    }

    RunSummary {
        total: items.len(),
        errored,
        scored: items.len() - errored,
        metrics,
        first_error,
    }
}
