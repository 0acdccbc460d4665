use crate::aggregate::{RunSummary, PASS_THRESHOLD};
use crate::model::EvalRun;
use std::path::Path;

const RULE: &str =
    "================================================================================";

/// Render the human-readable summary. Deterministic for a given run and
/// summary, so it can double as the results artifact and a CI comment body.
pub fn render_summary(eval_name: &str, run: &EvalRun, summary: &RunSummary) -> String {
    let width = summary
        .metrics
        .iter()
        .map(|m| m.name.len())
        .max()
        .unwrap_or(0);

    let mut lines = vec![
        RULE.to_string(),
        format!(" {} - evaluation results", eval_name),
        RULE.to_string(),
        String::new(),
        format!(
            "  report url   : {}",
            run.report_url.as_deref().unwrap_or("n/a")
        ),
        format!("  run id       : {}", run.id),
        format!("  total items  : {}", summary.total),
        format!("  errored items: {}", summary.errored),
        format!("  scored items : {}", summary.scored),
    ];

    if let Some(detail) = &summary.first_error {
        lines.push(format!("  first error  : {}", detail));
    }

    lines.push(String::new());
    lines.push(format!(
        "average scores (1-5 scale, threshold: {})",
        PASS_THRESHOLD
    ));

    let mut pass_lines = vec![
        String::new(),
        format!("pass rates (score >= {})", PASS_THRESHOLD),
    ];

    for m in &summary.metrics {
        match (m.mean(), m.pass_rate(PASS_THRESHOLD)) {
            (Some(mean), Some(rate)) => {
                lines.push(format!(
                    "  {:<width$} : {:.2} (n={})",
                    m.name,
                    mean,
                    m.n(),
                    width = width
                ));
                pass_lines.push(format!(
                    "  {:<width$} : {:.1}%",
                    m.name,
                    rate * 100.0,
                    width = width
                ));
            }
            _ => {
                lines.push(format!(
                    "  {:<width$} : no scores returned",
                    m.name,
                    width = width
                ));
            }
        }
    }

    if !summary.any_scores() {
        pass_lines.push("  no scores returned, check the report URL for details".to_string());
    }

    lines.extend(pass_lines);
    lines.join("\n")
}

/// Render the failure artifact. Written on every fatal pipeline error so a
/// downstream consumer always finds something to read, even when the run
/// never completed.
pub fn render_failure(eval_name: &str, err: &anyhow::Error) -> String {
    let lines = vec![
        RULE.to_string(),
        format!(" {} - evaluation FAILED", eval_name),
        RULE.to_string(),
        String::new(),
        format!("error: {:#}", err),
        String::new(),
        "troubleshooting:".to_string(),
        "  - verify the project endpoint (PROJECT_ENDPOINT)".to_string(),
        "  - check credentials (PROJECT_API_KEY)".to_string(),
        "  - ensure the judge model deployment exists and is accessible".to_string(),
    ];
    lines.join("\n")
}

/// Overwrite the results artifact. Creates parent directories as needed.
pub fn write_artifact(path: &Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, text)?;
    tracing::info!(path = %path.display(), "results artifact written");
    Ok(())
}
