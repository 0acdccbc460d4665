use crate::aggregate::{self, RunSummary};
use crate::config::{EvalSpec, ProjectConfig};
use crate::criteria;
use crate::dataset;
use crate::errors::RunFailed;
use crate::model::{DatasetRef, EvalDefinition, EvalRun, RunStatus};
use crate::providers::{DatasetStore, EvalRegistry, RunExecutor};
use crate::report;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, Duration};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Fixed wait between status polls. No backoff, no timeout: the loop
    /// runs until the remote run reaches a terminal state.
    pub poll_interval: Duration,
    /// The summary (or failure report) is always written here.
    pub results_path: PathBuf,
    pub run_name: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            results_path: PathBuf::from("evaluation_results.txt"),
            run_name: "baseline-eval".to_string(),
        }
    }
}

/// Everything a finished pipeline hands back to the caller.
#[derive(Debug)]
pub struct RunArtifacts {
    pub dataset: DatasetRef,
    pub definition: EvalDefinition,
    pub run: EvalRun,
    pub summary: RunSummary,
    pub report: String,
}

/// The evaluation pipeline: upload, register, launch, poll, aggregate.
/// Strictly sequential; every step receives the previous step's output as a
/// plain value. The three seams are trait objects so tests run on fakes.
pub struct Pipeline {
    pub store: Arc<dyn DatasetStore>,
    pub registry: Arc<dyn EvalRegistry>,
    pub executor: Arc<dyn RunExecutor>,
    pub project: ProjectConfig,
    pub options: PipelineOptions,
}

impl Pipeline {
    /// Execute the full pipeline. On any error the results artifact is
    /// written with the failure text before the error propagates, so the
    /// artifact is present after every invocation.
    pub async fn run(&self, spec: &EvalSpec) -> anyhow::Result<RunArtifacts> {
        match self.run_inner(spec).await {
            Ok(artifacts) => Ok(artifacts),
            Err(e) => {
                let text = report::render_failure(&spec.name, &e);
                if let Err(write_err) = report::write_artifact(&self.options.results_path, &text) {
                    tracing::warn!(error = %write_err, "failed to write results artifact");
                }
                Err(e)
            }
        }
    }

    async fn run_inner(&self, spec: &EvalSpec) -> anyhow::Result<RunArtifacts> {
        section("step 1: uploading evaluation dataset");
        let records = dataset::load_records(&spec.dataset.path)?;
        eprintln!(
            "  dataset: {} ({} records)",
            spec.dataset.path.display(),
            records.len()
        );
        let ds = dataset::upload_or_reuse(
            self.store.as_ref(),
            &spec.dataset.path,
            &spec.dataset.name,
            &spec.dataset.version,
        )
        .await?;
        eprintln!("  dataset id: {}", ds.id);

        section("step 2: creating evaluation definition");
        eprintln!("  judge model: {}", self.project.model_deployment);
        eprintln!("  evaluators : {}", spec.evaluators.join(", "));
        let criteria = criteria::build_criteria(&spec.evaluators, &self.project.model_deployment)?;
        let definition = self
            .registry
            .create_eval(&spec.name, criteria::item_schema(), &criteria)
            .await?;
        eprintln!("  evaluation id: {}", definition.id);

        section("step 3: launching evaluation run");
        // No idempotency key: every launch creates a new remote run.
        let launched = self
            .executor
            .create_run(&definition.id, &self.options.run_name, &ds.id)
            .await?;
        eprintln!("  run id: {} (status: {})", launched.id, launched.status);

        section("step 4: polling for completion");
        let run = self.poll_until_terminal(&definition.id, &launched.id).await?;

        section("step 5: retrieving results");
        let items = self
            .executor
            .list_output_items(&definition.id, &run.id)
            .await?;
        let summary = aggregate::summarize(&items, &spec.evaluators);
        if summary.errored > 0 {
            tracing::warn!(
                errored = summary.errored,
                "some items errored during evaluation"
            );
        }

        let rendered = report::render_summary(&spec.name, &run, &summary);
        report::write_artifact(&self.options.results_path, &rendered)?;
        eprintln!("{}", rendered);

        Ok(RunArtifacts {
            dataset: ds,
            definition,
            run,
            summary,
            report: rendered,
        })
    }

    /// Poll run status on a fixed interval until a terminal state shows up.
    /// `completed` returns the final run; `failed` becomes a `RunFailed`
    /// error; anything else, known or not, keeps the loop going.
    pub async fn poll_until_terminal(
        &self,
        eval_id: &str,
        run_id: &str,
    ) -> anyhow::Result<EvalRun> {
        let start = Instant::now();
        loop {
            let run = self.executor.retrieve_run(eval_id, run_id).await?;
            let elapsed = start.elapsed().as_secs();
            let status = run.run_status();

            if !status.is_terminal() {
                // Overwrite the same line so the terminal isn't flooded.
                eprint!("  [{}s] status: {}\r", elapsed, run.status);
                let _ = std::io::stderr().flush();
                sleep(self.options.poll_interval).await;
                continue;
            }

            if status == RunStatus::Failed {
                return Err(RunFailed {
                    run_id: run_id.to_string(),
                    elapsed_secs: elapsed,
                    detail: run
                        .error
                        .clone()
                        .unwrap_or_else(|| "no additional details available".to_string()),
                    report_url: run.report_url.clone(),
                }
                .into());
            }

            eprintln!("\n  evaluation completed in {}s", elapsed);
            return Ok(run);
        }
    }
}

fn section(title: &str) {
    eprintln!("\n{}", "=".repeat(80));
    eprintln!("{}", title);
    eprintln!("{}", "=".repeat(80));
}
