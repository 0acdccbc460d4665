use super::args::*;
use scorecard_core::config::{load_spec, ProjectConfig};
use scorecard_core::engine::runner::{Pipeline, PipelineOptions};
use scorecard_core::errors::{ConfigError, RunFailed};
use scorecard_core::providers::http::ProjectClient;
use std::sync::Arc;
use std::time::Duration;

pub mod exit_codes {
    pub const OK: i32 = 0;
    pub const RUN_FAILED: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
}

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Run(args) => cmd_run(args).await,
        Command::Validate(args) => cmd_validate(args).await,
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
    }
}

async fn cmd_run(args: RunArgs) -> anyhow::Result<i32> {
    let Some(endpoint) = args.endpoint else {
        eprintln!("config error: project endpoint is not set");
        eprintln!("  pass --endpoint or set PROJECT_ENDPOINT in the environment");
        return Ok(exit_codes::CONFIG_ERROR);
    };
    let Some(api_key) = args.api_key else {
        eprintln!("config error: API key is not set");
        eprintln!("  pass --api-key or set PROJECT_API_KEY in the environment");
        return Ok(exit_codes::CONFIG_ERROR);
    };

    let spec = match load_spec(&args.config) {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let project = match ProjectConfig::new(endpoint, api_key, args.model) {
        Ok(project) => project,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    eprintln!("project : {}", project.endpoint);
    eprintln!("model   : {}", project.model_deployment);
    eprintln!(
        "dataset : {} (v{})",
        spec.dataset.name, spec.dataset.version
    );

    let client = Arc::new(ProjectClient::new(&project));
    let pipeline = Pipeline {
        store: client.clone(),
        registry: client.clone(),
        executor: client,
        project,
        options: PipelineOptions {
            poll_interval: Duration::from_secs(args.poll_interval_secs),
            results_path: args.results.clone(),
            run_name: args.run_name,
        },
    };

    match pipeline.run(&spec).await {
        Ok(_) => {
            eprintln!("\nresults saved to {}", args.results.display());
            Ok(exit_codes::OK)
        }
        Err(e) => {
            if let Some(failed) = e.downcast_ref::<RunFailed>() {
                eprintln!("{}", failed);
                eprintln!("\nfailure report saved to {}", args.results.display());
                Ok(exit_codes::RUN_FAILED)
            } else if let Some(cfg) = e.downcast_ref::<ConfigError>() {
                eprintln!("config error: {}", cfg);
                Ok(exit_codes::CONFIG_ERROR)
            } else {
                eprintln!("error: {:#}", e);
                eprintln!("\nfailure report saved to {}", args.results.display());
                Ok(exit_codes::RUN_FAILED)
            }
        }
    }
}

async fn cmd_validate(args: ValidateArgs) -> anyhow::Result<i32> {
    let spec = match load_spec(&args.config) {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    match scorecard_core::dataset::load_records(&spec.dataset.path) {
        Ok(records) => {
            eprintln!(
                "ok: {} records, {} evaluators ({})",
                records.len(),
                spec.evaluators.len(),
                spec.evaluators.join(", ")
            );
            Ok(exit_codes::OK)
        }
        Err(e) => {
            eprintln!("config error: {:#}", e);
            Ok(exit_codes::CONFIG_ERROR)
        }
    }
}
