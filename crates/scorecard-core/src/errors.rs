use std::fmt;

/// Configuration problem detected before any network cost is incurred.
#[derive(Debug)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Terminal `failed` status reported by the remote run. Carries everything
/// needed for out-of-band diagnosis: run id, remote error detail and the
/// portal report URL.
#[derive(Debug)]
pub struct RunFailed {
    pub run_id: String,
    pub elapsed_secs: u64,
    pub detail: String,
    pub report_url: Option<String>,
}

impl fmt::Display for RunFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "evaluation run failed after {}s", self.elapsed_secs)?;
        writeln!(f, "  run id     : {}", self.run_id)?;
        writeln!(f, "  error      : {}", self.detail)?;
        writeln!(
            f,
            "  report url : {}",
            self.report_url.as_deref().unwrap_or("n/a")
        )?;
        write!(f, "  open the report URL in the project portal for full details")
    }
}

impl std::error::Error for RunFailed {}
