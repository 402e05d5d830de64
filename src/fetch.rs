//! Fetch merged pull requests through the hosting CLI.
//!
//! Spawns the client once, parses its JSON array, then keeps only the items
//! created inside the lookback window. The client filters by state only, so
//! the date check here is what bounds the report.

use crate::config::ClientConfig;
use crate::review::ReviewRequest;
use chrono::{DateTime, Duration, Utc};
use std::process::Command;

/// Trailing window covered by the report.
pub const LOOKBACK_DAYS: i64 = 30;

/// Fields requested from `gh pr list --json`.
pub const FIELDS: &str = "number,title,labels,createdAt,mergedAt,additions,deletions,reviews";

/// Invokes the hosting CLI.
#[derive(Debug, Clone)]
pub struct Fetcher {
    command: String,
    base_args: Vec<String>,
    limit: u32,
}

/// Result of a fetch after window filtering.
#[derive(Debug)]
pub struct FetchOutcome {
    /// Items inside the window.
    pub requests: Vec<ReviewRequest>,
    /// Items the client returned before filtering.
    pub fetched: usize,
    /// The `--limit` passed to the client.
    pub limit: u32,
}

impl FetchOutcome {
    /// True when the client returned as many items as it was allowed to,
    /// meaning matching PRs beyond the cap were silently dropped.
    pub fn hit_limit(&self) -> bool {
        self.limit > 0 && self.fetched as u64 >= u64::from(self.limit)
    }
}

impl Fetcher {
    pub fn new(command: impl Into<String>, base_args: Vec<String>, limit: u32) -> Self {
        Self {
            command: command.into(),
            base_args,
            limit,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone(), config.limit)
    }

    /// Full argument list passed to the client.
    pub fn client_args(&self) -> Vec<String> {
        let mut args = self.base_args.clone();
        args.extend([
            "--state".to_string(),
            "merged".to_string(),
            "--limit".to_string(),
            self.limit.to_string(),
            "--json".to_string(),
            FIELDS.to_string(),
        ]);
        args
    }

    /// Run the client once and return the merged PRs created in the last
    /// `window_days` relative to `now`.
    pub fn fetch_merged(
        &self,
        window_days: i64,
        now: DateTime<Utc>,
    ) -> Result<FetchOutcome, FetchError> {
        let args = self.client_args();
        tracing::debug!(command = %self.command, ?args, "running client");

        let output = Command::new(&self.command)
            .args(&args)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    FetchError::NotFound {
                        command: self.command.clone(),
                    }
                } else {
                    FetchError::Spawn {
                        command: self.command.clone(),
                        source: e,
                    }
                }
            })?;

        if !output.status.success() {
            return Err(FetchError::CommandFailed {
                command: self.command.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let all = parse_review_requests(&String::from_utf8_lossy(&output.stdout))?;
        let fetched = all.len();
        let requests = within_window(all, now, window_days);
        tracing::debug!(fetched, kept = requests.len(), window_days, "filtered by window");

        Ok(FetchOutcome {
            requests,
            fetched,
            limit: self.limit,
        })
    }
}

/// Parse the client's JSON array.
pub fn parse_review_requests(json: &str) -> Result<Vec<ReviewRequest>, FetchError> {
    serde_json::from_str(json).map_err(|e| FetchError::Parse { source: e })
}

/// Keep requests with `created_at >= now - window_days`.
///
/// `now` is shifted into each item's own offset before comparing. The cutoff
/// itself is inclusive.
pub fn within_window(
    requests: Vec<ReviewRequest>,
    now: DateTime<Utc>,
    window_days: i64,
) -> Vec<ReviewRequest> {
    requests
        .into_iter()
        .filter(|req| {
            let local_now = now.with_timezone(req.created_at.offset());
            req.created_at >= local_now - Duration::days(window_days)
        })
        .collect()
}

/// Errors from fetching pull requests.
#[derive(Debug)]
pub enum FetchError {
    /// The client binary is not installed or not on PATH.
    NotFound { command: String },
    /// The client could not be started for another reason.
    Spawn {
        command: String,
        source: std::io::Error,
    },
    /// The client ran but exited non-zero.
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    /// The client's stdout was not the expected JSON.
    Parse { source: serde_json::Error },
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::NotFound { command } => write!(f, "{command} not found"),
            FetchError::Spawn { command, source } => {
                write!(f, "failed to run {command}: {source}")
            }
            FetchError::CommandFailed {
                command, status, ..
            } => write!(f, "{command} exited with {status}"),
            FetchError::Parse { source } => write!(f, "invalid JSON from client: {source}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Spawn { source, .. } => Some(source),
            FetchError::Parse { source } => Some(source),
            FetchError::NotFound { .. } | FetchError::CommandFailed { .. } => None,
        }
    }
}
