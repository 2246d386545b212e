// src/health/checker.rs
use crate::config::Config;
use crate::probe::{CheckOutcome, ServiceTarget, TargetReport};
use crate::report::StatusReporter;
use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, error, info};
use uuid::Uuid;

pub struct HealthChecker {
    client: Client,
    timeout_ms: u64,
    targets: Vec<ServiceTarget>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("{0}")]
    Connect(String),

    #[error("No response within {0}ms")]
    Timeout(u64),
}

impl HealthChecker {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.probe.timeout())
            .build()
            .context("Failed to create HTTP client")?;

        let targets = config
            .targets
            .iter()
            .map(ServiceTarget::from_config)
            .collect();

        Ok(Self {
            client,
            timeout_ms: config.probe.timeout_ms,
            targets,
        })
    }

    pub fn targets(&self) -> &[ServiceTarget] {
        &self.targets
    }

    /// Probes every target concurrently and waits for all of them to
    /// settle. Each settled probe is handed to the reporter as it lands;
    /// the reporter prints the aggregate banner after the last one.
    pub async fn check_all(self: Arc<Self>, reporter: Arc<StatusReporter>) {
        let run_id = Uuid::new_v4();
        info!(%run_id, "Checking {} services", self.targets.len());

        let mut tasks = Vec::new();

        for target in self.targets.clone() {
            let checker = self.clone();
            let reporter = reporter.clone();
            let task = tokio::spawn(async move {
                let report = checker.probe_target(&target).await;
                reporter.record(&target, report);
            });
            tasks.push(task);
        }

        // Wait for all probes to settle
        let results = futures::future::join_all(tasks).await;

        for result in results {
            if let Err(e) = result {
                error!("Probe task join error: {}", e);
            }
        }

        debug!(%run_id, "All probes settled");
    }

    async fn probe_target(&self, target: &ServiceTarget) -> TargetReport {
        let start = Instant::now();
        debug!(target = %target.name, url = %target.url, "Dispatching probe");

        let outcome = match self.dispatch(target).await {
            Ok(response) => {
                let status = read_status_field(response).await;
                CheckOutcome::Running { status }
            }
            Err(ProbeError::Timeout(_)) => CheckOutcome::TimedOut,
            Err(ProbeError::Connect(message)) => CheckOutcome::NotRunning { error: message },
        };

        TargetReport {
            target_name: target.name.clone(),
            outcome,
            elapsed_ms: start.elapsed().as_millis() as u64,
            checked_at: Utc::now(),
        }
    }

    async fn dispatch(&self, target: &ServiceTarget) -> Result<reqwest::Response, ProbeError> {
        let request = self.client.get(target.url.as_str()).send();

        match timeout(std::time::Duration::from_millis(self.timeout_ms), request).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) if e.is_timeout() => Err(ProbeError::Timeout(self.timeout_ms)),
            Ok(Err(e)) => Err(ProbeError::Connect(e.to_string())),
            Err(_) => Err(ProbeError::Timeout(self.timeout_ms)),
        }
    }
}

/// Pulls the `status` field out of a JSON response body. Non-JSON bodies
/// are expected for non-API endpoints and yield `None` rather than an
/// error.
async fn read_status_field(response: reqwest::Response) -> Option<String> {
    let body = response.text().await.ok()?;
    status_field(&body)
}

fn status_field(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    match value.get("status") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    }
}
