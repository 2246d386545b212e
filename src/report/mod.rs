// src/report/mod.rs
use crate::probe::{CheckOutcome, ServiceTarget, TargetReport};
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{info, warn};

/// Collects settled probe reports and owns all stdout writing. Status
/// lines print first-settled-first; the aggregate banner prints exactly
/// once, from whichever task lands the final outcome.
pub struct StatusReporter {
    targets: Vec<ServiceTarget>,
    settled: AtomicUsize,
    reports: DashMap<String, TargetReport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub running: usize,
    pub total: usize,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.running == self.total
    }
}

impl StatusReporter {
    pub fn new(targets: Vec<ServiceTarget>) -> Self {
        Self {
            targets,
            settled: AtomicUsize::new(0),
            reports: DashMap::new(),
        }
    }

    /// Records one settled probe. Must be called exactly once per target;
    /// the counter decides which caller prints the banner.
    pub fn record(&self, target: &ServiceTarget, report: TargetReport) {
        self.print_status_line(target, &report);
        self.reports.insert(target.name.clone(), report);

        let settled = self.settled.fetch_add(1, Ordering::SeqCst) + 1;
        if settled == self.targets.len() {
            self.print_summary();
        }
    }

    pub fn finished(&self) -> bool {
        self.settled.load(Ordering::SeqCst) == self.targets.len()
    }

    pub fn report_for(&self, name: &str) -> Option<TargetReport> {
        self.reports.get(name).map(|r| r.value().clone())
    }

    /// `None` until every target has settled.
    pub fn summary(&self) -> Option<RunSummary> {
        if !self.finished() {
            return None;
        }
        Some(self.summarize())
    }

    fn summarize(&self) -> RunSummary {
        let running = self
            .reports
            .iter()
            .filter(|entry| entry.value().outcome.is_running())
            .count();

        RunSummary {
            running,
            total: self.targets.len(),
        }
    }

    fn print_status_line(&self, target: &ServiceTarget, report: &TargetReport) {
        println!(
            "{} (port {}) - {}",
            target.name,
            target.port,
            report.outcome.label()
        );

        match &report.outcome {
            CheckOutcome::Running { status } => {
                if let Some(status) = status {
                    println!("    status: {}", status);
                }
                info!(
                    target = %target.name,
                    elapsed_ms = report.elapsed_ms,
                    "Service is running"
                );
            }
            CheckOutcome::NotRunning { error } => {
                println!("    error: {}", error);
                warn!(target = %target.name, %error, "Service is not running");
            }
            CheckOutcome::TimedOut => {
                warn!(
                    target = %target.name,
                    elapsed_ms = report.elapsed_ms,
                    "Service timed out"
                );
            }
        }
    }

    fn print_summary(&self) {
        let summary = self.summarize();

        println!();
        if summary.is_success() {
            println!("All services are running!");
            println!();
            println!("Access your application:");
            for target in &self.targets {
                println!("    {}: {}", target.name, target.access_url());
            }
        } else {
            println!("Some services are not running.");
            println!("Start them manually and re-run this check.");
        }

        info!(
            running = summary.running,
            total = summary.total,
            "Health check complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use url::Url;

    fn test_target(index: usize) -> ServiceTarget {
        let port = 8000 + index as u16;
        ServiceTarget {
            name: format!("service-{index}"),
            url: Url::parse(&format!("http://localhost:{port}/health")).unwrap(),
            port,
        }
    }

    fn report_with(target: &ServiceTarget, outcome: CheckOutcome) -> TargetReport {
        TargetReport {
            target_name: target.name.clone(),
            outcome,
            elapsed_ms: 1,
            checked_at: Utc::now(),
        }
    }

    #[test]
    fn summary_is_none_until_all_targets_settle() {
        let targets: Vec<_> = (0..3).map(test_target).collect();
        let reporter = StatusReporter::new(targets.clone());

        reporter.record(
            &targets[0],
            report_with(&targets[0], CheckOutcome::Running { status: None }),
        );
        assert!(!reporter.finished());
        assert!(reporter.summary().is_none());

        reporter.record(&targets[1], report_with(&targets[1], CheckOutcome::TimedOut));
        assert!(reporter.summary().is_none());

        reporter.record(
            &targets[2],
            report_with(
                &targets[2],
                CheckOutcome::NotRunning {
                    error: "connection refused".to_string(),
                },
            ),
        );
        assert!(reporter.finished());

        let summary = reporter.summary().unwrap();
        assert_eq!(summary.running, 1);
        assert_eq!(summary.total, 3);
        assert!(!summary.is_success());
    }

    #[test]
    fn exactly_one_report_is_kept_per_target() {
        let targets: Vec<_> = (0..2).map(test_target).collect();
        let reporter = StatusReporter::new(targets.clone());

        for target in &targets {
            reporter.record(
                target,
                report_with(target, CheckOutcome::Running { status: None }),
            );
        }

        for target in &targets {
            assert!(reporter.report_for(&target.name).is_some());
        }
        assert_eq!(reporter.summary().unwrap().running, 2);
    }

    #[tokio::test]
    async fn concurrent_recording_settles_every_target() {
        let targets: Vec<_> = (0..16).map(test_target).collect();
        let reporter = std::sync::Arc::new(StatusReporter::new(targets.clone()));

        let mut tasks = Vec::new();
        for target in targets {
            let reporter = reporter.clone();
            tasks.push(tokio::spawn(async move {
                let report = report_with(&target, CheckOutcome::Running { status: None });
                reporter.record(&target, report);
            }));
        }
        futures::future::join_all(tasks).await;

        assert!(reporter.finished());
        let summary = reporter.summary().unwrap();
        assert_eq!(summary.running, 16);
        assert!(summary.is_success());
    }

    fn outcome_strategy() -> impl Strategy<Value = CheckOutcome> {
        prop_oneof![
            proptest::option::of("[a-z]{1,8}")
                .prop_map(|status| CheckOutcome::Running { status }),
            "[a-z ]{1,16}".prop_map(|error| CheckOutcome::NotRunning { error }),
            Just(CheckOutcome::TimedOut),
        ]
    }

    proptest! {
        #[test]
        fn banner_is_success_iff_every_outcome_is_running(
            outcomes in proptest::collection::vec(outcome_strategy(), 1..12)
        ) {
            let targets: Vec<_> = (0..outcomes.len()).map(test_target).collect();
            let reporter = StatusReporter::new(targets.clone());

            for (target, outcome) in targets.iter().zip(outcomes.iter()) {
                reporter.record(target, report_with(target, outcome.clone()));
            }

            let summary = reporter.summary().unwrap();
            let all_running = outcomes.iter().all(|o| o.is_running());
            prop_assert_eq!(summary.is_success(), all_running);
            prop_assert_eq!(summary.total, outcomes.len());
        }
    }
}
