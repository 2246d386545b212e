// src/main.rs
use anyhow::Result;
use service_probe::config::Config;
use service_probe::health::HealthChecker;
use service_probe::report::StatusReporter;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; diagnostics go to stderr so the report stays
    // clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("service_probe=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::default();
    config.validate()?;

    println!("Checking AI Model Marketplace services...");
    println!();

    let checker = Arc::new(HealthChecker::new(&config)?);
    let reporter = Arc::new(StatusReporter::new(checker.targets().to_vec()));

    checker.check_all(reporter).await;

    // Unreachable services are reported, not treated as process failure
    Ok(())
}
