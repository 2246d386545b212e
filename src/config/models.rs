// src/config/models.rs
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub probe: ProbeConfig,
    pub targets: Vec<TargetConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Per-target timeout, measured from each probe's own dispatch time.
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub name: String,
    pub url: Url,
    pub port: u16,
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl TargetConfig {
    fn fixed(name: &str, url: &str, port: u16) -> Self {
        Self {
            name: name.to_string(),
            url: Url::parse(url).expect("fixed target URL is well-formed"),
            port,
        }
    }
}

impl Default for Config {
    /// The local deployment stack this tool ships to probe.
    fn default() -> Self {
        Self {
            probe: ProbeConfig { timeout_ms: 2000 },
            targets: vec![
                TargetConfig::fixed(
                    "Fingerprinting Service",
                    "http://localhost:5000/health",
                    5000,
                ),
                TargetConfig::fixed("Backend API", "http://localhost:3000/health", 3000),
                TargetConfig::fixed("Frontend", "http://localhost:5173", 5173),
            ],
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            bail!("No targets configured");
        }

        if self.probe.timeout_ms == 0 {
            bail!("Probe timeout must be greater than zero");
        }

        for target in &self.targets {
            if !matches!(target.url.scheme(), "http" | "https") {
                bail!(
                    "Target '{}' has unsupported URL scheme '{}'",
                    target.name,
                    target.url.scheme()
                );
            }

            if target.url.host_str().is_none() {
                bail!("Target '{}' URL has no host", target.name);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.targets.len(), 3);
        assert_eq!(config.probe.timeout_ms, 2000);
    }

    #[test]
    fn default_targets_point_at_localhost() {
        let config = Config::default();
        for target in &config.targets {
            assert_eq!(target.url.host_str(), Some("localhost"));
        }
    }

    #[test]
    fn empty_target_list_is_rejected() {
        let config = Config {
            targets: Vec::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = Config {
            probe: ProbeConfig { timeout_ms: 0 },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let mut config = Config::default();
        config.targets[0].url = Url::parse("ftp://localhost:21/").unwrap();
        assert!(config.validate().is_err());
    }
}
