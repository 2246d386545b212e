// src/probe/target.rs
use crate::config::TargetConfig;
use url::Url;

/// A named service endpoint to probe. Built once from configuration at
/// startup and never mutated.
#[derive(Debug, Clone)]
pub struct ServiceTarget {
    pub name: String,
    pub url: Url,
    pub port: u16,
}

impl ServiceTarget {
    pub fn from_config(config: &TargetConfig) -> Self {
        Self {
            name: config.name.clone(),
            url: config.url.clone(),
            port: config.port,
        }
    }

    /// Root URL advertised in the success banner, without the probe path.
    pub fn access_url(&self) -> String {
        format!(
            "{}://{}:{}",
            self.url.scheme(),
            self.url.host_str().unwrap_or("localhost"),
            self.port
        )
    }
}
