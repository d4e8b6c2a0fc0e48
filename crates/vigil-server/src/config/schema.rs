use std::net::SocketAddr;

use serde::Deserialize;
use vigil_core::error::{Result, VigilError};

use crate::router::{HEALTHZ_PATH, PING_PATH};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VigilConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

impl Default for VigilConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            metrics: MetricsSection::default(),
        }
    }
}

impl VigilConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(VigilError::UnsupportedVersion);
        }
        self.server.validate()?;
        self.metrics.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            VigilError::BadConfig(format!(
                "server.listen must be a valid socket address, got {:?}",
                self.listen
            ))
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    #[serde(default = "default_metrics_path")]
    pub path: String,

    #[serde(default = "default_instrument_liveness")]
    pub instrument_liveness: bool,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            path: default_metrics_path(),
            instrument_liveness: default_instrument_liveness(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') {
            return Err(VigilError::BadConfig("metrics.path must start with '/'".into()));
        }
        if self.path.contains([':', '*', '{', '}']) {
            return Err(VigilError::BadConfig(
                "metrics.path must be a literal path without captures or wildcards".into(),
            ));
        }
        if self.path == PING_PATH || self.path == HEALTHZ_PATH {
            return Err(VigilError::BadConfig(format!(
                "metrics.path {} collides with a liveness route",
                self.path
            )));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_metrics_path() -> String {
    "/metrics".into()
}
fn default_instrument_liveness() -> bool {
    true
}
