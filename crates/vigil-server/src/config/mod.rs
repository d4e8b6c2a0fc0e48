//! Server config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use vigil_core::error::{Result, VigilError};

pub use schema::{MetricsSection, ServerSection, VigilConfig};

/// Config file read when no path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "vigil.yaml";

pub fn load_from_file(path: impl AsRef<Path>) -> Result<VigilConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)
        .map_err(|e| VigilError::Io(format!("read config {} failed: {e}", path.display())))?;
    load_from_str(&s)
}

/// Like [`load_from_file`], but a missing file yields the built-in defaults.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<VigilConfig> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            Ok(VigilConfig::default())
        }
        Err(e) => Err(VigilError::Io(format!("read config {} failed: {e}", path.display()))),
    }
}

pub fn load_from_str(s: &str) -> Result<VigilConfig> {
    let cfg: VigilConfig = serde_yaml::from_str(s)
        .map_err(|e| VigilError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
