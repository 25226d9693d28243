use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs::File, path::{Path, PathBuf}};

/// Pipeline configuration, read once at startup from a YAML document.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// JSON secret-store file holding the storage credentials.
    pub secrets_file: PathBuf,
    /// Secret scope the credentials live under.
    pub secret_scope: String,
    /// Filesystem root the bronze and silver containers are mounted beneath.
    pub storage_root: PathBuf,
}

impl Config {
    pub const DEFAULT_PATH: &'static str = "silversmith.yaml";

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("opening config file {}", path.display()))?;
        serde_yaml::from_reader(file)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}
