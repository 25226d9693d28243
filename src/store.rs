use crate::secrets::Credentials;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Storage containers the pipeline touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Bronze,
    Silver,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Bronze => "bronze",
            Tier::Silver => "silver",
        }
    }
}

/// OAuth connector configuration for the object store. The property set must
/// be applied before any container access; the account suffix and endpoint
/// template follow the `fs.azure` connector contract.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    account: String,
    client_id: String,
    client_secret: String,
    oauth_endpoint: String,
}

const OAUTH_PROVIDER: &str = "org.apache.hadoop.fs.azurebfs.oauth2.ClientCredsTokenProvider";

impl ConnectorConfig {
    pub fn new(creds: &Credentials) -> Self {
        ConnectorConfig {
            account: creds.storage_account.clone(),
            client_id: creds.client_id.clone(),
            client_secret: creds.client_secret.clone(),
            oauth_endpoint: format!(
                "https://login.microsoftonline.com/{}/oauth2/token",
                creds.tenant_id
            ),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    /// The named connector properties, keyed per account.
    pub fn properties(&self) -> Vec<(String, String)> {
        let suffix = format!("{}.dfs.core.windows.net", self.account);
        vec![
            (
                format!("fs.azure.account.auth.type.{suffix}"),
                "OAuth".to_string(),
            ),
            (
                format!("fs.azure.account.oauth.provider.type.{suffix}"),
                OAUTH_PROVIDER.to_string(),
            ),
            (
                format!("fs.azure.account.oauth2.client.id.{suffix}"),
                self.client_id.clone(),
            ),
            (
                format!("fs.azure.account.oauth2.client.secret.{suffix}"),
                self.client_secret.clone(),
            ),
            (
                format!("fs.azure.account.oauth2.client.endpoint.{suffix}"),
                self.oauth_endpoint.clone(),
            ),
        ]
    }
}

/// A configured view of the object store, mounted under a filesystem root.
/// Constructed exactly once per run and passed explicitly into the load and
/// write stages; nothing here is process-global.
#[derive(Debug, Clone)]
pub struct StorageMount {
    root: PathBuf,
    account: String,
}

impl StorageMount {
    /// Apply the connector configuration and open the mount. Fails if the
    /// mount root is absent, before any dataset I/O is attempted.
    pub fn configure<P: AsRef<Path>>(root: P, connector: &ConnectorConfig) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            bail!("storage root `{}` does not exist", root.display());
        }

        for (key, _value) in connector.properties() {
            // keys only, the property values carry the client secret
            debug!(%key, "connector property set");
        }

        Ok(StorageMount {
            root,
            account: connector.account().to_string(),
        })
    }

    /// `<root>/<container>/<storage-account>`
    pub fn container_path(&self, tier: Tier) -> PathBuf {
        self.root.join(tier.as_str()).join(&self.account)
    }
}
