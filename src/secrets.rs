use anyhow::{Context, Result};
use std::{collections::HashMap, fs::File, path::Path};

/// Key-value secret store, read from a JSON file shaped
/// `{ "<scope>": { "<key>": "<value>" } }`. Stands in for the deployment's
/// managed secret service; lookups fail loudly so a misconfigured vault
/// aborts the run before any storage access.
pub struct SecretStore {
    scopes: HashMap<String, HashMap<String, String>>,
}

impl SecretStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("opening secret store {}", path.display()))?;
        let scopes = serde_json::from_reader(file)
            .with_context(|| format!("parsing secret store {}", path.display()))?;
        Ok(SecretStore { scopes })
    }

    pub fn get(&self, scope: &str, key: &str) -> Result<&str> {
        self.scopes
            .get(scope)
            .with_context(|| format!("secret scope `{scope}` not found"))?
            .get(key)
            .map(String::as_str)
            .with_context(|| format!("secret `{key}` not found in scope `{scope}`"))
    }
}

/// The four credentials the storage connector needs.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub storage_account: String,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn resolve(store: &SecretStore, scope: &str) -> Result<Self> {
        Ok(Credentials {
            storage_account: store.get(scope, "storage-account-name")?.to_string(),
            tenant_id: store.get(scope, "tenant-id")?.to_string(),
            client_id: store.get(scope, "client-id")?.to_string(),
            client_secret: store.get(scope, "client-secret")?.to_string(),
        })
    }
}
