//! Service account credential file loading.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tokio::sync::RwLock;

use crate::{Error, Result};

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Cached credentials keyed by file path.
static CREDENTIALS_CACHE: OnceLock<RwLock<HashMap<String, Arc<ServiceAccountKey>>>> =
    OnceLock::new();

fn get_cache() -> &'static RwLock<HashMap<String, Arc<ServiceAccountKey>>> {
    CREDENTIALS_CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Google service account key, as downloaded from the cloud console.
#[derive(Debug, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Parse a key from its JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Auth(format!("Failed to parse service account key: {}", e)))
    }
}

/// Load the service account key at `path`, caching it for the container lifetime.
pub async fn load_service_account(path: &str) -> Result<Arc<ServiceAccountKey>> {
    {
        let cache = get_cache().read().await;
        if let Some(key) = cache.get(path) {
            return Ok(Arc::clone(key));
        }
    }

    let contents = tokio::fs::read_to_string(path).await?;
    let key = Arc::new(ServiceAccountKey::from_json(&contents)?);

    {
        let mut cache = get_cache().write().await;
        cache.insert(path.to_string(), Arc::clone(&key));
    }

    Ok(key)
}

/// Clear the credentials cache (useful for testing or key rotation).
pub async fn clear_cache() {
    let mut cache = get_cache().write().await;
    cache.clear();
}
