use crate::error::{Result, RewrappedError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Storage for the bearer token attached to every API request.
pub trait TokenStore: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn get(&self) -> Result<Option<String>>;
    fn set(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Process-lifetime tier. Lost on exit.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self) -> Result<Option<String>> {
        let guard = self
            .token
            .read()
            .map_err(|_| RewrappedError::TokenStore("memory tier lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn set(&self, token: &str) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| RewrappedError::TokenStore("memory tier lock poisoned".into()))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| RewrappedError::TokenStore("memory tier lock poisoned".into()))?;
        *guard = None;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    stored_at: i64,
    max_age_secs: Option<u64>,
}

impl StoredToken {
    fn is_expired(&self, now: i64) -> bool {
        match self.max_age_secs {
            Some(max_age) => now - self.stored_at >= max_age as i64,
            None => false,
        }
    }
}

/// Persistent tier: a small JSON file. An expired entry reads as absent.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    max_age_secs: Option<u64>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>, max_age_secs: Option<u64>) -> Self {
        Self {
            path: path.into(),
            max_age_secs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn name(&self) -> &'static str {
        "file"
    }

    fn get(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let stored: StoredToken = match serde_json::from_str(&content) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Ignoring unreadable token file {}: {}", self.path.display(), e);
                return Ok(None);
            }
        };
        if stored.is_expired(Utc::now().timestamp()) {
            debug!("Stored token in {} has expired", self.path.display());
            return Ok(None);
        }
        Ok(Some(stored.token))
    }

    fn set(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let stored = StoredToken {
            token: token.to_string(),
            stored_at: Utc::now().timestamp(),
            max_age_secs: self.max_age_secs,
        };
        fs::write(&self.path, serde_json::to_vec(&stored)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Tries tiers in order. Reads take the first hit, writes and clears go to every tier.
pub struct LayeredTokenStore {
    tiers: Vec<Arc<dyn TokenStore>>,
}

impl LayeredTokenStore {
    pub fn new(tiers: Vec<Arc<dyn TokenStore>>) -> Self {
        Self { tiers }
    }

    /// Persistent file tier first, then the in-process tier.
    pub fn standard(token_file: impl Into<PathBuf>, max_age_secs: Option<u64>) -> Self {
        Self::new(vec![
            Arc::new(FileTokenStore::new(token_file, max_age_secs)),
            Arc::new(MemoryTokenStore::new()),
        ])
    }
}

impl TokenStore for LayeredTokenStore {
    fn name(&self) -> &'static str {
        "layered"
    }

    fn get(&self) -> Result<Option<String>> {
        for tier in &self.tiers {
            match tier.get() {
                Ok(Some(token)) => return Ok(Some(token)),
                Ok(None) => continue,
                Err(e) => warn!("Token tier '{}' read failed: {}", tier.name(), e),
            }
        }
        Ok(None)
    }

    fn set(&self, token: &str) -> Result<()> {
        let mut stored = 0;
        for tier in &self.tiers {
            match tier.set(token) {
                Ok(()) => stored += 1,
                Err(e) => warn!("Token tier '{}' write failed, trying next: {}", tier.name(), e),
            }
        }
        if stored == 0 {
            return Err(RewrappedError::TokenStore(
                "all token storage tiers failed".into(),
            ));
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut first_err = None;
        for tier in &self.tiers {
            if let Err(e) = tier.clear() {
                warn!("Token tier '{}' clear failed: {}", tier.name(), e);
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
