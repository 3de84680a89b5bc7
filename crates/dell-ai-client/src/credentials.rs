use std::path::{Path, PathBuf};
use std::sync::RwLock;

use dell_ai_common::{HubError, Result};

/// Source of the bearer token attached to authenticated Hub calls.
///
/// Created once per process and handed to the transport; read on every
/// authenticated request, written by `auth login`, cleared by `auth logout`.
pub trait CredentialProvider: Send + Sync {
    /// Current token, or `None` when logged out.
    fn token(&self) -> Result<Option<String>>;

    fn save_token(&self, token: &str) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

/// Token file shared with the Hugging Face tooling.
///
/// `HF_TOKEN` in the environment wins over the file, matching the identity
/// provider's own lookup order.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
    env_token: Option<String>,
}

impl TokenFile {
    /// Token file at an explicit location, ignoring `HF_TOKEN`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env_token: None,
        }
    }

    pub fn from_env() -> Result<Self> {
        let path = default_token_path().ok_or_else(|| {
            HubError::auth("cannot locate the token file: neither HF_HOME nor HOME is set")
        })?;
        Ok(Self {
            path,
            env_token: std::env::var("HF_TOKEN").ok().and_then(normalize),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the token currently comes from `HF_TOKEN` rather than the file.
    pub fn from_environment(&self) -> bool {
        self.env_token.is_some()
    }
}

impl CredentialProvider for TokenFile {
    fn token(&self) -> Result<Option<String>> {
        if let Some(t) = &self.env_token {
            return Ok(Some(t.clone()));
        }
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(normalize(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(HubError::auth(format!(
                "failed to read token from {}: {e}",
                self.path.display()
            ))),
        }
    }

    fn save_token(&self, token: &str) -> Result<()> {
        let token = normalize(token.to_string())
            .ok_or_else(|| HubError::auth("refusing to save an empty token"))?;
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| {
                HubError::auth(format!("failed to save token: {}: {e}", dir.display()))
            })?;
        }
        std::fs::write(&self.path, token).map_err(|e| {
            HubError::auth(format!(
                "failed to save token: {}: {e}",
                self.path.display()
            ))
        })?;
        tracing::info!(path = %self.path.display(), "token saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "token removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(HubError::auth(format!(
                "failed to remove token {}: {e}",
                self.path.display()
            ))),
        }
    }
}

/// In-process token holder, for `--token` overrides and tests.
#[derive(Debug, Default)]
pub struct StaticCredentials {
    token: RwLock<Option<String>>,
}

impl StaticCredentials {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token.and_then(normalize)),
        }
    }
}

impl CredentialProvider for StaticCredentials {
    fn token(&self) -> Result<Option<String>> {
        let guard = self
            .token
            .read()
            .map_err(|_| HubError::auth("credential lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save_token(&self, token: &str) -> Result<()> {
        let token = normalize(token.to_string())
            .ok_or_else(|| HubError::auth("refusing to save an empty token"))?;
        let mut guard = self
            .token
            .write()
            .map_err(|_| HubError::auth("credential lock poisoned"))?;
        *guard = Some(token);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| HubError::auth("credential lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}

/// `$HF_TOKEN_PATH`, else `$HF_HOME/token`, else `$XDG_CACHE_HOME/huggingface/token`,
/// else `$HOME/.cache/huggingface/token`.
pub fn default_token_path() -> Option<PathBuf> {
    let var = |k: &str| std::env::var_os(k).filter(|v| !v.is_empty());
    if let Some(p) = var("HF_TOKEN_PATH") {
        return Some(PathBuf::from(p));
    }
    if let Some(home) = var("HF_HOME") {
        return Some(PathBuf::from(home).join("token"));
    }
    if let Some(cache) = var("XDG_CACHE_HOME") {
        return Some(PathBuf::from(cache).join("huggingface").join("token"));
    }
    var("HOME").map(|home| {
        PathBuf::from(home)
            .join(".cache")
            .join("huggingface")
            .join("token")
    })
}

fn normalize(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
