use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use contracts::system::auth::TokenPair;

use crate::shared::error::ApiError;

/// Where the token pair lives between requests (and between runs)
#[async_trait]
pub trait TokenStorage: Send + Sync {
    async fn load(&self) -> Result<Option<TokenPair>, ApiError>;
    async fn save(&self, tokens: &TokenPair) -> Result<(), ApiError>;
    async fn clear(&self) -> Result<(), ApiError>;
}

/// Tokens kept for the lifetime of the process only
#[derive(Default)]
pub struct MemoryTokenStorage {
    tokens: Mutex<Option<TokenPair>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
        }
    }
}

#[async_trait]
impl TokenStorage for MemoryTokenStorage {
    async fn load(&self) -> Result<Option<TokenPair>, ApiError> {
        let tokens = self
            .tokens
            .lock()
            .map_err(|_| ApiError::Storage("token lock poisoned".into()))?;
        Ok(tokens.clone())
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), ApiError> {
        let mut slot = self
            .tokens
            .lock()
            .map_err(|_| ApiError::Storage("token lock poisoned".into()))?;
        *slot = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), ApiError> {
        let mut slot = self
            .tokens
            .lock()
            .map_err(|_| ApiError::Storage("token lock poisoned".into()))?;
        *slot = None;
        Ok(())
    }
}

/// Token pair persisted as a small JSON file
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TokenStorage for FileTokenStorage {
    async fn load(&self) -> Result<Option<TokenPair>, ApiError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice::<TokenPair>(&bytes) {
                Ok(tokens) => Ok(Some(tokens)),
                Err(e) => {
                    // Повреждённый файл считаем отсутствующим
                    tracing::warn!("Ignoring unreadable token file {}: {}", self.path.display(), e);
                    Ok(None)
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ApiError::Storage(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), ApiError> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| ApiError::Storage(format!("Failed to create {}: {}", dir.display(), e)))?;
        }
        let bytes = serde_json::to_vec_pretty(tokens)
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        tokio::fs::write(&self.path, bytes).await.map_err(|e| {
            ApiError::Storage(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }

    async fn clear(&self) -> Result<(), ApiError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::Storage(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
