use super::leveling_models::LevelDocument;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Trait for persisting the leveling document.
///
/// The whole document is the unit of persistence: implementations never see
/// partial updates, they just load it once and overwrite it on every save.
#[async_trait]
pub trait LevelStore: Send + Sync {
    /// Load the persisted document. A store with nothing saved yet returns
    /// an empty document rather than an error.
    async fn load(&self) -> Result<LevelDocument, StoreError>;

    /// Replace whatever was persisted with `document`.
    async fn save(&self, document: &LevelDocument) -> Result<(), StoreError>;
}
