use async_trait::async_trait;
use thiserror::Error;

use mtr_core::domain::lead::Lead;

pub mod memory;
pub mod property_context;

pub use memory::InMemoryLeadRepository;
pub use property_context::TableSource;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Append-only store of captured leads.
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Stores `lead` and returns how many leads are held afterwards.
    async fn append(&self, lead: Lead) -> Result<usize, RepositoryError>;
    async fn list(&self) -> Result<Vec<Lead>, RepositoryError>;
    async fn len(&self) -> Result<usize, RepositoryError>;
}
