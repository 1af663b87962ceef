use tokio::sync::RwLock;

use mtr_core::domain::lead::Lead;

use super::{LeadRepository, RepositoryError};

/// Leads kept for the lifetime of the process.
///
/// Appends from concurrent tool calls are serialised by the lock.
#[derive(Default)]
pub struct InMemoryLeadRepository {
    leads: RwLock<Vec<Lead>>,
}

#[async_trait::async_trait]
impl LeadRepository for InMemoryLeadRepository {
    async fn append(&self, lead: Lead) -> Result<usize, RepositoryError> {
        let mut leads = self.leads.write().await;
        leads.push(lead);
        Ok(leads.len())
    }

    async fn list(&self) -> Result<Vec<Lead>, RepositoryError> {
        let leads = self.leads.read().await;
        Ok(leads.clone())
    }

    async fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.leads.read().await.len())
    }
}
