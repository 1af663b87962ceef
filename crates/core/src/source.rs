use async_trait::async_trait;
use tracing::{debug, warn};

use crate::catalog::builtin_properties;
use crate::domain::property::PropertyRecord;
use crate::errors::SourceError;

/// Anything that can produce the current set of rental listings.
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// Short label used in diagnostics (`static`, `table`).
    fn kind(&self) -> &'static str;

    async fn load(&self) -> Result<Vec<PropertyRecord>, SourceError>;

    /// Fetches every listing, degrading to an empty list when the backing source fails.
    ///
    /// The failure is reported only through the log; callers render their own
    /// "could not load" wording for an empty result.
    async fn fetch_all(&self) -> Vec<PropertyRecord> {
        match self.load().await {
            Ok(records) => {
                debug!(
                    event_name = "property.source.fetched",
                    source_kind = self.kind(),
                    record_count = records.len(),
                    "property listings fetched"
                );
                records
            }
            Err(error) => {
                warn!(
                    event_name = "property.source.fetch_failed",
                    source_kind = self.kind(),
                    error = %error,
                    "property listings unavailable, answering with an empty list"
                );
                Vec::new()
            }
        }
    }
}

/// Listings held in memory.
#[derive(Clone, Debug)]
pub struct StaticListSource {
    records: Vec<PropertyRecord>,
}

impl StaticListSource {
    pub fn new(records: Vec<PropertyRecord>) -> Self {
        Self { records }
    }
}

impl Default for StaticListSource {
    fn default() -> Self {
        Self::new(builtin_properties())
    }
}

#[async_trait]
impl PropertySource for StaticListSource {
    fn kind(&self) -> &'static str {
        "static"
    }

    async fn load(&self) -> Result<Vec<PropertyRecord>, SourceError> {
        Ok(self.records.clone())
    }
}
