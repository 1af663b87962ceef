use std::sync::Arc;

use mtr_agent::{AgentProfile, LeasingDesk, ToolRegistry};
use mtr_core::config::{AppConfig, ConfigError, LoadOptions};
use mtr_db::RepositoryError;
use thiserror::Error;
use tracing::info;

use crate::routes::AppState;

pub struct Application {
    pub config: AppConfig,
    pub desk: Arc<LeasingDesk>,
    pub tools: Arc<ToolRegistry>,
    pub profile: Arc<AgentProfile>,
}

impl Application {
    pub fn state(&self) -> AppState {
        AppState {
            desk: self.desk.clone(),
            tools: self.tools.clone(),
            profile: self.profile.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("property source initialization failed: {0}")]
    PropertySource(#[source] RepositoryError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let desk =
        Arc::new(LeasingDesk::from_config(&config).map_err(BootstrapError::PropertySource)?);
    info!(
        event_name = "system.bootstrap.property_source_ready",
        correlation_id = "bootstrap",
        source_kind = desk.source_kind(),
        table = %config.database.table,
        database = %config.database.redacted_url(),
        "property source initialized"
    );

    let tools = Arc::new(ToolRegistry::leasing(desk.clone()));
    let profile = Arc::new(AgentProfile::leasing(&tools));
    info!(
        event_name = "system.bootstrap.tools_registered",
        correlation_id = "bootstrap",
        tool_count = tools.len(),
        "leasing tools registered"
    );

    Ok(Application { config, desk, tools, profile })
}
