use std::sync::Arc;

use tracing::{info, warn};

use mtr_core::config::{AppConfig, SourceKind};
use mtr_core::domain::lead::Lead;
use mtr_core::listing::{check_availability, detail, summarize_all};
use mtr_core::source::{PropertySource, StaticListSource};
use mtr_db::{InMemoryLeadRepository, LeadRepository, RepositoryError, TableSource};

pub const MISSING_EMAIL: &str =
    "I didn't catch an email address. What's the best email for our team to reach you?";
pub const LEAD_NOT_SAVED: &str =
    "I'm sorry, I couldn't save your information right now. Please try again in a moment.";

/// The leasing operations the voice assistant can call.
///
/// Listings are fetched from the source on every call. Leads go to the
/// injected repository.
#[derive(Clone)]
pub struct LeasingDesk {
    properties: Arc<dyn PropertySource>,
    leads: Arc<dyn LeadRepository>,
}

impl LeasingDesk {
    pub fn new(properties: Arc<dyn PropertySource>, leads: Arc<dyn LeadRepository>) -> Self {
        Self { properties, leads }
    }

    /// Desk over the configured property source with an in-process lead store.
    ///
    /// Must be called inside a tokio runtime when the table source is selected.
    pub fn from_config(config: &AppConfig) -> Result<Self, RepositoryError> {
        let properties: Arc<dyn PropertySource> = match config.properties.source {
            SourceKind::Static => Arc::new(StaticListSource::default()),
            SourceKind::Table => Arc::new(TableSource::from_config(&config.database)?),
        };
        Ok(Self::new(properties, Arc::new(InMemoryLeadRepository::default())))
    }

    pub fn source_kind(&self) -> &'static str {
        self.properties.kind()
    }

    pub fn properties(&self) -> &Arc<dyn PropertySource> {
        &self.properties
    }

    pub fn leads(&self) -> &Arc<dyn LeadRepository> {
        &self.leads
    }

    pub async fn list_available_properties(&self) -> String {
        info!(event_name = "agent.tool.called", tool = "list_available_properties", "tool called");
        summarize_all(&self.properties.fetch_all().await)
    }

    pub async fn get_property_info(&self, property_name: &str) -> String {
        info!(
            event_name = "agent.tool.called",
            tool = "get_property_info",
            property_name,
            "tool called"
        );
        detail(property_name, &self.properties.fetch_all().await)
    }

    pub async fn check_property_availability(
        &self,
        property_name: &str,
        move_in_date: &str,
        move_out_date: &str,
    ) -> String {
        info!(
            event_name = "agent.tool.called",
            tool = "check_property_availability",
            property_name,
            move_in_date,
            move_out_date,
            "tool called"
        );
        check_availability(
            property_name,
            move_in_date,
            move_out_date,
            &self.properties.fetch_all().await,
        )
    }

    pub async fn save_lead(
        &self,
        name: &str,
        email: &str,
        property_interest: &str,
        notes: &str,
    ) -> String {
        let lead = Lead::new(name, email, property_interest, notes);
        if lead.email.is_empty() {
            info!(event_name = "lead.rejected", reason = "missing_email", "lead not stored");
            return MISSING_EMAIL.to_string();
        }

        match self.leads.append(lead.clone()).await {
            Ok(total) => {
                info!(
                    event_name = "lead.saved",
                    lead_id = %lead.id.0,
                    name = %lead.name,
                    email = %lead.email,
                    property_interest = %lead.property_interest,
                    total_leads = total,
                    "lead saved"
                );
                format!(
                    "I've saved your information. Someone from our team will reach out to {} \
                     within 24 hours to help you with next steps for the {}.",
                    lead.email,
                    lead.interest_label()
                )
            }
            Err(error) => {
                warn!(event_name = "lead.save_failed", error = %error, "lead could not be stored");
                LEAD_NOT_SAVED.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use mtr_core::config::{AppConfig, SourceKind};
    use mtr_core::domain::lead::Lead;
    use mtr_core::domain::property::PropertyRecord;
    use mtr_core::errors::SourceError;
    use mtr_core::listing::format::{LOAD_FAILURE, NOT_FOUND_FOR_DATES};
    use mtr_core::source::{PropertySource, StaticListSource};
    use mtr_db::{InMemoryLeadRepository, LeadRepository, RepositoryError};

    use super::{LeasingDesk, LEAD_NOT_SAVED, MISSING_EMAIL};

    struct OfflineSource;

    #[async_trait]
    impl PropertySource for OfflineSource {
        fn kind(&self) -> &'static str {
            "offline"
        }

        async fn load(&self) -> Result<Vec<PropertyRecord>, SourceError> {
            Err(SourceError::Backend("connection refused".to_string()))
        }
    }

    struct FullLeadRepository;

    #[async_trait]
    impl LeadRepository for FullLeadRepository {
        async fn append(&self, _lead: Lead) -> Result<usize, RepositoryError> {
            Err(RepositoryError::Decode("lead store is read-only".to_string()))
        }

        async fn list(&self) -> Result<Vec<Lead>, RepositoryError> {
            Ok(Vec::new())
        }

        async fn len(&self) -> Result<usize, RepositoryError> {
            Ok(0)
        }
    }

    fn desk_with(source: Arc<dyn PropertySource>) -> (LeasingDesk, Arc<InMemoryLeadRepository>) {
        let leads = Arc::new(InMemoryLeadRepository::default());
        (LeasingDesk::new(source, leads.clone()), leads)
    }

    fn catalog_desk() -> (LeasingDesk, Arc<InMemoryLeadRepository>) {
        desk_with(Arc::new(StaticListSource::default()))
    }

    #[tokio::test]
    async fn desk_follows_the_configured_source() {
        let mut config = AppConfig::default();
        config.properties.source = SourceKind::Static;
        let desk = LeasingDesk::from_config(&config).expect("static desk");
        assert_eq!(desk.source_kind(), "static");

        config.properties.source = SourceKind::Table;
        let desk = LeasingDesk::from_config(&config).expect("unconfigured table desk");
        assert_eq!(desk.source_kind(), "table");
        assert_eq!(desk.list_available_properties().await, LOAD_FAILURE);
    }

    #[tokio::test]
    async fn listing_names_every_catalog_property() {
        let (desk, _) = catalog_desk();
        let answer = desk.list_available_properties().await;

        assert!(answer.contains("Beautiful Centrally Located 1 Bdrm Monthly Rental"));
        assert!(answer.contains("Blue Door Studio Downtown Lander Loft, a studio"));
        assert!(answer.ends_with('.'));
    }

    #[tokio::test]
    async fn property_info_resolves_by_nickname() {
        let (desk, _) = catalog_desk();
        let answer = desk.get_property_info("Lander").await;

        assert!(answer
            .starts_with("Blue Door Studio Downtown Lander Loft is at 744 Lincoln Street, Lander"));
        assert!(answer.contains("The pet deposit is $400."));
    }

    #[tokio::test]
    async fn availability_echoes_requested_dates() {
        let (desk, _) = catalog_desk();
        let answer = desk.check_property_availability("boulder", "March 1", "June 30").await;

        assert!(answer.contains("Your dates: March 1 to June 30."));
        assert!(answer.contains("24 to 48 hours"));

        let missing = desk.check_property_availability("denver", "March 1", "June 30").await;
        assert_eq!(missing, NOT_FOUND_FOR_DATES);
    }

    #[tokio::test]
    async fn offline_source_still_answers() {
        let (desk, _) = desk_with(Arc::new(OfflineSource));

        assert_eq!(desk.list_available_properties().await, LOAD_FAILURE);
        assert!(desk.get_property_info("boulder").await.contains("couldn't load our listings"));
        assert_eq!(
            desk.check_property_availability("boulder", "", "").await,
            NOT_FOUND_FOR_DATES
        );
    }

    #[tokio::test]
    async fn saving_a_lead_stores_it_once() {
        let (desk, leads) = catalog_desk();
        let answer = desk.save_lead("Jane", "jane@x.com", "boulder", "").await;

        assert_eq!(
            answer,
            "I've saved your information. Someone from our team will reach out to jane@x.com \
             within 24 hours to help you with next steps for the boulder."
        );
        let stored = leads.list().await.expect("list leads");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "Jane");
        assert_eq!(stored[0].property_interest, "boulder");
    }

    #[tokio::test]
    async fn lead_without_interest_uses_generic_wording() {
        let (desk, _) = catalog_desk();
        let answer = desk.save_lead("Sam", "sam@x.com", "", "moving in March").await;

        assert!(answer.ends_with("next steps for the property."));
    }

    #[tokio::test]
    async fn blank_email_is_not_stored() {
        let (desk, leads) = catalog_desk();
        let answer = desk.save_lead("Jane", "   ", "boulder", "").await;

        assert_eq!(answer, MISSING_EMAIL);
        assert_eq!(leads.len().await.expect("count leads"), 0);
    }

    #[tokio::test]
    async fn failing_lead_store_answers_politely() {
        let desk = LeasingDesk::new(
            Arc::new(StaticListSource::default()),
            Arc::new(FullLeadRepository),
        );

        assert_eq!(desk.save_lead("Jane", "jane@x.com", "", "").await, LEAD_NOT_SAVED);
    }
}
