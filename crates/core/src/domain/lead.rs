use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

/// Contact details left by a prospective renter for follow-up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: String,
    pub property_interest: String,
    pub notes: String,
    pub captured_at: DateTime<Utc>,
}

impl Lead {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        property_interest: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id: LeadId(Uuid::new_v4().to_string()),
            name: name.into().trim().to_string(),
            email: email.into().trim().to_string(),
            property_interest: property_interest.into().trim().to_string(),
            notes: notes.into().trim().to_string(),
            captured_at: Utc::now(),
        }
    }

    pub fn interest_label(&self) -> &str {
        if self.property_interest.is_empty() {
            "property"
        } else {
            &self.property_interest
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Lead;

    #[test]
    fn interest_label_falls_back_to_generic_phrase() {
        let lead = Lead::new("Jane", "jane@x.com", "  ", "");
        assert_eq!(lead.interest_label(), "property");

        let lead = Lead::new("Jane", "jane@x.com", "Lander loft", "");
        assert_eq!(lead.interest_label(), "Lander loft");
    }

    #[test]
    fn leads_get_distinct_ids() {
        let first = Lead::new("Jane", "jane@x.com", "", "");
        let second = Lead::new("Jane", "jane@x.com", "", "");
        assert_ne!(first.id, second.id);
    }
}
