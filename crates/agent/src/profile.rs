use serde::Serialize;

use crate::tools::{ToolDescriptor, ToolRegistry};

pub const ASSISTANT_NAME: &str = "mtr-leasing-assistant";

pub const INSTRUCTIONS: &str = "\
You are a friendly leasing assistant for a mid-term rental company. You help prospective \
tenants learn about our furnished rental properties.

## Your personality
- Warm, helpful and efficient
- Conversational but professional
- Keep responses concise (1-3 sentences) because this is a voice conversation

## What you can help with
- Describe the properties we have using the property tools
- Answer questions about rent, amenities, pet policies and availability dates
- Collect contact information from interested renters

## What you should know
- All properties are furnished mid-term rentals (1-11 month stays)
- We cater to traveling professionals, remote workers and people in transition
- Applying means an online application, a background check, then first month plus deposit
- We respond to applications within 24-48 hours

## Conversation flow
1. Greet the caller and ask how you can help
2. Answer their questions using the property tools
3. If they're interested, collect their name and email with save_lead
4. Confirm next steps and end professionally

If someone asks something you can't help with, say you're the leasing assistant and offer \
to take a message for the property manager.";

pub const GREETING: &str =
    "Greet the user warmly and ask how you can help them with their housing search today.";

/// Everything the hosted voice runtime needs to start a leasing session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AgentProfile {
    pub name: String,
    pub instructions: String,
    pub greeting: String,
    pub tools: Vec<ToolDescriptor>,
}

impl AgentProfile {
    pub fn leasing(registry: &ToolRegistry) -> Self {
        Self {
            name: ASSISTANT_NAME.to_string(),
            instructions: INSTRUCTIONS.to_string(),
            greeting: GREETING.to_string(),
            tools: registry.descriptors(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mtr_core::source::StaticListSource;
    use mtr_db::InMemoryLeadRepository;

    use super::AgentProfile;
    use crate::desk::LeasingDesk;
    use crate::tools::ToolRegistry;

    #[test]
    fn profile_lists_every_registered_tool() {
        let desk = LeasingDesk::new(
            Arc::new(StaticListSource::default()),
            Arc::new(InMemoryLeadRepository::default()),
        );
        let registry = ToolRegistry::leasing(Arc::new(desk));
        let profile = AgentProfile::leasing(&registry);

        assert_eq!(profile.tools.len(), registry.len());
        assert!(profile.instructions.contains("save_lead"));
        assert!(profile.greeting.starts_with("Greet the user"));

        let encoded = serde_json::to_value(&profile).expect("profile serializes");
        assert_eq!(encoded["tools"][0]["name"], "check_property_availability");
    }
}
