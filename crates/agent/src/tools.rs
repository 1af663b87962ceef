use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::desk::LeasingDesk;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// JSON schema of the arguments object.
    fn parameters(&self) -> Value;
    async fn execute(&self, input: Value) -> Result<Value>;
}

/// What the hosted runtime needs to advertise a tool to the model.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// The four leasing tools sharing one desk.
    pub fn leasing(desk: Arc<LeasingDesk>) -> Self {
        let mut registry = Self::default();
        registry.register(ListAvailablePropertiesTool { desk: desk.clone() });
        registry.register(GetPropertyInfoTool { desk: desk.clone() });
        registry.register(CheckPropertyAvailabilityTool { desk: desk.clone() });
        registry.register(SaveLeadTool { desk });
        registry
    }

    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        self.tools.insert(tool.name().to_string(), Box::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    /// Registered tool names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names = self.tools.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.names()
            .into_iter()
            .filter_map(|name| self.get(name))
            .map(|tool| ToolDescriptor {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Tool arguments, read leniently.
///
/// A missing argument or one that is not a string reads as empty.
struct Arguments(Map<String, Value>);

impl Arguments {
    fn parse(input: Value) -> Result<Self> {
        match input {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self(Map::new())),
            other => bail!("tool arguments must be a JSON object, got {}", kind_of(&other)),
        }
    }

    fn text(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or_default()
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn string_parameters(properties: &[(&str, &str)], required: &[&str]) -> Value {
    let properties = properties
        .iter()
        .map(|(name, description)| {
            (name.to_string(), json!({ "type": "string", "description": description }))
        })
        .collect::<Map<_, _>>();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

struct ListAvailablePropertiesTool {
    desk: Arc<LeasingDesk>,
}

#[async_trait]
impl Tool for ListAvailablePropertiesTool {
    fn name(&self) -> &'static str {
        "list_available_properties"
    }

    fn description(&self) -> &'static str {
        "Get a summary of all available rental properties."
    }

    fn parameters(&self) -> Value {
        string_parameters(&[], &[])
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        Arguments::parse(input)?;
        Ok(Value::String(self.desk.list_available_properties().await))
    }
}

struct GetPropertyInfoTool {
    desk: Arc<LeasingDesk>,
}

#[async_trait]
impl Tool for GetPropertyInfoTool {
    fn name(&self) -> &'static str {
        "get_property_info"
    }

    fn description(&self) -> &'static str {
        "Get detailed information about a specific property."
    }

    fn parameters(&self) -> Value {
        string_parameters(
            &[(
                "property_name",
                "The name, nickname, city or type of property (e.g. 'studio', 'boulder', 'lander')",
            )],
            &["property_name"],
        )
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let args = Arguments::parse(input)?;
        Ok(Value::String(self.desk.get_property_info(args.text("property_name")).await))
    }
}

struct CheckPropertyAvailabilityTool {
    desk: Arc<LeasingDesk>,
}

#[async_trait]
impl Tool for CheckPropertyAvailabilityTool {
    fn name(&self) -> &'static str {
        "check_property_availability"
    }

    fn description(&self) -> &'static str {
        "Check if a property is available for specific dates."
    }

    fn parameters(&self) -> Value {
        string_parameters(
            &[
                ("property_name", "The name or type of property"),
                ("move_in_date", "When the renter wants to move in"),
                ("move_out_date", "When the renter plans to move out"),
            ],
            &["property_name", "move_in_date", "move_out_date"],
        )
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let args = Arguments::parse(input)?;
        let answer = self
            .desk
            .check_property_availability(
                args.text("property_name"),
                args.text("move_in_date"),
                args.text("move_out_date"),
            )
            .await;
        Ok(Value::String(answer))
    }
}

struct SaveLeadTool {
    desk: Arc<LeasingDesk>,
}

#[async_trait]
impl Tool for SaveLeadTool {
    fn name(&self) -> &'static str {
        "save_lead"
    }

    fn description(&self) -> &'static str {
        "Save a potential renter's contact information for follow-up."
    }

    fn parameters(&self) -> Value {
        string_parameters(
            &[
                ("name", "The renter's name"),
                ("email", "The renter's email address"),
                ("property_interest", "Which property they're interested in (optional)"),
                ("notes", "Any additional notes about their inquiry (optional)"),
            ],
            &["name", "email"],
        )
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let args = Arguments::parse(input)?;
        let answer = self
            .desk
            .save_lead(
                args.text("name"),
                args.text("email"),
                args.text("property_interest"),
                args.text("notes"),
            )
            .await;
        Ok(Value::String(answer))
    }
}
