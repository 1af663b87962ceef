use std::sync::Arc;

use mtr_agent::{LeasingDesk, ToolRegistry};
use serde_json::{Map, Value};

use crate::commands::{current_thread_runtime, load_config, CommandResult};

/// Tools whose effects only live as long as the process that runs them.
const SERVER_ONLY_TOOLS: [&str; 1] = ["save_lead"];

/// Runs one leasing tool against the configured property source.
///
/// `args` are `key=value` pairs; `input`, when given, is a JSON object that
/// the pairs are layered on top of. `save_lead` is refused: leads are kept in
/// the serving process's memory, so a lead saved here would vanish on exit.
pub fn run(name: &str, args: &[String], input: Option<&str>) -> CommandResult {
    if SERVER_ONLY_TOOLS.contains(&name) {
        return CommandResult::failure(
            "tool",
            "server_only_tool",
            format!(
                "`{name}` keeps leads in the server's memory; \
                 call POST /tools/{name} on a running mtr-server instead"
            ),
            1,
        );
    }
    let arguments = match parse_arguments(args, input) {
        Ok(arguments) => arguments,
        Err(message) => return CommandResult::failure("tool", "invalid_arguments", message, 1),
    };
    let config = match load_config("tool") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match current_thread_runtime("tool") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let desk = LeasingDesk::from_config(&config)
            .map_err(|error| ("runtime_init", error.to_string(), 3u8))?;
        let registry = ToolRegistry::leasing(Arc::new(desk));

        let Some(tool) = registry.get(name) else {
            let message =
                format!("unknown tool `{name}`; available: {}", registry.names().join(", "));
            return Err(("unknown_tool", message, 1u8));
        };

        let output = tool
            .execute(Value::Object(arguments))
            .await
            .map_err(|error| ("invalid_arguments", error.to_string(), 1u8))?;
        Ok(match output {
            Value::String(text) => text,
            other => other.to_string(),
        })
    });

    match result {
        Ok(answer) => CommandResult::success("tool", answer),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("tool", error_class, message, exit_code)
        }
    }
}

fn parse_arguments(args: &[String], input: Option<&str>) -> Result<Map<String, Value>, String> {
    let mut arguments = match input {
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err("--input must be a JSON object".to_string()),
            Err(error) => return Err(format!("--input is not valid JSON: {error}")),
        },
        None => Map::new(),
    };

    for pair in args {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(format!("argument `{pair}` must look like key=value"));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("argument `{pair}` has an empty key"));
        }
        arguments.insert(key.to_string(), Value::String(value.to_string()));
    }

    Ok(arguments)
}
