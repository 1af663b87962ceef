use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use mtr_core::config::AppConfig;
use toml::Value;

use crate::commands::{load_config, CommandResult};

struct ConfigFile {
    path: Option<PathBuf>,
    doc: Option<Value>,
}

pub fn run() -> CommandResult {
    let config = match load_config("config") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    CommandResult { exit_code: 0, output: render(&config, &ConfigFile::detect()) }
}

fn render(config: &AppConfig, file: &ConfigFile) -> String {
    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    let entries: [(&str, String, &[&str]); 10] = [
        (
            "database.url",
            config.database.redacted_url(),
            &["MTR_DATABASE_URL", "MIDWAY_DATABASE_URL"],
        ),
        (
            "database.max_connections",
            config.database.max_connections.to_string(),
            &["MTR_DATABASE_MAX_CONNECTIONS"],
        ),
        (
            "database.timeout_secs",
            config.database.timeout_secs.to_string(),
            &["MTR_DATABASE_TIMEOUT_SECS"],
        ),
        ("database.table", config.database.table.clone(), &["MTR_DATABASE_TABLE"]),
        (
            "properties.source",
            config.properties.source.as_str().to_string(),
            &["MTR_PROPERTY_SOURCE"],
        ),
        (
            "server.bind_address",
            config.server.bind_address.clone(),
            &["MTR_SERVER_BIND_ADDRESS"],
        ),
        ("server.port", config.server.port.to_string(), &["MTR_SERVER_PORT"]),
        (
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            &["MTR_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        ),
        ("logging.level", config.logging.level.clone(), &["MTR_LOGGING_LEVEL", "MTR_LOG_LEVEL"]),
        (
            "logging.format",
            config.logging.format.as_str().to_string(),
            &["MTR_LOGGING_FORMAT", "MTR_LOG_FORMAT"],
        ),
    ];

    for (key, value, env_keys) in entries {
        lines.push(render_line(key, &value, field_source(key, env_keys, file)));
    }

    lines.join("\n")
}

impl ConfigFile {
    fn detect() -> Self {
        let path = [PathBuf::from("mtr.toml"), PathBuf::from("config/mtr.toml")]
            .into_iter()
            .find(|path| path.exists());
        let doc = path.as_deref().and_then(load_doc);
        Self { path, doc }
    }
}

fn load_doc(path: &Path) -> Option<Value> {
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(key_path: &str, env_keys: &[&str], file: &ConfigFile) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = file.doc.as_ref() {
        if contains_path(doc, key_path) {
            let file_path = file
                .path
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
