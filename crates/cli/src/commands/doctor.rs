use mtr_agent::LeasingDesk;
use mtr_core::config::{AppConfig, LoadOptions};
use mtr_core::source::PropertySource;
use mtr_db::connect_with_settings;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> super::CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\
                 \"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    super::CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => {
                    checks.push(runtime.block_on(check_database_connectivity(&config)));
                    checks.push(runtime.block_on(check_property_source(&config)));
                }
                Err(error) => {
                    let details = format!("failed to initialize async runtime: {error}");
                    checks.push(failed("database_connectivity", details.clone()));
                    checks.push(failed("property_source", details));
                }
            }
        }
        Err(error) => {
            checks.push(failed("config_validation", error.to_string()));
            checks.push(skipped("database_connectivity", "configuration did not load"));
            checks.push(skipped("property_source", "configuration did not load"));
        }
    }

    let all_pass = checks.iter().all(|check| check.status != CheckStatus::Fail);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn failed(name: &'static str, details: String) -> DoctorCheck {
    DoctorCheck { name, status: CheckStatus::Fail, details }
}

fn skipped(name: &'static str, reason: &str) -> DoctorCheck {
    DoctorCheck { name, status: CheckStatus::Skipped, details: format!("skipped because {reason}") }
}

async fn check_database_connectivity(config: &AppConfig) -> DoctorCheck {
    let Some(url) = config.database.exposed_url() else {
        return skipped("database_connectivity", "database.url is not set");
    };

    let result =
        connect_with_settings(url, config.database.max_connections, config.database.timeout_secs)
            .await;

    match result {
        Ok(pool) => {
            pool.close().await;
            DoctorCheck {
                name: "database_connectivity",
                status: CheckStatus::Pass,
                details: format!("connected using `{}`", config.database.redacted_url()),
            }
        }
        Err(error) => {
            failed("database_connectivity", format!("failed to connect to database: {error}"))
        }
    }
}

/// Loads listings the same way the tool endpoint does, without the empty-list fallback.
async fn check_property_source(config: &AppConfig) -> DoctorCheck {
    let desk = match LeasingDesk::from_config(config) {
        Ok(desk) => desk,
        Err(error) => return failed("property_source", error.to_string()),
    };

    match desk.properties().load().await {
        Ok(records) if records.is_empty() => failed(
            "property_source",
            format!("{} source returned no properties", desk.source_kind()),
        ),
        Ok(records) => DoctorCheck {
            name: "property_source",
            status: CheckStatus::Pass,
            details: format!("{} source returned {} properties", desk.source_kind(), records.len()),
        },
        Err(error) => failed("property_source", error.to_string()),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
