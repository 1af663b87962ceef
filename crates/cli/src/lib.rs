pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "mtr",
    about = "Mid-term rental leasing desk operator CLI",
    long_about = "Operate the leasing desk: database migrations, catalog seeding, readiness \
                  checks, config inspection, and direct tool calls.",
    after_help = "Examples:\n  mtr doctor --json\n  mtr seed\n  \
                  mtr tool get_property_info --arg property_name=boulder"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Upsert the built-in property catalog into the property table")]
    Seed,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, database connectivity, and the property source")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Call one leasing tool and print its spoken answer")]
    Tool {
        #[arg(help = "Tool name, e.g. list_available_properties")]
        name: String,
        #[arg(long = "arg", value_name = "KEY=VALUE", help = "Tool argument (repeatable)")]
        args: Vec<String>,
        #[arg(long, value_name = "JSON", help = "Tool arguments as a JSON object")]
        input: Option<String>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Tool { name, args, input } => {
            commands::tool::run(&name, &args, input.as_deref())
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
