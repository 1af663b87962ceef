use std::process::ExitCode;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    mtr_cli::run()
}
