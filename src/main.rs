use std::process::ExitCode;

use clap::Parser;
use photoverse_lib::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; the API key may come from the real environment.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    match photoverse_lib::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
