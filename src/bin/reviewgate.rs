use clap::Parser;
use colored::Colorize;
use reviewgate_core::cli::{self, Cli};
use reviewgate_core::exit::ReviewExit;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ReviewExit {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli::execute(&cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red());
            ReviewExit::Error
        }
    }
}
