mod cli;
mod config;
mod output;

use cbrf_rates::CbrfRates;
use clap::Parser;
use cli::{Cli, Command};
use serde_json::Value;
use config::{init_tracing, load_config, load_dotenv};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    load_dotenv();
    init_tracing();

    let config = load_config(&cli);
    tracing::debug!("Using feeds {} and {}", config.daily_url, config.dynamic_url);

    let result = run(config, &cli.command).await;

    match result {
        Ok(value) => {
            output::print_json(&value)?;
            Ok(())
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(config: cbrf_rates::RatesConfig, command: &Command) -> cbrf_rates::Result<Value> {
    let rates = &CbrfRates::new(config)?;
    match command {
        Command::All(args) => cli::run_all(rates, args).await,
        Command::One(args) => cli::run_one(rates, args).await,
        Command::Dynamic(args) => cli::run_dynamic(rates, args).await,
        Command::Convert(args) => cli::run_convert(rates, args).await,
    }
}
