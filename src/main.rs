use log::error;
use std::env;
use std::process::ExitCode;
use wikibooks_recipes::{load_config, run};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Could not load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Optional output path as the first argument
    if let Some(output) = env::args().nth(1) {
        config.output = output.into();
    }

    match run(&config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Crawl failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
