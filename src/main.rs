use clap::Parser;
use gopass_secret::cli::{run, Cli};
use gopass_secret::config::LoggingConfig;
use gopass_secret::logging;
use tracing::error;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(err) => {
            logging::init(&LoggingConfig::default());
            error!("error running gopass secret function: {err:#}");
            std::process::exit(1);
        }
    };
    logging::init(&config.logging);

    if let Err(err) = run(&cli, &config).await {
        error!("error running gopass secret function: {err:#}");
        std::process::exit(1);
    }
}
