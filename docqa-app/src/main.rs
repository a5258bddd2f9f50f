use clap::Parser;
use docqa_app::{AppConfig, Cli, run, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    telemetry::init(config.log_format);

    run(cli, config).await
}
