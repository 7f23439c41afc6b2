use stayline::logger::*;
use stayline::settings::*;
use stayline::views::{self, App};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    debug!(?project_settings);
    let logger_config = LogConfig {
        filter: project_settings.log.filter.clone(),
    };
    logger.reload_from_config(&logger_config)?;

    let app = App::try_new(&project_settings, cli.json).await?;
    let outcome = views::run(&app, cli.command).await;

    let shutdown_timeout = std::time::Duration::from_secs(5);
    if tokio::time::timeout(shutdown_timeout, app.shutdown()).await.is_err() {
        error!("shutdown timed out");
    }

    Ok(outcome.into())
}
