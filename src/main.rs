mod alarm;
mod briefing;
mod cli;
mod clock_task;
mod config;
mod error;
mod logging;
mod render;
mod robot;
mod weather;

use crate::robot::Robot;

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::eyre::Result<()> {
    setup_panic();
    color_eyre::install().map_err(crate::error::Error::InstallingColorEyre)?;
    let cli = <crate::cli::Cli as clap::Parser>::parse();
    crate::logging::setup(cli.verbosity);

    // before anything spawns a thread, see `LocalTime`
    let time_source = crate::clock_task::LocalTime::new().map_err(crate::error::Error::TimeOffset)?;

    let cfg = match cli.config.as_deref() {
        Some(path) => crate::config::Config::load(path).await?,
        None => {
            tracing::debug!("No configuration file given, using defaults");
            crate::config::Config::default()
        }
    };

    if cli.verify_config {
        tracing::info!("Configuration verified");
        return Ok(());
    }

    run(cli, cfg, time_source).await?;
    Ok(())
}

fn setup_panic() {
    human_panic::setup_panic!(human_panic::Metadata::new(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    ));
}

async fn run(
    cli: crate::cli::Cli,
    config: crate::config::Config,
    time_source: crate::clock_task::LocalTime,
) -> Result<(), crate::error::Error> {
    let alarm = crate::alarm::extract_alarm_time(&cli.alarm);
    match alarm {
        Some(alarm) => tracing::info!("Alarm set for {alarm}"),
        None => tracing::info!(
            "No alarm time provided. Usage example: 'daily-briefing 17:23' to set alarm for 5:23 PM. (Input uses the 24-hour clock.)"
        ),
    }
    tracing::info!("Press CTRL-C to quit");

    let weather = config
        .weather
        .as_ref()
        .map(|weather| crate::weather::WeatherClient::new(weather, config.display.size()))
        .transpose()?;
    if weather.is_none() {
        tracing::warn!("No [weather] section configured, the briefing will not include weather");
    }

    let robot = crate::robot::TerminalRobot::new(&config.robot);
    let cancellation_token = tokio_util::sync::CancellationToken::new();

    tokio::task::spawn({
        let cancellation_token = cancellation_token.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("Ctrl-C received, shutting down"),
                Err(error) => tracing::error!(?error, "Failed to listen for Ctrl-C, shutting down"),
            }
            cancellation_token.cancel();
        }
    });

    let clock_task = crate::clock_task::ClockTask::new(
        cancellation_token,
        &config,
        alarm,
        robot,
        weather,
        time_source,
    );

    let mut robot = clock_task.run().await?;
    robot.abort_all_actions().await?;

    Ok(())
}
