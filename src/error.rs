#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Setting up error reporting failed")]
    InstallingColorEyre(#[source] color_eyre::Report),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error("Error getting local time offset")]
    TimeOffset(#[source] time::error::IndeterminateOffset),

    #[error("Error formatting time")]
    TimeFormatting(#[source] time::error::Format),

    #[error("Robot action failed")]
    Robot(#[from] crate::robot::RobotError),

    #[error("Setting up weather service failed")]
    Weather(#[from] crate::weather::WeatherError),

    #[error("Daily briefing failed")]
    Briefing(#[from] crate::briefing::BriefingError),
}
