//! The sequence played once the alarm goes off.

use crate::robot::Robot;
use crate::weather::WeatherSource;

const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] = time::macros::format_description!(
    "[weekday], [month repr:long] [day], [year]"
);

#[derive(Debug, thiserror::Error)]
pub enum BriefingError {
    #[error(transparent)]
    Robot(#[from] crate::robot::RobotError),

    #[error(transparent)]
    Weather(#[from] crate::weather::WeatherError),

    #[error("Error formatting date")]
    DateFormatting(#[source] time::error::Format),
}

async fn say<R: Robot>(robot: &mut R, text: &str) -> Result<(), BriefingError> {
    let handle = robot.say_text(text).await?;
    robot.wait_for_completed(handle).await?;
    Ok(())
}

/// Announce the time and date, then read the weather report.
///
/// Every line is spoken to completion before the next one starts. Any failure ends the briefing.
pub async fn run<R, W>(
    robot: &mut R,
    weather: Option<&W>,
    now: time::OffsetDateTime,
    icon_duration: std::time::Duration,
) -> Result<(), BriefingError>
where
    R: Robot,
    W: WeatherSource,
{
    // the clock face frame still running would race the briefing
    robot.abort_all_actions().await?;
    robot.get_in_position().await?;

    let short_time = format!("{}:{}", now.hour(), now.minute());
    let date = now.format(DATE_FORMAT).map_err(BriefingError::DateFormatting)?;

    say(robot, &format!("Attention, Human! It's {short_time}")).await?;
    say(
        robot,
        &format!("Human, listen up and get ready for your daily briefing! Here it comes at {short_time}"),
    )
    .await?;
    say(robot, &format!("Today is {date}")).await?;

    match weather {
        Some(weather) => weather_advice(robot, weather, icon_duration).await,
        None => {
            tracing::warn!("No weather service configured, skipping weather report");
            Ok(())
        }
    }
}

/// Read the current conditions while showing the weather icon, then comment on the temperature.
pub async fn weather_advice<R, W>(
    robot: &mut R,
    weather: &W,
    icon_duration: std::time::Duration,
) -> Result<(), BriefingError>
where
    R: Robot,
    W: WeatherSource,
{
    let report = weather.fetch().await?;
    tracing::info!(temperature = %report.temperature, weather = %report.weather, "Reporting weather");

    let speech = robot.say_text(&report.sentence()).await?;
    let icon = robot.display_frame(&report.icon, icon_duration).await?;
    robot.wait_for_completed(speech).await?;
    robot.wait_for_completed(icon).await?;

    say(robot, report.band().remark()).await
}
