use tokio_util::sync::CancellationToken;

use crate::alarm::AlarmTime;
use crate::alarm::ClockState;
use crate::alarm::Tick;
use crate::render::ClockRenderer;
use crate::robot::Robot;
use crate::weather::WeatherSource;

pub trait TimeSource {
    fn now(&mut self) -> time::OffsetDateTime;
}

/// Wall clock time in the local offset.
///
/// The offset lookup is unsound (and refused by `time`) once other threads exist, so it is done
/// once at startup and retried whenever the local date changes. Until a retry succeeds, the last
/// known offset stays in use.
pub struct LocalTime {
    offset: time::UtcOffset,
    checked_on: time::Date,
}

impl LocalTime {
    pub fn new() -> Result<Self, time::error::IndeterminateOffset> {
        let offset = time::UtcOffset::current_local_offset()?;
        tracing::info!(%offset, "Using local UTC offset");
        Ok(Self {
            offset,
            checked_on: time::OffsetDateTime::now_utc().to_offset(offset).date(),
        })
    }

    fn at<F>(&mut self, now_utc: time::OffsetDateTime, lookup: F) -> time::OffsetDateTime
    where
        F: FnOnce() -> Result<time::UtcOffset, time::error::IndeterminateOffset>,
    {
        let local = now_utc.to_offset(self.offset);
        if local.date() == self.checked_on {
            return local;
        }

        self.checked_on = local.date();
        match lookup() {
            Ok(offset) if offset != self.offset => {
                tracing::info!(old = %self.offset, new = %offset, "Local UTC offset changed");
                self.offset = offset;
                now_utc.to_offset(offset)
            }
            Ok(_) => local,
            Err(error) => {
                tracing::debug!(%error, offset = %self.offset, "Keeping cached local UTC offset");
                local
            }
        }
    }
}

impl TimeSource for LocalTime {
    fn now(&mut self) -> time::OffsetDateTime {
        self.at(
            time::OffsetDateTime::now_utc(),
            time::UtcOffset::current_local_offset,
        )
    }
}

pub struct ClockTask<R, W, T> {
    poll_interval: std::time::Duration,
    frame_duration: std::time::Duration,
    icon_duration: std::time::Duration,
    cancellation_token: CancellationToken,
    alarm: Option<AlarmTime>,
    renderer: ClockRenderer,
    robot: R,
    weather: Option<W>,
    time_source: T,
    state: ClockState,
}

impl<R, W, T> ClockTask<R, W, T>
where
    R: Robot,
    W: WeatherSource,
    T: TimeSource,
{
    pub fn new(
        cancellation_token: CancellationToken,
        config: &crate::config::Config,
        alarm: Option<AlarmTime>,
        robot: R,
        weather: Option<W>,
        time_source: T,
    ) -> Self {
        Self {
            poll_interval: config.clock.poll_interval,
            frame_duration: config.clock.frame_duration,
            icon_duration: config
                .weather
                .as_ref()
                .map(|weather| weather.icon_duration)
                .unwrap_or(std::time::Duration::from_secs(5)),
            cancellation_token,
            alarm,
            renderer: ClockRenderer::new(&config.display),
            robot,
            weather,
            time_source,
            state: ClockState::default(),
        }
    }

    pub async fn run(mut self) -> Result<R, crate::error::Error> {
        self.robot.get_in_position().await?;

        let mut poll_interval = tokio::time::interval(self.poll_interval);
        poll_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            let Some(_tick) = self
                .cancellation_token
                .run_until_cancelled(poll_interval.tick())
                .await
            else {
                tracing::info!("Ending clock loop");
                break;
            };

            let now = self.time_source.now();

            match self.state.tick(now.time(), self.alarm) {
                Tick::Alarm => {
                    tracing::info!(time = %now.time(), "Alarm time reached, starting briefing");

                    let briefing = crate::briefing::run(
                        &mut self.robot,
                        self.weather.as_ref(),
                        now,
                        self.icon_duration,
                    );
                    let Some(result) = self.cancellation_token.run_until_cancelled(briefing).await
                    else {
                        tracing::info!("Briefing cancelled");
                        break;
                    };
                    result?;
                    tracing::info!("Briefing finished");
                }

                Tick::Redraw => {
                    let frame = self
                        .renderer
                        .render(now.time())
                        .map_err(crate::error::Error::TimeFormatting)?;

                    // the frame is superseded by the next one, nobody waits for it
                    let _handle = self
                        .robot
                        .display_frame(&frame, self.frame_duration)
                        .await?;
                }

                Tick::Unchanged => {}
            }
        }

        Ok(self.robot)
    }
}
