mod detector;

pub use self::detector::ClockState;
pub use self::detector::Tick;

/// A time of day, parsed once from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmTime(time::Time);

impl AlarmTime {
    pub fn new(hours: u8, minutes: u8, seconds: u8) -> Result<Self, time::error::ComponentRange> {
        time::Time::from_hms(hours, minutes, seconds).map(Self)
    }

    /// Whether `now` lies strictly before the alarm on the same day.
    pub fn is_ahead_of(&self, now: time::Time) -> bool {
        now < self.0
    }
}

impl std::fmt::Display for AlarmTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (h, m, s) = self.0.as_hms();
        write!(f, "{h:02}:{m:02}:{s:02}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    const fn max(self) -> i64 {
        match self {
            TimeUnit::Hours => 23,
            TimeUnit::Minutes | TimeUnit::Seconds => 59,
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeUnit::Hours => f.write_str("hours"),
            TimeUnit::Minutes => f.write_str("minutes"),
            TimeUnit::Seconds => f.write_str("seconds"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AlarmTimeError {
    #[error("{unit} value '{value}' is not an int")]
    NotAnInteger { unit: TimeUnit, value: String },

    #[error("{unit} value {value} is negative")]
    Negative { unit: TimeUnit, value: String },

    #[error("{unit} value {value} exceeded {max}")]
    Exceeded {
        unit: TimeUnit,
        value: String,
        max: i64,
    },
}

fn convert_to_time_int(field: &str, unit: TimeUnit) -> Result<u8, AlarmTimeError> {
    let digits = field.trim();
    let value = match digits.parse::<i64>() {
        Ok(value) => value,
        Err(error) => {
            return Err(match error.kind() {
                std::num::IntErrorKind::PosOverflow => AlarmTimeError::Exceeded {
                    unit,
                    value: digits.to_string(),
                    max: unit.max(),
                },
                std::num::IntErrorKind::NegOverflow => AlarmTimeError::Negative {
                    unit,
                    value: digits.to_string(),
                },
                _ => AlarmTimeError::NotAnInteger {
                    unit,
                    value: field.to_string(),
                },
            });
        }
    };

    if value < 0 {
        return Err(AlarmTimeError::Negative {
            unit,
            value: value.to_string(),
        });
    }

    if value > unit.max() {
        return Err(AlarmTimeError::Exceeded {
            unit,
            value: value.to_string(),
            max: unit.max(),
        });
    }

    // bounded by `unit.max()` above
    Ok(value as u8)
}

/// Parse a 24-hour alarm time from command line tokens
///
/// Tokens may be separated by whitespace or colons, so `["11", "22", "33"]`, `["11:22:33"]` and
/// `["11", "22:33"]` all describe the same time. Seconds are optional. Fewer than two fields
/// means no alarm.
pub fn parse_alarm_time<S: AsRef<str>>(tokens: &[S]) -> Result<Option<AlarmTime>, AlarmTimeError> {
    let fields = tokens
        .iter()
        .flat_map(|token| token.as_ref().split(':'))
        .collect::<Vec<&str>>();

    let [hours, minutes, rest @ ..] = fields.as_slice() else {
        return Ok(None);
    };

    let hours = convert_to_time_int(hours, TimeUnit::Hours)?;
    let minutes = convert_to_time_int(minutes, TimeUnit::Minutes)?;
    let seconds = match rest.first() {
        Some(seconds) => convert_to_time_int(seconds, TimeUnit::Seconds)?,
        None => 0,
    };

    Ok(AlarmTime::new(hours, minutes, seconds).ok())
}

/// Like [`parse_alarm_time`], but reports a validation error and carries on without an alarm.
pub fn extract_alarm_time<S: AsRef<str>>(tokens: &[S]) -> Option<AlarmTime> {
    match parse_alarm_time(tokens) {
        Ok(alarm) => alarm,
        Err(error) => {
            tracing::error!(%error, "Invalid alarm time, continuing without alarm");
            None
        }
    }
}
