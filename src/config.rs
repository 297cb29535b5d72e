#[derive(Debug, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub display: DisplayConfig,
    pub clock: ClockConfig,
    pub weather: Option<WeatherConfig>,
    pub robot: RobotConfig,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Show an analog face with a small digital readout below
    pub analog: bool,
    pub width: u32,
    pub height: u32,
    pub font: Font,
    pub time_offset_x: u8,
    pub time_offset_y: u8,
}

impl DisplayConfig {
    pub fn size(&self) -> embedded_graphics::prelude::Size {
        embedded_graphics::prelude::Size::new(self.width, self.height)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            analog: false,
            width: 128,
            height: 32,
            font: Font::default(),
            time_offset_x: 8,
            time_offset_y: 6,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub enum Font {
    Font5x8,
    Font6x10,
    Font9x18,
    #[default]
    Font10x20,
}

impl From<Font> for embedded_graphics::mono_font::MonoFont<'static> {
    fn from(value: Font) -> Self {
        match value {
            Font::Font5x8 => embedded_graphics::mono_font::ascii::FONT_5X8,
            Font::Font6x10 => embedded_graphics::mono_font::ascii::FONT_6X10,
            Font::Font9x18 => embedded_graphics::mono_font::ascii::FONT_9X18,
            Font::Font10x20 => embedded_graphics::mono_font::ascii::FONT_10X20,
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClockConfig {
    #[serde(with = "humantime_serde")]
    pub poll_interval: std::time::Duration,

    /// How long each clock face frame is shown
    #[serde(with = "humantime_serde")]
    pub frame_duration: std::time::Duration,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            poll_interval: std::time::Duration::from_millis(100),
            frame_duration: std::time::Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeatherConfig {
    pub api_key: String,

    /// Two letter state abbreviation
    pub state: String,

    pub city: String,

    #[serde(default = "default_base_url")]
    pub base_url: url::Url,

    #[serde(default = "default_icon_duration", with = "humantime_serde")]
    pub icon_duration: std::time::Duration,

    #[serde(default = "default_pixel_threshold")]
    pub pixel_threshold: u8,

    #[serde(default = "default_invert_icon")]
    pub invert_icon: bool,

    /// Unset means requests may hang forever
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<std::time::Duration>,
}

fn default_base_url() -> url::Url {
    url::Url::parse("http://api.wunderground.com/api/").expect("Constant URL is valid")
}

const fn default_icon_duration() -> std::time::Duration {
    std::time::Duration::from_secs(5)
}

const fn default_pixel_threshold() -> u8 {
    175
}

const fn default_invert_icon() -> bool {
    true
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RobotConfig {
    /// Program (and leading arguments) speaking the text given as last argument
    pub speech_command: Option<Vec<String>>,

    /// Print face frames to stdout
    pub render_frames: bool,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            speech_command: None,
            render_frames: true,
        }
    }
}

/// Longest accepted display side, in pixels
pub const MAX_DISPLAY_SIDE: u32 = 4096;

impl Config {
    pub async fn load(path: &camino::Utf8Path) -> Result<Self, ConfigError> {
        let config_str =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::ReadingFile {
                    path: path.to_path_buf(),
                    source,
                })?;

        let config: Self = toml::from_str(&config_str).map_err(ConfigError::ParsingConfig)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.width == 0 || self.display.height == 0 {
            return Err(ConfigError::EmptyDisplay);
        }

        if self.display.width > MAX_DISPLAY_SIDE || self.display.height > MAX_DISPLAY_SIDE {
            return Err(ConfigError::DisplayTooLarge {
                width: self.display.width,
                height: self.display.height,
            });
        }

        if self.clock.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }

        if self
            .robot
            .speech_command
            .as_ref()
            .is_some_and(|command| command.is_empty())
        {
            return Err(ConfigError::EmptySpeechCommand);
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file from path '{}'", .path)]
    ReadingFile {
        path: camino::Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    ParsingConfig(#[from] toml::de::Error),

    #[error("Display width and height must not be zero")]
    EmptyDisplay,

    #[error("Display {width}x{height} exceeds {MAX_DISPLAY_SIDE} pixels per side")]
    DisplayTooLarge { width: u32, height: u32 },

    #[error("Poll interval must not be zero")]
    ZeroPollInterval,

    #[error("Speech command must name a program")]
    EmptySpeechCommand,
}
