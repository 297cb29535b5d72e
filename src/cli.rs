use clap::Parser;

/// Alarm clock showing the time on the robot's face and reading a daily briefing at the alarm
/// time.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(flatten)]
    pub verbosity: clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,

    /// Path of the configuration file, defaults apply when not given
    #[clap(long, short)]
    pub config: Option<camino::Utf8PathBuf>,

    /// Load and check the configuration, then exit
    #[clap(long)]
    pub verify_config: bool,

    /// Alarm time on the 24-hour clock, e.g. `17:23`, `17 23` or `17:23:30`
    #[clap(value_name = "HOURS [MINUTES [SECONDS]]", allow_negative_numbers = true)]
    pub alarm: Vec<String>,
}
