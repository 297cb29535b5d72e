//! What the briefing and the clock face need from the robot.
//!
//! Every action is started by one call and finished by awaiting its handle with
//! [`Robot::wait_for_completed`]. Starting an action does not wait for the previous one, so a
//! frame can be shown while a line is being spoken.

mod terminal;

#[cfg(test)]
pub mod fake;

pub use self::terminal::TerminalRobot;

use crate::render::Frame;

pub trait Robot {
    type Handle;

    async fn say_text(&mut self, text: &str) -> Result<Self::Handle, RobotError>;

    /// Show `frame` on the face for `duration`, replacing whatever frame is shown now.
    async fn display_frame(
        &mut self,
        frame: &Frame,
        duration: std::time::Duration,
    ) -> Result<Self::Handle, RobotError>;

    async fn wait_for_completed(&mut self, handle: Self::Handle) -> Result<(), RobotError>;

    /// Cancel every action that is still running.
    async fn abort_all_actions(&mut self) -> Result<(), RobotError>;

    /// Move into a pose where the face is easy to see.
    async fn get_in_position(&mut self) -> Result<(), RobotError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RobotError {
    #[error("Failed to run speech command '{program}'")]
    SpawnSpeech {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Speech command exited with {status}")]
    SpeechFailed { status: std::process::ExitStatus },

    #[error("Failed to write to the terminal")]
    WriteTerminal(#[source] std::io::Error),

    #[error("Action task failed")]
    Join(#[source] tokio::task::JoinError),
}
