use std::io::Write;

use tokio::task::AbortHandle;
use tokio::task::JoinHandle;

use super::RobotError;
use crate::render::Frame;

const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

/// A robot living in the terminal: speech is always printed and optionally handed to an external
/// text-to-speech program, frames are printed when `render_frames` is set.
pub struct TerminalRobot<O = std::io::Stdout> {
    speech_command: Option<Vec<String>>,
    render_frames: bool,
    out: O,
    in_flight: Vec<AbortHandle>,
    current_display: Option<AbortHandle>,
}

impl TerminalRobot {
    pub fn new(config: &crate::config::RobotConfig) -> Self {
        Self::with_output(config, std::io::stdout())
    }
}

impl<O: Write> TerminalRobot<O> {
    pub fn with_output(config: &crate::config::RobotConfig, out: O) -> Self {
        Self {
            speech_command: config.speech_command.clone(),
            render_frames: config.render_frames,
            out,
            in_flight: Vec::new(),
            current_display: None,
        }
    }

    fn track(&mut self, handle: &JoinHandle<Result<(), RobotError>>) -> AbortHandle {
        self.in_flight.retain(|action| !action.is_finished());
        let abort_handle = handle.abort_handle();
        self.in_flight.push(abort_handle.clone());
        abort_handle
    }
}

async fn speak(command: Option<Vec<String>>, text: String) -> Result<(), RobotError> {
    let Some((program, args)) = command.as_deref().and_then(<[String]>::split_first) else {
        return Ok(());
    };

    let status = tokio::process::Command::new(program)
        .args(args)
        .arg(&text)
        .kill_on_drop(true)
        .status()
        .await
        .map_err(|source| RobotError::SpawnSpeech {
            program: program.clone(),
            source,
        })?;

    if !status.success() {
        return Err(RobotError::SpeechFailed { status });
    }

    tracing::trace!(?text, "Finished speaking");
    Ok(())
}

impl<O: Write> super::Robot for TerminalRobot<O> {
    type Handle = JoinHandle<Result<(), RobotError>>;

    async fn say_text(&mut self, text: &str) -> Result<Self::Handle, RobotError> {
        tracing::info!(?text, "Saying text");
        writeln!(self.out, "> {text}").map_err(RobotError::WriteTerminal)?;
        self.out.flush().map_err(RobotError::WriteTerminal)?;

        let handle = tokio::task::spawn(speak(self.speech_command.clone(), text.to_string()));
        self.track(&handle);
        Ok(handle)
    }

    async fn display_frame(
        &mut self,
        frame: &Frame,
        duration: std::time::Duration,
    ) -> Result<Self::Handle, RobotError> {
        if let Some(previous) = self.current_display.take() {
            previous.abort();
        }

        if self.render_frames {
            write!(self.out, "{CLEAR_SCREEN}{frame}").map_err(RobotError::WriteTerminal)?;
            self.out.flush().map_err(RobotError::WriteTerminal)?;
        }
        tracing::trace!(?frame, ?duration, "Displaying frame");

        let handle = tokio::task::spawn(async move {
            tokio::time::sleep(duration).await;
            Ok(())
        });
        self.current_display = Some(self.track(&handle));
        Ok(handle)
    }

    async fn wait_for_completed(&mut self, handle: Self::Handle) -> Result<(), RobotError> {
        match handle.await {
            Ok(result) => result,
            Err(error) if error.is_cancelled() => {
                tracing::debug!("Action was aborted before completion");
                Ok(())
            }
            Err(error) => Err(RobotError::Join(error)),
        }
    }

    async fn abort_all_actions(&mut self) -> Result<(), RobotError> {
        tracing::debug!(count = self.in_flight.len(), "Aborting all actions");
        for action in self.in_flight.drain(..) {
            action.abort();
        }
        self.current_display = None;
        Ok(())
    }

    async fn get_in_position(&mut self) -> Result<(), RobotError> {
        tracing::debug!("Face is always visible in the terminal, not moving");
        Ok(())
    }
}
