use super::RobotError;
use crate::render::Frame;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Say(String),
    Display {
        lit: usize,
        duration: std::time::Duration,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Started(usize, Action),
    Waited(usize),
    AbortedAll,
    Positioned,
}

/// Records every call, all actions complete immediately.
#[derive(Debug, Default)]
pub struct FakeRobot {
    pub events: Vec<Event>,
    next_handle: usize,
}

impl FakeRobot {
    fn start(&mut self, action: Action) -> usize {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.events.push(Event::Started(handle, action));
        handle
    }

    /// One line per event, for snapshots
    pub fn script(&self) -> String {
        self.events
            .iter()
            .map(|event| match event {
                Event::Started(handle, Action::Say(text)) => format!("#{handle} say {text:?}"),
                Event::Started(handle, Action::Display { duration, .. }) => {
                    format!("#{handle} display {duration:?}")
                }
                Event::Waited(handle) => format!("wait #{handle}"),
                Event::AbortedAll => String::from("abort all"),
                Event::Positioned => String::from("get in position"),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn spoken(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Started(_, Action::Say(text)) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl super::Robot for FakeRobot {
    type Handle = usize;

    async fn say_text(&mut self, text: &str) -> Result<Self::Handle, RobotError> {
        Ok(self.start(Action::Say(text.to_string())))
    }

    async fn display_frame(
        &mut self,
        frame: &Frame,
        duration: std::time::Duration,
    ) -> Result<Self::Handle, RobotError> {
        Ok(self.start(Action::Display {
            lit: frame.lit_count(),
            duration,
        }))
    }

    async fn wait_for_completed(&mut self, handle: Self::Handle) -> Result<(), RobotError> {
        self.events.push(Event::Waited(handle));
        Ok(())
    }

    async fn abort_all_actions(&mut self) -> Result<(), RobotError> {
        self.events.push(Event::AbortedAll);
        Ok(())
    }

    async fn get_in_position(&mut self) -> Result<(), RobotError> {
        self.events.push(Event::Positioned);
        Ok(())
    }
}
