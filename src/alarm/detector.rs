use super::AlarmTime;

/// Fires on the transition from "before the alarm" to "at or after the alarm".
///
/// Polling never lands exactly on the alarm time, so equality is useless here. The detector
/// starts in the "not before" state, which means starting the program after the alarm time has
/// passed does not fire until the next day.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlarmEdge {
    was_before_alarm_time: bool,
}

impl AlarmEdge {
    pub fn observe(&mut self, is_before_alarm_time: bool) -> bool {
        let fire = self.was_before_alarm_time && !is_before_alarm_time;
        self.was_before_alarm_time = is_before_alarm_time;
        fire
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The alarm boundary was crossed since the last sample
    Alarm,

    /// The displayed second changed, the clock face needs a new frame
    Redraw,

    Unchanged,
}

/// Mutable state of the poll loop
#[derive(Debug, Default)]
pub struct ClockState {
    edge: AlarmEdge,
    last_displayed_time: Option<time::Time>,
}

impl ClockState {
    pub fn tick(&mut self, now: time::Time, alarm: Option<AlarmTime>) -> Tick {
        let do_alarm = alarm
            .map(|alarm| self.edge.observe(alarm.is_ahead_of(now)))
            .unwrap_or(false);

        if do_alarm {
            return Tick::Alarm;
        }

        if self
            .last_displayed_time
            .is_some_and(|last| last.second() == now.second())
        {
            return Tick::Unchanged;
        }

        self.last_displayed_time = Some(now);
        Tick::Redraw
    }
}
