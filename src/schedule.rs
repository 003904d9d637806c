//! Wall-clock trigger: fires the retry loop at fixed minute offsets.

use std::thread;
use std::time::Duration;

use chrono::{DateTime, Local, Timelike};
use tracing::debug;

/// An (hour, minute) pair identifying one firing slot.
pub type Slot = (u32, u32);

/// Fixed set of minute offsets within each hour at which a tick fires.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub minute_offsets: Vec<u32>,
    /// How often the idle loop checks the clock.
    pub poll_interval: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            minute_offsets: (5..60).step_by(10).collect(),
            poll_interval: Duration::from_secs(1),
        }
    }
}

impl Schedule {
    /// The slot due at `now`, if any.
    pub fn due_slot(&self, now: DateTime<Local>) -> Option<Slot> {
        let minute = now.minute();
        self.minute_offsets
            .contains(&minute)
            .then(|| (now.hour(), minute))
    }

    /// Poll the clock forever, firing `tick` once per due slot.
    ///
    /// `tick` runs on this thread, so ticks never overlap: a slot that
    /// comes due while the previous tick is still retrying fires late, or
    /// not at all if its minute has passed by the time the tick returns.
    pub fn run(&self, mut tick: impl FnMut()) -> ! {
        let mut last_fired: Option<Slot> = None;
        loop {
            match self.due_slot(Local::now()) {
                Some(slot) if last_fired != Some(slot) => {
                    debug!(hour = slot.0, minute = slot.1, "trigger due");
                    tick();
                    last_fired = Some(slot);
                }
                Some(_) => {}
                None => last_fired = None,
            }
            thread::sleep(self.poll_interval);
        }
    }
}
