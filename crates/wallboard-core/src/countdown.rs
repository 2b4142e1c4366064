/// Seconds-until-refresh counter driven by a one-second timer.
///
/// Each tick reports the current value, then decrements. The refresh is due
/// once the counter has gone below zero; it stays due until [`reset`] is
/// called after a successful refresh.
///
/// [`reset`]: Countdown::reset
#[derive(Debug, Clone)]
pub struct Countdown {
    interval_secs: i64,
    time_left: i64,
}

/// Result of one countdown tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownTick {
    pub label: String,
    pub due: bool,
}

impl Countdown {
    pub fn new(interval_secs: u32) -> Self {
        let interval_secs = i64::from(interval_secs);
        Self {
            interval_secs,
            time_left: interval_secs,
        }
    }

    pub fn tick(&mut self) -> CountdownTick {
        let label = countdown_label(self.time_left);
        self.time_left -= 1;
        CountdownTick {
            label,
            due: self.is_due(),
        }
    }

    pub fn reset(&mut self) {
        self.time_left = self.interval_secs;
    }

    pub fn is_due(&self) -> bool {
        self.time_left < 0
    }

    pub fn time_left(&self) -> i64 {
        self.time_left
    }

    pub fn interval_secs(&self) -> i64 {
        self.interval_secs
    }
}

/// Text shown in the countdown element. Negative values display as zero.
pub fn countdown_label(seconds: i64) -> String {
    format!("Next update in {} seconds", seconds.max(0))
}
