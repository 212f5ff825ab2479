/// Default focus session length (25 minutes).
pub const DEFAULT_FOCUS_SECS: u32 = 25 * 60;

/// Shortest configurable session, in minutes.
pub const MIN_FOCUS_MINUTES: u32 = 1;

/// Longest configurable session, in minutes.
pub const MAX_FOCUS_MINUTES: u32 = 180;

/// Lifecycle phase of the focus timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPhase {
    Idle,
    Running,
    Paused,
    Expired,
}

/// Result of a single one-second tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer was not running; nothing changed.
    Inert,
    /// One second elapsed; carries the remaining seconds.
    Ticked(u32),
    /// The countdown reached zero. Produced exactly once per run-down.
    Expired,
}

/// A single countdown session bound to one task label.
///
/// The label is a snapshot taken at open time; later edits or deletion
/// of the task do not follow. The driver owns the tick cadence and
/// must stop ticking on any non-`Ticked` outcome, which keeps at most
/// one tick source alive per timer.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusTimer {
    phase: FocusPhase,
    remaining_secs: u32,
    duration_secs: u32,
    task_label: String,
}

impl FocusTimer {
    /// Open an idle session for `task_label` at the default length.
    pub fn open(task_label: &str) -> Self {
        Self {
            phase: FocusPhase::Idle,
            remaining_secs: DEFAULT_FOCUS_SECS,
            duration_secs: DEFAULT_FOCUS_SECS,
            task_label: task_label.to_string(),
        }
    }

    pub fn phase(&self) -> FocusPhase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn task_label(&self) -> &str {
        &self.task_label
    }

    /// Start a session of `minutes`, clamped to
    /// [`MIN_FOCUS_MINUTES`]..=[`MAX_FOCUS_MINUTES`]. Valid from Idle
    /// or Expired; a no-op while Running or Paused.
    pub fn start(&mut self, minutes: u32) -> bool {
        if !matches!(self.phase, FocusPhase::Idle | FocusPhase::Expired) {
            return false;
        }
        let minutes = minutes.clamp(MIN_FOCUS_MINUTES, MAX_FOCUS_MINUTES);
        self.duration_secs = minutes * 60;
        self.remaining_secs = self.duration_secs;
        self.phase = FocusPhase::Running;
        true
    }

    /// Pause a running session, keeping the remaining time.
    pub fn pause(&mut self) -> bool {
        if self.phase != FocusPhase::Running {
            return false;
        }
        self.phase = FocusPhase::Paused;
        true
    }

    /// Resume a paused session without resetting the remaining time.
    /// A session paused at zero restarts with the last configured
    /// duration.
    pub fn resume(&mut self) -> bool {
        if self.phase != FocusPhase::Paused {
            return false;
        }
        if self.remaining_secs == 0 {
            self.remaining_secs = self.duration_secs;
        }
        self.phase = FocusPhase::Running;
        true
    }

    /// Stop the session from any state and reset to the default length.
    pub fn stop(&mut self) {
        self.phase = FocusPhase::Idle;
        self.remaining_secs = DEFAULT_FOCUS_SECS;
    }

    /// Advance the countdown by one second. The counter never goes
    /// below zero; the tick that reaches zero expires the timer.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != FocusPhase::Running {
            return TickOutcome::Inert;
        }
        if self.remaining_secs == 0 {
            // Only reachable through hand-built state; expire without
            // touching the counter.
            self.phase = FocusPhase::Expired;
            return TickOutcome::Expired;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs == 0 {
            self.phase = FocusPhase::Expired;
            return TickOutcome::Expired;
        }
        TickOutcome::Ticked(self.remaining_secs)
    }
}

/// Format seconds as zero-padded `MM:SS`.
pub fn format_mmss(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_is_idle_at_default_length() {
        let timer = FocusTimer::open("Buy milk");
        assert_eq!(timer.phase(), FocusPhase::Idle);
        assert_eq!(timer.remaining_secs(), DEFAULT_FOCUS_SECS);
        assert_eq!(timer.task_label(), "Buy milk");
    }

    #[test]
    fn test_start_clamps_duration() {
        let mut timer = FocusTimer::open("Test");
        assert!(timer.start(0));
        assert_eq!(timer.remaining_secs(), 60);

        let mut timer = FocusTimer::open("Test");
        assert!(timer.start(999));
        assert_eq!(timer.remaining_secs(), 180 * 60);
    }

    #[test]
    fn test_start_is_noop_while_running_or_paused() {
        let mut timer = FocusTimer::open("Test");
        timer.start(25);
        assert!(!timer.start(5));
        assert_eq!(timer.remaining_secs(), 1500);

        timer.pause();
        assert!(!timer.start(5));
        assert_eq!(timer.phase(), FocusPhase::Paused);
    }

    #[test]
    fn test_run_down_expires_exactly_once() {
        let mut timer = FocusTimer::open("Test");
        timer.start(25);

        let mut expirations = 0;
        for _ in 0..1500 {
            if timer.tick() == TickOutcome::Expired {
                expirations += 1;
            }
        }

        assert_eq!(expirations, 1);
        assert_eq!(timer.phase(), FocusPhase::Expired);
        assert_eq!(timer.remaining_secs(), 0);

        // Further ticks are inert and never go negative.
        assert_eq!(timer.tick(), TickOutcome::Inert);
        assert_eq!(timer.remaining_secs(), 0);
    }

    #[test]
    fn test_pause_preserves_remaining() {
        let mut timer = FocusTimer::open("Test");
        timer.start(5);
        for _ in 0..10 {
            timer.tick();
        }
        assert!(timer.pause());
        assert_eq!(timer.phase(), FocusPhase::Paused);
        assert_eq!(timer.remaining_secs(), 290);

        // Ticks while paused do not decrement.
        assert_eq!(timer.tick(), TickOutcome::Inert);
        assert_eq!(timer.remaining_secs(), 290);

        assert!(timer.resume());
        assert_eq!(timer.tick(), TickOutcome::Ticked(289));
    }

    #[test]
    fn test_pause_only_valid_while_running() {
        let mut timer = FocusTimer::open("Test");
        assert!(!timer.pause());
        assert!(!timer.resume());
    }

    #[test]
    fn test_resume_at_zero_restarts_with_last_duration() {
        let mut timer = FocusTimer::open("Test");
        timer.start(2);
        // Rebuild the corner state by hand: paused with nothing left.
        timer.remaining_secs = 0;
        timer.phase = FocusPhase::Paused;

        assert!(timer.resume());
        assert_eq!(timer.phase(), FocusPhase::Running);
        assert_eq!(timer.remaining_secs(), 120);
    }

    #[test]
    fn test_tick_at_zero_expires_without_decrement() {
        let mut timer = FocusTimer::open("Test");
        timer.start(1);
        timer.remaining_secs = 0;

        assert_eq!(timer.tick(), TickOutcome::Expired);
        assert_eq!(timer.remaining_secs(), 0);
    }

    #[test]
    fn test_stop_resets_from_any_state() {
        let mut timer = FocusTimer::open("Test");
        timer.start(5);
        timer.tick();
        timer.stop();
        assert_eq!(timer.phase(), FocusPhase::Idle);
        assert_eq!(timer.remaining_secs(), DEFAULT_FOCUS_SECS);

        // Expired -> stop -> startable again.
        timer.start(1);
        for _ in 0..60 {
            timer.tick();
        }
        assert_eq!(timer.phase(), FocusPhase::Expired);
        timer.stop();
        assert_eq!(timer.phase(), FocusPhase::Idle);
        assert!(timer.start(25));
    }

    #[test]
    fn test_format_mmss() {
        assert_eq!(format_mmss(1500), "25:00");
        assert_eq!(format_mmss(290), "04:50");
        assert_eq!(format_mmss(61), "01:01");
        assert_eq!(format_mmss(0), "00:00");
    }
}
