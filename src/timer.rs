//! Focus countdown.
//!
//! `FocusTimer` is a plain state machine; it never schedules anything on its
//! own. The runtime owns a [`Ticker`] while the timer is running and feeds
//! its ticks back in through [`FocusTimer::tick`].
//!
//! ```text
//! Idle --start--> Running --stop--> Idle
//!                 Running --remaining hits 0--> Expired --acknowledge--> Idle
//! ```

use crate::habits::DEEP_WORK_LIMIT;
use std::time::Duration;
use tokio::{sync::mpsc, task::JoinHandle, time};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStatus {
    Idle,
    Running,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Ignored,
    Counted,
    Expired,
}

#[derive(Debug, Clone)]
pub struct FocusTimer {
    limit: u32,
    remaining: u32,
    status: TimerStatus,
    /// Bumped on every start so ticks scheduled for an earlier run can be told apart.
    run: u64,
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self::new(DEEP_WORK_LIMIT)
    }
}

impl FocusTimer {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            remaining: limit,
            status: TimerStatus::Idle,
            run: 0,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn alarm_visible(&self) -> bool {
        self.status == TimerStatus::Expired
    }

    /// Fraction of the session still left, 1.0 when idle.
    pub fn progress(&self) -> f64 {
        if self.limit == 0 {
            return 0.0;
        }
        self.remaining as f64 / self.limit as f64
    }

    /// Idle -> Running. Returns the new run id, or `None` if the timer was
    /// not idle.
    pub fn start(&mut self) -> Option<u64> {
        if self.status != TimerStatus::Idle {
            return None;
        }
        self.run += 1;
        self.remaining = self.limit;
        self.status = TimerStatus::Running;
        Some(self.run)
    }

    /// Running -> Idle, resetting the countdown. Returns whether it stopped.
    pub fn stop(&mut self) -> bool {
        if self.status != TimerStatus::Running {
            return false;
        }
        self.status = TimerStatus::Idle;
        self.remaining = self.limit;
        true
    }

    /// Expired -> Idle.
    pub fn acknowledge(&mut self) -> bool {
        if self.status != TimerStatus::Expired {
            return false;
        }
        self.status = TimerStatus::Idle;
        self.remaining = self.limit;
        true
    }

    pub fn tick(&mut self, run: u64) -> TickOutcome {
        if self.status != TimerStatus::Running || run != self.run {
            return TickOutcome::Ignored;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.status = TimerStatus::Expired;
            return TickOutcome::Expired;
        }
        TickOutcome::Counted
    }
}

pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// One-second tick source for a single timer run.
///
/// Ticks are sent as the run id they were scheduled for. The task is
/// aborted on [`Ticker::cancel`] and on drop.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    pub fn spawn<T, F>(run: u64, events: mpsc::UnboundedSender<T>, make_event: F) -> Self
    where
        T: Send + 'static,
        F: Fn(u64) -> T + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
            // first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                if events.send(make_event(run)).is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }

    pub fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_countdown_expires_and_raises_alarm() {
        let mut timer = FocusTimer::default();
        let run = timer.start().unwrap();

        for _ in 0..DEEP_WORK_LIMIT - 1 {
            assert_eq!(timer.tick(run), TickOutcome::Counted);
        }
        assert_eq!(timer.tick(run), TickOutcome::Expired);
        assert_eq!(timer.remaining(), 0);
        assert!(!timer.is_running());
        assert!(timer.alarm_visible());

        assert_eq!(timer.tick(run), TickOutcome::Ignored);
        assert_eq!(timer.remaining(), 0);

        assert!(timer.acknowledge());
        assert_eq!(timer.status(), TimerStatus::Idle);
        assert_eq!(timer.remaining(), DEEP_WORK_LIMIT);
    }

    #[test]
    fn idle_timer_without_ticks_stays_full() {
        let timer = FocusTimer::default();
        assert_eq!(timer.remaining(), DEEP_WORK_LIMIT);
        assert_eq!(timer.status(), TimerStatus::Idle);
        assert_eq!(timer.progress(), 1.0);
    }

    #[test]
    fn stop_resets_and_ignores_late_ticks() {
        let mut timer = FocusTimer::new(10);
        let first = timer.start().unwrap();
        timer.tick(first);
        timer.tick(first);
        assert_eq!(timer.remaining(), 8);

        assert!(timer.stop());
        assert_eq!(timer.remaining(), 10);
        assert_eq!(timer.tick(first), TickOutcome::Ignored);

        let second = timer.start().unwrap();
        assert_ne!(first, second);
        assert_eq!(timer.tick(first), TickOutcome::Ignored);
        assert_eq!(timer.tick(second), TickOutcome::Counted);
        assert_eq!(timer.remaining(), 9);
    }

    #[test]
    fn invalid_transitions_are_refused() {
        let mut timer = FocusTimer::new(1);
        assert!(!timer.stop());
        assert!(!timer.acknowledge());
        let run = timer.start().unwrap();
        assert!(timer.start().is_none());
        assert_eq!(timer.tick(run), TickOutcome::Expired);
        assert!(timer.start().is_none());
        assert!(!timer.stop());
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(DEEP_WORK_LIMIT), "90:00");
        assert_eq!(format_time(65), "1:05");
        assert_eq!(format_time(0), "0:00");
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_sends_one_tick_per_second_until_cancelled() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ticker = Ticker::spawn(3, tx, |run| run);

        time::sleep(Duration::from_millis(3_500)).await;
        let mut received = Vec::new();
        while let Ok(run) = rx.try_recv() {
            received.push(run);
        }
        assert_eq!(received, [3, 3, 3]);

        ticker.cancel();
        time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }
}
