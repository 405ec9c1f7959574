//! Stopwatch for tracking time spent on an activity.
//!
//! A [`Stopwatch`] moves through `Idle -> Running -> Paused -> Running` and
//! back to `Idle` on stop. Transitions that do not apply to the current state
//! are ignored rather than reported as errors, so UI handlers can call them
//! unconditionally. [`Ticker`] refreshes the display once per second while
//! the watch is running.

use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use serde::Serialize;
use time::{Duration, OffsetDateTime};
use tokio::{
    sync::{RwLock, mpsc},
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use uuid::Uuid;

pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Clock that only moves when told to. Clones share the same reading.
#[derive(Debug, Clone)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start: OffsetDateTime) -> Self {
        let millis = (start.unix_timestamp_nanos() / 1_000_000) as i64;
        Self {
            millis: Arc::new(AtomicI64::new(millis)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.millis
            .fetch_add(by.whole_milliseconds() as i64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH + Duration::milliseconds(self.millis.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Emitted when a stopwatch is stopped.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedSession {
    pub id: Uuid,
    pub label: Option<String>,
    pub duration_seconds: u64,
    pub note: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub stopped_at: OffsetDateTime,
}

#[derive(Debug)]
pub struct Stopwatch<C = SystemClock> {
    clock: C,
    state: TimerState,
    started_at: Option<OffsetDateTime>,
    accumulated: Duration,
    label: Option<String>,
}

impl Default for Stopwatch<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> Stopwatch<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: TimerState::Idle,
            started_at: None,
            accumulated: Duration::ZERO,
            label: None,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn started_at(&self) -> Option<OffsetDateTime> {
        self.started_at
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn accumulated_seconds(&self) -> u64 {
        self.accumulated.whole_seconds() as u64
    }

    /// Time spent running since the last reset.
    pub fn elapsed_seconds(&self) -> u64 {
        (self.accumulated + self.running_span()).whole_seconds() as u64
    }

    pub fn display(&self) -> String {
        format_hms(self.elapsed_seconds())
    }

    fn running_span(&self) -> Duration {
        match self.started_at {
            // A clock stepping backwards must not shrink the total.
            Some(start) => (self.clock.now() - start).max(Duration::ZERO),
            None => Duration::ZERO,
        }
    }

    pub fn start(&mut self) -> bool {
        if self.state != TimerState::Idle {
            return false;
        }
        self.started_at = Some(self.clock.now());
        self.state = TimerState::Running;
        tracing::debug!(label = ?self.label, "stopwatch started");
        true
    }

    /// Start tracking a named activity.
    pub fn start_for(&mut self, label: impl Into<String>) -> bool {
        if self.state != TimerState::Idle {
            return false;
        }
        self.label = Some(label.into());
        self.start()
    }

    pub fn pause(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.accumulated += self.running_span();
        self.started_at = None;
        self.state = TimerState::Paused;
        tracing::debug!(accumulated = self.accumulated_seconds(), "stopwatch paused");
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != TimerState::Paused {
            return false;
        }
        self.started_at = Some(self.clock.now());
        self.state = TimerState::Running;
        tracing::debug!(accumulated = self.accumulated_seconds(), "stopwatch resumed");
        true
    }

    pub fn stop(&mut self) -> Option<CompletedSession> {
        self.stop_with_note(None)
    }

    /// Stop and reset, returning the session total. `None` when idle.
    pub fn stop_with_note(&mut self, note: Option<String>) -> Option<CompletedSession> {
        if self.state == TimerState::Idle {
            return None;
        }
        if self.state == TimerState::Running {
            self.accumulated += self.running_span();
        }
        let session = CompletedSession {
            id: Uuid::new_v4(),
            label: self.label.take(),
            duration_seconds: self.accumulated_seconds(),
            note: note.filter(|n| !n.trim().is_empty()),
            stopped_at: self.clock.now(),
        };
        self.state = TimerState::Idle;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        tracing::info!(
            label = ?session.label,
            duration = %format_hms(session.duration_seconds),
            "stopwatch stopped"
        );
        Some(session)
    }
}

/// `HH:MM:SS`, zero padded. Hours grow past two digits instead of wrapping.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// `6h 24m` style summary used in the day totals.
pub fn format_hours_minutes(total_seconds: u64) -> String {
    format!("{}h {}m", total_seconds / 3600, (total_seconds % 3600) / 60)
}

pub type SharedStopwatch<C = SystemClock> = Arc<RwLock<Stopwatch<C>>>;

/// Background task that pushes the formatted elapsed time once per second
/// while the watch runs. Dropping the ticker stops it.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    pub fn spawn<C>(stopwatch: SharedStopwatch<C>) -> (Self, mpsc::Receiver<String>)
    where
        C: Clock + 'static,
    {
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(async move {
            let period = std::time::Duration::from_secs(1);
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let display = {
                    let watch = stopwatch.read().await;
                    if !watch.is_running() {
                        continue;
                    }
                    watch.display()
                };
                if tx.send(display).await.is_err() {
                    break;
                }
            }
        });
        (Self { handle }, rx)
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
    use time::macros::datetime;

    fn watch() -> (Stopwatch<ManualClock>, ManualClock) {
        let clock = ManualClock::new(datetime!(2024-07-21 09:00 UTC));
        (Stopwatch::new(clock.clone()), clock)
    }

    #[test]
    fn format_hms_pads() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(3661), "01:01:01");
        assert_eq!(format_hms(59), "00:00:59");
        assert_eq!(format_hms(360_000), "100:00:00");
        assert_eq!(format_hours_minutes(23_040), "6h 24m");
    }

    #[test]
    fn duration_is_sum_of_running_intervals() {
        let (mut sw, clock) = watch();
        assert!(sw.start());
        clock.advance(Duration::seconds(10));
        assert!(sw.pause());
        clock.advance(Duration::seconds(100));
        assert!(sw.resume());
        clock.advance(Duration::seconds(20));
        assert!(sw.pause());
        clock.advance(Duration::seconds(7));
        assert!(sw.resume());
        clock.advance(Duration::seconds(5));

        let session = sw.stop().expect("running watch stops");
        assert_eq!(session.duration_seconds, 35);
    }

    #[test]
    fn paused_display_is_frozen() {
        let (mut sw, clock) = watch();
        sw.start();
        clock.advance(Duration::seconds(65));
        assert_eq!(sw.display(), "00:01:05");
        sw.pause();
        clock.advance(Duration::seconds(600));
        assert_eq!(sw.display(), "00:01:05");
        assert_eq!(sw.accumulated_seconds(), 65);
    }

    #[test]
    fn stop_resets_to_idle() {
        let (mut sw, clock) = watch();
        sw.start_for("Update user interface design");
        clock.advance(Duration::seconds(3));
        sw.pause();
        let session = sw
            .stop_with_note(Some("wireframes done".into()))
            .expect("paused watch stops");
        assert_eq!(session.duration_seconds, 3);
        assert_eq!(session.label.as_deref(), Some("Update user interface design"));
        assert_eq!(session.note.as_deref(), Some("wireframes done"));
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["durationSeconds"], 3);
        assert_eq!(json["stoppedAt"], "2024-07-21T09:00:03Z");

        assert_eq!(sw.state(), TimerState::Idle);
        assert!(!sw.is_running());
        assert_eq!(sw.accumulated_seconds(), 0);
        assert_eq!(sw.started_at(), None);
        assert_eq!(sw.label(), None);
    }

    #[test]
    fn invalid_transitions_are_ignored() {
        let (mut sw, clock) = watch();
        assert!(!sw.pause());
        assert!(sw.stop().is_none());
        assert!(!sw.resume());
        assert_eq!(sw.state(), TimerState::Idle);

        sw.start();
        let started = sw.started_at();
        clock.advance(Duration::seconds(4));
        assert!(!sw.start());
        assert!(!sw.resume());
        assert_eq!(sw.started_at(), started);

        sw.pause();
        assert!(!sw.start());
        assert_eq!(sw.state(), TimerState::Paused);
    }

    #[test]
    fn restart_after_stop_begins_at_zero() {
        let (mut sw, clock) = watch();
        sw.start();
        clock.advance(Duration::seconds(30));
        sw.stop();
        assert!(sw.start());
        clock.advance(Duration::seconds(2));
        assert_eq!(sw.elapsed_seconds(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_reports_while_running() {
        let (mut sw, clock) = watch();
        sw.start();
        clock.advance(Duration::seconds(5));
        let shared = Arc::new(RwLock::new(sw));

        let (ticker, mut rx) = Ticker::spawn(shared.clone());
        assert_eq!(rx.recv().await.as_deref(), Some("00:00:05"));
        clock.advance(Duration::seconds(1));
        assert_eq!(rx.recv().await.as_deref(), Some("00:00:06"));

        ticker.cancel();
        assert_eq!(rx.recv().await, None);
    }
}
