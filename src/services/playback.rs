//! Playback engine boundary.
//!
//! The editor never decodes audio. It reads positions from a
//! [`PlaybackClock`] on a fixed cadence and reacts to engine notifications.

use std::time::Instant;

use crate::lyrics::format_time;

/// Source of playback position ticks.
pub trait PlaybackClock {
    /// Current position in milliseconds. May be negative while pre-rolling.
    fn position_ms(&self) -> i64;

    /// Total length in milliseconds, 0 when unknown.
    fn duration_ms(&self) -> u64;
}

/// Notifications raised by the playback engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Media opened and its duration is known.
    Opened {
        /// Natural duration in milliseconds.
        duration_ms: u64,
    },
    /// Playback reached the end of the media.
    Ended,
    /// The engine could not play the media.
    Failed(String),
}

/// Position/duration text such as `01:05 / 03:35`.
pub fn playback_time_text(position_ms: i64, duration_ms: u64) -> String {
    let position = u64::try_from(position_ms).unwrap_or_default();
    format!("{} / {}", format_time(position), format_time(duration_ms))
}

/// Clock driven by the system monotonic clock.
///
/// Stands in for an engine when following lyrics from the command line.
#[derive(Debug, Clone)]
pub struct WallClock {
    started: Option<Instant>,
    elapsed_ms: u64,
    duration_ms: u64,
}

impl WallClock {
    /// Create a stopped clock for media of `duration_ms`.
    pub const fn new(duration_ms: u64) -> Self {
        Self {
            started: None,
            elapsed_ms: 0,
            duration_ms,
        }
    }

    /// Start or resume.
    pub fn play(&mut self) {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    /// Pause, keeping the position.
    pub fn pause(&mut self) {
        if let Some(started) = self.started.take() {
            self.elapsed_ms += millis(started);
        }
    }

    /// Stop and rewind to the start.
    pub fn stop(&mut self) {
        self.started = None;
        self.elapsed_ms = 0;
    }

    /// Check if the clock is running.
    pub const fn is_playing(&self) -> bool {
        self.started.is_some()
    }

    /// Check if a known duration has been reached.
    pub fn is_finished(&self) -> bool {
        self.duration_ms > 0 && self.raw_position_ms() >= self.duration_ms
    }

    fn raw_position_ms(&self) -> u64 {
        self.elapsed_ms + self.started.map_or(0, millis)
    }
}

impl PlaybackClock for WallClock {
    fn position_ms(&self) -> i64 {
        let position = if self.duration_ms > 0 {
            self.raw_position_ms().min(self.duration_ms)
        } else {
            self.raw_position_ms()
        };
        i64::try_from(position).unwrap_or(i64::MAX)
    }

    fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}

fn millis(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX)
}
