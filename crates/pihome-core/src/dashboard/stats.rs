//! Rolling frame time statistics for the status panel

use std::fmt::Write;
use std::time::{Duration, Instant};

/// Number of frame intervals the average is taken over.
pub const FRAME_HISTORY: usize = 60;

#[derive(Debug, Clone)]
pub struct FrameStats {
    intervals_ms: [f32; FRAME_HISTORY],
    len: usize,
    next: usize,
    last_frame: Option<Instant>,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            intervals_ms: [0.0; FRAME_HISTORY],
            len: 0,
            next: 0,
            last_frame: None,
        }
    }

    /// Mark a frame boundary at `now`.
    pub fn tick(&mut self, now: Instant) {
        if let Some(last) = self.last_frame {
            self.record(now.saturating_duration_since(last));
        }
        self.last_frame = Some(now);
    }

    pub fn record(&mut self, interval: Duration) {
        self.intervals_ms[self.next] = interval.as_secs_f32() * 1000.0;
        self.next = (self.next + 1) % FRAME_HISTORY;
        self.len = (self.len + 1).min(FRAME_HISTORY);
    }

    pub fn average_ms(&self) -> Option<f32> {
        if self.len == 0 {
            return None;
        }
        let sum: f32 = self.intervals_ms[..self.len].iter().sum();
        Some(sum / self.len as f32)
    }

    pub fn fps(&self) -> Option<f32> {
        self.average_ms()
            .filter(|ms| *ms > 0.0)
            .map(|ms| 1000.0 / ms)
    }

    /// Status line, e.g. "Application average 100.125 ms/frame (10.0 FPS)".
    pub fn status_line(&self) -> heapless::String<64> {
        let mut line = heapless::String::new();
        match (self.average_ms(), self.fps()) {
            (Some(ms), Some(fps)) => {
                write!(line, "Application average {:.3} ms/frame ({:.1} FPS)", ms, fps).ok()
            }
            _ => write!(line, "Application average --- ms/frame").ok(),
        };
        line
    }
}
