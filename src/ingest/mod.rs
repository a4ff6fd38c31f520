//! Frame Ingestion
//!
//! Landmark frames arrive from an external detector as JSON lines. This
//! module decodes them ([`reader`]), decides which frames the engine
//! actually processes ([`FrameGate`]) and assigns each frame its session
//! time ([`FrameClock`]).

pub mod reader;

pub use reader::{parse_frame, FrameReader};

use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::landmark::Frame;

/// Which clock a session runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBase {
    /// Detector timestamps (`timestamp_ms`)
    Stream,
    /// Time since the clock was created
    Wall,
}

/// Session clock fixed by the first frame.
///
/// A first frame carrying `timestamp_ms` puts the session on stream time;
/// otherwise it runs on wall time. Frames that disagree with the chosen
/// base are timed on it anyway: on stream time a frame without a
/// timestamp reuses the last one, on wall time timestamps are ignored.
/// Returned times never go backwards.
#[derive(Debug, Clone)]
pub struct FrameClock {
    started: Instant,
    base: Option<TimeBase>,
    last: Duration,
    mismatched: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            base: None,
            last: Duration::ZERO,
            mismatched: 0,
        }
    }

    /// Session time for `frame`
    pub fn now(&mut self, frame: &Frame) -> Duration {
        let wall = self.started.elapsed();
        self.time(frame.timestamp_ms, wall)
    }

    fn time(&mut self, timestamp_ms: Option<u64>, wall: Duration) -> Duration {
        let base = *self.base.get_or_insert_with(|| {
            let base = if timestamp_ms.is_some() {
                TimeBase::Stream
            } else {
                TimeBase::Wall
            };
            debug!(?base, "Session time base chosen");
            base
        });

        let now = match (base, timestamp_ms) {
            (TimeBase::Stream, Some(ms)) => Duration::from_millis(ms),
            (TimeBase::Wall, None) => wall,
            (TimeBase::Stream, None) | (TimeBase::Wall, Some(_)) => {
                if self.mismatched == 0 {
                    warn!(?base, "Frame timing disagrees with the session time base");
                }
                self.mismatched += 1;
                match base {
                    TimeBase::Stream => self.last,
                    TimeBase::Wall => wall,
                }
            }
        };
        self.last = self.last.max(now);
        self.last
    }

    /// Chosen time base, once a frame has been timed
    pub fn base(&self) -> Option<TimeBase> {
        self.base
    }

    /// Frames whose timing did not match the time base
    pub fn mismatched(&self) -> u64 {
        self.mismatched
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic every-Nth frame gate.
///
/// The counter is bumped on every frame and a frame passes iff
/// `counter % n == 0`, so the same stream always yields the same
/// processed subset regardless of timing.
#[derive(Debug, Clone)]
pub struct FrameGate {
    every_nth: u32,
    counter: u64,
}

impl FrameGate {
    /// `every_nth` of 0 is treated as 1
    pub fn new(every_nth: u32) -> Self {
        Self {
            every_nth: every_nth.max(1),
            counter: 0,
        }
    }

    /// Count a frame and report whether it should be processed
    pub fn admit(&mut self) -> bool {
        self.counter += 1;
        self.counter % u64::from(self.every_nth) == 0
    }

    /// Frames seen so far
    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn every_nth(&self) -> u32 {
        self.every_nth
    }

    pub fn reset(&mut self) {
        self.counter = 0;
    }
}
