//! Time management utilities
//!
//! [`FrameClock`] is the injected source of frame timing the lifecycle loop
//! runs on. [`FixedStepClock`] is deterministic and used by tests and
//! headless runs; [`SystemClock`] paces frames against the wall clock.

use std::time::{Duration, Instant};

/// Source of frame timing for the lifecycle loop
pub trait FrameClock {
    /// Reset internal timing; called when the loop (re)starts
    fn start(&mut self) {}

    /// Wait for the next frame and return its delta time in seconds.
    /// `None` means the clock has stopped producing frames.
    fn next_frame(&mut self) -> Option<f32>;
}

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Restart timing from now without clearing counters
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.delta_time = 0.0;
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Time elapsed since the last `update`/`reset`, without updating
    pub fn since_last_frame(&self) -> Duration {
        self.last_frame.elapsed()
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Deterministic clock: every frame advances by the same step
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    step: f32,
    frame_limit: Option<u64>,
    frames: u64,
}

impl FixedStepClock {
    /// Clock that produces frames of `step` seconds forever
    pub fn new(step: f32) -> Self {
        Self {
            step,
            frame_limit: None,
            frames: 0,
        }
    }

    /// Clock ticking at `fps` frames per second
    pub fn from_fps(fps: u32) -> Self {
        Self::new(1.0 / fps.max(1) as f32)
    }

    /// Stop producing frames after `limit` frames
    pub fn with_frame_limit(mut self, limit: u64) -> Self {
        self.frame_limit = Some(limit);
        self
    }

    /// Frames produced so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl FrameClock for FixedStepClock {
    fn next_frame(&mut self) -> Option<f32> {
        if self.frame_limit.is_some_and(|limit| self.frames >= limit) {
            return None;
        }
        self.frames += 1;
        Some(self.step)
    }
}

/// Wall-clock frame pacing at a target FPS
pub struct SystemClock {
    timer: Timer,
    frame_duration: Duration,
    frame_limit: Option<u64>,
}

impl SystemClock {
    /// Clock paced to `target_fps`
    pub fn new(target_fps: u32) -> Self {
        Self {
            timer: Timer::new(),
            frame_duration: Duration::from_secs_f64(1.0 / target_fps.max(1) as f64),
            frame_limit: None,
        }
    }

    /// Stop producing frames after `limit` frames
    pub fn with_frame_limit(mut self, limit: Option<u64>) -> Self {
        self.frame_limit = limit;
        self
    }

    /// Total seconds of frames produced
    pub fn total_time(&self) -> f32 {
        self.timer.total_time()
    }
}

impl FrameClock for SystemClock {
    fn start(&mut self) {
        self.timer.reset();
    }

    fn next_frame(&mut self) -> Option<f32> {
        if self.frame_limit.is_some_and(|limit| self.timer.frame_count() >= limit) {
            return None;
        }
        let elapsed = self.timer.since_last_frame();
        if elapsed < self.frame_duration {
            std::thread::sleep(self.frame_duration - elapsed);
        }
        self.timer.update();
        Some(self.timer.delta_time())
    }
}
