//! Frame statistics sampling

use std::any::Any;
use std::fmt;

use super::Capability;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::lifecycle::{LifecycleManager, SceneHooks};
use crate::scene::SceneGraph;

/// One statistics sample
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Frames per second over the sample window
    pub fps: f32,
    /// Average frame time over the sample window
    pub frame_time_ms: f32,
    /// Frames since the capability was added
    pub frame_count: u64,
    /// Drawables in the scene when the sample was taken
    pub drawables: usize,
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} fps ({:.2} ms), {} frames, {} drawables",
            self.fps, self.frame_time_ms, self.frame_count, self.drawables
        )
    }
}

type StatsCallback = Box<dyn FnMut(&FrameStats)>;

/// Samples frame times and reports a [`FrameStats`] once per interval
pub struct FrameStatistics {
    interval: f32,
    window_time: f32,
    window_frames: u32,
    frame_count: u64,
    latest: Option<FrameStats>,
    callback: Option<StatsCallback>,
}

impl FrameStatistics {
    /// Report every `interval` seconds of frame time
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(f32::EPSILON),
            window_time: 0.0,
            window_frames: 0,
            frame_count: 0,
            latest: None,
            callback: None,
        }
    }

    /// Use the configured statistics interval
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.statistics_interval)
    }

    /// Receive every new sample
    pub fn set_callback(&mut self, callback: impl FnMut(&FrameStats) + 'static) {
        self.callback = Some(Box::new(callback));
    }

    /// Most recent sample, if a full interval has elapsed
    pub fn latest(&self) -> Option<FrameStats> {
        self.latest
    }

    /// Frames observed so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Capability for FrameStatistics {
    fn name(&self) -> &'static str {
        "frame_statistics"
    }

    fn on_update(&mut self, scene: &SceneGraph, delta_time: f32) {
        self.frame_count += 1;
        self.window_frames += 1;
        self.window_time += delta_time;
        if self.window_time < self.interval {
            return;
        }

        let frames = self.window_frames as f32;
        let stats = FrameStats {
            fps: if self.window_time > 0.0 { frames / self.window_time } else { 0.0 },
            frame_time_ms: self.window_time * 1000.0 / frames,
            frame_count: self.frame_count,
            drawables: scene.len(),
        };
        log::trace!("Frame statistics: {stats}");

        self.latest = Some(stats);
        self.window_time = 0.0;
        self.window_frames = 0;
        if let Some(callback) = self.callback.as_mut() {
            callback(&stats);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<H: SceneHooks> LifecycleManager<H> {
    /// Route frame statistics to `callback`.
    ///
    /// Fails with a capability error unless [`FrameStatistics`] was added.
    pub fn set_statistics_callback(&mut self, callback: impl FnMut(&FrameStats) + 'static) -> Result<()> {
        self.capabilities
            .require_mut::<FrameStatistics>("frame_statistics")?
            .set_callback(callback);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceStore;
    use crate::scene::Camera;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_reports_once_per_interval() {
        let scene = SceneGraph::new(ResourceStore::shared(), Camera::default());
        let samples = Rc::new(RefCell::new(Vec::new()));
        let sink = samples.clone();

        let mut stats = FrameStatistics::new(1.0);
        stats.set_callback(move |s| sink.borrow_mut().push(*s));

        for _ in 0..3 {
            stats.on_update(&scene, 0.25);
        }
        assert!(stats.latest().is_none());

        stats.on_update(&scene, 0.25);
        let sample = stats.latest().unwrap();
        assert_relative_eq!(sample.fps, 4.0);
        assert_relative_eq!(sample.frame_time_ms, 250.0);
        assert_eq!(sample.frame_count, 4);
        assert_eq!(samples.borrow().len(), 1);

        for _ in 0..4 {
            stats.on_update(&scene, 0.25);
        }
        assert_eq!(samples.borrow().len(), 2);
        assert_eq!(samples.borrow()[1].frame_count, 8);
    }

    #[test]
    fn test_display() {
        let stats = FrameStats { fps: 60.0, frame_time_ms: 16.667, frame_count: 120, drawables: 3 };
        assert_eq!(stats.to_string(), "60.0 fps (16.67 ms), 120 frames, 3 drawables");
    }
}
