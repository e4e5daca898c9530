//! Adaptive quality controller
//!
//! Watches a rolling window of frame times and switches the simulation off
//! when the average frame rate sinks below a fraction of the target. The
//! switch is one-way: only `enable_physics` turns the simulation back on.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_AUTO_DISABLE_THRESHOLD, DEFAULT_TARGET_FPS, FPS_WINDOW};
use crate::settings::QualityLevel;

/// Whether the simulation is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerState {
    Enabled,
    /// Switched off by the host
    Disabled,
    /// Switched off by the frame-rate monitor
    AutoDisabled,
}

/// Frame-rate monitor plus the pending quality level
#[derive(Debug, Clone)]
pub struct QualityController {
    state: ControllerState,
    target_fps: f32,
    auto_disable_threshold: f32,
    /// Instantaneous FPS samples, ring buffer
    samples: [f32; FPS_WINDOW],
    sample_index: usize,
    sample_count: usize,
    average_fps: f32,
    last_timestamp_ms: Option<f64>,
    pending_quality: QualityLevel,
}

impl QualityController {
    pub fn new(quality: QualityLevel) -> Self {
        Self {
            state: ControllerState::Enabled,
            target_fps: DEFAULT_TARGET_FPS,
            auto_disable_threshold: DEFAULT_AUTO_DISABLE_THRESHOLD,
            samples: [0.0; FPS_WINDOW],
            sample_index: 0,
            sample_count: 0,
            average_fps: 0.0,
            last_timestamp_ms: None,
            pending_quality: quality,
        }
    }

    /// Start in the manually disabled state
    pub fn start_disabled(mut self) -> Self {
        self.state = ControllerState::Disabled;
        self
    }

    pub fn with_target_fps(mut self, fps: f32) -> Self {
        if fps.is_finite() && fps > 0.0 {
            self.target_fps = fps;
        }
        self
    }

    pub fn with_auto_disable_threshold(mut self, threshold: f32) -> Self {
        if threshold.is_finite() {
            self.auto_disable_threshold = threshold.clamp(0.0, 1.0);
        }
        self
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state == ControllerState::Enabled
    }

    pub fn target_fps(&self) -> f32 {
        self.target_fps
    }

    /// Rolling average over the samples collected so far
    pub fn average_fps(&self) -> f32 {
        self.average_fps
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Record one frame-to-frame delta in seconds
    pub fn record_frame_delta(&mut self, delta_secs: f32) {
        if self.state != ControllerState::Enabled {
            return;
        }
        if !delta_secs.is_finite() || delta_secs <= 0.0 {
            return;
        }

        self.samples[self.sample_index] = 1.0 / delta_secs;
        self.sample_index = (self.sample_index + 1) % FPS_WINDOW;
        self.sample_count = (self.sample_count + 1).min(FPS_WINDOW);
        self.average_fps =
            self.samples[..self.sample_count].iter().sum::<f32>() / self.sample_count as f32;

        // Judge only a full window so a single slow start-up frame can't trip it
        if self.sample_count == FPS_WINDOW
            && self.average_fps < self.target_fps * self.auto_disable_threshold
        {
            self.state = ControllerState::AutoDisabled;
            log::warn!(
                "Soft-body physics auto-disabled: {:.1} fps average (target {:.0}, threshold {:.0}%)",
                self.average_fps,
                self.target_fps,
                self.auto_disable_threshold * 100.0
            );
        }
    }

    /// Record a wall-clock timestamp in milliseconds (e.g. `performance.now()`)
    pub fn record_timestamp(&mut self, now_ms: f64) {
        if let Some(last) = self.last_timestamp_ms {
            self.record_frame_delta(((now_ms - last) / 1000.0) as f32);
        }
        self.last_timestamp_ms = Some(now_ms);
    }

    /// Manual switch back on; clears the window so old samples can't re-trip it
    pub fn enable_physics(&mut self) {
        if self.state != ControllerState::Enabled {
            log::info!("Soft-body physics enabled");
        }
        self.state = ControllerState::Enabled;
        self.clear_samples();
    }

    pub fn disable_physics(&mut self) {
        if self.state == ControllerState::Enabled {
            log::info!("Soft-body physics disabled");
            self.state = ControllerState::Disabled;
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.enable_physics();
        } else {
            self.disable_physics();
        }
    }

    /// Always honored; applied by the next topology rebuild
    pub fn set_quality(&mut self, quality: QualityLevel) {
        self.pending_quality = quality;
    }

    pub fn pending_quality(&self) -> QualityLevel {
        self.pending_quality
    }

    fn clear_samples(&mut self) {
        self.samples = [0.0; FPS_WINDOW];
        self.sample_index = 0;
        self.sample_count = 0;
        self.average_fps = 0.0;
        self.last_timestamp_ms = None;
    }
}
