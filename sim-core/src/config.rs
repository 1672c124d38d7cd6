use std::time::Duration;

use crate::{error::ConfigError, updater::SizeRule};

/// Which of the two demos a [`Config`] describes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Demo {
    /// Herd members colored by a fixed position projection.
    Herd,
    /// Signal-driven particles.
    #[default]
    Particles,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    pub demo: Demo,
    pub object_count: usize,
    /// Side length of the drawn domain, in renderer units (pixels).
    pub drawing_size: f32,
    pub delta_time: f32,
    /// Number of frames in a run.
    pub steps: usize,
    /// Pause before each frame is presented, so the animation is visible.
    pub frame_delay: Duration,
    /// Seed for positions, velocities and projections; `None` draws one.
    pub seed: Option<u64>,
    pub size_rule: SizeRule,
}

impl Config {
    pub fn particles() -> Self {
        Self {
            demo: Demo::Particles,
            object_count: 100,
            drawing_size: 400.0,
            delta_time: 0.1,
            steps: 1000,
            frame_delay: Duration::from_micros(10),
            seed: None,
            size_rule: SizeRule::Oscillating,
        }
    }

    pub fn herd() -> Self {
        Self {
            demo: Demo::Herd,
            object_count: 50,
            drawing_size: 400.0,
            delta_time: 0.1,
            steps: 100,
            frame_delay: Duration::from_micros(500),
            seed: None,
            size_rule: SizeRule::Oscillating,
        }
    }

    /// The preset for `demo`.
    pub fn for_demo(demo: Demo) -> Self {
        match demo {
            Demo::Herd => Self::herd(),
            Demo::Particles => Self::particles(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.object_count == 0 {
            return Err(ConfigError::ZeroObjects);
        }
        if !self.delta_time.is_finite() {
            return Err(ConfigError::NonFiniteDeltaTime(self.delta_time));
        }
        if self.drawing_size.is_nan() || self.drawing_size <= 0.0 {
            return Err(ConfigError::NonPositiveDrawingSize(self.drawing_size));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::particles()
    }
}
