use std::time::{Duration, Instant};

/// Frame clock for the VR loop: tracks delta time and the remaining frame budget
#[derive(Debug)]
pub struct FramePacer {
    interval: Duration,
    last_tick: Instant,
}

impl FramePacer {
    pub fn new(target_fps: f32) -> Self {
        let fps = if target_fps.is_finite() && target_fps > 0.0 {
            target_fps
        } else {
            90.0
        };
        Self {
            interval: Duration::from_secs_f32(1.0 / fps),
            last_tick: Instant::now(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time left before the next frame is due
    pub fn remaining(&self) -> Duration {
        self.interval.saturating_sub(self.last_tick.elapsed())
    }

    /// Delta since the last tick in seconds; advances the clock
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        delta
    }
}
