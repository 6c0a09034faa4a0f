use glam::Quat;
use std::sync::{Arc, Mutex, MutexGuard};

use super::actor::VrActor;
use crate::traits::{FrameStatus, VrDisplay};

/// What a headless VR display observed, shared with the control thread
#[derive(Debug, Clone, Default)]
pub struct VrFrameLog {
    pub frames: u64,
    pub last_actor_count: usize,
    pub last_triangle_count: usize,
    pub last_orientation: Option<Quat>,
    pub sessions: u32,
}

/// VR display without a headset; records frames and optionally closes after a budget
#[derive(Debug, Clone, Default)]
pub struct HeadlessVrDisplay {
    log: Arc<Mutex<VrFrameLog>>,
    frame_limit: Option<u64>,
    session_frames: u64,
}

impl HeadlessVrDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the session closed after `frames` frames per session
    pub fn with_frame_limit(frames: u64) -> Self {
        Self {
            frame_limit: Some(frames),
            ..Self::default()
        }
    }

    /// Handle for reading the frame log while the display lives on the worker thread
    pub fn log_handle(&self) -> Arc<Mutex<VrFrameLog>> {
        Arc::clone(&self.log)
    }

    pub fn snapshot(&self) -> VrFrameLog {
        lock(&self.log).clone()
    }
}

fn lock(log: &Mutex<VrFrameLog>) -> MutexGuard<'_, VrFrameLog> {
    log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl VrDisplay for HeadlessVrDisplay {
    fn initialize(&mut self) -> anyhow::Result<()> {
        self.session_frames = 0;
        lock(&self.log).sessions += 1;
        Ok(())
    }

    fn render_frame(&mut self, actors: &[VrActor], orientation: Quat) -> anyhow::Result<FrameStatus> {
        self.session_frames += 1;
        {
            let mut log = lock(&self.log);
            log.frames += 1;
            log.last_actor_count = actors.len();
            log.last_triangle_count = actors.iter().map(|a| a.surface().triangle_count()).sum();
            log.last_orientation = Some(orientation);
        }

        match self.frame_limit {
            Some(limit) if self.session_frames >= limit => Ok(FrameStatus::Closed),
            _ => Ok(FrameStatus::Continue),
        }
    }
}
