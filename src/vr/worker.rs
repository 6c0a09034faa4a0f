use glam::Quat;
use log::{debug, info, warn};
use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use super::actor::VrActor;
use super::command::{VrCommand, VrEvent};
use super::pacer::FramePacer;
use crate::error::{ViewerError, ViewerResult};
use crate::traits::{FrameStatus, VrDisplay};

/// Render loop tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VrSettings {
    pub target_fps: f32,
    /// Degrees per second about the vertical axis
    pub rotation_speed: f32,
}

impl Default for VrSettings {
    fn default() -> Self {
        Self {
            target_fps: 90.0,
            rotation_speed: 0.0,
        }
    }
}

/// Everything the render loop owns while it runs
struct LoopState<D> {
    display: D,
    actors: Vec<VrActor>,
    orientation: Quat,
}

/// Loop state parked until the render thread picks it up, so a failed spawn can reclaim it
type Handoff<D> = Arc<Mutex<Option<LoopState<D>>>>;

/// Thread body; yields `None` only when the handoff slot was already empty
type LoopBody<D> = Box<dyn FnOnce() -> Option<LoopState<D>> + Send>;

fn take_handoff<D>(slot: &Mutex<Option<LoopState<D>>>) -> Option<LoopState<D>> {
    slot.lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .take()
}

struct Running<D> {
    handle: JoinHandle<Option<LoopState<D>>>,
    commands: Sender<VrCommand>,
    end_requested: bool,
}

enum WorkerState<D> {
    Stopped(LoopState<D>),
    Running(Running<D>),
    /// The render thread panicked or could not be spawned; display and actors are gone
    Failed,
}

/// Parallel render loop over a private actor list.
///
/// The display and the actor list move onto the render thread on
/// [`start`](Self::start) and come back on [`wait`](Self::wait), so the list
/// can only be edited while the worker is stopped.
pub struct VrRenderWorker<D: VrDisplay + 'static> {
    state: WorkerState<D>,
    settings: VrSettings,
    events_tx: Sender<VrEvent>,
    events_rx: Receiver<VrEvent>,
}

impl<D: VrDisplay + 'static> VrRenderWorker<D> {
    pub fn new(display: D, settings: VrSettings) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            state: WorkerState::Stopped(LoopState {
                display,
                actors: Vec::new(),
                orientation: Quat::IDENTITY,
            }),
            settings,
            events_tx,
            events_rx,
        }
    }

    pub fn settings(&self) -> VrSettings {
        self.settings
    }

    /// True while the render thread is alive; a loop that ended on its own
    /// (display closed, frame error) no longer counts as running
    pub fn is_running(&self) -> bool {
        match &self.state {
            WorkerState::Running(running) => !running.handle.is_finished(),
            _ => false,
        }
    }

    /// Join a render thread that already exited so its state comes back
    fn reap_finished(&mut self) -> ViewerResult<()> {
        let finished = matches!(&self.state, WorkerState::Running(r) if r.handle.is_finished());
        if finished {
            debug!("collecting a render loop that ended on its own");
            self.wait()?;
        }
        Ok(())
    }

    fn stopped_mut(&mut self, action: &str) -> ViewerResult<&mut LoopState<D>> {
        self.reap_finished()?;
        match &mut self.state {
            WorkerState::Stopped(parts) => Ok(parts),
            WorkerState::Running(_) => Err(ViewerError::WorkerState(format!(
                "cannot {} while the render loop is running",
                action
            ))),
            WorkerState::Failed => Err(ViewerError::WorkerState(format!(
                "cannot {}: the render thread failed",
                action
            ))),
        }
    }

    /// Private actor list; only readable while stopped
    pub fn actors(&self) -> ViewerResult<&[VrActor]> {
        match &self.state {
            WorkerState::Stopped(parts) => Ok(&parts.actors),
            WorkerState::Running(_) => Err(ViewerError::WorkerState(
                "actor list is owned by the running render loop".into(),
            )),
            WorkerState::Failed => Err(ViewerError::WorkerState(
                "the render thread failed".into(),
            )),
        }
    }

    /// Display back on the control thread; only available while stopped
    pub fn display(&self) -> Option<&D> {
        match &self.state {
            WorkerState::Stopped(parts) => Some(&parts.display),
            _ => None,
        }
    }

    pub fn add_actor_offline(&mut self, actor: VrActor) -> ViewerResult<()> {
        self.stopped_mut("add actors")?.actors.push(actor);
        Ok(())
    }

    /// Clear the private actor list; rejected while running
    pub fn remove_all_actors(&mut self) -> ViewerResult<usize> {
        let parts = self.stopped_mut("remove actors")?;
        let removed = parts.actors.len();
        parts.actors.clear();
        Ok(removed)
    }

    /// Spawn the render loop over the current actor list.
    ///
    /// If the thread cannot be spawned the worker stays stopped with its
    /// display and actors intact.
    pub fn start(&mut self) -> ViewerResult<()> {
        self.start_with(|builder, body| builder.spawn(body))
    }

    fn start_with<S>(&mut self, spawn: S) -> ViewerResult<()>
    where
        S: FnOnce(thread::Builder, LoopBody<D>) -> io::Result<JoinHandle<Option<LoopState<D>>>>,
    {
        self.stopped_mut("start")?;
        let WorkerState::Stopped(parts) = std::mem::replace(&mut self.state, WorkerState::Failed)
        else {
            return Err(ViewerError::WorkerState("worker is not stopped".into()));
        };

        let handoff: Handoff<D> = Arc::new(Mutex::new(Some(parts)));
        let (commands, command_rx) = mpsc::channel();
        let events = self.events_tx.clone();
        let settings = self.settings;
        let slot = Arc::clone(&handoff);
        let body: LoopBody<D> = Box::new(move || {
            let parts = take_handoff(&slot)?;
            Some(render_loop(parts, command_rx, events, settings))
        });

        match spawn(thread::Builder::new().name("vr-render".to_string()), body) {
            Ok(handle) => {
                info!("VR render loop started");
                self.state = WorkerState::Running(Running {
                    handle,
                    commands,
                    end_requested: false,
                });
                Ok(())
            }
            Err(e) => {
                if let Some(parts) = take_handoff(&handoff) {
                    self.state = WorkerState::Stopped(parts);
                }
                Err(ViewerError::WorkerState(format!(
                    "failed to spawn render thread: {}",
                    e
                )))
            }
        }
    }

    /// Queue a command for the render loop; rejected while stopped
    pub fn issue_command(&mut self, command: VrCommand) -> ViewerResult<()> {
        self.reap_finished()?;
        let WorkerState::Running(running) = &mut self.state else {
            return Err(ViewerError::WorkerState(format!(
                "cannot issue {:?}: render loop is not running",
                command
            )));
        };
        if command == VrCommand::EndRender {
            running.end_requested = true;
        }
        // A closed channel means the loop already exited; wait() collects it
        if running.commands.send(command).is_err() {
            debug!("render loop already gone, dropping {:?}", command);
        }
        Ok(())
    }

    /// Block until the render thread has exited; returns at once when stopped
    pub fn wait(&mut self) -> ViewerResult<()> {
        match std::mem::replace(&mut self.state, WorkerState::Failed) {
            WorkerState::Running(running) => {
                if !running.end_requested {
                    debug!("waiting on a render loop without END_RENDER");
                }
                match running.handle.join() {
                    Ok(Some(parts)) => {
                        self.state = WorkerState::Stopped(parts);
                        Ok(())
                    }
                    Ok(None) => Err(ViewerError::WorkerState(
                        "render thread started without its state".into(),
                    )),
                    Err(_) => Err(ViewerError::WorkerState(
                        "render thread panicked".into(),
                    )),
                }
            }
            WorkerState::Stopped(parts) => {
                self.state = WorkerState::Stopped(parts);
                Ok(())
            }
            WorkerState::Failed => Err(ViewerError::WorkerState(
                "the render thread failed".into(),
            )),
        }
    }

    /// END_RENDER followed by wait; no-op when already stopped
    pub fn stop(&mut self) -> ViewerResult<()> {
        if let WorkerState::Running(running) = &mut self.state {
            running.end_requested = true;
            // the loop may already have exited on its own
            let _ = running.commands.send(VrCommand::EndRender);
        }
        self.wait()
    }

    /// Full stop/clear/rebuild/start cycle.
    ///
    /// `build` runs only after the loop has stopped, so it never races the
    /// render thread. `RebuildComplete` is queued before the new loop reports
    /// `Started`. The loop is started again even if it was stopped before.
    pub fn resync<F>(&mut self, build: F) -> ViewerResult<usize>
    where
        F: FnOnce() -> Vec<VrActor>,
    {
        let _ = self.events_tx.send(VrEvent::RebuildRequested);
        self.stop()?;
        self.remove_all_actors()?;
        let actors = build();
        let count = actors.len();
        self.stopped_mut("rebuild")?.actors = actors;
        let _ = self.events_tx.send(VrEvent::RebuildComplete { actors: count });
        self.start()?;
        Ok(count)
    }

    /// Drain pending notifications
    pub fn events(&self) -> Vec<VrEvent> {
        self.events_rx.try_iter().collect()
    }
}

impl<D: VrDisplay + 'static> Drop for VrRenderWorker<D> {
    fn drop(&mut self) {
        if matches!(self.state, WorkerState::Running(_)) {
            if let Err(e) = self.stop() {
                warn!("VR worker shutdown: {}", e);
            }
        }
    }
}

fn render_loop<D: VrDisplay>(
    mut parts: LoopState<D>,
    commands: Receiver<VrCommand>,
    events: Sender<VrEvent>,
    settings: VrSettings,
) -> LoopState<D> {
    if let Err(e) = parts.display.initialize() {
        let _ = events.send(VrEvent::FrameFailed(format!("{:#}", e)));
        let _ = events.send(VrEvent::Stopped { frames: 0 });
        return parts;
    }
    let _ = events.send(VrEvent::Started {
        actors: parts.actors.len(),
    });

    let mut pacer = FramePacer::new(settings.target_fps);
    let mut rotation_speed = settings.rotation_speed;
    let mut frames = 0u64;

    'render: loop {
        // Service the command queue until the next frame is due
        loop {
            match commands.recv_timeout(pacer.remaining()) {
                Ok(VrCommand::EndRender) => break 'render,
                Ok(VrCommand::RotateX(deg)) => {
                    parts.orientation = Quat::from_rotation_x(deg.to_radians()) * parts.orientation
                }
                Ok(VrCommand::RotateY(deg)) => {
                    parts.orientation = Quat::from_rotation_y(deg.to_radians()) * parts.orientation
                }
                Ok(VrCommand::RotateZ(deg)) => {
                    parts.orientation = Quat::from_rotation_z(deg.to_radians()) * parts.orientation
                }
                Ok(VrCommand::SetRotationSpeed(speed)) => rotation_speed = speed,
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => break 'render,
            }
        }

        let delta = pacer.tick();
        if rotation_speed != 0.0 {
            let step = Quat::from_rotation_y((rotation_speed * delta).to_radians());
            parts.orientation = (step * parts.orientation).normalize();
        }

        match parts.display.render_frame(&parts.actors, parts.orientation) {
            Ok(FrameStatus::Continue) => frames += 1,
            Ok(FrameStatus::Closed) => {
                frames += 1;
                break 'render;
            }
            Err(e) => {
                let _ = events.send(VrEvent::FrameFailed(format!("{:#}", e)));
                break 'render;
            }
        }
    }

    parts.display.shutdown();
    let _ = events.send(VrEvent::Stopped { frames });
    parts
}
