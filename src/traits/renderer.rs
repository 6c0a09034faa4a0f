use glam::Quat;

use crate::math::{Aabb, Rgb};
use crate::render::PrimaryActor;
use crate::vr::VrActor;

/// On-screen renderer, bound to the control thread
pub trait RenderService {
    /// Add an actor to the current actor set
    fn add_actor(&mut self, actor: PrimaryActor);

    /// Drop every actor from the current actor set
    fn remove_all_actors(&mut self);

    fn set_background(&mut self, color: Rgb);

    /// Frame the camera on the given bounds (`None` when nothing is drawable)
    fn reset_camera(&mut self, bounds: Option<Aabb>);

    /// Draw the current actor set
    fn render(&mut self) -> anyhow::Result<()>;
}

/// Outcome of one immersive frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    /// The headset session ended; the render loop exits
    Closed,
}

/// Immersive display driven by the VR render worker.
///
/// The display moves onto the worker thread for the lifetime of a render
/// loop and comes back when the loop is joined.
pub trait VrDisplay: Send {
    fn initialize(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Draw one frame of the private actor list under the scene orientation
    fn render_frame(&mut self, actors: &[VrActor], orientation: Quat) -> anyhow::Result<FrameStatus>;

    fn shutdown(&mut self) {}
}
