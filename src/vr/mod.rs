mod actor;
mod command;
mod headless;
mod pacer;
mod snapshot;
mod worker;

pub use actor::VrActor;
pub use command::{VrCommand, VrEvent};
pub use headless::{HeadlessVrDisplay, VrFrameLog};
pub use pacer::FramePacer;
pub use snapshot::build_snapshot;
pub use worker::{VrRenderWorker, VrSettings};
