mod handle;
mod headless;
mod primary;

pub use handle::{ActorProperty, Mapper, PrimaryActor, RenderHandle};
pub use headless::HeadlessRenderer;
pub use primary::{PrimaryRenderSync, SyncReport};
