pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod loaders;
pub mod math;
pub mod part;
pub mod render;
pub mod status;
pub mod traits;
pub mod viewer;
pub mod vr;

pub use config::ViewerConfig;
pub use error::{ViewerError, ViewerResult};
pub use part::{NodeId, PartNode, PartTree};
pub use viewer::{LoadOutcome, Viewer};
