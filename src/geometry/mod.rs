mod filters;
mod mesh;
mod surface;

pub use filters::{FilterFlags, FilterPipeline, SHRINK_FACTOR};
pub use mesh::TriangleMesh;
pub use surface::{Surface, Vertex};
