use std::path::Path;

use crate::error::ViewerResult;
use crate::geometry::TriangleMesh;

/// Geometry I/O boundary: file path in, triangulated surface out
pub trait GeometryLoader {
    /// Fails with `ViewerError::Load` for unreadable files, unsupported
    /// formats and files without triangles
    fn load(&self, path: &Path) -> ViewerResult<TriangleMesh>;
}
