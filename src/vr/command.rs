/// Requests serviced by the VR render loop between frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VrCommand {
    /// Leave the render loop; the only cancellation signal
    EndRender,
    /// Rotate the VR scene about an axis by the given degrees
    RotateX(f32),
    RotateY(f32),
    RotateZ(f32),
    /// Continuous rotation about the vertical axis, degrees per second
    SetRotationSpeed(f32),
}

/// Notifications from the VR worker, drained by the control thread
#[derive(Debug, Clone, PartialEq)]
pub enum VrEvent {
    Started { actors: usize },
    RebuildRequested,
    RebuildComplete { actors: usize },
    FrameFailed(String),
    Stopped { frames: u64 },
}
