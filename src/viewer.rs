use glam::Vec3;
use log::warn;
use std::path::{Path, PathBuf};

use crate::config::ViewerConfig;
use crate::error::{ViewerError, ViewerResult};
use crate::math::Rgb;
use crate::part::{NodeId, PartSettings, PartTree};
use crate::render::PrimaryRenderSync;
use crate::status::StatusLog;
use crate::traits::{GeometryLoader, RenderService, VrDisplay};
use crate::vr::{build_snapshot, VrCommand, VrEvent, VrRenderWorker};

/// Result of loading one file in a batch
#[derive(Debug)]
pub struct LoadOutcome {
    pub node: NodeId,
    pub path: PathBuf,
    /// Triangle count on success
    pub result: ViewerResult<usize>,
}

/// Control-thread façade: owns the tree, the primary renderer and the VR worker.
///
/// Every edit finishes with a primary sync. The VR view only changes through
/// [`Viewer::resync_vr`].
pub struct Viewer<R: RenderService, D: VrDisplay + 'static> {
    config: ViewerConfig,
    tree: PartTree,
    primary: PrimaryRenderSync,
    renderer: R,
    vr: VrRenderWorker<D>,
    loader: Box<dyn GeometryLoader>,
    status: StatusLog,
}

impl<R: RenderService, D: VrDisplay + 'static> Viewer<R, D> {
    /// Build the default tree of top-level containers and draw it once
    pub fn new(
        config: ViewerConfig,
        renderer: R,
        vr_display: D,
        loader: Box<dyn GeometryLoader>,
    ) -> ViewerResult<Self> {
        let mut tree = PartTree::new(config.default_part_color);
        let root = tree.root();
        for i in 0..config.top_level_parts {
            tree.add_child(root, format!("TopLevel {}", i), true)?;
        }

        let mut viewer = Self {
            vr: VrRenderWorker::new(vr_display, config.vr_settings()),
            status: StatusLog::new(config.status_capacity),
            primary: PrimaryRenderSync::new(),
            tree,
            renderer,
            loader,
            config,
        };
        viewer.renderer.set_background(viewer.config.background);
        viewer.update_render();
        Ok(viewer)
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn tree(&self) -> &PartTree {
        &self.tree
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn primary(&self) -> &PrimaryRenderSync {
        &self.primary
    }

    pub fn vr(&self) -> &VrRenderWorker<D> {
        &self.vr
    }

    pub fn status(&self) -> &StatusLog {
        &self.status
    }

    /// Top-level container at `row` under the root
    pub fn top_level(&self, row: usize) -> Option<NodeId> {
        self.tree.child(self.tree.root(), row)
    }

    pub fn select(&mut self, id: NodeId) -> ViewerResult<()> {
        let name = self.tree.node(id)?.name().to_string();
        self.status.push(format!("The selected item is: {}", name));
        Ok(())
    }

    /// Re-draw the on-screen view from the tree
    pub fn update_render(&mut self) {
        if let Err(e) = self.primary.sync(&mut self.tree, &mut self.renderer) {
            self.status.push(format!("Render failed: {:#}", e));
        }
    }

    pub fn add_container(&mut self, parent: NodeId, name: &str) -> ViewerResult<NodeId> {
        let id = self.tree.add_child(parent, name, false)?;
        self.update_render();
        Ok(id)
    }

    /// Load each file as a new child of `parent`, then sync once.
    ///
    /// A failed load leaves its child as an empty container and does not stop
    /// the rest of the batch.
    pub fn load_files<P: AsRef<Path>>(
        &mut self,
        parent: NodeId,
        paths: &[P],
    ) -> ViewerResult<Vec<LoadOutcome>> {
        let visible = self.tree.node(parent)?.is_visible();
        let mut outcomes = Vec::with_capacity(paths.len());

        for path in paths {
            let path = path.as_ref();
            self.status
                .push(format!("The selected file is: {}", path.display()));

            let node = self.tree.add_child(parent, path.display().to_string(), false)?;
            self.tree.set_visible(node, visible)?;

            let result = match self.loader.load(path) {
                Ok(mesh) => {
                    let triangles = mesh.triangle_count();
                    self.tree.load_geometry(node, mesh)?;
                    Ok(triangles)
                }
                Err(e) => {
                    warn!("{}", e);
                    self.status.push(e.to_string());
                    Err(e)
                }
            };
            outcomes.push(LoadOutcome {
                node,
                path: path.to_path_buf(),
                result,
            });
        }

        self.update_render();
        Ok(outcomes)
    }

    pub fn load_file(&mut self, parent: NodeId, path: impl AsRef<Path>) -> ViewerResult<LoadOutcome> {
        let mut outcomes = self.load_files(parent, &[path.as_ref()])?;
        outcomes
            .pop()
            .ok_or_else(|| ViewerError::InvalidNode("load produced no node".into()))
    }

    pub fn set_color(&mut self, id: NodeId, color: Rgb) -> ViewerResult<()> {
        self.tree.set_color(id, color)?;
        self.update_render();
        Ok(())
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> ViewerResult<()> {
        self.tree.set_visible(id, visible)?;
        self.update_render();
        Ok(())
    }

    pub fn set_name(&mut self, id: NodeId, name: &str) -> ViewerResult<()> {
        self.tree.set_name(id, name)?;
        self.update_render();
        Ok(())
    }

    pub fn set_shrink(&mut self, id: NodeId, enabled: bool) -> ViewerResult<()> {
        self.tree.set_shrink(id, enabled)?;
        self.update_render();
        Ok(())
    }

    pub fn set_clip(&mut self, id: NodeId, enabled: bool) -> ViewerResult<()> {
        self.tree.set_clip(id, enabled)?;
        self.update_render();
        Ok(())
    }

    pub fn set_position(&mut self, id: NodeId, position: Vec3) -> ViewerResult<()> {
        self.tree.set_position(id, position)?;
        self.update_render();
        Ok(())
    }

    pub fn reset_position(&mut self, id: NodeId) -> ViewerResult<bool> {
        let reset = self.tree.reset_to_original_position(id)?;
        if !reset {
            let name = self.tree.node(id)?.name().to_string();
            self.status
                .push(format!("{} has no original position to reset to", name));
        }
        self.update_render();
        Ok(reset)
    }

    pub fn remove_part(&mut self, id: NodeId) -> ViewerResult<usize> {
        let removed = self.tree.remove(id)?;
        self.update_render();
        Ok(removed)
    }

    /// Apply an accepted options dialog
    pub fn apply_settings(&mut self, id: NodeId, settings: &PartSettings) -> ViewerResult<()> {
        settings.apply(&mut self.tree, id)?;
        self.status.push("Dialog accepted");
        self.update_render();
        Ok(())
    }

    pub fn set_background(&mut self, color: Rgb) {
        self.config.background = color;
        self.renderer.set_background(color);
        self.update_render();
    }

    /// Snapshot the tree into the VR worker and start it
    pub fn start_vr(&mut self) -> ViewerResult<()> {
        if self.vr.is_running() {
            self.status.push("VR is already running");
            return Err(ViewerError::WorkerState("VR is already running".into()));
        }
        self.vr.remove_all_actors()?;
        for actor in build_snapshot(&self.tree) {
            self.vr.add_actor_offline(actor)?;
        }
        self.vr.start()?;
        self.pump_vr_events();
        Ok(())
    }

    /// Issue END_RENDER and wait for the render thread to exit
    pub fn stop_vr(&mut self) -> ViewerResult<()> {
        self.vr.stop()?;
        self.pump_vr_events();
        Ok(())
    }

    /// Block until the render loop ends on its own, e.g. when the headset
    /// session closes; no END_RENDER is sent
    pub fn wait_vr(&mut self) -> ViewerResult<()> {
        self.vr.wait()?;
        self.pump_vr_events();
        Ok(())
    }

    /// Reflect the current tree in VR through a full stop/rebuild/start cycle
    pub fn resync_vr(&mut self) -> ViewerResult<usize> {
        let tree = &self.tree;
        let count = self.vr.resync(|| build_snapshot(tree))?;
        self.pump_vr_events();
        Ok(count)
    }

    pub fn vr_command(&mut self, command: VrCommand) -> ViewerResult<()> {
        self.vr.issue_command(command)
    }

    /// Move worker notifications into the status log
    pub fn pump_vr_events(&mut self) -> Vec<VrEvent> {
        let events = self.vr.events();
        for event in &events {
            let text = match event {
                VrEvent::Started { actors } => format!("VR started with {} actor(s)", actors),
                VrEvent::RebuildRequested => "VR rebuild requested".to_string(),
                VrEvent::RebuildComplete { actors } => {
                    format!("VR rebuild complete: {} actor(s)", actors)
                }
                VrEvent::FrameFailed(reason) => format!("VR frame failed: {}", reason),
                VrEvent::Stopped { frames } => format!("VR stopped after {} frame(s)", frames),
            };
            self.status.push(text);
        }
        events
    }
}
