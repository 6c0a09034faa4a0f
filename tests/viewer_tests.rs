use anyhow::anyhow;
use glam::Vec3;
use part_viewer::geometry::TriangleMesh;
use part_viewer::loaders::{load_gltf_mesh, GltfLoader};
use part_viewer::math::Rgb;
use part_viewer::part::{PartOutline, PartSettings};
use part_viewer::render::HeadlessRenderer;
use part_viewer::traits::GeometryLoader;
use part_viewer::vr::{HeadlessVrDisplay, VrCommand, VrFrameLog};
use part_viewer::{Viewer, ViewerConfig, ViewerError, ViewerResult};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Serves a fixed triangle for `.stl` paths and fails everything else
struct StubLoader;

impl GeometryLoader for StubLoader {
    fn load(&self, path: &Path) -> ViewerResult<TriangleMesh> {
        if path.extension().map_or(false, |ext| ext == "stl") {
            Ok(TriangleMesh::new(
                vec![Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
                vec![[0, 1, 2]],
            )
            .unwrap())
        } else {
            Err(ViewerError::load(path, &anyhow!("unsupported file")))
        }
    }
}

type TestViewer = Viewer<HeadlessRenderer, HeadlessVrDisplay>;

fn viewer() -> TestViewer {
    Viewer::new(
        ViewerConfig::default(),
        HeadlessRenderer::new(),
        HeadlessVrDisplay::new(),
        Box::new(StubLoader),
    )
    .unwrap()
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

// ============================================================================
// Startup
// ============================================================================

#[test]
fn test_default_tree_has_top_level_parts() {
    let viewer = viewer();
    let tree = viewer.tree();

    assert_eq!(tree.child_count(tree.root()), 3);
    for row in 0..3 {
        let id = viewer.top_level(row).unwrap();
        let node = tree.node(id).unwrap();
        assert_eq!(node.name(), format!("TopLevel {}", row));
        assert!(node.is_top_level());
        assert_eq!(node.color(), Rgb::SENTINEL);
    }
    assert!(viewer.top_level(3).is_none());
    assert_eq!(viewer.renderer().background(), Rgb::WHITE);
    assert_eq!(viewer.primary().sync_count(), 1);
}

#[test]
fn test_config_shapes_the_viewer() {
    let config = ViewerConfig {
        top_level_parts: 1,
        background: Rgb::new(0, 0, 0),
        default_part_color: Rgb::new(0, 0, 255),
        ..ViewerConfig::default()
    };
    let viewer = Viewer::new(
        config,
        HeadlessRenderer::new(),
        HeadlessVrDisplay::new(),
        Box::new(StubLoader),
    )
    .unwrap();

    assert_eq!(viewer.tree().child_count(viewer.tree().root()), 1);
    assert_eq!(viewer.renderer().background(), Rgb::new(0, 0, 0));
    let top = viewer.top_level(0).unwrap();
    assert_eq!(viewer.tree().node(top).unwrap().color(), Rgb::new(0, 0, 255));
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_failed_load_keeps_container_and_batch_continues() {
    let mut viewer = viewer();
    let top = viewer.top_level(0).unwrap();
    let syncs = viewer.primary().sync_count();

    let outcomes = viewer
        .load_files(top, &["bracket.stl", "broken.obj", "housing.stl"])
        .unwrap();

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].result.as_ref().ok(), Some(&1));
    assert!(matches!(outcomes[1].result, Err(ViewerError::Load { .. })));
    assert!(outcomes[2].result.is_ok());

    let tree = viewer.tree();
    assert_eq!(tree.child_count(top), 3);
    let failed = tree.node(outcomes[1].node).unwrap();
    assert!(!failed.has_geometry());
    assert!(failed.is_visible());

    // one sync for the whole batch
    assert_eq!(viewer.primary().sync_count(), syncs + 1);
    assert!(viewer.renderer().contains(outcomes[1].node));
    assert_eq!(viewer.renderer().triangle_count(), 2);
    assert!(viewer.status().contains("unsupported file"));
}

#[test]
fn test_loaded_child_inherits_parent_visibility() {
    let mut viewer = viewer();
    let top = viewer.top_level(1).unwrap();
    viewer.set_visible(top, false).unwrap();

    let outcome = viewer.load_file(top, "bracket.stl").unwrap();
    assert!(!viewer.tree().node(outcome.node).unwrap().is_visible());
    assert!(!viewer.renderer().contains(outcome.node));
}

#[test]
fn test_gltf_fixture_loads() {
    let mesh = load_gltf_mesh(fixture("square.gltf")).unwrap();
    assert_eq!(mesh.triangle_count(), 2);
    assert_eq!(mesh.points.len(), 4);

    let bounds = mesh.bounds().unwrap();
    assert_eq!(bounds.min, Vec3::new(-2.0, 0.0, 0.0));
    assert_eq!(bounds.max, Vec3::new(-1.0, 1.0, 0.0));
}

#[test]
fn test_gltf_loader_reports_missing_file() {
    let err = GltfLoader.load(Path::new("/no/such/part.gltf")).unwrap_err();
    match err {
        ViewerError::Load { path, reason } => {
            assert_eq!(path, PathBuf::from("/no/such/part.gltf"));
            assert!(reason.contains("Failed to load glTF file"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_viewer_with_gltf_loader() {
    let mut viewer = Viewer::new(
        ViewerConfig::default(),
        HeadlessRenderer::new(),
        HeadlessVrDisplay::new(),
        Box::new(GltfLoader),
    )
    .unwrap();
    let top = viewer.top_level(0).unwrap();

    let outcome = viewer.load_file(top, fixture("square.gltf")).unwrap();
    assert_eq!(outcome.result.unwrap(), 2);
    assert_eq!(viewer.renderer().triangle_count(), 2);
    assert!(viewer.renderer().camera_bounds().is_some());
}

// ============================================================================
// Editing
// ============================================================================

#[test]
fn test_edit_scenarios() {
    let mut viewer = viewer();
    let top = viewer.top_level(0).unwrap();
    let part = viewer.load_file(top, "bracket.stl").unwrap().node;

    // position reset
    let original = viewer.tree().node(part).unwrap().original_position().unwrap();
    viewer.set_position(part, Vec3::new(3.0, 3.0, 3.0)).unwrap();
    assert_eq!(viewer.renderer().actor(part).unwrap().position, Vec3::new(3.0, 3.0, 3.0));
    assert!(viewer.reset_position(part).unwrap());
    assert_eq!(viewer.renderer().actor(part).unwrap().position, original);

    // containers have nothing to reset to
    assert!(!viewer.reset_position(top).unwrap());
    assert!(viewer.status().contains("no original position"));

    // colour cascade shows up on screen
    let teal = Rgb::new(0, 128, 128);
    viewer.set_color(top, teal).unwrap();
    assert_eq!(viewer.renderer().actor(part).unwrap().property.color, teal);

    // hide and show
    viewer.set_visible(top, false).unwrap();
    assert!(!viewer.renderer().contains(part));
    viewer.set_visible(top, true).unwrap();
    assert_eq!(viewer.renderer().actor(part).unwrap().property.color, teal);

    // filters
    viewer.set_clip(top, true).unwrap();
    assert!(viewer.tree().node(part).unwrap().clip_enabled());
    let clipped = viewer.renderer().camera_bounds().unwrap();
    assert!(clipped.max.x <= 1e-5);
}

#[test]
fn test_settings_dialog_and_select() {
    let mut viewer = viewer();
    let top = viewer.top_level(2).unwrap();

    viewer.select(top).unwrap();
    assert!(viewer.status().contains("The selected item is: TopLevel 2"));

    let mut settings = PartSettings::load(viewer.tree(), top).unwrap();
    settings.name = "Frame".to_string();
    viewer.apply_settings(top, &settings).unwrap();
    assert_eq!(viewer.tree().node(top).unwrap().name(), "Frame");
    assert!(viewer.status().contains("Dialog accepted"));
}

#[test]
fn test_remove_part_updates_view() {
    let mut viewer = viewer();
    let top = viewer.top_level(0).unwrap();
    let part = viewer.load_file(top, "bracket.stl").unwrap().node;

    assert_eq!(viewer.remove_part(top).unwrap(), 2);
    assert!(!viewer.renderer().contains(part));
    assert_eq!(viewer.tree().child_count(viewer.tree().root()), 2);
    assert!(viewer.remove_part(viewer.tree().root()).is_err());
}

#[test]
fn test_outline_serializes() {
    let mut viewer = viewer();
    let top = viewer.top_level(0).unwrap();
    viewer.load_file(top, "bracket.stl").unwrap();

    let outline = PartOutline::build(viewer.tree(), viewer.tree().root()).unwrap();
    let json = serde_json::to_value(&outline).unwrap();
    assert_eq!(json["children"].as_array().unwrap().len(), 3);
    assert_eq!(json["children"][0]["name"], "TopLevel 0");
    assert_eq!(json["children"][0]["children"][0]["triangles"], 1);
}

// ============================================================================
// VR
// ============================================================================

#[test]
fn test_vr_mirrors_tree_only_after_resync() {
    let mut viewer = viewer();
    let top = viewer.top_level(0).unwrap();
    viewer.load_files(top, &["a.stl", "b.stl"]).unwrap();

    viewer.start_vr().unwrap();
    assert!(viewer.start_vr().is_err());
    assert!(viewer.status().contains("VR is already running"));

    let c = viewer.load_file(top, "c.stl").unwrap().node;
    assert!(viewer.renderer().contains(c));

    assert_eq!(viewer.resync_vr().unwrap(), 3);
    viewer.vr_command(VrCommand::SetRotationSpeed(45.0)).unwrap();
    viewer.stop_vr().unwrap();

    assert_eq!(viewer.vr().actors().unwrap().len(), 3);
    assert!(viewer.status().contains("VR rebuild complete: 3 actor(s)"));
    assert!(viewer.status().contains("VR stopped"));
    assert!(viewer.vr_command(VrCommand::EndRender).is_err());
}

fn frame_limited_viewer(frames: u64) -> (TestViewer, Arc<Mutex<VrFrameLog>>) {
    let display = HeadlessVrDisplay::with_frame_limit(frames);
    let log = display.log_handle();
    let viewer = Viewer::new(
        ViewerConfig::default(),
        HeadlessRenderer::new(),
        display,
        Box::new(StubLoader),
    )
    .unwrap();
    (viewer, log)
}

#[test]
fn test_vr_session_runs_out_its_frame_budget() {
    let (mut viewer, log) = frame_limited_viewer(5);
    let top = viewer.top_level(0).unwrap();
    viewer.load_file(top, "bracket.stl").unwrap();

    assert_eq!(viewer.resync_vr().unwrap(), 1);
    viewer.wait_vr().unwrap();

    let log = log.lock().unwrap().clone();
    assert_eq!(log.frames, 5);
    assert_eq!(log.last_actor_count, 1);
    assert!(!viewer.vr().is_running());
    assert!(viewer.status().contains("VR stopped after 5 frame(s)"));
}

#[test]
fn test_vr_restarts_after_display_closed() {
    let (mut viewer, log) = frame_limited_viewer(2);
    viewer.start_vr().unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while viewer.vr().is_running() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(2));
    }
    assert!(!viewer.vr().is_running(), "display never closed the session");

    viewer.start_vr().unwrap();
    assert!(!viewer.status().contains("VR is already running"));
    viewer.stop_vr().unwrap();
    assert_eq!(log.lock().unwrap().sessions, 2);
}
