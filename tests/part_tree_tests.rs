use glam::Vec3;
use part_viewer::geometry::TriangleMesh;
use part_viewer::math::Rgb;
use part_viewer::part::{PartSettings, HEADERS, NAME_COLUMN, VISIBLE_COLUMN};
use part_viewer::{PartTree, ViewerError};

fn triangle() -> TriangleMesh {
    TriangleMesh::new(
        vec![Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
        vec![[0, 1, 2]],
    )
    .unwrap()
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn test_single_top_level_child() {
    let mut tree = PartTree::default();
    let a = tree.add_child(tree.root(), "A", true).unwrap();

    assert_eq!(tree.child_count(tree.root()), 1);
    assert_eq!(tree.row(a), 0);
    assert_eq!(tree.parent_item(a), Some(tree.root()));
    assert_eq!(tree.parent_item(tree.root()), None);
}

#[test]
fn test_rows_follow_insertion_order() {
    let mut tree = PartTree::default();
    let root = tree.root();
    let ids: Vec<_> = (0..4)
        .map(|i| tree.add_child(root, format!("part {}", i), false).unwrap())
        .collect();

    for (row, id) in ids.iter().enumerate() {
        assert_eq!(tree.row(*id), row);
        assert_eq!(tree.child(root, row), Some(*id));
    }
}

#[test]
fn test_child_out_of_range_is_absent() {
    let mut tree = PartTree::default();
    let a = tree.add_child(tree.root(), "A", true).unwrap();

    assert_eq!(tree.child(a, 0), None);
    assert_eq!(tree.child(tree.root(), 1), None);
    assert_eq!(tree.child(tree.root(), usize::MAX), None);
}

#[test]
fn test_reparenting_is_rejected_without_mutation() {
    let mut tree = PartTree::default();
    let a = tree.add_child(tree.root(), "A", true).unwrap();
    let b = tree.add_child(tree.root(), "B", true).unwrap();
    let c = tree.add_child(a, "C", false).unwrap();

    let err = tree.append_child(b, c).unwrap_err();
    assert!(matches!(err, ViewerError::InvalidNode(_)));
    assert_eq!(tree.parent_item(c), Some(a));
    assert_eq!(tree.child_count(b), 0);
    assert_eq!(tree.child_count(a), 1);
}

#[test]
fn test_cycles_are_rejected() {
    let mut tree = PartTree::default();
    let a = tree.create_node("A", false);
    let b = tree.create_node("B", false);
    tree.append_child(a, b).unwrap();

    assert!(tree.append_child(b, a).is_err());
    assert!(tree.append_child(a, a).is_err());
    assert!(tree.append_child(b, tree.root()).is_err());
}

#[test]
fn test_remove_drops_whole_subtree() {
    let mut tree = PartTree::default();
    let a = tree.add_child(tree.root(), "A", true).unwrap();
    let b = tree.add_child(tree.root(), "B", true).unwrap();
    let a1 = tree.add_child(a, "A1", false).unwrap();
    let a2 = tree.add_child(a1, "A2", false).unwrap();

    assert_eq!(tree.remove(a).unwrap(), 3);
    assert!(tree.get(a).is_none());
    assert!(tree.get(a2).is_none());
    assert_eq!(tree.row(b), 0);
    assert_eq!(tree.len(), 2);

    // Ids are never reused
    let c = tree.add_child(tree.root(), "C", true).unwrap();
    assert_ne!(c, a);
    assert!(tree.remove(tree.root()).is_err());
}

// ============================================================================
// Cascade
// ============================================================================

#[test]
fn test_top_level_colour_cascades_recursively() {
    let mut tree = PartTree::default();
    let top = tree.add_child(tree.root(), "T", true).unwrap();
    let c1 = tree.add_child(top, "c1", false).unwrap();
    let c2 = tree.add_child(top, "c2", false).unwrap();
    let grandchild = tree.add_child(c1, "g", false).unwrap();

    let blue = Rgb::new(0, 0, 255);
    tree.set_color(top, blue).unwrap();
    for id in [top, c1, c2, grandchild] {
        assert_eq!(tree.node(id).unwrap().color(), blue);
    }

    let green = Rgb::new(0, 255, 0);
    tree.set_color(c1, green).unwrap();
    assert_eq!(tree.node(c1).unwrap().color(), green);
    assert_eq!(tree.node(top).unwrap().color(), blue);
    assert_eq!(tree.node(c2).unwrap().color(), blue);
    // non-top-level edits do not cascade
    assert_eq!(tree.node(grandchild).unwrap().color(), blue);
}

#[test]
fn test_unchanged_top_level_colour_does_not_overwrite_children() {
    let mut tree = PartTree::default();
    let top = tree.add_child(tree.root(), "T", true).unwrap();
    let child = tree.add_child(top, "c", false).unwrap();
    tree.set_color(child, Rgb::WHITE).unwrap();

    tree.set_color(top, Rgb::SENTINEL).unwrap();
    assert_eq!(tree.node(child).unwrap().color(), Rgb::WHITE);
}

#[test]
fn test_filter_flags_cascade_and_refilter() {
    let mut tree = PartTree::default();
    let top = tree.add_child(tree.root(), "T", true).unwrap();
    let child = tree.add_child(top, "c", false).unwrap();
    tree.load_geometry(child, triangle()).unwrap();
    let before = tree.node(child).unwrap().derived_geometry().cloned().unwrap();

    tree.set_shrink(top, true).unwrap();

    let node = tree.node(child).unwrap();
    assert!(node.shrink_enabled());
    assert!(!node.clip_enabled());
    assert_ne!(**node.derived_geometry().unwrap(), *before);
}

#[test]
fn test_visibility_does_not_cascade() {
    let mut tree = PartTree::default();
    let top = tree.add_child(tree.root(), "T", true).unwrap();
    let child = tree.add_child(top, "c", false).unwrap();

    tree.set_visible(top, false).unwrap();
    assert!(tree.node(child).unwrap().is_visible());
    assert_eq!(tree.visible_nodes(tree.root()), vec![tree.root()]);
}

// ============================================================================
// Geometry and position
// ============================================================================

#[test]
fn test_reset_restores_original_position() {
    let mut tree = PartTree::default();
    let a = tree.add_child(tree.root(), "A", true).unwrap();
    tree.set_position(a, Vec3::new(1.0, 2.0, 3.0)).unwrap();
    tree.load_geometry(a, triangle()).unwrap();

    let node = tree.node(a).unwrap();
    assert!(node.source_geometry().is_some());
    assert_eq!(node.original_position(), Some(Vec3::new(1.0, 2.0, 3.0)));

    tree.set_position(a, Vec3::new(-5.0, 0.5, 9.0)).unwrap();
    assert!(tree.reset_to_original_position(a).unwrap());
    assert_eq!(tree.node(a).unwrap().position(), Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_reset_without_geometry_is_noop() {
    let mut tree = PartTree::default();
    let a = tree.add_child(tree.root(), "A", true).unwrap();
    tree.set_position(a, Vec3::ONE).unwrap();

    assert!(!tree.reset_to_original_position(a).unwrap());
    assert_eq!(tree.node(a).unwrap().position(), Vec3::ONE);
}

#[test]
fn test_original_position_captured_once() {
    let mut tree = PartTree::default();
    let a = tree.add_child(tree.root(), "A", true).unwrap();
    tree.load_geometry(a, triangle()).unwrap();
    tree.set_position(a, Vec3::X).unwrap();
    tree.load_geometry(a, triangle()).unwrap();

    assert_eq!(tree.node(a).unwrap().original_position(), Some(Vec3::ZERO));
}

// ============================================================================
// Widget columns
// ============================================================================

#[test]
fn test_root_reports_headers() {
    let tree = PartTree::default();
    assert_eq!(tree.data(tree.root(), NAME_COLUMN).as_deref(), Some(HEADERS[0]));
    assert_eq!(tree.data(tree.root(), VISIBLE_COLUMN).as_deref(), Some(HEADERS[1]));
    assert_eq!(tree.data(tree.root(), 2), None);
}

#[test]
fn test_columns_read_and_write() {
    let mut tree = PartTree::default();
    let a = tree.add_child(tree.root(), "A", true).unwrap();

    assert_eq!(tree.data(a, NAME_COLUMN).as_deref(), Some("A"));
    assert_eq!(tree.data(a, VISIBLE_COLUMN).as_deref(), Some("true"));

    assert!(tree.set(a, NAME_COLUMN, "Bracket"));
    assert!(tree.set(a, VISIBLE_COLUMN, "false"));
    assert!(!tree.set(a, VISIBLE_COLUMN, "maybe"));
    assert!(!tree.set(a, 7, "x"));

    let node = tree.node(a).unwrap();
    assert_eq!(node.name(), "Bracket");
    assert!(!node.is_visible());
}

#[test]
fn test_settings_round_trip_through_dialog() {
    let mut tree = PartTree::default();
    let top = tree.add_child(tree.root(), "T", true).unwrap();
    let child = tree.add_child(top, "c", false).unwrap();

    let mut settings = PartSettings::load(&tree, top).unwrap();
    assert_eq!(settings.color, Rgb::SENTINEL);
    settings.name = "Housing".to_string();
    settings.color = Rgb::new(10, 20, 30);
    settings.visible = false;
    settings.apply(&mut tree, top).unwrap();

    let node = tree.node(top).unwrap();
    assert_eq!(node.name(), "Housing");
    assert!(!node.is_visible());
    assert_eq!(tree.node(child).unwrap().color(), Rgb::new(10, 20, 30));
}
