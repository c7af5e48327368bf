use std::f32::consts::FRAC_PI_3;

use cgmath::{InnerSpace, Vector3};
use portal_scene::{
    data_structures::{transform::Transform, model::MaterialKind, scene_graph::SceneNode},
    resources::scene::{DRACO_EXTENSION, check_extensions},
    scene::{
        axe::{AXE_GROUP, AXE_HANDLE, AXE_HEAD, HEAD_OFFSET, animate_axe, axe_pose, build_axe_group},
        portal::{MATERIAL_ASSIGNMENTS, assign_materials},
    },
};

fn node_at(name: &str, position: [f32; 3]) -> SceneNode {
    let mut node = SceneNode::new(name);
    node.local.translation = position.into();
    node
}

/// Root with the axe parts nested below an unrelated node, as exported scenes often are.
fn portal_like_scene() -> SceneNode {
    let mut root = SceneNode::new("PortalScene.glb");
    root.add_child(node_at("baked", [0.0; 3]));
    let mut stump = node_at("Stump", [1.0, 0.0, 0.0]);
    stump.add_child(node_at(AXE_HANDLE, [0.5, 0.2, -0.3]));
    root.add_child(stump);
    root.add_child(node_at(AXE_HEAD, [1.4, 0.1, -0.3]));
    root.update_world_transform_all();
    root
}

fn assert_vec_close(a: Vector3<f32>, b: Vector3<f32>) {
    assert!((a - b).magnitude() < 1e-5, "{a:?} != {b:?}");
}

#[test]
fn should_compose_world_transforms_down_the_tree() {
    let root = portal_like_scene();
    let handle = root.find(AXE_HANDLE).expect("handle exists");
    assert_vec_close(handle.world_transform().translation, Vector3::new(1.5, 0.2, -0.3));

    let mut parent = Transform::identity();
    parent.scale = Vector3::new(2.0, 2.0, 2.0);
    parent.translation = Vector3::new(0.0, 1.0, 0.0);
    let child = Transform::from_translation(Vector3::new(1.0, 0.0, 0.0));
    assert_vec_close((&parent * &child).translation, Vector3::new(2.0, 1.0, 0.0));
}

#[test]
fn should_find_and_take_nested_nodes() {
    let mut root = portal_like_scene();
    assert_eq!(root.node_count(), 5);
    assert!(root.find("missing").is_none());

    let handle = root.take_child(AXE_HANDLE).expect("handle exists");
    assert_eq!(handle.name, AXE_HANDLE);
    assert!(root.find(AXE_HANDLE).is_none());
    assert_eq!(root.node_count(), 4);
}

#[test]
fn should_group_the_axe_where_the_handle_was() {
    let mut root = portal_like_scene();
    assert!(build_axe_group(&mut root));

    let group = root.find(AXE_GROUP).expect("group was added");
    // The handle's local position is kept, not its world position
    assert_vec_close(group.local.translation, Vector3::new(0.5, 0.2, -0.3));
    let names: Vec<&str> = group.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, [AXE_HANDLE, AXE_HEAD]);

    let handle = group.find(AXE_HANDLE).expect("handle moved");
    let head = group.find(AXE_HEAD).expect("head moved");
    assert_vec_close(handle.local.translation, Vector3::new(0.0, 0.0, 0.0));
    assert_vec_close(head.local.translation, HEAD_OFFSET.into());
    assert_vec_close(
        head.world_transform().translation,
        Vector3::new(0.5 - 0.02, 0.2 - 0.08, -0.3),
    );
    assert_eq!(root.node_count(), 6);
}

#[test]
fn should_leave_the_scene_alone_without_an_axe() {
    let mut root = SceneNode::new("root");
    root.add_child(node_at(AXE_HANDLE, [1.0, 0.0, 0.0]));
    assert!(!build_axe_group(&mut root));
    assert_eq!(root.names(), ["root", AXE_HANDLE]);

    // Animating a scene without a group is a no-op
    animate_axe(&mut root, 1.0);
    assert_vec_close(
        root.find(AXE_HANDLE).expect("handle stays").local.translation,
        Vector3::new(1.0, 0.0, 0.0),
    );
}

#[test]
fn should_chop_between_rest_and_full_swing() {
    let (y, rotation) = axe_pose(0.0);
    assert!((y - 0.38).abs() < 1e-6);
    assert_eq!(rotation, 0.0);

    // sin(1.5 * t) peaks at t = π/3
    let (y, rotation) = axe_pose(FRAC_PI_3);
    assert!((y - 0.98).abs() < 1e-5);
    assert!((rotation + 1.0).abs() < 1e-5);

    for step in 0..200 {
        let (y, rotation) = axe_pose(step as f32 * 0.05);
        assert!((0.38..=0.98 + 1e-6).contains(&y));
        assert!((-1.0 - 1e-6..=0.0).contains(&rotation));
    }
}

#[test]
fn should_animate_the_axe_group() {
    let mut root = portal_like_scene();
    build_axe_group(&mut root);
    animate_axe(&mut root, FRAC_PI_3);
    root.update_world_transform_all();

    let group = root.find(AXE_GROUP).expect("group exists");
    assert!((group.local.translation.y - 0.98).abs() < 1e-5);
    // x and z keep the handle's original placement
    assert!((group.local.translation.x - 0.5).abs() < 1e-6);
    assert!((group.local.translation.z + 0.3).abs() < 1e-6);
}

#[test]
fn should_skip_materials_for_nodes_without_geometry() {
    let mut root = portal_like_scene();
    assert_eq!(assign_materials(&mut root), 0);
    assert_eq!(root.node_count(), 5);
    assert!(!root.assign_material("baked", MaterialKind::Portal));
}

#[test]
fn should_name_a_material_for_every_scene_object() {
    for (name, kind) in MATERIAL_ASSIGNMENTS {
        assert_eq!(MaterialKind::for_node(name), Some(kind));
    }
    assert_eq!(MaterialKind::for_node("Stump"), None);
}

#[test]
fn should_reject_draco_compressed_scenes() {
    assert!(check_extensions(["KHR_materials_unlit", "KHR_texture_transform"]).is_ok());
    assert!(check_extensions(Vec::<&str>::new()).is_ok());
    let err = check_extensions(["KHR_materials_unlit", DRACO_EXTENSION]).expect_err("draco");
    assert!(err.to_string().contains(DRACO_EXTENSION));
}
