//! The chopping axe.
//!
//! Handle and head are separate nodes in the model. They are moved into an
//! `AxeGroup` node placed where the handle was, so that a single transform
//! swings both.

use cgmath::Vector3;

use crate::data_structures::scene_graph::SceneNode;

pub const AXE_GROUP: &str = "AxeGroup";
pub const AXE_HANDLE: &str = "AxeHandle";
pub const AXE_HEAD: &str = "AxeHead";

/// Position of the head relative to the handle inside the group.
pub const HEAD_OFFSET: [f32; 3] = [-0.02, -0.08, 0.0];

/// Height and z rotation (radians) of the axe group after `elapsed` seconds.
pub fn axe_pose(elapsed: f32) -> (f32, f32) {
    let swing = (elapsed * 1.5).sin().abs();
    (swing * 0.6 + 0.38, -swing)
}

/// Move handle and head below a new `AxeGroup` node. Returns `false` and
/// leaves the tree untouched when either node is missing.
pub fn build_axe_group(root: &mut SceneNode) -> bool {
    if root.find(AXE_HANDLE).is_none() || root.find(AXE_HEAD).is_none() {
        log::warn!("{AXE_HANDLE} or {AXE_HEAD} is missing, the axe stays still");
        return false;
    }
    let (Some(mut handle), Some(mut head)) = (root.take_child(AXE_HANDLE), root.take_child(AXE_HEAD))
    else {
        return false;
    };

    let mut group = SceneNode::new(AXE_GROUP);
    group.local.translation = handle.local.translation;

    handle.local.translation = Vector3::new(0.0, 0.0, 0.0);
    head.local.translation = HEAD_OFFSET.into();
    group.add_child(handle);
    group.add_child(head);
    root.add_child(group);
    root.update_world_transform_all();
    true
}

/// Swing the axe group, if the scene has one.
pub fn animate_axe(root: &mut SceneNode, elapsed: f32) {
    if let Some(group) = root.find_mut(AXE_GROUP) {
        let (y, rotation_z) = axe_pose(elapsed);
        group.local.translation.y = y;
        group.local.set_rotation_z(rotation_z);
    }
}
