//! Node transforms and the world matrix every scene mesh is drawn with.
//!
//! A [`Transform`] is translation, rotation and scale relative to the parent
//! node. `parent * child` composes them down the scene graph; the resulting
//! world transform is uploaded as a one-element [`TransformRaw`] instance.

use std::ops::Mul;

use cgmath::{Matrix4, One, Quaternion, Rad, Rotation3, Vector3};

use crate::data_structures::model::Vertex;

#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn from_translation(translation: Vector3<f32>) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    /// Replace the rotation by `radians` around the z axis.
    pub fn set_rotation_z(&mut self, radians: f32) {
        self.rotation = Quaternion::from_angle_z(Rad(radians));
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn to_raw(&self) -> TransformRaw {
        TransformRaw {
            model: self.matrix().into(),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// `parent * child`: the child's transform expressed in the parent's space.
///
/// Scale is applied per axis before rotating, which is exact as long as no
/// node combines non-uniform scale with a rotated child (true for the scene).
impl Mul<&Transform> for &Transform {
    type Output = Transform;

    fn mul(self, child: &Transform) -> Transform {
        let scaled = Vector3::new(
            self.scale.x * child.translation.x,
            self.scale.y * child.translation.y,
            self.scale.z * child.translation.z,
        );
        Transform {
            translation: self.translation + self.rotation * scaled,
            rotation: self.rotation * child.rotation,
            scale: Vector3::new(
                self.scale.x * child.scale.x,
                self.scale.y * child.scale.y,
                self.scale.z * child.scale.z,
            ),
        }
    }
}

impl From<gltf::scene::Transform> for Transform {
    fn from(transform: gltf::scene::Transform) -> Self {
        let (translation, [x, y, z, w], scale) = transform.decomposed();
        Self {
            translation: translation.into(),
            rotation: Quaternion::new(w, x, y, z),
            scale: scale.into(),
        }
    }
}

/// World matrix as stored in a mesh node's instance buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformRaw {
    pub model: [[f32; 4]; 4],
}

impl TransformRaw {
    /// One column per location, 5 to 8 in every mesh shader.
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
        8 => Float32x4,
    ];
}

impl Vertex for TransformRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TransformRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}
