use glam::Vec3;
use id_arena::Id;

use crate::scene_graph::material::MaterialId;
use crate::scene_graph::scene::GeometryId;
use crate::scene_graph::transform::Transform;

pub type ObjectId = Id<Object3D>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: Vec3,
    pub intensity: f32,
    /// 0 means unlimited range.
    pub distance: f32,
    pub decay: f32,
}

impl PointLight {
    pub fn new(color: Vec3, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            distance: 0.0,
            decay: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObjectKind {
    Mesh {
        geometry: GeometryId,
        material: MaterialId,
    },
    AmbientLight(AmbientLight),
    PointLight(PointLight),
    Camera,
}

pub struct Object3D {
    pub name: String,
    pub transform: Transform,
    pub kind: ObjectKind,
}

impl Object3D {
    pub fn new(name: impl Into<String>, transform: Transform, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            transform,
            kind,
        }
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, ObjectKind::Mesh { .. })
    }

    pub fn is_light(&self) -> bool {
        matches!(
            self.kind,
            ObjectKind::AmbientLight(_) | ObjectKind::PointLight(_)
        )
    }
}
