use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::math::bounds::AABB;

pub mod primitives;
pub mod shape;
pub mod text;
pub mod triangulate;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Indexed triangle list with counter-clockwise front faces.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn bounding_box(&self) -> Option<AABB> {
        AABB::from_points(self.vertices.iter().map(|vertex| vertex.position))
    }

    /// Moves every vertex so that the bounding box is centered on the origin.
    pub fn center(&mut self) {
        let Some(bounds) = self.bounding_box() else {
            return;
        };

        let offset = bounds.center();
        for vertex in &mut self.vertices {
            vertex.position -= offset;
        }
    }
}
