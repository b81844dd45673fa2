use glam::Vec3;
use id_arena::Id;

use crate::assets::TextureSlot;

pub type MaterialId = Id<Material>;

#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Colors each fragment by its view-space normal.
    Normal,
    Standard(StandardMaterial),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandardMaterial {
    pub color: Vec3,
    pub roughness: f32,
    pub metalness: f32,
    pub map: Option<TextureSlot>,
    pub roughness_map: Option<TextureSlot>,
    pub metalness_map: Option<TextureSlot>,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            roughness: 1.0,
            metalness: 0.0,
            map: None,
            roughness_map: None,
            metalness_map: None,
        }
    }
}
