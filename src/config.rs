use std::f32::consts::PI;

use glam::Vec3;

use crate::assets::{ColorSpace, TextureSlot};
use crate::geometry::text::TextGeometryOptions;

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub window_title: String,
    pub assets: AssetPaths,
    pub camera: CameraConfig,
    pub population: PopulationConfig,
    pub text: String,
    pub text_options: TextGeometryOptions,
    pub max_pixel_ratio: f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window_title: "Happy New Year".to_string(),
            assets: AssetPaths::default(),
            camera: CameraConfig::default(),
            population: PopulationConfig::default(),
            text: "Happy New Year".to_string(),
            text_options: TextGeometryOptions::default(),
            max_pixel_ratio: 2.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextureSource {
    pub slot: TextureSlot,
    pub path: String,
    pub color_space: ColorSpace,
}

#[derive(Debug, Clone)]
pub struct AssetPaths {
    pub textures: Vec<TextureSource>,
    pub font: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        const DIR: &str = "assets/textures/ChristmasTreeOrnament";

        let texture = |slot, file: &'static str, color_space| TextureSource {
            slot,
            path: format!("{DIR}/{file}"),
            color_space,
        };

        Self {
            textures: vec![
                texture(
                    TextureSlot::Color,
                    "ChristmasTreeOrnament_Color.png",
                    ColorSpace::Srgb,
                ),
                texture(
                    TextureSlot::Displacement,
                    "ChristmasTreeOrnament_Displacement.png",
                    ColorSpace::Linear,
                ),
                texture(
                    TextureSlot::Normal,
                    "ChristmasTreeOrnament_NormalGL.png",
                    ColorSpace::Linear,
                ),
                texture(
                    TextureSlot::Roughness,
                    "ChristmasTreeOrnament_Roughness.png",
                    ColorSpace::Linear,
                ),
                texture(
                    TextureSlot::Metalness,
                    "ChristmasTreeOrnament_Metalness.png",
                    ColorSpace::Linear,
                ),
            ],
            font: "assets/fonts/poly.json".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub position: Vec3,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.5, 0.5, 2.0),
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PopulationConfig {
    pub torus_count: usize,
    pub sphere_count: usize,
    pub cube_count: usize,
    /// Edge length of the cube the primitives are scattered in, centered on the origin.
    pub spread: f32,
    pub max_rotation: f32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            torus_count: 75,
            sphere_count: 300,
            cube_count: 75,
            spread: 15.0,
            max_rotation: PI,
        }
    }
}

impl PopulationConfig {
    pub fn total(&self) -> usize {
        self.torus_count + self.sphere_count + self.cube_count
    }
}
