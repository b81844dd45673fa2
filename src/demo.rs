use glam::Vec3;
use rand::Rng;

use crate::{
    assets::{AssetLoader, Font, LoadEvent, TextureLibrary},
    camera::PerspectiveCamera,
    clock::Clock,
    config::DemoConfig,
    controls::OrbitControls,
    populate::{self, Population},
    scene_graph::{AmbientLight, Object3D, ObjectId, ObjectKind, PointLight, Scene, Transform},
    viewport::Viewport,
};

pub struct DemoState {
    pub config: DemoConfig,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub viewport: Viewport,
    pub clock: Clock,
    pub scene: Scene,
    pub textures: TextureLibrary,
    /// `None` until the font load completes; the scene stays unpopulated until then.
    pub font: Option<Font>,
    pub population: Option<Population>,
    loader: AssetLoader,
    camera_node: ObjectId,
}

impl DemoState {
    pub fn new(config: DemoConfig) -> Self {
        let mut scene = Scene::new();

        scene.add_object(Object3D::new(
            "Ambient light",
            Transform::from_translation(Vec3::ZERO),
            ObjectKind::AmbientLight(AmbientLight {
                color: Vec3::ONE,
                intensity: 1.0,
            }),
        ));
        scene.add_object(Object3D::new(
            "Point light",
            Transform::from_translation(Vec3::new(4.0, 0.0, 0.0)),
            ObjectKind::PointLight(PointLight::new(Vec3::ONE, 30.0)),
        ));

        let camera = PerspectiveCamera::new(&config.camera, 1.0);
        let camera_node = scene.add_object(Object3D::new(
            "Camera",
            Transform::from_translation(camera.position),
            ObjectKind::Camera,
        ));

        let loader = AssetLoader::new();
        for texture in &config.assets.textures {
            loader.load_texture(texture.slot, &texture.path, texture.color_space);
        }
        loader.load_font(&config.assets.font);

        Self {
            viewport: Viewport::new(config.max_pixel_ratio),
            camera,
            controls: OrbitControls::damped(),
            clock: Clock::start(),
            scene,
            textures: TextureLibrary::new(),
            font: None,
            population: None,
            loader,
            camera_node,
            config,
        }
    }

    /// Applies whatever asset loads finished since the last frame.
    pub fn process_loads(&mut self) {
        for event in self.loader.poll() {
            match event {
                LoadEvent::Texture(texture) => self.textures.insert(texture),
                LoadEvent::Font(font) => self.on_font_loaded(font, &mut rand::thread_rng()),
            }
        }
    }

    pub fn on_font_loaded<R: Rng + ?Sized>(&mut self, font: Font, rng: &mut R) {
        if self.font.is_some() {
            log::warn!("Ignoring second font load, the scene is already populated");
            return;
        }

        let population = populate::populate(&mut self.scene, &font, &self.config, rng);
        self.population = Some(population);
        self.font = Some(font);
    }

    pub fn pending_loads(&self) -> usize {
        self.loader.in_flight()
    }

    /// Per-frame simulation step, returns whether the camera moved.
    pub fn update_controls(&mut self) -> bool {
        let moved = self.controls.update(&mut self.camera);

        if moved {
            if let Some(node) = self.scene.get_object_mut(self.camera_node) {
                node.transform.set_translation(self.camera.position);
            }
        }
        self.scene.late_update();

        moved
    }
}
