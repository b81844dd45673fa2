use std::{collections::HashMap, sync::Arc};

use anyhow::Context;
use wgpu::CommandEncoderDescriptor;
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    camera::PerspectiveCamera,
    rendering::{
        config::RenderConfig,
        imgui_renderer::ImguiRendererState,
        instance::InstanceData,
        normal_pass::{NormalPass, NormalPassTextureViews},
        render_camera::RenderCamera,
        render_common::RenderCommon,
        render_model::RenderModel,
        shader_loader::{PipelineCacheBuilder, ShaderLoader},
        texture::DepthTexture,
    },
    scene_graph::{GeometryId, ObjectKind, Scene},
};

pub struct Renderer {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,

    common: Arc<RenderCommon>,
    depth_texture: DepthTexture,
    render_models: HashMap<GeometryId, RenderModel>,
    // Scene revision the render models were last gathered at.
    scene_revision: Option<u64>,

    camera: RenderCamera,

    shader_loader: ShaderLoader,
    normal_pass: NormalPass,
    imgui: ImguiRendererState,

    config: RenderConfig,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        size: PhysicalSize<u32>,
        config: &RenderConfig,
        camera: &PerspectiveCamera,
        imgui_context: &mut imgui::Context,
    ) -> anyhow::Result<Renderer> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No compatible graphics adapter")?;

        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to create device")?;

        let camera = RenderCamera::new(&device, camera);

        let common = RenderCommon::new(
            &device,
            &adapter,
            &surface,
            size,
            camera.uniform_buffer.clone(),
        )?;
        let common = Arc::new(common);

        let depth_texture = DepthTexture::new(&device, size, "Depth texture");

        let mut cache_builder = PipelineCacheBuilder::new();
        let normal_pass = NormalPass::create(&device, common.clone(), &mut cache_builder);
        let shader_loader = ShaderLoader::new(&device, cache_builder, config.watch_shaders)?;

        let imgui =
            ImguiRendererState::new(&device, &queue, common.surface_format(), imgui_context);

        Ok(Self {
            window,
            size,
            surface,
            device,
            queue,
            common,
            depth_texture,
            render_models: HashMap::new(),
            scene_revision: None,
            camera,
            shader_loader,
            normal_pass,
            imgui,
            config: config.clone(),
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.size = new_size;
        self.depth_texture.resize(&self.device, new_size);

        let mut config = match self.common.output_surface_config.write() {
            Ok(config) => config,
            Err(poisoned) => poisoned.into_inner(),
        };
        config.width = new_size.width;
        config.height = new_size.height;
        self.surface.configure(&self.device, &config);
    }

    /// Uploads geometries added since the last call and regathers the mesh
    /// instances. Does nothing while the scene revision is unchanged.
    pub fn sync_scene(&mut self, scene: &Scene) {
        if self.scene_revision == Some(scene.revision()) {
            return;
        }

        for (id, geometry) in scene.geometries.iter() {
            if !self.render_models.contains_key(&id) {
                log::debug!(
                    "Uploading geometry {} with {} triangles",
                    geometry.name,
                    geometry.triangle_count()
                );
                self.render_models
                    .insert(id, RenderModel::from_geometry(&self.device, geometry));
            }
        }

        for model in self.render_models.values_mut() {
            model.clear_instances();
        }

        for (_, object) in scene.objects.iter() {
            let ObjectKind::Mesh { geometry, .. } = object.kind else {
                continue;
            };

            if let Some(model) = self.render_models.get_mut(&geometry) {
                model.push_instance(InstanceData::from_transform(&object.transform));
            }
        }

        for model in self.render_models.values_mut() {
            model.upload_instances(&self.device, &self.queue);
        }

        self.scene_revision = Some(scene.revision());
    }

    pub fn render(
        &mut self,
        camera: &PerspectiveCamera,
        imgui_context: &mut imgui::Context,
    ) -> Result<(), wgpu::SurfaceError> {
        self.shader_loader.load_pending_shaders();
        self.camera.update(&self.queue, camera);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render encoder"),
            });

        self.normal_pass.render(
            &NormalPassTextureViews {
                color: &view,
                depth: self.depth_texture.view(),
            },
            &mut encoder,
            &self.shader_loader.cache,
            self.config.clear_color,
            self.render_models.values(),
        );

        if let Err(e) =
            self.imgui
                .render(&view, imgui_context, &self.device, &self.queue, &mut encoder)
        {
            log::error!("{:#}", e);
        }

        self.queue.submit([encoder.finish()]);
        output.present();

        Ok(())
    }
}
