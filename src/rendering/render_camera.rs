use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::camera::PerspectiveCamera;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable, Default)]
pub struct CameraUniform {
    view: Mat4,
    projection: Mat4,
    view_projection: Mat4,
}

impl CameraUniform {
    pub fn from_camera(camera: &PerspectiveCamera) -> Self {
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();

        Self {
            view,
            projection,
            view_projection: projection * view,
        }
    }
}

pub struct RenderCamera {
    pub uniform_buffer: wgpu::Buffer,
    uniform: CameraUniform,
}

impl RenderCamera {
    pub fn new(device: &wgpu::Device, camera: &PerspectiveCamera) -> Self {
        let uniform = CameraUniform::from_camera(camera);

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera uniform buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            uniform_buffer,
            uniform,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, camera: &PerspectiveCamera) {
        self.uniform = CameraUniform::from_camera(camera);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
