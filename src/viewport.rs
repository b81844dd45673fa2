use winit::dpi::PhysicalSize;

use crate::camera::PerspectiveCamera;

/// Window size in logical pixels and the pixel ratio the surface is rendered at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
    max_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(max_pixel_ratio: f64) -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            pixel_ratio: 1.0,
            max_pixel_ratio,
        }
    }

    /// Applies a new window size. The camera aspect follows the logical size and
    /// the pixel ratio is capped so high-density displays don't render at full
    /// resolution. Returns the drawing buffer size, or `None` for a zero-area window.
    pub fn resize(
        &mut self,
        camera: &mut PerspectiveCamera,
        width: f64,
        height: f64,
        device_pixel_ratio: f64,
    ) -> Option<PhysicalSize<u32>> {
        self.width = width;
        self.height = height;
        self.pixel_ratio = device_pixel_ratio.min(self.max_pixel_ratio);

        if width <= 0.0 || height <= 0.0 {
            return None;
        }

        camera.set_aspect((width / height) as f32);

        Some(self.drawing_buffer_size())
    }

    /// Same as `resize` but from the physical size winit reports.
    pub fn resize_physical(
        &mut self,
        camera: &mut PerspectiveCamera,
        physical: PhysicalSize<u32>,
        scale_factor: f64,
    ) -> Option<PhysicalSize<u32>> {
        let logical = physical.to_logical::<f64>(scale_factor);
        self.resize(camera, logical.width, logical.height, scale_factor)
    }

    pub fn drawing_buffer_size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(
            (self.width * self.pixel_ratio).round() as u32,
            (self.height * self.pixel_ratio).round() as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(&CameraConfig::default(), 1.0)
    }

    #[test]
    fn resize_sets_aspect_and_surface_size() {
        let mut camera = camera();
        let mut viewport = Viewport::new(2.0);

        let size = viewport.resize(&mut camera, 1280.0, 720.0, 1.0).unwrap();

        assert!((camera.aspect() - 1280.0 / 720.0).abs() < 1e-6);
        assert_eq!(size, PhysicalSize::new(1280, 720));
        assert_eq!(viewport.pixel_ratio, 1.0);
    }

    #[test]
    fn pixel_ratio_is_capped() {
        let mut camera = camera();
        let mut viewport = Viewport::new(2.0);

        let size = viewport.resize(&mut camera, 800.0, 600.0, 3.0).unwrap();
        assert_eq!(viewport.pixel_ratio, 2.0);
        assert_eq!(size, PhysicalSize::new(1600, 1200));

        let size = viewport.resize(&mut camera, 800.0, 600.0, 1.5).unwrap();
        assert_eq!(viewport.pixel_ratio, 1.5);
        assert_eq!(size, PhysicalSize::new(1200, 900));
    }

    #[test]
    fn resizing_twice_with_the_same_input_is_idempotent() {
        let mut camera = camera();
        let mut viewport = Viewport::new(2.0);

        let first = viewport.resize(&mut camera, 1024.0, 768.0, 2.5);
        let (viewport_once, projection_once) = (viewport, camera.projection_matrix());
        let second = viewport.resize(&mut camera, 1024.0, 768.0, 2.5);

        assert_eq!(first, second);
        assert_eq!(viewport, viewport_once);
        assert_eq!(camera.projection_matrix(), projection_once);
    }

    #[test]
    fn physical_sizes_are_converted_to_logical() {
        let mut camera = camera();
        let mut viewport = Viewport::new(2.0);

        let size = viewport
            .resize_physical(&mut camera, PhysicalSize::new(3000, 1500), 3.0)
            .unwrap();

        assert_eq!((viewport.width, viewport.height), (1000.0, 500.0));
        assert_eq!(size, PhysicalSize::new(2000, 1000));
        assert!((camera.aspect() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn zero_area_leaves_camera_alone() {
        let mut camera = camera();
        let mut viewport = Viewport::new(2.0);

        assert!(viewport.resize(&mut camera, 0.0, 600.0, 1.0).is_none());
        assert_eq!(camera.aspect(), 1.0);
    }
}
