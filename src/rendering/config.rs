#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Recompile shaders when files under the shader folder change.
    pub watch_shaders: bool,
    pub clear_color: wgpu::Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            watch_shaders: cfg!(debug_assertions),
            clear_color: wgpu::Color::BLACK,
        }
    }
}
