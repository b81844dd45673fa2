pub mod config;
pub mod imgui_renderer;
pub mod instance;
pub mod normal_pass;
pub mod render_camera;
pub mod render_common;
pub mod render_model;
pub mod renderer;
pub mod shader_loader;
pub mod texture;
