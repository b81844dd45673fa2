use anyhow::Result;

mod assets;
mod camera;
mod clock;
mod config;
mod controls;
mod debug_panel;
mod demo;
mod engine;
mod geometry;
mod math;
mod populate;
mod rendering;
mod scene_graph;
mod viewport;
mod window;

fn main() -> Result<()> {
    pretty_env_logger::init();

    pollster::block_on(window::run())?;

    Ok(())
}
