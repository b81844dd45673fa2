use std::time::Duration;

use imgui::Condition;

use crate::{assets::TextureSlot, demo::DemoState};

const TEXTURE_SLOTS: [TextureSlot; 5] = [
    TextureSlot::Color,
    TextureSlot::Displacement,
    TextureSlot::Normal,
    TextureSlot::Roughness,
    TextureSlot::Metalness,
];

/// Exponentially smoothed frame time for the stats readout.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    smoothed_frame_time: Option<f32>,
    frames: u64,
}

impl FrameStats {
    const SMOOTHING: f32 = 0.1;

    pub fn record(&mut self, frame_time: Duration) {
        let seconds = frame_time.as_secs_f32();
        self.smoothed_frame_time = Some(match self.smoothed_frame_time {
            Some(previous) => previous + (seconds - previous) * Self::SMOOTHING,
            None => seconds,
        });
        self.frames += 1;
    }

    pub fn fps(&self) -> f32 {
        match self.smoothed_frame_time {
            Some(frame_time) if frame_time > 0.0 => 1.0 / frame_time,
            _ => 0.0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// The "Options" window. Starts collapsed and has no controls bound to the scene.
pub fn draw(ui: &imgui::Ui, stats: &FrameStats, demo: &DemoState) {
    ui.window("Options")
        .collapsed(true, Condition::FirstUseEver)
        .size([260.0, 220.0], Condition::FirstUseEver)
        .build(|| {
            ui.text(format!("{:.1} fps", stats.fps()));
            ui.text(format!("Frame {}", stats.frames()));
            ui.text(format!("Elapsed {:.1}s", demo.clock.elapsed_secs()));
            ui.separator();
            ui.text(format!("Meshes: {}", demo.scene.mesh_count()));
            ui.text(format!("Textures: {}/{}", demo.textures.len(), TEXTURE_SLOTS.len()));
            for slot in TEXTURE_SLOTS {
                if let Some(texture) = demo.textures.get(slot) {
                    let (width, height) = texture.dimensions();
                    ui.text(format!(
                        "  {:?}: {}x{} {:?}",
                        slot, width, height, texture.color_space
                    ));
                }
            }
            ui.text(format!("Pending loads: {}", demo.pending_loads()));
        });
}
