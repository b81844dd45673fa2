use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc::{channel, Receiver, Sender},
        Arc,
    },
};

use anyhow::Context;

use crate::assets::{
    font::Font,
    texture::{ColorSpace, LoadedTexture, TextureSlot},
};

pub enum LoadEvent {
    Texture(LoadedTexture),
    Font(Font),
}

// Reads and decodes assets on the rayon pool. Results are picked up on the
// main thread with `poll`, failed loads are logged and never produce an event.
pub struct AssetLoader {
    sender: Sender<LoadEvent>,
    receiver: Receiver<LoadEvent>,
    in_flight: Arc<AtomicUsize>,
}

impl AssetLoader {
    pub fn new() -> Self {
        let (sender, receiver) = channel();

        Self {
            sender,
            receiver,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn load_texture(&self, slot: TextureSlot, path: impl AsRef<Path>, color_space: ColorSpace) {
        let path = path.as_ref().to_path_buf();

        self.spawn(path, move |path| {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read texture {}", path.display()))?;
            let texture = LoadedTexture::decode(slot, color_space, &bytes)?;
            log::info!(
                "Loaded {:?} texture {} ({}x{})",
                slot,
                path.display(),
                texture.image.width(),
                texture.image.height()
            );
            Ok(LoadEvent::Texture(texture))
        });
    }

    pub fn load_font(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();

        self.spawn(path, |path| {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read font {}", path.display()))?;
            let font = Font::from_typeface_json(&source)?;
            log::info!(
                "Loaded font {} ({} glyphs) from {}",
                font.family_name,
                font.glyph_count(),
                path.display()
            );
            Ok(LoadEvent::Font(font))
        });
    }

    /// Completed loads since the last call, in completion order.
    pub fn poll(&self) -> Vec<LoadEvent> {
        self.receiver.try_iter().collect()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    fn spawn<F>(&self, path: PathBuf, load: F)
    where
        F: FnOnce(&Path) -> anyhow::Result<LoadEvent> + Send + 'static,
    {
        let sender = self.sender.clone();
        let in_flight = self.in_flight.clone();
        in_flight.fetch_add(1, Ordering::AcqRel);

        rayon::spawn(move || {
            match load(&path) {
                Ok(event) => {
                    // The receiver only goes away when the app is shutting down.
                    let _ = sender.send(event);
                }
                Err(e) => log::warn!("Asset {} is unavailable: {:#}", path.display(), e),
            }

            in_flight.fetch_sub(1, Ordering::AcqRel);
        });
    }
}
