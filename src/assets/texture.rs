use std::collections::HashMap;

use anyhow::Context;
use image::RgbaImage;

/// Role of a texture in the ornament material set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Color,
    Displacement,
    Normal,
    Roughness,
    Metalness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Srgb,
    Linear,
}

pub struct LoadedTexture {
    pub slot: TextureSlot,
    pub color_space: ColorSpace,
    pub image: RgbaImage,
}

impl LoadedTexture {
    pub fn decode(slot: TextureSlot, color_space: ColorSpace, bytes: &[u8]) -> anyhow::Result<Self> {
        let image = image::load_from_memory(bytes)
            .with_context(|| format!("Failed to decode {:?} texture", slot))?
            .to_rgba8();

        Ok(Self {
            slot,
            color_space,
            image,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Textures that have finished loading. Slots whose load failed simply stay empty.
#[derive(Default)]
pub struct TextureLibrary {
    textures: HashMap<TextureSlot, LoadedTexture>,
}

impl TextureLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, texture: LoadedTexture) {
        self.textures.insert(texture.slot, texture);
    }

    pub fn get(&self, slot: TextureSlot) -> Option<&LoadedTexture> {
        self.textures.get(&slot)
    }

    pub fn is_loaded(&self, slot: TextureSlot) -> bool {
        self.textures.contains_key(&slot)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgba};

    use super::*;

    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_png_to_rgba() {
        let texture =
            LoadedTexture::decode(TextureSlot::Color, ColorSpace::Srgb, &png_bytes(4, 2)).unwrap();

        assert_eq!(texture.dimensions(), (4, 2));
        assert_eq!(texture.image.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn garbage_fails_to_decode() {
        assert!(LoadedTexture::decode(TextureSlot::Normal, ColorSpace::Linear, b"nope").is_err());
    }

    #[test]
    fn library_keeps_one_texture_per_slot() {
        let mut library = TextureLibrary::new();
        for _ in 0..2 {
            library.insert(
                LoadedTexture::decode(TextureSlot::Roughness, ColorSpace::Linear, &png_bytes(1, 1))
                    .unwrap(),
            );
        }

        assert_eq!(library.len(), 1);
        assert!(library.is_loaded(TextureSlot::Roughness));
        assert!(!library.is_loaded(TextureSlot::Metalness));
    }
}
