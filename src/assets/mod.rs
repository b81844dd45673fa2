pub mod font;
pub mod loader;
pub mod texture;

pub use font::Font;
pub use loader::{AssetLoader, LoadEvent};
pub use texture::{ColorSpace, LoadedTexture, TextureLibrary, TextureSlot};
