/**
 * This module contains all logic for loading textures and scenes from external files.
 *
 * Natively assets are read from `./assets`, on the web they are fetched from
 * `<origin>/assets`.
 */
pub mod scene;
pub mod texture;

pub use scene::load_scene_gltf;
pub use texture::{load_binary, load_texture};
