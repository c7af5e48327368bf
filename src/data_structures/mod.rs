//! Scene data structures: meshes, materials, textures, transforms and the
//! procedural geometry of the scene.
//!
//! - `color` parses and converts the hex colours the scene is authored with
//! - `fireflies` holds the firefly instance layout and placement
//! - `grass` is the procedural grass-blade generator
//! - `model` contains mesh and material definitions
//! - `scene_graph` keeps the glTF node hierarchy
//! - `transform` holds node transforms and their GPU representation
//! - `texture` contains the GPU texture wrapper and creation utilities

pub mod color;
pub mod fireflies;
pub mod grass;
pub mod model;
pub mod scene_graph;
pub mod texture;
pub mod transform;
