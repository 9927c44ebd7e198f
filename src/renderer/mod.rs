//! WebGPU rendering module
//!
//! The scene is rebuilt from the game state every frame as one coloured
//! triangle list and drawn in a single pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, world_to_ndc};
pub use scene::{build_frame, clear_color};
pub use vertex::Vertex;
