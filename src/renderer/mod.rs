//! Rendering module
//!
//! The simulation hands out a `Snapshot`; everything here turns it into
//! pixels or characters. The starfield is the only state owned by this layer.

pub mod hud;
pub mod pipeline;
pub mod shapes;
pub mod stars;
#[cfg(not(target_arch = "wasm32"))]
pub mod terminal;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::build_scene;
pub use stars::Starfield;
pub use vertex::Vertex;
