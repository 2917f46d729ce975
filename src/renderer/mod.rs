//! WebGPU rendering module
//!
//! Instanced meshes: cubes for soil and dirt, octahedra for gold.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
