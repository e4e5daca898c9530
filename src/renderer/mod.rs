//! Rendering module
//!
//! The rig only knows the `RenderAdapter` contract; `MeshAdapter` turns parts
//! into a vertex list, and `MeshPipeline` draws that list with WebGPU.

pub mod adapter;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use adapter::{Facing, MeshAdapter, PartView, RenderAdapter};
pub use pipeline::MeshPipeline;
pub use vertex::Vertex;
