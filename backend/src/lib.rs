//! Geometry core for drawing 2D vector graphics on a GL canvas.
//!
//! Meshes are packed into flat vertex/index buffers, placed in the world by
//! per-shape affine matrices and viewed through a clamped orthographic camera.
//! The GL side only ever sees the packed buffers and matrices handed to a
//! [`renderer::Renderer`].

pub mod app;
pub mod data;
pub mod error;
pub mod mesh;
pub mod renderer;
pub mod scene_system;

pub use error::{GeometryError, Result};
