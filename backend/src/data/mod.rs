pub mod buffer;
pub mod dirty_flag;
pub mod matrix;
pub mod rect;
pub mod vector;

pub use lyon::geom::euclid;

pub mod prelude {
    pub use super::buffer::{IndexTupleBuffer, VertexBuffer};
    pub use super::dirty_flag::DirtyFlag;
    pub use super::matrix::{Affine2D, ProjectWorldToViewport, ScaleToFit};
    pub use super::rect::Rect;
    pub use super::vector::VectorExt;

    /// Model or world space point; the role is a convention of the call site.
    pub type Point = super::euclid::default::Point2D<f32>;
    pub type Vector = super::euclid::default::Vector2D<f32>;

    pub struct ScreenSpace;
    pub type ScreenPoint = super::euclid::Point2D<f32, ScreenSpace>;
    pub type ScreenVector = super::euclid::Vector2D<f32, ScreenSpace>;
    pub type ScreenSize = super::euclid::Size2D<f32, ScreenSpace>;

    pub struct WorldSpace;

    pub struct ViewportSpace;
    pub type ProjMatrix = super::euclid::Transform3D<f32, WorldSpace, ViewportSpace>;
}
