use super::camera::Camera;
use crate::{
    data::prelude::*,
    error::{GeometryError, Result},
};

/// Where the canvas sits on screen.
///
/// Screen points are in pixels with Y down. The canvas rectangle starts at
/// `origin`; NDC here is `[0, 1]` over the canvas with Y flipped up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    origin: ScreenPoint,
    size: ScreenSize,
}

impl Surface {
    pub fn new(origin: ScreenPoint, size: ScreenSize) -> Result<Self> {
        let mut surface = Self { origin, size };
        surface.resize(origin, size)?;
        Ok(surface)
    }

    pub fn resize(&mut self, origin: ScreenPoint, size: ScreenSize) -> Result<()> {
        if !(size.width > 0.0 && size.height > 0.0) {
            return Err(GeometryError::InvalidOptions(format!(
                "canvas must have a positive size, got {}x{}",
                size.width, size.height
            )));
        }
        self.origin = origin;
        self.size = size;
        Ok(())
    }

    pub fn origin(&self) -> ScreenPoint {
        self.origin
    }

    pub fn size(&self) -> ScreenSize {
        self.size
    }

    pub fn screen_to_canvas(&self, point: ScreenPoint) -> ScreenPoint {
        (point - self.origin).to_point()
    }

    pub fn canvas_to_ndc(&self, point: ScreenPoint) -> Point {
        Point::new(point.x / self.size.width, 1.0 - point.y / self.size.height)
    }

    pub fn ndc_to_world(ndc: Point, view: &Rect) -> Point {
        Point::new(view.left + ndc.x * view.width(), view.bottom + ndc.y * view.height())
    }

    pub fn screen_to_world(&self, point: ScreenPoint, camera: &Camera) -> Point {
        Self::ndc_to_world(self.canvas_to_ndc(self.screen_to_canvas(point)), &camera.view())
    }

    pub fn world_to_ndc(point: Point, view: &Rect) -> Point {
        Point::new((point.x - view.left) / view.width(), (point.y - view.bottom) / view.height())
    }

    pub fn ndc_to_canvas(&self, ndc: Point) -> ScreenPoint {
        ScreenPoint::new(ndc.x * self.size.width, (1.0 - ndc.y) * self.size.height)
    }

    pub fn world_to_screen(&self, point: Point, camera: &Camera) -> ScreenPoint {
        self.ndc_to_canvas(Self::world_to_ndc(point, &camera.view())) + self.origin.to_vector()
    }

    /// World units covered by one screen pixel, horizontally.
    pub fn pixel_size(&self, camera: &Camera) -> f32 {
        camera.view().width() / self.size.width
    }
}

#[cfg(test)]
mod test_surface {
    use super::*;
    use crate::scene_system::camera::CameraOptions;

    const EPSILON: f32 = 1e-3;

    fn setup() -> (Surface, Camera) {
        let surface = Surface::new(ScreenPoint::new(10.0, 20.0), ScreenSize::new(400.0, 200.0)).unwrap();
        let mut camera = Camera::new(Rect::new(0.0, 100.0, 200.0, 0.0), CameraOptions::default()).unwrap();
        camera.set_viewport(400.0, 200.0).unwrap();
        (surface, camera)
    }

    #[test]
    fn test_screen_to_world() {
        let (surface, camera) = setup();
        assert_eq!(surface.screen_to_canvas(ScreenPoint::new(10.0, 20.0)), ScreenPoint::new(0.0, 0.0));
        assert_eq!(surface.canvas_to_ndc(ScreenPoint::new(0.0, 0.0)), Point::new(0.0, 1.0));

        // Top-left of the canvas is the top-left of the view.
        assert_eq!(surface.screen_to_world(ScreenPoint::new(10.0, 20.0), &camera), Point::new(0.0, 100.0));
        assert_eq!(surface.screen_to_world(ScreenPoint::new(410.0, 220.0), &camera), Point::new(200.0, 0.0));
        assert_eq!(surface.screen_to_world(ScreenPoint::new(210.0, 120.0), &camera), Point::new(100.0, 50.0));
        assert_eq!(surface.pixel_size(&camera), 0.5);
    }

    #[test]
    fn test_round_trip_after_zoom() {
        let (surface, mut camera) = setup();
        camera.zoom_in(4.0);
        camera.offset(Vector::new(30.0, -10.0));

        let screen = ScreenPoint::new(123.0, 45.0);
        let world = surface.screen_to_world(screen, &camera);
        let back = surface.world_to_screen(world, &camera);
        assert!((back - screen).length() < EPSILON);
    }

    #[test]
    fn test_invalid_size() {
        assert!(Surface::new(ScreenPoint::origin(), ScreenSize::new(0.0, 10.0)).is_err());
        let (mut surface, _) = setup();
        assert!(surface.resize(ScreenPoint::origin(), ScreenSize::new(10.0, -1.0)).is_err());
        assert_eq!(surface.size(), ScreenSize::new(400.0, 200.0));
    }
}
