use crate::{
    data::prelude::*,
    error::{GeometryError, Result},
};

/// Depth range of the orthographic projection. Depth is unused in 2D.
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraOptions {
    /// Zoom at which the view covers the whole fitted target.
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self { min_zoom: 1.0, max_zoom: 16.0 }
    }
}

impl CameraOptions {
    pub fn validate(&self) -> Result<()> {
        if self.min_zoom.is_nan() || self.min_zoom < 1.0 {
            return Err(GeometryError::InvalidOptions(format!("min zoom must be at least 1, got {}", self.min_zoom)));
        }
        if !self.max_zoom.is_finite() || self.max_zoom < self.min_zoom {
            return Err(GeometryError::InvalidOptions(format!(
                "max zoom {} is below min zoom {}",
                self.max_zoom, self.min_zoom
            )));
        }
        Ok(())
    }
}

/// What a zoom about a focus point actually applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomResult {
    pub scale_factor: f32,
    pub offset: Vector,
}

/// Orthographic camera panning and zooming inside a fixed target area.
///
/// Every request is clamped so the view never leaves the target; the
/// methods return the amount that was really applied.
#[derive(Debug, Clone)]
pub struct Camera {
    target: Rect,
    /// `target` cut down to the viewport aspect, centered, at zoom 1.
    fitted: Rect,
    view: Rect,
    /// Offset of the view center from the target center.
    position: Vector,
    zoom: f32,
    viewport: ScreenSize,
    options: CameraOptions,
    projection: DirtyFlag<ProjMatrix>,
}

impl Camera {
    pub fn new(target: Rect, options: CameraOptions) -> Result<Self> {
        options.validate()?;
        let mut target = target;
        target.normalize();
        if target.is_empty() {
            return Err(GeometryError::EmptyRect);
        }

        let mut camera = Self {
            target,
            fitted: target,
            view: target,
            position: Vector::zero(),
            zoom: options.min_zoom,
            viewport: ScreenSize::new(target.width(), target.height()),
            options,
            projection: DirtyFlag::dirty(ProjMatrix::identity()),
        };
        camera.rebuild_view();
        Ok(camera)
    }

    pub fn target(&self) -> Rect {
        self.target
    }

    pub fn view(&self) -> Rect {
        self.view
    }

    pub fn position(&self) -> Vector {
        self.position
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn viewport(&self) -> ScreenSize {
        self.viewport
    }

    pub fn options(&self) -> &CameraOptions {
        &self.options
    }

    /// Refit the view to a new viewport size, keeping zoom and position.
    pub fn set_viewport(&mut self, width: f32, height: f32) -> Result<()> {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(GeometryError::InvalidOptions(format!("viewport must be positive, got {width}x{height}")));
        }

        let aspect = width / height;
        let (mut fit_width, mut fit_height) = (self.target.width(), self.target.height());
        if aspect > fit_width / fit_height {
            fit_height = fit_width / aspect;
        } else {
            fit_width = fit_height * aspect;
        }

        self.viewport = ScreenSize::new(width, height);
        self.fitted = Rect::from_center_size(self.target.center(), fit_width, fit_height);
        self.rebuild_view();
        Ok(())
    }

    fn rebuild_view(&mut self) {
        let mut view = self.fitted;
        view.stretch(1.0 / self.zoom);
        view.offset(self.position);
        self.view = view;
        self.projection.set_dirty();
    }

    /// Half extents of the positions at which the current view still fits.
    fn far(&self) -> Vector {
        let shrink = (self.zoom - self.options.min_zoom) / self.zoom;
        Vector::new(self.target.width() / 2.0 * shrink, self.target.height() / 2.0 * shrink)
    }

    /// Pan by `desired`, clamped to the target. Returns the applied offset.
    ///
    /// When the view already sits outside the pannable range the result can
    /// point against `desired`.
    pub fn offset(&mut self, desired: Vector) -> Vector {
        let far = self.far();
        let candidate = self.position + desired;
        let clamped = Vector::new(candidate.x.clamp(-far.x, far.x), candidate.y.clamp(-far.y, far.y));
        let actual = clamped - self.position;

        if actual != desired {
            log::debug!("camera pan clamped: wanted {:?}, applied {:?}", desired, actual);
        }
        if actual != Vector::zero() {
            self.position = clamped;
            self.view.offset(actual);
            self.projection.set_dirty();
        }
        actual
    }

    /// Multiply the zoom by `desired`, clamped to the zoom range. Returns the
    /// applied factor.
    pub fn zoom_in(&mut self, desired: f32) -> f32 {
        if !(desired > 0.0 && desired.is_finite()) {
            log::debug!("camera zoom ignored: factor {}", desired);
            return 1.0;
        }

        let zoom = (self.zoom * desired).clamp(self.options.min_zoom, self.options.max_zoom);
        let actual = zoom / self.zoom;
        if actual != desired {
            log::debug!("camera zoom clamped: wanted x{}, applied x{}", desired, actual);
        }
        if actual == 1.0 {
            return actual;
        }

        self.zoom = zoom;
        self.view.stretch(1.0 / actual);
        self.projection.set_dirty();
        // A smaller zoom widens the view, which may now cross the target.
        self.offset(Vector::zero());
        actual
    }

    pub fn zoom_out(&mut self, desired: f32) -> f32 {
        self.zoom_in(1.0 / desired)
    }

    /// Zoom while keeping `focus` at the same place on screen.
    ///
    /// The returned offset is the whole move of the view center, including
    /// the pull back into the target after zooming out.
    pub fn zoom_to_point(&mut self, desired: f32, focus: Point) -> ZoomResult {
        let start = self.position;
        let relative = self.normalize_in_view(focus);
        let scale_factor = self.zoom_in(desired);
        let landed = Point::new(
            self.view.left + relative.x * self.view.width(),
            self.view.bottom + relative.y * self.view.height(),
        );
        self.offset(focus - landed);
        ZoomResult { scale_factor, offset: self.position - start }
    }

    /// `point` relative to the view, `(0, 0)` at the bottom-left corner and
    /// `(1, 1)` at the top-right.
    pub fn normalize_in_view(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.view.left) / self.view.width(),
            (point.y - self.view.bottom) / self.view.height(),
        )
    }

    pub fn is_projection_dirty(&self) -> bool {
        self.projection.is_dirty()
    }

    /// Orthographic projection of the current view, rebuilt when stale.
    pub fn projection(&mut self) -> &ProjMatrix {
        let view = self.view;
        self.projection.refresh_with(|| ProjMatrix::look_to(&view, NEAR, FAR))
    }
}
