use super::camera::{Camera, ZoomResult};
use crate::{
    data::{prelude::*, vector::distance},
    error::{GeometryError, Result},
};

/// Phase of an input gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStatus {
    Start,
    /// The pointer moved while the gesture is held.
    Move,
    End,
    /// The pointer left the canvas; ends the gesture like `End`.
    Leave,
}

/// Input already converted to world space by the event source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pointer { status: InputStatus, point: Point },
    Pinch { status: InputStatus, points: [Point; 2] },
    Wheel { status: InputStatus, lines: f32, focus: Point },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolOptions {
    /// Zoom ratio applied per wheel line scrolled down.
    pub scroll_zoom_speed: f32,
}

impl Default for ToolOptions {
    fn default() -> Self {
        Self { scroll_zoom_speed: 0.8 }
    }
}

impl ToolOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.scroll_zoom_speed > 0.0 && self.scroll_zoom_speed < 1.0) {
            return Err(GeometryError::InvalidOptions(format!(
                "scroll zoom speed must be in (0, 1), got {}",
                self.scroll_zoom_speed
            )));
        }
        Ok(())
    }
}

/// The unchanged camera outcome.
const NO_CHANGE: ZoomResult = ZoomResult { scale_factor: 1.0, offset: Vector::new(0.0, 0.0) };

/// Map world points captured under `old_view` to the world points now under
/// the same screen positions.
fn follow_view(points: &mut [Point], old_view: &Rect, new_view: &Rect) -> Result<()> {
    if old_view != new_view {
        Affine2D::rect_to_rect(old_view, new_view, ScaleToFit::Fill)?.map_points(points);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PanState {
    #[default]
    Idle,
    Tracking { previous: Point },
}

/// Drag the content along with the pointer.
#[derive(Debug, Default)]
pub struct PanTool {
    state: PanState,
}

impl PanTool {
    pub fn state(&self) -> PanState {
        self.state
    }

    /// Returns the pan the camera applied.
    pub fn handle(&mut self, status: InputStatus, point: Point, camera: &mut Camera) -> Result<Vector> {
        log::trace!("pan {:?} at {:?} in {:?}", status, point, self.state);

        match (status, self.state) {
            (InputStatus::Start, _) => {
                self.state = PanState::Tracking { previous: point };
                Ok(Vector::zero())
            }
            (InputStatus::Move, PanState::Tracking { previous }) => {
                let old_view = camera.view();
                let applied = camera.offset(previous - point);

                let mut pointer = [point];
                follow_view(&mut pointer, &old_view, &camera.view())?;
                self.state = PanState::Tracking { previous: pointer[0] };
                Ok(applied)
            }
            (InputStatus::Move, PanState::Idle) => Ok(Vector::zero()),
            (InputStatus::End | InputStatus::Leave, _) => {
                self.state = PanState::Idle;
                Ok(Vector::zero())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PinchState {
    #[default]
    Idle,
    Tracking { span: f32, focus: Point },
}

/// Two finger zoom: the span ratio zooms, the midpoint pans.
#[derive(Debug, Default)]
pub struct PinchTool {
    state: PinchState,
}

impl PinchTool {
    pub fn state(&self) -> PinchState {
        self.state
    }

    fn track(&mut self, [a, b]: [Point; 2]) {
        self.state = PinchState::Tracking { span: distance(a, b), focus: a.lerp(b, 0.5) };
    }

    pub fn handle(&mut self, status: InputStatus, points: [Point; 2], camera: &mut Camera) -> Result<ZoomResult> {
        log::trace!("pinch {:?} at {:?} in {:?}", status, points, self.state);

        match (status, self.state) {
            (InputStatus::Start, _) => {
                self.track(points);
                Ok(NO_CHANGE)
            }
            (InputStatus::Move, PinchState::Tracking { span, focus }) => {
                let old_view = camera.view();
                let (a, b) = (points[0], points[1]);
                let new_focus = a.lerp(b, 0.5);
                let new_span = distance(a, b);

                let pan = camera.offset(focus - new_focus);
                let mut moved = [new_focus];
                follow_view(&mut moved, &old_view, &camera.view())?;

                let mut result = if span > 0.0 && new_span > 0.0 {
                    camera.zoom_to_point(new_span / span, moved[0])
                } else {
                    NO_CHANGE
                };
                result.offset += pan;

                let mut fingers = points;
                follow_view(&mut fingers, &old_view, &camera.view())?;
                self.track(fingers);
                Ok(result)
            }
            (InputStatus::Move, PinchState::Idle) => Ok(NO_CHANGE),
            (InputStatus::End | InputStatus::Leave, _) => {
                self.state = PinchState::Idle;
                Ok(NO_CHANGE)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ScrollState {
    #[default]
    Idle,
    /// Product of the zoom applied since the scroll started.
    Tracking { applied: f32 },
}

/// Wheel zoom about the pointer.
#[derive(Debug, Default)]
pub struct ScrollZoomTool {
    state: ScrollState,
    options: ToolOptions,
}

impl ScrollZoomTool {
    pub fn new(options: ToolOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { state: ScrollState::Idle, options })
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    /// Scrolling up (positive `lines`) zooms in.
    pub fn handle(&mut self, status: InputStatus, lines: f32, focus: Point, camera: &mut Camera) -> ZoomResult {
        log::trace!("scroll {:?} by {} at {:?} in {:?}", status, lines, focus, self.state);

        match status {
            InputStatus::Start | InputStatus::Move => {
                let result = camera.zoom_to_point(self.options.scroll_zoom_speed.powf(-lines), focus);
                let applied = match self.state {
                    ScrollState::Idle => 1.0,
                    ScrollState::Tracking { applied } => applied,
                };
                self.state = ScrollState::Tracking { applied: applied * result.scale_factor };
                result
            }
            InputStatus::End | InputStatus::Leave => {
                if let ScrollState::Tracking { applied } = self.state {
                    log::debug!("scroll finished, zoomed x{} in total", applied);
                }
                self.state = ScrollState::Idle;
                NO_CHANGE
            }
        }
    }
}

/// Routes pointer events to the gesture tools.
#[derive(Debug, Default)]
pub struct Controller {
    pub pan: PanTool,
    pub pinch: PinchTool,
    pub scroll: ScrollZoomTool,
}

impl Controller {
    pub fn new(options: ToolOptions) -> Result<Self> {
        Ok(Self { pan: PanTool::default(), pinch: PinchTool::default(), scroll: ScrollZoomTool::new(options)? })
    }

    pub fn handle(&mut self, event: PointerEvent, camera: &mut Camera) -> Result<ZoomResult> {
        match event {
            PointerEvent::Pointer { status, point } => {
                let offset = self.pan.handle(status, point, camera)?;
                Ok(ZoomResult { scale_factor: 1.0, offset })
            }
            PointerEvent::Pinch { status, points } => self.pinch.handle(status, points, camera),
            PointerEvent::Wheel { status, lines, focus } => Ok(self.scroll.handle(status, lines, focus, camera)),
        }
    }
}

#[cfg(test)]
mod test_controller {
    use super::*;
    use crate::scene_system::{camera::CameraOptions, surface::Surface};

    const EPSILON: f32 = 1e-3;

    fn camera() -> Camera {
        let mut camera = Camera::new(Rect::new(0.0, 100.0, 200.0, 0.0), CameraOptions::default()).unwrap();
        camera.set_viewport(400.0, 200.0).unwrap();
        camera
    }

    fn approx_eq(a: Point, b: Point) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_follow_view() {
        let mut points = [Point::new(50.0, 25.0), Point::new(100.0, 50.0)];
        follow_view(&mut points, &Rect::new(0.0, 50.0, 100.0, 0.0), &Rect::new(10.0, 60.0, 210.0, 10.0)).unwrap();
        assert!(approx_eq(points[0], Point::new(110.0, 35.0)));
        assert!(approx_eq(points[1], Point::new(210.0, 60.0)));
    }

    #[test]
    fn test_pan_drags_content() {
        let mut camera = camera();
        camera.zoom_in(2.0);
        let surface = Surface::new(ScreenPoint::origin(), ScreenSize::new(400.0, 200.0)).unwrap();
        let mut pan = PanTool::default();

        let grab = ScreenPoint::new(200.0, 100.0);
        let grabbed = surface.screen_to_world(grab, &camera);
        pan.handle(InputStatus::Start, grabbed, &mut camera).unwrap();

        // Moving the pointer 40 px left shows content further right.
        let to = surface.screen_to_world(ScreenPoint::new(160.0, 100.0), &camera);
        let applied = pan.handle(InputStatus::Move, to, &mut camera).unwrap();
        assert!(approx_eq(applied.to_point(), Point::new(10.0, 0.0)));

        // The grabbed world point is under the pointer again.
        let under = surface.screen_to_world(ScreenPoint::new(160.0, 100.0), &camera);
        assert!(approx_eq(under, grabbed));
        assert!(matches!(pan.state(), PanState::Tracking { previous } if approx_eq(previous, grabbed)));

        pan.handle(InputStatus::Leave, to, &mut camera).unwrap();
        assert_eq!(pan.state(), PanState::Idle);
        assert_eq!(pan.handle(InputStatus::Move, grabbed, &mut camera).unwrap(), Vector::zero());
    }

    #[test]
    fn test_pan_clamped_at_edge() {
        let mut camera = camera();
        let mut pan = PanTool::default();
        pan.handle(InputStatus::Start, Point::new(100.0, 50.0), &mut camera).unwrap();
        let applied = pan.handle(InputStatus::Move, Point::new(0.0, 50.0), &mut camera).unwrap();
        assert_eq!(applied, Vector::zero());
        assert_eq!(camera.view(), camera.target());
    }

    #[test]
    fn test_pinch_spread_zooms_in() {
        let mut camera = camera();
        let mut pinch = PinchTool::default();
        let start = [Point::new(90.0, 50.0), Point::new(110.0, 50.0)];
        pinch.handle(InputStatus::Start, start, &mut camera).unwrap();
        assert!(matches!(pinch.state(), PinchState::Tracking { span, .. } if (span - 20.0).abs() < EPSILON));

        let spread = [Point::new(80.0, 50.0), Point::new(120.0, 50.0)];
        let result = pinch.handle(InputStatus::Move, spread, &mut camera).unwrap();
        assert!((result.scale_factor - 2.0).abs() < EPSILON);
        assert!((camera.zoom() - 2.0).abs() < EPSILON);
        assert!(approx_eq(camera.view().center(), Point::new(100.0, 50.0)));

        // The fingers are re-expressed in the zoomed view: the span halves.
        assert!(matches!(pinch.state(), PinchState::Tracking { span, .. } if (span - 20.0).abs() < EPSILON));

        pinch.handle(InputStatus::End, spread, &mut camera).unwrap();
        assert_eq!(pinch.state(), PinchState::Idle);
    }

    #[test]
    fn test_pinch_ignores_zero_span() {
        let mut camera = camera();
        let mut pinch = PinchTool::default();
        let same = [Point::new(10.0, 10.0), Point::new(10.0, 10.0)];
        pinch.handle(InputStatus::Start, same, &mut camera).unwrap();
        let result = pinch.handle(InputStatus::Move, same, &mut camera).unwrap();
        assert_eq!(result.scale_factor, 1.0);
        assert_eq!(camera.zoom(), 1.0);
    }

    #[test]
    fn test_scroll_zoom() {
        let mut camera = camera();
        let mut scroll = ScrollZoomTool::new(ToolOptions::default()).unwrap();
        let focus = Point::new(100.0, 50.0);

        let result = scroll.handle(InputStatus::Start, 1.0, focus, &mut camera);
        assert!((result.scale_factor - 1.25).abs() < EPSILON);
        scroll.handle(InputStatus::Move, 2.0, focus, &mut camera);
        assert!((camera.zoom() - 1.25f32.powi(3)).abs() < EPSILON);
        assert!(matches!(scroll.state(), ScrollState::Tracking { applied } if (applied - camera.zoom()).abs() < EPSILON));

        // Scrolling back down past the minimum only undoes what was applied.
        let result = scroll.handle(InputStatus::Move, -10.0, focus, &mut camera);
        assert!((result.scale_factor * 1.25f32.powi(3) - 1.0).abs() < EPSILON);
        scroll.handle(InputStatus::End, 0.0, focus, &mut camera);
        assert_eq!(scroll.state(), ScrollState::Idle);

        assert!(ScrollZoomTool::new(ToolOptions { scroll_zoom_speed: 1.5 }).is_err());
    }

    #[test]
    fn test_controller_routes_events() {
        let mut camera = camera();
        let mut controller = Controller::new(ToolOptions::default()).unwrap();
        let focus = Point::new(100.0, 50.0);

        let zoom = controller
            .handle(PointerEvent::Wheel { status: InputStatus::Move, lines: 3.0, focus }, &mut camera)
            .unwrap();
        assert!(zoom.scale_factor > 1.0);

        controller.handle(PointerEvent::Pointer { status: InputStatus::Start, point: focus }, &mut camera).unwrap();
        let pan = controller
            .handle(PointerEvent::Pointer { status: InputStatus::Move, point: Point::new(95.0, 50.0) }, &mut camera)
            .unwrap();
        assert_eq!(pan.scale_factor, 1.0);
        assert!((pan.offset.x - 5.0).abs() < EPSILON);
    }
}
