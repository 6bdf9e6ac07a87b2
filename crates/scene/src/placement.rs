use foundation::math::SphericalCoordinate;
use runtime::event_bus::{EngineEvent, EventBus};
use runtime::frame::Frame;

use crate::camera::Orientation;
use crate::config::EngineConfig;
use crate::projection::{ScreenPoint, Viewport, screen_to_spherical};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// The ray missed the sphere. Defensive for on-canvas pixels; treat as
    /// "couldn't place item here", never as fatal.
    NoIntersection,
    /// Zero-area viewport; the input is ignored.
    InvalidViewport,
}

impl PlacementError {
    /// Stable machine-readable name, used in rejected-placement events.
    pub fn reason(self) -> &'static str {
        match self {
            PlacementError::NoIntersection => "no_intersection",
            PlacementError::InvalidViewport => "invalid_viewport",
        }
    }
}

impl std::fmt::Display for PlacementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementError::NoIntersection => write!(f, "ray missed the panorama sphere"),
            PlacementError::InvalidViewport => write!(f, "viewport has zero area"),
        }
    }
}

impl std::error::Error for PlacementError {}

/// Resolves pointer and drop events to angular positions on the sphere.
///
/// Both "click to set a marker position" and "drop a palette item onto the
/// view" must go through [`place_at`](Self::place_at) — one implementation is
/// what guarantees the two interactions agree on the same pixel.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlacementService {
    sphere_radius: f64,
}

impl PlacementService {
    pub fn new(sphere_radius: f64) -> Self {
        Self { sphere_radius }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.sphere_radius)
    }

    pub fn sphere_radius(&self) -> f64 {
        self.sphere_radius
    }

    /// The sphere point under a pointer or drop event, as an angular position.
    pub fn place_at(
        &self,
        screen: ScreenPoint,
        viewport: Viewport,
        orientation: Orientation,
    ) -> Result<SphericalCoordinate, PlacementError> {
        if viewport.is_degenerate() {
            return Err(PlacementError::InvalidViewport);
        }
        screen_to_spherical(screen, viewport, orientation, self.sphere_radius)
            .ok_or(PlacementError::NoIntersection)
    }

    /// [`place_at`](Self::place_at), also reported on the event bus so an
    /// editor overlay can observe placements it didn't initiate.
    pub fn place_at_reported(
        &self,
        screen: ScreenPoint,
        viewport: Viewport,
        orientation: Orientation,
        frame: Frame,
        bus: &mut EventBus,
    ) -> Result<SphericalCoordinate, PlacementError> {
        let result = self.place_at(screen, viewport, orientation);
        match result {
            Ok(coord) => bus.emit(
                frame,
                EngineEvent::PlacementResolved {
                    yaw_deg: coord.yaw_deg,
                    pitch_deg: coord.pitch_deg,
                },
            ),
            Err(err) => bus.emit(
                frame,
                EngineEvent::PlacementRejected {
                    reason: err.reason(),
                },
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::{PlacementError, PlacementService};
    use crate::camera::Orientation;
    use crate::config::EngineConfig;
    use crate::projection::{ScreenPoint, Viewport, screen_to_spherical};
    use foundation::math::angular_distance;
    use runtime::event_bus::{EngineEvent, EventBus};
    use runtime::frame::Frame;

    #[test]
    fn click_and_drop_paths_are_the_same_computation() {
        // A "drop" from the palette and a "click" on the canvas arrive as the
        // same (pixel, viewport, orientation) triple; the service must give
        // byte-identical answers to the shared projection function.
        let service = PlacementService::from_config(&EngineConfig::default());
        let orientation = Orientation::new(300.0, 15.0, 80.0);
        let viewport = Viewport::new(1440.0, 900.0);
        let screen = ScreenPoint::new(1000.0, 333.0);

        let placed = service.place_at(screen, viewport, orientation).unwrap();
        let clicked = screen_to_spherical(screen, viewport, orientation, 500.0).unwrap();
        assert_eq!(placed, clicked);
    }

    #[test]
    fn center_placement_matches_the_view_direction() {
        let service = PlacementService::new(500.0);
        let orientation = Orientation::new(30.0, 10.0, 75.0);
        let coord = service
            .place_at(
                ScreenPoint::new(960.0, 540.0),
                Viewport::new(1920.0, 1080.0),
                orientation,
            )
            .unwrap();
        assert!(angular_distance(coord.yaw_deg, 30.0) <= 0.5);
        assert!((coord.pitch_deg - 10.0).abs() <= 0.5);
    }

    #[test]
    fn zero_area_viewport_is_an_invalid_viewport() {
        let service = PlacementService::new(500.0);
        let err = service
            .place_at(
                ScreenPoint::new(10.0, 10.0),
                Viewport::new(0.0, 0.0),
                Orientation::new(0.0, 0.0, 75.0),
            )
            .unwrap_err();
        assert_eq!(err, PlacementError::InvalidViewport);
        assert_eq!(err.reason(), "invalid_viewport");
    }

    #[test]
    fn reported_placement_emits_the_matching_event() {
        let service = PlacementService::new(500.0);
        let mut bus = EventBus::new();
        let frame = Frame::first(1.0 / 60.0);
        let orientation = Orientation::new(90.0, 0.0, 75.0);

        let coord = service
            .place_at_reported(
                ScreenPoint::new(640.0, 360.0),
                Viewport::new(1280.0, 720.0),
                orientation,
                frame,
                &mut bus,
            )
            .unwrap();

        let events = bus.drain();
        assert_eq!(events.len(), 1);
        let EngineEvent::PlacementResolved { yaw_deg, pitch_deg } = events[0].data else {
            panic!("expected a resolved event, got {:?}", events[0].data);
        };
        assert_eq!(yaw_deg, coord.yaw_deg);
        assert_eq!(pitch_deg, coord.pitch_deg);

        let err = service
            .place_at_reported(
                ScreenPoint::new(0.0, 0.0),
                Viewport::new(0.0, 720.0),
                orientation,
                frame,
                &mut bus,
            )
            .unwrap_err();
        let events = bus.drain();
        assert_eq!(
            events[0].data,
            EngineEvent::PlacementRejected {
                reason: err.reason()
            }
        );
    }
}
