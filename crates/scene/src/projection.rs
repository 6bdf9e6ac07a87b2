//! Screen ↔ sphere projection.
//!
//! The view-dependent half of the coordinate mapper. Together with
//! `foundation::math::spherical` this is the single source of truth for all
//! conversions: live click navigation and drag/drop placement both go through
//! [`screen_to_spherical`], so a click and a drop on the same pixel resolve
//! to the same angular position.

use foundation::math::{SphericalCoordinate, Vec3, cartesian_to_spherical, spherical_to_cartesian};

use crate::camera::Orientation;

/// A pointer position in viewport pixels, origin at the top-left.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenPoint {
    pub x_px: f64,
    pub y_px: f64,
}

impl ScreenPoint {
    pub fn new(x_px: f64, y_px: f64) -> Self {
        Self { x_px, y_px }
    }
}

/// Viewport size in pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width_px: f64,
    pub height_px: f64,
}

impl Viewport {
    pub fn new(width_px: f64, height_px: f64) -> Self {
        Self {
            width_px,
            height_px,
        }
    }

    /// A zero-area viewport cannot host a projection.
    pub fn is_degenerate(self) -> bool {
        !(self.width_px > 0.0) || !(self.height_px > 0.0)
    }

    pub fn aspect(self) -> f64 {
        self.width_px / self.height_px
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }
}

const WORLD_UP: Vec3 = Vec3 {
    x: 0.0,
    y: 1.0,
    z: 0.0,
};

/// Converts a pixel into a ray from the viewer's eye (the sphere center)
/// through that pixel, under the camera rotation implied by `orientation`.
///
/// `orientation.zoom_deg` is the vertical field of view; the horizontal
/// extent follows from the viewport aspect ratio. Returns `None` for a
/// degenerate viewport or an orientation pitched into a pole (the latter is
/// prevented upstream by pitch clamping).
pub fn screen_to_ray(
    screen: ScreenPoint,
    viewport: Viewport,
    orientation: Orientation,
) -> Option<Ray> {
    if viewport.is_degenerate() {
        return None;
    }

    // Pixel -> normalized device coordinates in [-1, 1], y up.
    let ndc_x = (screen.x_px / viewport.width_px) * 2.0 - 1.0;
    let ndc_y = 1.0 - (screen.y_px / viewport.height_px) * 2.0;

    let tan_half_fov = (orientation.zoom_deg.to_radians() * 0.5).tan();

    // Camera basis from the orientation. The forward axis reuses the single
    // spherical->cartesian formula at unit radius.
    let forward = spherical_to_cartesian(
        SphericalCoordinate::new(orientation.yaw_deg, orientation.pitch_deg),
        1.0,
    );
    let right = WORLD_UP.cross(forward).normalized()?;
    let up = forward.cross(right);

    let dir = forward
        + right.scale(ndc_x * tan_half_fov * viewport.aspect())
        + up.scale(ndc_y * tan_half_fov);

    Some(Ray::new(Vec3::new(0.0, 0.0, 0.0), dir.normalized()?))
}

/// Nearest intersection of `ray` with the origin-centered sphere of the
/// given radius, at positive ray parameter.
///
/// For an eye at the sphere center every ray hits; `None` is the defensive
/// answer for rays built elsewhere that genuinely miss.
pub fn intersect_sphere(ray: Ray, radius: f64) -> Option<Vec3> {
    let a = ray.dir.dot(ray.dir);
    if a <= 0.0 {
        return None;
    }
    let b = 2.0 * ray.origin.dot(ray.dir);
    let c = ray.origin.dot(ray.origin) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let mut t = (-b - sqrt_d) / (2.0 * a);
    if t < 0.0 {
        t = (-b + sqrt_d) / (2.0 * a);
    }
    if t < 0.0 {
        return None;
    }

    Some(ray.origin + ray.dir.scale(t))
}

/// Pixel -> angular position on the sphere; the one conversion both click
/// navigation and drop placement must use.
pub fn screen_to_spherical(
    screen: ScreenPoint,
    viewport: Viewport,
    orientation: Orientation,
    radius: f64,
) -> Option<SphericalCoordinate> {
    let ray = screen_to_ray(screen, viewport, orientation)?;
    let hit = intersect_sphere(ray, radius)?;
    Some(cartesian_to_spherical(hit))
}

#[cfg(test)]
mod tests {
    use super::{Ray, ScreenPoint, Viewport, intersect_sphere, screen_to_ray, screen_to_spherical};
    use crate::camera::Orientation;
    use foundation::math::{Vec3, angular_distance, spherical_to_cartesian};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn center_pixel_maps_to_the_view_direction() {
        let orientation = Orientation::new(30.0, 10.0, 75.0);
        let viewport = Viewport::new(1920.0, 1080.0);
        let coord =
            screen_to_spherical(ScreenPoint::new(960.0, 540.0), viewport, orientation, 500.0)
                .expect("center pixel always hits");
        assert!(angular_distance(coord.yaw_deg, 30.0) <= 0.5);
        assert_close(coord.pitch_deg, 10.0, 0.5);
    }

    #[test]
    fn screen_axes_move_the_expected_way() {
        let orientation = Orientation::new(0.0, 0.0, 75.0);
        let viewport = Viewport::new(1600.0, 900.0);

        let right =
            screen_to_spherical(ScreenPoint::new(1200.0, 450.0), viewport, orientation, 500.0)
                .unwrap();
        assert!(right.yaw_deg > 1.0 && right.yaw_deg < 90.0);
        assert_close(right.pitch_deg, 0.0, 1e-6);

        let above =
            screen_to_spherical(ScreenPoint::new(800.0, 100.0), viewport, orientation, 500.0)
                .unwrap();
        assert!(above.pitch_deg > 1.0);
    }

    #[test]
    fn hit_points_lie_on_the_sphere() {
        let orientation = Orientation::new(212.0, -25.0, 90.0);
        let viewport = Viewport::new(1024.0, 768.0);
        for (x, y) in [(0.0, 0.0), (1023.0, 767.0), (512.0, 100.0), (37.0, 700.0)] {
            let ray = screen_to_ray(ScreenPoint::new(x, y), viewport, orientation).unwrap();
            let hit = intersect_sphere(ray, 500.0).expect("eye is inside the sphere");
            assert_close(hit.length(), 500.0, 1e-6);
        }
    }

    #[test]
    fn placement_and_render_agree_on_the_same_point() {
        // The cartesian position a renderer derives from the placed angle must
        // be the raycast hit that produced it.
        let orientation = Orientation::new(140.0, 20.0, 60.0);
        let viewport = Viewport::new(1280.0, 720.0);
        let screen = ScreenPoint::new(417.0, 533.0);

        let ray = screen_to_ray(screen, viewport, orientation).unwrap();
        let hit = intersect_sphere(ray, 500.0).unwrap();
        let placed = screen_to_spherical(screen, viewport, orientation, 500.0).unwrap();
        let rendered = spherical_to_cartesian(placed, 500.0);

        assert_close(rendered.x, hit.x, 1e-6);
        assert_close(rendered.y, hit.y, 1e-6);
        assert_close(rendered.z, hit.z, 1e-6);
    }

    #[test]
    fn degenerate_viewport_yields_no_ray() {
        let orientation = Orientation::new(0.0, 0.0, 75.0);
        assert!(
            screen_to_ray(ScreenPoint::new(0.0, 0.0), Viewport::new(0.0, 720.0), orientation)
                .is_none()
        );
        assert!(
            screen_to_ray(ScreenPoint::new(0.0, 0.0), Viewport::new(1280.0, 0.0), orientation)
                .is_none()
        );
    }

    #[test]
    fn ray_missing_the_sphere_is_reported_as_none() {
        // An external ray well outside the sphere, pointing away.
        let ray = Ray::new(Vec3::new(2000.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(intersect_sphere(ray, 500.0), None);

        // Same origin, aimed at the sphere: hits the near surface.
        let toward = Ray::new(Vec3::new(2000.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let hit = intersect_sphere(toward, 500.0).unwrap();
        assert_close(hit.x, 500.0, 1e-9);
    }

    #[test]
    fn zoom_narrows_the_angular_span_of_a_pixel() {
        let viewport = Viewport::new(1000.0, 1000.0);
        let screen = ScreenPoint::new(750.0, 500.0);

        let wide =
            screen_to_spherical(screen, viewport, Orientation::new(0.0, 0.0, 120.0), 500.0)
                .unwrap();
        let narrow =
            screen_to_spherical(screen, viewport, Orientation::new(0.0, 0.0, 30.0), 500.0)
                .unwrap();
        assert!(
            narrow.yaw_deg < wide.yaw_deg,
            "zoomed-in view must cover a smaller arc ({} vs {})",
            narrow.yaw_deg,
            wide.yaw_deg
        );
    }
}
