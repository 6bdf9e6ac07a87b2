use super::Vec3;
use super::angle::normalize_yaw;

/// Render radius of the panorama sphere (world units).
pub const DEFAULT_SPHERE_RADIUS: f64 = 500.0;

/// An angular position on the sphere.
///
/// Yaw is `[0, 360)` degrees, increasing from +z toward +x. Pitch is degrees
/// above the horizon, negative below.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphericalCoordinate {
    pub yaw_deg: f64,
    pub pitch_deg: f64,
}

impl SphericalCoordinate {
    pub fn new(yaw_deg: f64, pitch_deg: f64) -> Self {
        Self { yaw_deg, pitch_deg }
    }
}

/// Converts an angular position to a point on the sphere of the given radius.
///
/// This is the single render-position formula; callers must not apply their
/// own yaw offsets on top of it.
pub fn spherical_to_cartesian(coord: SphericalCoordinate, radius: f64) -> Vec3 {
    let yaw_rad = coord.yaw_deg.to_radians();
    let pitch_rad = coord.pitch_deg.to_radians();
    let cos_pitch = pitch_rad.cos();

    Vec3::new(
        radius * cos_pitch * yaw_rad.sin(),
        radius * pitch_rad.sin(),
        radius * cos_pitch * yaw_rad.cos(),
    )
}

/// Converts a sphere point back to an angular position.
///
/// Inverse of [`spherical_to_cartesian`] for any pitch strictly inside
/// `(-90, 90)`. At the poles yaw is meaningless and the returned yaw is
/// unspecified.
pub fn cartesian_to_spherical(point: Vec3) -> SphericalCoordinate {
    let radius = point.length();
    if radius <= 0.0 {
        return SphericalCoordinate::new(0.0, 0.0);
    }

    let pitch_deg = (point.y / radius).clamp(-1.0, 1.0).asin().to_degrees();
    let yaw_deg = normalize_yaw(point.x.atan2(point.z).to_degrees());

    SphericalCoordinate::new(yaw_deg, pitch_deg)
}

#[cfg(test)]
mod tests {
    use super::{
        DEFAULT_SPHERE_RADIUS, SphericalCoordinate, cartesian_to_spherical, spherical_to_cartesian,
    };
    use crate::math::angle::angular_distance;
    use crate::math::vec::Vec3;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn cardinal_directions() {
        let r = DEFAULT_SPHERE_RADIUS;

        let front = spherical_to_cartesian(SphericalCoordinate::new(0.0, 0.0), r);
        assert_close(front.x, 0.0, 1e-9);
        assert_close(front.y, 0.0, 1e-9);
        assert_close(front.z, r, 1e-9);

        let east = spherical_to_cartesian(SphericalCoordinate::new(90.0, 0.0), r);
        assert_close(east.x, r, 1e-9);
        assert_close(east.z, 0.0, 1e-9);

        let up = spherical_to_cartesian(SphericalCoordinate::new(0.0, 90.0), r);
        assert_close(up.y, r, 1e-9);
    }

    #[test]
    fn points_lie_on_the_sphere() {
        for yaw in [0.0, 33.0, 123.0, 275.5] {
            for pitch in [-80.0, -12.5, 0.0, 45.0, 88.0] {
                let p = spherical_to_cartesian(SphericalCoordinate::new(yaw, pitch), 500.0);
                assert_close(p.length(), 500.0, 1e-9);
            }
        }
    }

    #[test]
    fn round_trip_within_tolerance() {
        // Round-trip law: exact to well under 1e-3 degrees away from the poles.
        for yaw in [0.0, 10.0, 90.0, 179.9, 180.0, 270.0, 359.9] {
            for pitch in [-88.9, -45.0, -1.0, 0.0, 30.0, 88.9] {
                let coord = SphericalCoordinate::new(yaw, pitch);
                let rt = cartesian_to_spherical(spherical_to_cartesian(coord, 500.0));
                assert!(
                    angular_distance(rt.yaw_deg, coord.yaw_deg) <= 1e-3,
                    "yaw {yaw} round-tripped to {}",
                    rt.yaw_deg
                );
                assert_close(rt.pitch_deg, coord.pitch_deg, 1e-3);
            }
        }
    }

    #[test]
    fn inverse_is_radius_independent() {
        let coord = SphericalCoordinate::new(200.0, -30.0);
        let near = cartesian_to_spherical(spherical_to_cartesian(coord, 1.0));
        let far = cartesian_to_spherical(spherical_to_cartesian(coord, 5000.0));
        assert_close(near.yaw_deg, far.yaw_deg, 1e-9);
        assert_close(near.pitch_deg, far.pitch_deg, 1e-9);
    }

    #[test]
    fn degenerate_origin_maps_to_zero() {
        let c = cartesian_to_spherical(Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(c, SphericalCoordinate::new(0.0, 0.0));
    }
}
