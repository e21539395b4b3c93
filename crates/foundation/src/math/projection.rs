//! Geographic to render-surface projections.
//!
//! Two surfaces are supported:
//! - flat maps, which take geographic coordinates natively (identity);
//! - a globe drawn as a sphere in scene units, with +Y through the north pole.
//!
//! The sphere mapping offsets longitude by 180 degrees and negates X so that
//! it lines up with the globe mesh's texture orientation. Changing either
//! convention rotates every marker relative to the globe.

use std::f64::consts::PI;

use super::Vec3;

const DEG_TO_RAD: f64 = PI / 180.0;

/// Valid latitude range in degrees (inclusive).
pub const LAT_RANGE_DEG: (f64, f64) = (-90.0, 90.0);
/// Valid longitude range in degrees (inclusive).
pub const LON_RANGE_DEG: (f64, f64) = (-180.0, 180.0);

/// True when `lat_deg`/`lon_deg` are finite and inside the WGS84 degree ranges.
pub fn is_valid_lat_lon(lat_deg: f64, lon_deg: f64) -> bool {
    lat_deg.is_finite()
        && lon_deg.is_finite()
        && (LAT_RANGE_DEG.0..=LAT_RANGE_DEG.1).contains(&lat_deg)
        && (LON_RANGE_DEG.0..=LON_RANGE_DEG.1).contains(&lon_deg)
}

/// Project a latitude/longitude pair onto a sphere of `radius` scene units.
///
/// `phi` is the polar angle from the north pole and `theta` the azimuth,
/// offset so that `lon = -180` maps to `theta = 0`. At the poles every
/// longitude collapses onto the same point.
pub fn project_to_sphere(lat_deg: f64, lon_deg: f64, radius: f64) -> Vec3 {
    let phi = (90.0 - lat_deg) * DEG_TO_RAD;
    let theta = (lon_deg + 180.0) * DEG_TO_RAD;

    let x = -(radius * phi.sin() * theta.cos());
    let z = radius * phi.sin() * theta.sin();
    let y = radius * phi.cos();

    Vec3::new(x, y, z)
}

/// Flat-map projection. Map surfaces accept `(lat, lon)` directly.
#[inline]
pub fn project_to_map(lat_deg: f64, lon_deg: f64) -> (f64, f64) {
    (lat_deg, lon_deg)
}

#[cfg(test)]
mod tests {
    use super::{Vec3, is_valid_lat_lon, project_to_map, project_to_sphere};

    fn norm(p: Vec3) -> f64 {
        (p.x * p.x + p.y * p.y + p.z * p.z).sqrt()
    }

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn equator_anti_meridian_lies_on_negative_x() {
        let p = project_to_sphere(0.0, -180.0, 1.0);
        assert_close(p.x, -1.0, 1e-12);
        assert_close(p.y, 0.0, 1e-12);
        assert_close(p.z, 0.0, 1e-12);
    }

    #[test]
    fn equator_prime_meridian_lies_on_positive_x() {
        let p = project_to_sphere(0.0, 0.0, 2.0);
        assert_close(p.x, 2.0, 1e-12);
        assert_close(p.y, 0.0, 1e-12);
        assert_close(p.z, 0.0, 1e-12);
    }

    #[test]
    fn ninety_west_lies_on_positive_z() {
        let p = project_to_sphere(0.0, -90.0, 1.0);
        assert_close(p.x, 0.0, 1e-12);
        assert_close(p.z, 1.0, 1e-12);
    }

    #[test]
    fn repeated_projection_is_bit_identical() {
        for &(lat, lon) in &[(40.7128, -74.006), (-33.86, 151.21), (0.0, 0.0), (89.9, 179.9)] {
            let a = project_to_sphere(lat, lon, 2.02);
            let b = project_to_sphere(lat, lon, 2.02);
            assert_eq!(a.x.to_bits(), b.x.to_bits());
            assert_eq!(a.y.to_bits(), b.y.to_bits());
            assert_eq!(a.z.to_bits(), b.z.to_bits());
        }
    }

    #[test]
    fn projected_points_lie_on_the_sphere() {
        let mut lat = -90.0;
        while lat <= 90.0 {
            let mut lon = -180.0;
            while lon <= 180.0 {
                for radius in [0.5, 2.02, 6_378_137.0] {
                    let p = project_to_sphere(lat, lon, radius);
                    assert_close(norm(p), radius, radius * 1e-12);
                }
                lon += 7.5;
            }
            lat += 7.5;
        }
    }

    #[test]
    fn poles_collapse_to_single_point() {
        let north = project_to_sphere(90.0, -180.0, 1.5);
        let south = project_to_sphere(-90.0, -180.0, 1.5);
        let mut lon = -180.0;
        while lon <= 180.0 {
            let n = project_to_sphere(90.0, lon, 1.5);
            let s = project_to_sphere(-90.0, lon, 1.5);
            // sin(pi) is not exactly zero, so the south pole drifts by a few ulps.
            for (a, b) in [(n, north), (s, south)] {
                assert_close(a.x, b.x, 1e-12);
                assert_close(a.y, b.y, 1e-12);
                assert_close(a.z, b.z, 1e-12);
            }
            lon += 15.0;
        }
        assert_close(north.y, 1.5, 1e-12);
        assert_close(south.y, -1.5, 1e-12);
    }

    #[test]
    fn map_projection_is_identity() {
        assert_eq!(project_to_map(38.9072, -77.0369), (38.9072, -77.0369));
    }

    #[test]
    fn lat_lon_validation() {
        assert!(is_valid_lat_lon(90.0, -180.0));
        assert!(is_valid_lat_lon(-90.0, 180.0));
        assert!(!is_valid_lat_lon(90.5, 0.0));
        assert!(!is_valid_lat_lon(0.0, -180.1));
        assert!(!is_valid_lat_lon(f64::NAN, 0.0));
        assert!(!is_valid_lat_lon(0.0, f64::INFINITY));
    }
}
