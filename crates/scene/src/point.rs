use foundation::math::{Vec3, project_to_map, project_to_sphere};

/// Renderer-ready position of a marker.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ScenePoint {
    /// Flat-map surfaces take geographic degrees directly.
    Geographic { lat_deg: f64, lon_deg: f64 },
    /// Globe scene coordinates, +Y through the north pole.
    Cartesian(Vec3),
}

/// Maps validated coordinates onto a rendering surface.
pub trait Projector {
    fn project(&self, lat_deg: f64, lon_deg: f64) -> ScenePoint;
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct MapProjector;

impl Projector for MapProjector {
    fn project(&self, lat_deg: f64, lon_deg: f64) -> ScenePoint {
        let (lat_deg, lon_deg) = project_to_map(lat_deg, lon_deg);
        ScenePoint::Geographic { lat_deg, lon_deg }
    }
}

/// Globe radius of the default globe mesh, in scene units.
pub const DEFAULT_GLOBE_RADIUS: f64 = 2.0;
/// Markers float this fraction of the globe radius above the surface mesh.
pub const DEFAULT_MARKER_LIFT: f64 = 0.01;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlobeProjector {
    pub globe_radius: f64,
    /// Fraction of `globe_radius` added so markers are not occluded by the mesh.
    pub lift: f64,
}

impl GlobeProjector {
    pub fn new(globe_radius: f64, lift: f64) -> Self {
        Self { globe_radius, lift }
    }

    pub fn marker_radius(&self) -> f64 {
        self.globe_radius * (1.0 + self.lift)
    }
}

impl Default for GlobeProjector {
    fn default() -> Self {
        Self::new(DEFAULT_GLOBE_RADIUS, DEFAULT_MARKER_LIFT)
    }
}

impl Projector for GlobeProjector {
    fn project(&self, lat_deg: f64, lon_deg: f64) -> ScenePoint {
        ScenePoint::Cartesian(project_to_sphere(lat_deg, lon_deg, self.marker_radius()))
    }
}
