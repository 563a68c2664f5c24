//! Local planar projection used for every metric measurement.
//!
//! Coordinates are mapped onto a tangent plane at a fixed origin using the
//! WGS84 meridional and prime-vertical radii of curvature at the origin's
//! latitude. Over a campus-sized extent the distortion is far below the
//! simplification tolerance, and the mapping is linear, so area ratios and
//! containment are preserved exactly.
#![expect(
    clippy::float_arithmetic,
    reason = "projection maths operates on floating-point coordinates"
)]

use geo::{Coord, MapCoords, MultiPolygon};

const WGS84_SEMI_MAJOR_M: f64 = 6_378_137.0;
const WGS84_ECCENTRICITY_SQ: f64 = 0.006_694_379_990_14;

/// Centre of the default area of interest (south 34.058, west -118.456,
/// north 34.082, east -118.433).
pub const CAMPUS_ORIGIN: Coord<f64> = Coord {
    x: -118.4445,
    y: 34.07,
};

/// Equidistant projection about a reference origin.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use campusmap_core::LocalProjection;
///
/// let projection = LocalProjection::new(Coord { x: -118.44, y: 34.07 });
/// let planar = projection.project(Coord { x: -118.44, y: 34.071 });
/// assert!(planar.x.abs() < 1e-9);
/// assert!((planar.y - 110.9).abs() < 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalProjection {
    origin: Coord<f64>,
    metres_per_degree_lon: f64,
    metres_per_degree_lat: f64,
}

impl LocalProjection {
    /// Build a projection centred on `origin` (`x = longitude`, `y = latitude`).
    #[must_use]
    pub fn new(origin: Coord<f64>) -> Self {
        let latitude = origin.y.to_radians();
        let sin_lat = latitude.sin();
        let w = 1.0 - WGS84_ECCENTRICITY_SQ * sin_lat * sin_lat;
        let prime_vertical = WGS84_SEMI_MAJOR_M / w.sqrt();
        let meridional = WGS84_SEMI_MAJOR_M * (1.0 - WGS84_ECCENTRICITY_SQ) / (w * w.sqrt());
        let radians_per_degree = std::f64::consts::PI / 180.0;
        Self {
            origin,
            metres_per_degree_lon: prime_vertical * latitude.cos() * radians_per_degree,
            metres_per_degree_lat: meridional * radians_per_degree,
        }
    }

    /// Origin of the projection in geographic coordinates.
    #[must_use]
    pub const fn origin(&self) -> Coord<f64> {
        self.origin
    }

    /// Map a geographic coordinate to metres east/north of the origin.
    #[must_use]
    pub fn project(&self, coord: Coord<f64>) -> Coord<f64> {
        Coord {
            x: (coord.x - self.origin.x) * self.metres_per_degree_lon,
            y: (coord.y - self.origin.y) * self.metres_per_degree_lat,
        }
    }

    /// Inverse of [`LocalProjection::project`].
    #[must_use]
    pub fn unproject(&self, coord: Coord<f64>) -> Coord<f64> {
        Coord {
            x: coord.x / self.metres_per_degree_lon + self.origin.x,
            y: coord.y / self.metres_per_degree_lat + self.origin.y,
        }
    }

    /// Project every coordinate of a multipolygon.
    #[must_use]
    pub fn project_geometry(&self, geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        geometry.map_coords(|coord| self.project(coord))
    }

    /// Unproject every coordinate of a multipolygon.
    #[must_use]
    pub fn unproject_geometry(&self, geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        geometry.map_coords(|coord| self.unproject(coord))
    }
}

impl Default for LocalProjection {
    fn default() -> Self {
        Self::new(CAMPUS_ORIGIN)
    }
}
