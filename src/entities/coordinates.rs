use geo_types::{Geometry, Point};
use serde::{Deserialize, Serialize};

use crate::error::{invalid_input_error, Error};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Fixed approximation used to size the bounding-box pre-filter.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(invalid_input_error("latitude must be between -90 and 90"));
        }

        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(invalid_input_error(
                "longitude must be between -180 and 180",
            ));
        }

        Ok(())
    }

    /// Great-circle distance in meters (haversine).
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_METERS * c
    }
}

impl From<Coordinates> for Point<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Point::new(coordinates.lng, coordinates.lat)
    }
}

impl From<Coordinates> for Geometry<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Geometry::Point(coordinates.into())
    }
}

/// Axis-aligned box around a search circle, used only to narrow candidates
/// before the exact distance check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Returns `None` when the box would wrap a pole or the antimeridian;
    /// callers then skip the pre-filter entirely.
    pub fn around(center: Coordinates, radius_meters: f64) -> Option<Self> {
        let lat_span = radius_meters / METERS_PER_DEGREE;
        let min_lat = center.lat - lat_span;
        let max_lat = center.lat + lat_span;

        if min_lat < -90.0 || max_lat > 90.0 {
            return None;
        }

        // widen longitude by 1/cos(lat) so the box never clips the circle
        let widest_lat = min_lat.abs().max(max_lat.abs()).to_radians();
        let lng_span = lat_span / widest_lat.cos();
        let min_lng = center.lng - lng_span;
        let max_lng = center.lng + lng_span;

        if !lng_span.is_finite() || min_lng < -180.0 || max_lng > 180.0 {
            return None;
        }

        Some(Self {
            min_lat,
            min_lng,
            max_lat,
            max_lng,
        })
    }

    pub fn contains(&self, point: &Coordinates) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lng..=self.max_lng).contains(&point.lng)
    }
}
