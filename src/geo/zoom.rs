use std::f64::consts::PI;

use crate::data::osm::GeoPoint;
use crate::errors::{Error, Result};
use crate::geo::bbox::BBox;
use crate::util;

const EARTH_RADIUS_M: f64 = 6_378_137.0;
const PIXELS_PER_TILE: f64 = 256.0;
const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Slippy-map zoom levels: 0 is the whole world, 20 is a single building.
/// https://wiki.openstreetmap.org/wiki/Zoom_levels
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 20;

/// Approximate the bounding box of one map tile centered on `centroid` at
/// the given zoom level. Degrees per meter uses the standard 111320 m/deg
/// latitude figure, scaled by cos(lat) for longitude. Results are rounded to
/// four decimal places.
pub fn to_bbox(centroid: &GeoPoint, zoom: u8) -> Result<BBox> {
    if zoom > MAX_ZOOM {
        return Err(Error::validation(format!(
            "zoom must be between {} and {}",
            MIN_ZOOM, MAX_ZOOM
        )));
    }

    let earth_circumference = 2.0 * PI * EARTH_RADIUS_M;
    let meters_per_pixel = earth_circumference / (PIXELS_PER_TILE * 2_f64.powi(zoom as i32));

    let meters_per_degree_lon =
        ((centroid.lat * PI / 180.0).cos() * METERS_PER_DEGREE_LAT).abs();

    let half_width = (PIXELS_PER_TILE / 2.0) * meters_per_pixel / meters_per_degree_lon;
    let half_height = (PIXELS_PER_TILE / 2.0) * meters_per_pixel / METERS_PER_DEGREE_LAT;

    BBox::from_min_max(
        util::round(centroid.lat - half_height, 4),
        util::round(centroid.lon - half_width, 4),
        util::round(centroid.lat + half_height, 4),
        util::round(centroid.lon + half_width, 4),
    )
}
