use crate::data::osm::GeoPoint;
use crate::errors::{Error, Result};
use crate::geo::bbox::BBox;

/// Linear interpolation of `value` from one range onto another. With `clamp`
/// the result is constrained to the output range whichever way around its
/// endpoints are given.
pub fn linear_map(
    value: f64,
    in_min: f64,
    in_max: f64,
    out_min: f64,
    out_max: f64,
    clamp: bool,
) -> Result<f64> {
    if in_min == in_max {
        return Err(Error::validation("input range must not be empty"));
    }
    let mapped = (value - in_min) / (in_max - in_min) * (out_max - out_min) + out_min;
    if !clamp {
        return Ok(mapped);
    }
    let (low, high) = if out_min < out_max {
        (out_min, out_max)
    } else {
        (out_max, out_min)
    };
    Ok(mapped.clamp(low, high))
}

/// Project a geographic point into output-surface coordinates. Longitude
/// maps west..east onto 0..width. Latitude maps north..south onto 0..height:
/// increasing latitude must move toward the top of the surface, so the
/// latitude axis is inverted.
pub fn project_point(
    pt: &GeoPoint,
    bbox: &BBox,
    out_width: f64,
    out_height: f64,
) -> Result<(f64, f64)> {
    if !bbox.is_valid() {
        return Err(Error::not_ready("bounding box is not ready for projection"));
    }
    let [south, west, north, east] = bbox.to_array()?;
    let x = linear_map(pt.lon, west, east, 0.0, out_width, false)?;
    let y = linear_map(pt.lat, north, south, 0.0, out_height, false)?;
    Ok((x, y))
}
