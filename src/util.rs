use regex::Regex;

use crate::errors::{Error, Result};

/// Round to `places` decimal places.
pub fn round(num: f64, places: u32) -> f64 {
    let factor = 10_f64.powi(places as i32);
    (num * factor).round() / factor
}

/// Euclidean distance between two projected points.
pub fn dist(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (x1 - x2).hypot(y1 - y2)
}

/// Does the input look like a literal "lat, lon" pair?
pub fn is_lat_lon(input: &str) -> bool {
    let re = Regex::new(r"(-?\d+\.\d+),\s*(-?\d+\.\d+)").unwrap();
    re.is_match(input.trim())
}

/// Parse a literal "lat, lon" pair, range-checking both halves.
pub fn parse_lat_lon(input: &str) -> Result<(f64, f64)> {
    let mut parts = input.split(',').map(str::trim);
    let lat: f64 = parts
        .next()
        .ok_or_else(|| Error::validation("expected \"lat, lon\""))?
        .parse()?;
    let lon: f64 = parts
        .next()
        .ok_or_else(|| Error::validation("expected \"lat, lon\""))?
        .parse()?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(Error::validation("latitude must be between -90 and 90"));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(Error::validation("longitude must be between -180 and 180"));
    }
    Ok((lat, lon))
}

/// Turn a free-text place name into a safe file stem,
/// e.g. "Durham, NC, USA" -> "durham-nc-usa".
pub fn slugify(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let strip = Regex::new(r"[^a-z0-9 -]").unwrap();
    let spaces = Regex::new(r"\s+").unwrap();
    let dashes = Regex::new(r"-+").unwrap();

    let stripped = strip.replace_all(&lowered, "");
    let hyphenated = spaces.replace_all(&stripped, "-");
    dashes.replace_all(&hyphenated, "-").to_string()
}
