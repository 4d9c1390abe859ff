pub mod nominatim;
pub mod overpass;
pub mod throttle;
