use serde::{Deserialize, Serialize};

use crate::data::osm::GeoPoint;
use crate::errors::{Error, Result};

/// GeoJSON geometry as Nominatim returns it for `format=geojson`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub bbox: Option<[f64; 4]>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

/// The envelope of a Nominatim GeoJSON response.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GeoJson {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl GeoJson {
    /// Centroid of the first feature. GeoJSON stores (lon, lat); this swaps
    /// the pair into (lat, lon) order.
    pub fn centroid(&self) -> Result<GeoPoint> {
        let feature = self
            .features
            .first()
            .ok_or_else(|| Error::data_shape("geocoding response has no features"))?;
        let geometry = feature
            .geometry
            .as_ref()
            .ok_or_else(|| Error::data_shape("first feature has no geometry"))?;
        if geometry.kind != "Point" {
            return Err(Error::data_shape(format!(
                "expected Point geometry, got {}",
                geometry.kind
            )));
        }
        let [lon, lat] = geometry.coordinates;
        Ok(GeoPoint { lat, lon })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use serde_json::json;

    #[test]
    fn extracts_centroid_in_lat_lon_order() {
        let response: GeoJson = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "license": "Data © OpenStreetMap contributors, ODbL 1.0.",
            "features": [{
                "type": "Feature",
                "properties": {"display_name": "Durham, NC"},
                "bbox": [-78.9154, 35.9857, -78.8882, 36.0076],
                "geometry": {"type": "Point", "coordinates": [-78.901, 35.996]}
            }]
        }))
        .unwrap();

        let centroid = response.centroid().unwrap();
        assert_eq!(centroid.lat, 35.996);
        assert_eq!(centroid.lon, -78.901);
    }

    #[test]
    fn missing_features_is_a_data_shape_error() {
        let response: GeoJson =
            serde_json::from_value(json!({"type": "FeatureCollection", "features": []})).unwrap();
        let err = response.centroid().unwrap_err();
        assert_eq!(err.kind, ErrorKind::DataShape);
    }

    #[test]
    fn non_point_geometry_is_rejected() {
        let response: GeoJson = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "LineString", "coordinates": [0.0, 0.0]}
            }]
        }))
        .unwrap();
        assert!(response.centroid().is_err());
    }
}
