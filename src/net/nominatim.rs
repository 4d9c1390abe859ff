use std::time::Duration;

use log::info;

use crate::data::nominatim::GeoJson;
use crate::data::osm::GeoPoint;
use crate::errors::Result;
use crate::geo::bbox::BBox;
use crate::geo::zoom;
use crate::net::throttle::SlowClient;
use crate::util;

/// Free-text geocoding via a Nominatim endpoint.
///
/// Provider list: https://wiki.openstreetmap.org/wiki/Nominatim#Alternatives_.2F_Third-party_providers
/// Check the provider's usage policy before pointing this elsewhere.
pub struct Nominatim<'a> {
    client: &'a mut SlowClient,
    base_url: String,
    referer: String,
    timeout: Duration,
}

/// What a jump needs to begin: where to center and what rectangle to ask
/// Overpass for.
#[derive(Debug)]
pub struct ResolvedPlace {
    pub centroid: GeoPoint,
    pub bbox: BBox,
}

impl<'a> Nominatim<'a> {
    pub fn new(
        client: &'a mut SlowClient,
        base_url: &str,
        referer: &str,
        timeout: Duration,
    ) -> Nominatim<'a> {
        Nominatim {
            client,
            base_url: base_url.to_string(),
            referer: referer.to_string(),
            timeout,
        }
    }

    /// One free-form search, `format=geojson` so the centroid comes back.
    pub fn free_form(&mut self, query: &str) -> Result<GeoJson> {
        let url = format!(
            "{}?q={}&format=geojson",
            self.base_url,
            urlencode(query)
        );
        info!(query = query; "Geocoding place name");
        let body = self.client.get(&url, &self.referer, self.timeout)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Turn a free-text query into a centroid and bounding box. A literal
    /// "lat, lon" pair bypasses geocoding entirely; anything else goes to
    /// the geocoder. Failures here are fatal to the jump.
    pub fn resolve_coordinates(&mut self, query: &str, zoom_level: u8) -> Result<ResolvedPlace> {
        let centroid = if util::is_lat_lon(query) {
            let (lat, lon) = util::parse_lat_lon(query)?;
            GeoPoint { lat, lon }
        } else {
            self.free_form(query)?.centroid()?
        };
        let bbox = zoom::to_bbox(&centroid, zoom_level)?;
        Ok(ResolvedPlace { centroid, bbox })
    }
}

/// Percent-encode a query string for use in a URL query component.
fn urlencode(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            b' ' => encoded.push_str("%20"),
            other => encoded.push_str(&format!("%{:02X}", other)),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_query_strings() {
        assert_eq!(urlencode("Durham, NC, USA"), "Durham%2C%20NC%2C%20USA");
        assert_eq!(urlencode("café"), "caf%C3%A9");
    }

    #[test]
    fn literal_coordinates_bypass_the_network() {
        let mut client = SlowClient::new(Duration::from_millis(0)).unwrap();
        let mut nominatim = Nominatim::new(
            &mut client,
            "http://127.0.0.1:1/search",
            "https://example.invalid",
            Duration::from_millis(10),
        );
        let resolved = nominatim.resolve_coordinates("35.996, -78.901", 15).unwrap();
        assert_eq!(resolved.centroid.lat, 35.996);
        assert_eq!(resolved.centroid.lon, -78.901);
        assert!(resolved.bbox.is_valid());
    }

    #[test]
    fn bad_literal_coordinates_are_fatal() {
        let mut client = SlowClient::new(Duration::from_millis(0)).unwrap();
        let mut nominatim = Nominatim::new(
            &mut client,
            "http://127.0.0.1:1/search",
            "https://example.invalid",
            Duration::from_millis(10),
        );
        assert!(nominatim.resolve_coordinates("91.0, 0.0", 15).is_err());
    }
}
