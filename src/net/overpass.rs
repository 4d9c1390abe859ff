use std::time::Duration;

use log::info;

use crate::data::osm::OverpassResponse;
use crate::errors::Result;
use crate::geo::bbox::BBox;
use crate::layers::LayerStack;
use crate::net::throttle::SlowClient;

/// The Overpass QL query for a layer stack over a bounding box. The bbox
/// clause uses the canonical south,west,north,east order; the timeout is
/// whole seconds.
pub fn build_query(stack: &LayerStack, bbox: &BBox, timeout_secs: u64) -> Result<String> {
    Ok(format!(
        "[bbox:{}][out:json][timeout:{}];({});out geom;",
        bbox.overpass_bbox()?,
        timeout_secs,
        stack.query_fragments()
    ))
}

/// Client for the Overpass API interpreter endpoint.
pub struct Overpass<'a> {
    client: &'a mut SlowClient,
    base_url: String,
    timeout: Duration,
}

impl<'a> Overpass<'a> {
    pub fn new(client: &'a mut SlowClient, base_url: &str, timeout: Duration) -> Overpass<'a> {
        Overpass {
            client,
            base_url: base_url.to_string(),
            timeout,
        }
    }

    /// POST the query (form-encoded as `data=<query>`) and parse the JSON
    /// response. Network or parse failures are fatal to the jump.
    pub fn fetch(&mut self, stack: &LayerStack, bbox: &BBox) -> Result<OverpassResponse> {
        let query = build_query(stack, bbox, self.timeout.as_secs().max(1))?;
        info!(query = query.as_str(); "Fetching map data");

        let body = self
            .client
            .post_form(&self.base_url, "data", &query, self.timeout)?;
        let response: OverpassResponse = serde_json::from_str(&body)?;
        info!(elements = response.elements.len(); "Fetched map data");
        Ok(response)
    }
}
