pub mod canvas;
pub mod path;
pub mod rings;
pub mod svg;

use log::warn;

use crate::data::osm::Element;
use crate::errors::Result;
use crate::geo::bbox::BBox;
use crate::geo::project;
use crate::layers::{LayerSpec, LayerStack};
use crate::render::path::{Ring, MAX_OPEN_DISTANCE};
use crate::render::rings::{extract_rings, is_closed, GeoRing, RingSet};

/// A drawable path in output-surface space. Compound paths carry their
/// cutout rings separately so back ends can apply the even-odd fill rule.
#[derive(Debug, Clone)]
pub enum PathGeometry {
    Simple(Ring),
    Compound { outer: Vec<Ring>, inner: Vec<Ring> },
}

#[derive(Debug, Clone)]
pub struct ProjectedPath {
    pub geometry: PathGeometry,
    /// Paint the interior? Requires a layer fill color, a closed element,
    /// and endpoints within the open-path threshold.
    pub fill: bool,
}

/// One layer's worth of projected paths, in the order they should be
/// painted within the layer.
#[derive(Debug)]
pub struct RenderedLayer<'a> {
    pub spec: &'a LayerSpec,
    pub paths: Vec<ProjectedPath>,
}

/// Outcome of projecting a whole stack. Failed elements are skipped, never
/// fatal; their ids are kept for the summary.
#[derive(Debug, Default)]
pub struct RenderReport {
    pub drawn: usize,
    pub failed: Vec<u64>,
}

fn project_ring(ring: &GeoRing, bbox: &BBox, width: f64, height: f64) -> Result<Ring> {
    ring.iter()
        .map(|pt| project::project_point(pt, bbox, width, height))
        .collect()
}

fn element_paths(
    element: &Element,
    fillable: bool,
    bbox: &BBox,
    width: f64,
    height: f64,
) -> Result<Vec<ProjectedPath>> {
    let closed = fillable && is_closed(element);

    match extract_rings(element)? {
        RingSet::Simple(geo_rings) => geo_rings
            .iter()
            .map(|geo_ring| {
                let ring = project_ring(geo_ring, bbox, width, height)?;
                // Probe the command now so a degenerate ring fails the
                // whole element instead of surfacing at write time.
                path::path_command(&ring)?;
                let fill = closed && !path::is_open(&ring, MAX_OPEN_DISTANCE);
                Ok(ProjectedPath {
                    geometry: PathGeometry::Simple(ring),
                    fill,
                })
            })
            .collect(),
        RingSet::Compound { outer, inner } => {
            let outer: Vec<Ring> = outer
                .iter()
                .map(|r| project_ring(r, bbox, width, height))
                .collect::<Result<_>>()?;
            let inner: Vec<Ring> = inner
                .iter()
                .map(|r| project_ring(r, bbox, width, height))
                .collect::<Result<_>>()?;
            path::compound_path_command(&outer, &inner)?;

            let fill = closed
                && outer
                    .first()
                    .map(|ring| !path::is_open(ring, MAX_OPEN_DISTANCE))
                    .unwrap_or(false);
            Ok(vec![ProjectedPath {
                geometry: PathGeometry::Compound { outer, inner },
                fill,
            }])
        }
    }
}

/// Project every dispatched element of every layer into drawable paths,
/// in painting order (reverse of the classification order). Elements that
/// fail extraction or projection are collected and reported, and the rest
/// of the batch continues.
pub fn project_layers<'a>(
    stack: &'a LayerStack,
    bbox: &BBox,
    width: f64,
    height: f64,
) -> Result<(Vec<RenderedLayer<'a>>, RenderReport)> {
    let mut report = RenderReport::default();
    let mut rendered = Vec::new();

    for layer in stack.render_order() {
        let fillable = layer.spec.color_fill.is_some();
        let mut paths = Vec::new();
        for element in &layer.elements {
            match element_paths(element, fillable, bbox, width, height) {
                Ok(mut element_paths) => {
                    report.drawn += 1;
                    paths.append(&mut element_paths);
                }
                Err(err) => {
                    warn!(
                        element = element.id(),
                        kind = element.kind_name(),
                        err = err.to_string();
                        "Element failed to draw"
                    );
                    report.failed.push(element.id());
                }
            }
        }
        rendered.push(RenderedLayer {
            spec: &layer.spec,
            paths,
        });
    }

    if !report.failed.is_empty() {
        warn!(failed = report.failed.len(); "Some elements failed to draw");
    }
    Ok((rendered, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::osm::OverpassResponse;
    use serde_json::json;

    /// One residential way and one water multipolygon with a cutout, shaped
    /// like a real `out geom` response.
    fn synthetic_response() -> OverpassResponse {
        serde_json::from_value(json!({
            "version": 0.6,
            "generator": "Overpass API",
            "osm3s": {"timestamp_osm_base": "2025-08-01T00:00:00Z", "copyright": ""},
            "elements": [
                {
                    "type": "way",
                    "id": 100,
                    "tags": {"building": "house"},
                    "geometry": [
                        {"lat": 35.2, "lon": -78.8},
                        {"lat": 35.2, "lon": -78.7},
                        {"lat": 35.3, "lon": -78.7},
                        {"lat": 35.2, "lon": -78.8}
                    ]
                },
                {
                    "type": "relation",
                    "id": 200,
                    "tags": {"natural": "water"},
                    "members": [
                        {"type": "way", "ref": 1, "role": "outer", "geometry": [
                            {"lat": 35.1, "lon": -78.9},
                            {"lat": 35.1, "lon": -78.5},
                            {"lat": 35.5, "lon": -78.5},
                            {"lat": 35.1, "lon": -78.9}
                        ]},
                        {"type": "way", "ref": 2, "role": "inner", "geometry": [
                            {"lat": 35.2, "lon": -78.75},
                            {"lat": 35.2, "lon": -78.65},
                            {"lat": 35.3, "lon": -78.65},
                            {"lat": 35.2, "lon": -78.75}
                        ]}
                    ]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn end_to_end_dispatch_and_projection() {
        let response = synthetic_response();
        let mut stack = LayerStack::with_default_layers();
        let dispatch = stack.dispatch(&response.elements);

        assert_eq!(dispatch.matched, 2);
        assert!(dispatch.orphans.is_empty());

        let residential = stack
            .layers
            .iter()
            .find(|l| l.spec.name == "Buildings - Residential")
            .unwrap();
        assert_eq!(residential.elements.len(), 1);
        let water = stack.layers.iter().find(|l| l.spec.name == "Water").unwrap();
        assert_eq!(water.elements.len(), 1);

        let bbox = BBox::from_min_max(35.0, -79.0, 35.6, -78.4).unwrap();
        let (rendered, report) = project_layers(&stack, &bbox, 800.0, 800.0).unwrap();

        assert_eq!(report.drawn, 2);
        assert!(report.failed.is_empty());

        let water_paths = &rendered
            .iter()
            .find(|l| l.spec.name == "Water")
            .unwrap()
            .paths;
        assert_eq!(water_paths.len(), 1);
        match &water_paths[0].geometry {
            PathGeometry::Compound { outer, inner } => {
                assert_eq!(outer.len(), 1);
                assert_eq!(inner.len(), 1);
            }
            PathGeometry::Simple(_) => panic!("expected a compound path for the cutout"),
        }
        assert!(water_paths[0].fill);

        let house_paths = &rendered
            .iter()
            .find(|l| l.spec.name == "Buildings - Residential")
            .unwrap()
            .paths;
        assert_eq!(house_paths.len(), 1);
        assert!(matches!(house_paths[0].geometry, PathGeometry::Simple(_)));
        assert!(house_paths[0].fill);
    }

    #[test]
    fn degenerate_elements_fail_without_aborting_the_batch() {
        let response: OverpassResponse = serde_json::from_value(json!({
            "version": 0.6,
            "generator": "Overpass API",
            "elements": [
                {
                    "type": "way",
                    "id": 1,
                    "tags": {"building": "yes"},
                    "geometry": [{"lat": 35.1, "lon": -78.6}]
                },
                {
                    "type": "way",
                    "id": 2,
                    "tags": {"building": "yes"},
                    "geometry": [
                        {"lat": 35.1, "lon": -78.6},
                        {"lat": 35.2, "lon": -78.6}
                    ]
                }
            ]
        }))
        .unwrap();

        let mut stack = LayerStack::with_default_layers();
        stack.dispatch(&response.elements);
        let bbox = BBox::from_min_max(35.0, -79.0, 35.6, -78.4).unwrap();
        let (_, report) = project_layers(&stack, &bbox, 800.0, 800.0).unwrap();

        assert_eq!(report.drawn, 1);
        assert_eq!(report.failed, vec![1]);
    }

    #[test]
    fn open_ways_are_never_filled() {
        let response: OverpassResponse = serde_json::from_value(json!({
            "version": 0.6,
            "generator": "Overpass API",
            "elements": [{
                "type": "way",
                "id": 5,
                "tags": {"building": "yes"},
                "geometry": [
                    {"lat": 35.1, "lon": -78.9},
                    {"lat": 35.2, "lon": -78.8},
                    {"lat": 35.3, "lon": -78.6}
                ]
            }]
        }))
        .unwrap();

        let mut stack = LayerStack::with_default_layers();
        stack.dispatch(&response.elements);
        let bbox = BBox::from_min_max(35.0, -79.0, 35.6, -78.4).unwrap();
        let (rendered, _) = project_layers(&stack, &bbox, 800.0, 800.0).unwrap();

        let buildings = rendered
            .iter()
            .find(|l| l.spec.name == "Buildings - All")
            .unwrap();
        assert_eq!(buildings.paths.len(), 1);
        assert!(!buildings.paths[0].fill);
    }
}
