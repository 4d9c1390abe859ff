use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A geographic coordinate in degrees, WGS84.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Exact-value identity, usable as a hash/set key. Two points are the
    /// same only when their bit patterns match.
    pub fn key(&self) -> (u64, u64) {
        (self.lat.to_bits(), self.lon.to_bits())
    }
}

/// Per-element bounding rectangle as Overpass reports it.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub minlat: f64,
    pub minlon: f64,
    pub maxlat: f64,
    pub maxlon: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Node,
    Way,
    Relation,
}

/// One member of a relation. Only way members carry geometry.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Member {
    #[serde(rename = "type")]
    pub kind: MemberKind,
    #[serde(rename = "ref")]
    pub id: u64,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub geometry: Vec<GeoPoint>,
}

impl Member {
    pub fn is_inner(&self) -> bool {
        self.role == "inner"
    }

    pub fn is_outer(&self) -> bool {
        self.role == "outer"
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Node {
    pub id: u64,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Way {
    pub id: u64,
    #[serde(default)]
    pub bounds: Option<Bounds>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    #[serde(default)]
    pub geometry: Vec<GeoPoint>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Relation {
    pub id: u64,
    #[serde(default)]
    pub bounds: Option<Bounds>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    #[serde(default)]
    pub members: Vec<Member>,
}

/// An OSM element from an Overpass `out geom` response.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Node(Node),
    Way(Way),
    Relation(Relation),
}

impl Element {
    pub fn id(&self) -> u64 {
        match self {
            Element::Node(n) => n.id,
            Element::Way(w) => w.id,
            Element::Relation(r) => r.id,
        }
    }

    pub fn tags(&self) -> &HashMap<String, String> {
        match self {
            Element::Node(n) => &n.tags,
            Element::Way(w) => &w.tags,
            Element::Relation(r) => &r.tags,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Node(_) => "node",
            Element::Way(_) => "way",
            Element::Relation(_) => "relation",
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Osm3s {
    #[serde(default)]
    pub timestamp_osm_base: String,
    #[serde(default)]
    pub copyright: String,
}

/// The envelope of an Overpass JSON response.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OverpassResponse {
    pub version: f32,
    pub generator: String,
    #[serde(default)]
    pub osm3s: Osm3s,
    pub elements: Vec<Element>,
}

/// An Overpass response saved locally for replay, with the query's bounding
/// box (south, west, north, east) and centroid (lat, lon) attached.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CachedMapData {
    #[serde(flatten)]
    pub response: OverpassResponse,
    pub bbox: [f64; 4],
    pub centroid: [f64; 2],
}
