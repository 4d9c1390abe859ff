use std::collections::HashSet;

use crate::data::osm::{Element, GeoPoint, MemberKind, Relation, Way};
use crate::errors::{Error, Result};

/// One contour in geographic space.
pub type GeoRing = Vec<GeoPoint>;

/// The ring structure of a drawable element. Relations with at least one
/// "inner" member render as a single compound path with cutouts; everything
/// else renders ring by ring.
#[derive(Debug, Clone)]
pub enum RingSet {
    Simple(Vec<GeoRing>),
    Compound {
        outer: Vec<GeoRing>,
        inner: Vec<GeoRing>,
    },
}

/// A way contributes its point sequence as a single ring, unmodified.
pub fn rings_for_way(way: &Way) -> GeoRing {
    way.geometry.clone()
}

/// One ring per way member that carries geometry, in member order. Node and
/// relation members are skipped. Multi-segment boundaries split across
/// several members are not stitched back together.
pub fn rings_for_relation(relation: &Relation) -> Vec<GeoRing> {
    relation
        .members
        .iter()
        .filter(|m| m.kind == MemberKind::Way && !m.geometry.is_empty())
        .map(|m| m.geometry.clone())
        .collect()
}

/// Does this relation punch holes? True when any member has role "inner".
pub fn has_cutouts(relation: &Relation) -> bool {
    relation.members.iter().any(|m| m.is_inner())
}

/// Ring structure for a drawable element. Nodes are not drawable and reach
/// this point only through a bug upstream.
pub fn extract_rings(element: &Element) -> Result<RingSet> {
    match element {
        Element::Way(way) => Ok(RingSet::Simple(vec![rings_for_way(way)])),
        Element::Relation(relation) => {
            if has_cutouts(relation) {
                let outer = relation
                    .members
                    .iter()
                    .filter(|m| {
                        m.is_outer() && m.kind == MemberKind::Way && !m.geometry.is_empty()
                    })
                    .map(|m| m.geometry.clone())
                    .collect();
                let inner = relation
                    .members
                    .iter()
                    .filter(|m| {
                        m.is_inner() && m.kind == MemberKind::Way && !m.geometry.is_empty()
                    })
                    .map(|m| m.geometry.clone())
                    .collect();
                Ok(RingSet::Compound { outer, inner })
            } else {
                Ok(RingSet::Simple(rings_for_relation(relation)))
            }
        }
        Element::Node(_) => Err(Error::unsupported_element(
            "only ways and relations can be drawn",
        )),
    }
}

/// Should this element fill as a closed shape?
///
/// Ways close when first and last point are exactly equal. Relations use a
/// repeated-point scan over non-inner way members: any exactly duplicated
/// vertex counts as closure. That is a loose heuristic (it can fire on a
/// coincidental shared vertex and miss boundaries that close inexactly) and
/// is kept as-is; call sites depend on its behavior.
pub fn is_closed(element: &Element) -> bool {
    match element {
        Element::Way(way) => match (way.geometry.first(), way.geometry.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        },
        Element::Relation(relation) => {
            let mut seen: HashSet<(u64, u64)> = HashSet::new();
            for member in &relation.members {
                if member.is_inner() || member.kind == MemberKind::Node {
                    continue;
                }
                for pt in &member.geometry {
                    if !seen.insert(pt.key()) {
                        return true;
                    }
                }
            }
            false
        }
        Element::Node(_) => false,
    }
}
