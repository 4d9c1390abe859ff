use std::collections::HashMap;

use log::{info, warn};

use crate::data::osm::Element;

/// Palette shared by the default layer table. Hex "#rrggbbaa".
pub mod colors {
    pub const BG: &str = "#f1f4cbff";
    pub const DARK: &str = "#413633ff";
    pub const BRIGHT: &str = "#ee5642ff";
    pub const GREEN: &str = "#99c572ff";
    pub const BLUE: &str = "#8ab5ccff";
    pub const ICK: &str = "#731c7aff";
}

pub mod stroke_weights {
    pub const FAINT: f64 = 0.3;
    pub const LIGHT: f64 = 0.5;
    pub const MEDIUM: f64 = 1.3;
    pub const HEAVY: f64 = 2.5;
    pub const SUPER: f64 = 4.0;
}

/// One tag-matching rule: a key, and either a closed set of values or
/// "any value for this key".
#[derive(Debug, Clone)]
pub struct TagRule {
    pub key: String,
    pub values: Option<Vec<String>>,
}

impl TagRule {
    pub fn any(key: &str) -> TagRule {
        TagRule {
            key: key.to_string(),
            values: None,
        }
    }

    pub fn values(key: &str, values: &[&str]) -> TagRule {
        TagRule {
            key: key.to_string(),
            values: Some(values.iter().map(|v| v.to_string()).collect()),
        }
    }
}

/// Style and matching configuration for one layer. Immutable once built.
#[derive(Debug, Clone)]
pub struct LayerSpec {
    pub name: String,
    pub color_fill: Option<String>,
    pub color_stroke: Option<String>,
    pub stroke_weight: f64,
    pub tags: Vec<TagRule>,
}

/// A drawing bucket: its configuration plus the elements dispatched to it.
#[derive(Debug, Clone)]
pub struct Layer {
    pub spec: LayerSpec,
    pub elements: Vec<Element>,
}

impl Layer {
    pub fn new(spec: LayerSpec) -> Layer {
        Layer {
            spec,
            elements: Vec::new(),
        }
    }

    /// OR semantics across keys: the first element tag that satisfies any
    /// rule wins. A rule without values matches the key alone.
    pub fn matches_tags(&self, tags: &HashMap<String, String>) -> bool {
        for (key, value) in tags {
            for rule in &self.spec.tags {
                if &rule.key != key {
                    continue;
                }
                match &rule.values {
                    None => return true,
                    Some(values) if values.iter().any(|v| v == value) => return true,
                    Some(_) => {}
                }
            }
        }
        false
    }

    /// Overpass QL selectors for this layer's rules, one `wr[...]` clause
    /// per rule, in rule order. Multiple values become a regex alternation.
    pub fn query_fragment(&self) -> String {
        let mut fragment = String::new();
        for rule in &self.spec.tags {
            match &rule.values {
                None => fragment.push_str(&format!("wr[\"{}\"];", rule.key)),
                Some(values) if values.len() == 1 => {
                    fragment.push_str(&format!("wr[\"{}\"=\"{}\"];", rule.key, values[0]))
                }
                Some(values) => fragment.push_str(&format!(
                    "wr[\"{}\"~\"{}\"];",
                    rule.key,
                    values.join("|")
                )),
            }
        }
        fragment
    }
}

/// What dispatch found: how many elements landed in a layer, and the ones
/// nothing claimed. Orphans are a diagnostic, never dropped silently.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub matched: usize,
    pub orphans: Vec<Element>,
}

/// The fixed, ordered layer list. Order is significant twice over: dispatch
/// assigns each element to the first matching layer, and painting walks the
/// list in reverse so earlier (more specific) layers end up on top.
#[derive(Debug)]
pub struct LayerStack {
    pub layers: Vec<Layer>,
}

impl LayerStack {
    pub fn new(specs: Vec<LayerSpec>) -> LayerStack {
        LayerStack {
            layers: specs.into_iter().map(Layer::new).collect(),
        }
    }

    pub fn with_default_layers() -> LayerStack {
        LayerStack::new(default_layers())
    }

    /// The combined Overpass QL body for every layer.
    pub fn query_fragments(&self) -> String {
        self.layers.iter().map(|l| l.query_fragment()).collect()
    }

    /// Assign each element to the first layer whose rules match its tags
    /// (first-match-wins, so an element lands in exactly one layer even when
    /// several would accept it). Unmatched elements are returned as orphans.
    pub fn dispatch(&mut self, elements: &[Element]) -> DispatchReport {
        let mut report = DispatchReport::default();

        'elements: for element in elements {
            for layer in &mut self.layers {
                if layer.matches_tags(element.tags()) {
                    layer.elements.push(element.clone());
                    report.matched += 1;
                    continue 'elements;
                }
            }
            report.orphans.push(element.clone());
        }

        info!(matched = report.matched; "Dispatched elements to layers");
        if !report.orphans.is_empty() {
            warn!(orphans = report.orphans.len(); "Some elements matched no layer");
        }
        report
    }

    /// Drop accumulated elements so the stack can serve another jump.
    pub fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.elements.clear();
        }
    }

    /// Layers in painting order: reverse of the dispatch order.
    pub fn render_order(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().rev()
    }
}

/// The default classification table.
///
/// Parse order: as listed (first entries match first).
/// Draw order: reversed (first entries are drawn last, on top).
pub fn default_layers() -> Vec<LayerSpec> {
    vec![
        LayerSpec {
            name: "Buildings - Residential".to_string(),
            color_fill: Some(colors::BRIGHT.to_string()),
            color_stroke: Some(colors::DARK.to_string()),
            stroke_weight: stroke_weights::FAINT,
            tags: vec![TagRule::values(
                "building",
                &[
                    "house",
                    "residential",
                    "detached",
                    "apartments",
                    "semidetached_house",
                    "bungalow",
                    "dormitory",
                ],
            )],
        },
        LayerSpec {
            name: "Buildings - All".to_string(),
            color_fill: Some(colors::DARK.to_string()),
            color_stroke: Some(colors::BRIGHT.to_string()),
            stroke_weight: stroke_weights::FAINT,
            tags: vec![TagRule::any("building")],
        },
        LayerSpec {
            name: "Paths".to_string(),
            color_fill: Some(colors::BG.to_string()),
            color_stroke: Some(colors::DARK.to_string()),
            stroke_weight: stroke_weights::LIGHT,
            tags: vec![TagRule::values(
                "highway",
                &["footway", "service", "driveway", "path", "pedestrian"],
            )],
        },
        LayerSpec {
            name: "Primary Roads".to_string(),
            color_fill: None,
            color_stroke: Some(colors::DARK.to_string()),
            stroke_weight: stroke_weights::SUPER,
            tags: vec![TagRule::values(
                "highway",
                &[
                    "motorway",
                    "motorway_link",
                    "trunk",
                    "trunk_link",
                    "primary",
                    "primary_link",
                ],
            )],
        },
        LayerSpec {
            name: "Secondary Roads".to_string(),
            color_fill: None,
            color_stroke: Some(colors::DARK.to_string()),
            stroke_weight: stroke_weights::HEAVY,
            tags: vec![TagRule::values(
                "highway",
                &["secondary", "secondary_link", "tertiary", "tertiary_link"],
            )],
        },
        LayerSpec {
            name: "Tertiary Roads".to_string(),
            color_fill: None,
            color_stroke: Some(colors::DARK.to_string()),
            stroke_weight: stroke_weights::MEDIUM,
            tags: vec![TagRule::values("highway", &["residential", "service"])],
        },
        LayerSpec {
            name: "Water".to_string(),
            color_fill: Some(colors::BLUE.to_string()),
            color_stroke: Some(colors::DARK.to_string()),
            stroke_weight: stroke_weights::FAINT,
            tags: vec![
                TagRule::any("waterway"),
                TagRule::values("natural", &["water"]),
            ],
        },
        LayerSpec {
            name: "Green Space".to_string(),
            color_fill: Some(colors::GREEN.to_string()),
            color_stroke: Some(colors::DARK.to_string()),
            stroke_weight: stroke_weights::FAINT,
            tags: vec![
                TagRule::values("leisure", &["park", "garden"]),
                TagRule::values("landuse", &["grass"]),
            ],
        },
        LayerSpec {
            name: "Public Space".to_string(),
            color_fill: Some(colors::GREEN.to_string()),
            color_stroke: Some(colors::DARK.to_string()),
            stroke_weight: stroke_weights::FAINT,
            tags: vec![
                TagRule::values("leisure", &["village_green", "track", "dog_park"]),
                TagRule::values("amenity", &["school"]),
            ],
        },
        LayerSpec {
            name: "Parking".to_string(),
            color_fill: Some(colors::ICK.to_string()),
            color_stroke: Some(colors::BG.to_string()),
            stroke_weight: stroke_weights::FAINT,
            tags: vec![
                TagRule::any("parking"),
                TagRule::any("parking_space"),
                TagRule::values("amenity", &["parking"]),
                TagRule::values(
                    "building",
                    &[
                        "parking",
                        "parking_garage",
                        "parking_shelter",
                        "car_park",
                        "parkingbuilding",
                        "parking_deck",
                    ],
                ),
            ],
        },
        LayerSpec {
            name: "No Trespassing".to_string(),
            color_fill: Some(colors::BRIGHT.to_string()),
            color_stroke: None,
            stroke_weight: stroke_weights::FAINT,
            tags: vec![TagRule::values("access", &["private"])],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::osm::Way;

    fn tagged_way(id: u64, tags: &[(&str, &str)]) -> Element {
        Element::Way(Way {
            id,
            bounds: None,
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            geometry: Vec::new(),
        })
    }

    #[test]
    fn any_rule_matches_key_alone() {
        let layer = Layer::new(LayerSpec {
            name: "test".to_string(),
            color_fill: None,
            color_stroke: None,
            stroke_weight: 1.0,
            tags: vec![TagRule::any("building")],
        });
        let tags = [("building".to_string(), "cathedral".to_string())]
            .into_iter()
            .collect();
        assert!(layer.matches_tags(&tags));
    }

    #[test]
    fn value_rule_requires_membership() {
        let layer = Layer::new(LayerSpec {
            name: "test".to_string(),
            color_fill: None,
            color_stroke: None,
            stroke_weight: 1.0,
            tags: vec![TagRule::values("leisure", &["park", "garden"])],
        });
        let park = [("leisure".to_string(), "park".to_string())]
            .into_iter()
            .collect();
        let pitch = [("leisure".to_string(), "pitch".to_string())]
            .into_iter()
            .collect();
        assert!(layer.matches_tags(&park));
        assert!(!layer.matches_tags(&pitch));
    }

    #[test]
    fn query_fragment_forms() {
        let layer = Layer::new(LayerSpec {
            name: "test".to_string(),
            color_fill: None,
            color_stroke: None,
            stroke_weight: 1.0,
            tags: vec![
                TagRule::any("waterway"),
                TagRule::values("natural", &["water"]),
                TagRule::values("leisure", &["park", "garden"]),
            ],
        });
        assert_eq!(
            layer.query_fragment(),
            "wr[\"waterway\"];wr[\"natural\"=\"water\"];wr[\"leisure\"~\"park|garden\"];"
        );
    }

    #[test]
    fn dispatch_is_first_match_wins() {
        let mut stack = LayerStack::with_default_layers();
        let house = tagged_way(1, &[("building", "house")]);
        let report = stack.dispatch(&[house]);

        assert_eq!(report.matched, 1);
        assert!(report.orphans.is_empty());
        assert_eq!(stack.layers[0].spec.name, "Buildings - Residential");
        assert_eq!(stack.layers[0].elements.len(), 1);
        // "Buildings - All" would also match, but never sees the element.
        assert!(stack.layers[1].elements.is_empty());
    }

    #[test]
    fn unmatched_elements_become_orphans() {
        let mut stack = LayerStack::with_default_layers();
        let mystery = tagged_way(2, &[("aeroway", "runway")]);
        let report = stack.dispatch(&[mystery]);

        assert_eq!(report.matched, 0);
        assert_eq!(report.orphans.len(), 1);
        assert_eq!(report.orphans[0].id(), 2);
    }

    #[test]
    fn clear_makes_the_stack_reusable() {
        let mut stack = LayerStack::with_default_layers();
        stack.dispatch(&[tagged_way(1, &[("building", "house")])]);
        stack.clear();
        assert!(stack.layers.iter().all(|l| l.elements.is_empty()));
    }

    #[test]
    fn render_order_is_reversed() {
        let stack = LayerStack::with_default_layers();
        let first_drawn = stack.render_order().next().unwrap();
        assert_eq!(first_drawn.spec.name, "No Trespassing");
    }
}
