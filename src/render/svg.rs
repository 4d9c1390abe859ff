use std::fmt::Write;

use crate::errors::Result;
use crate::render::{path, PathGeometry, RenderedLayer};

/// Builds an SVG document string: a background rect, then one `<g>` per
/// layer carrying the layer's fill/stroke/stroke-width so the paths inside
/// stay small. Layers must be added in painting order.
pub struct SvgDocument {
    width: f64,
    height: f64,
    body: String,
}

impl SvgDocument {
    pub fn new(width: f64, height: f64, background: &str) -> SvgDocument {
        let mut body = String::new();
        write!(
            body,
            "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
            width, height, background
        )
        .unwrap();
        SvgDocument {
            width,
            height,
            body,
        }
    }

    pub fn add_layer(&mut self, layer: &RenderedLayer) -> Result<()> {
        let fill = layer.spec.color_fill.as_deref().unwrap_or("none");
        let stroke = layer.spec.color_stroke.as_deref().unwrap_or("none");
        write!(
            self.body,
            "<g fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\">\n",
            fill, stroke, layer.spec.stroke_weight
        )
        .unwrap();

        for projected in &layer.paths {
            let (commands, compound) = match &projected.geometry {
                PathGeometry::Simple(ring) => (path::path_command(ring)?, false),
                PathGeometry::Compound { outer, inner } => {
                    (path::compound_path_command(outer, inner)?, true)
                }
            };

            self.body.push_str("<path d=\"");
            self.body.push_str(&commands);
            self.body.push('"');
            if compound {
                self.body.push_str(" fill-rule=\"evenodd\"");
            }
            if !projected.fill {
                self.body.push_str(" fill=\"none\"");
            }
            self.body.push_str("/>\n");
        }

        self.body.push_str("</g>\n");
        Ok(())
    }

    pub fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
             viewBox=\"0 0 {w} {h}\">\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

/// Assemble the whole document from layers already in painting order.
pub fn render_svg(
    layers: &[RenderedLayer],
    width: f64,
    height: f64,
    background: &str,
) -> Result<String> {
    let mut document = SvgDocument::new(width, height, background);
    for layer in layers {
        document.add_layer(layer)?;
    }
    Ok(document.finish())
}
