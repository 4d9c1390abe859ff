use std::path::Path;

use raqote::{
    DrawOptions, DrawTarget, LineCap, LineJoin, PathBuilder, SolidSource, Source, StrokeStyle,
    Winding,
};

use crate::errors::{Error, Result};
use crate::render::{PathGeometry, RenderedLayer};

/// Parse a `#rrggbbaa` color into a raqote solid source.
pub fn parse_color(input: &str) -> Result<SolidSource> {
    // Length is in bytes; require ASCII so the slices below stay on char
    // boundaries for any input.
    if input.len() != 9 || !input.is_ascii() || !input.starts_with('#') {
        return Err(Error::validation(format!(
            "expected a #rrggbbaa color, got {:?}",
            input
        )));
    }
    let byte = |range: std::ops::Range<usize>| -> Result<u8> {
        u8::from_str_radix(&input[range], 16)
            .map_err(|_| Error::validation(format!("bad hex digits in color {:?}", input)))
    };
    let r = byte(1..3)?;
    let g = byte(3..5)?;
    let b = byte(5..7)?;
    let a = byte(7..9)?;
    Ok(SolidSource::from_unpremultiplied_argb(a, r, g, b))
}

fn stroke(width: f32) -> StrokeStyle {
    StrokeStyle {
        cap: LineCap::Round,
        join: LineJoin::Round,
        width,
        miter_limit: 2.0,
        dash_array: Vec::new(),
        dash_offset: 0.0,
    }
}

fn ring_into(pb: &mut PathBuilder, ring: &[(f64, f64)]) {
    let (x0, y0) = ring[0];
    pb.move_to(x0 as f32, y0 as f32);
    for (x, y) in &ring[1..] {
        pb.line_to(*x as f32, *y as f32);
    }
}

/// Raster back end. Paints layers onto a raqote draw target and writes the
/// result as PNG, the same traversal the SVG back end makes.
pub struct CanvasMap {
    dt: DrawTarget,
}

impl CanvasMap {
    pub fn new(width: i32, height: i32, background: &str) -> Result<CanvasMap> {
        let mut dt = DrawTarget::new(width, height);
        dt.clear(parse_color(background)?);
        Ok(CanvasMap { dt })
    }

    /// Layers must arrive in painting order.
    pub fn draw_layers(&mut self, layers: &[RenderedLayer]) -> Result<()> {
        for layer in layers {
            self.draw_layer(layer)?;
        }
        Ok(())
    }

    fn draw_layer(&mut self, layer: &RenderedLayer) -> Result<()> {
        let fill_source = match &layer.spec.color_fill {
            Some(color) => Some(Source::Solid(parse_color(color)?)),
            None => None,
        };
        let stroke_source = match &layer.spec.color_stroke {
            Some(color) => Some(Source::Solid(parse_color(color)?)),
            None => None,
        };
        let draw_options = DrawOptions::new();

        for projected in &layer.paths {
            let mut pb = PathBuilder::new();
            let even_odd = match &projected.geometry {
                PathGeometry::Simple(ring) => {
                    ring_into(&mut pb, ring);
                    false
                }
                PathGeometry::Compound { outer, inner } => {
                    for ring in outer {
                        ring_into(&mut pb, ring);
                    }
                    for ring in inner {
                        let reversed: Vec<(f64, f64)> = ring.iter().rev().copied().collect();
                        ring_into(&mut pb, &reversed);
                    }
                    true
                }
            };
            let mut raqote_path = pb.finish();
            if even_odd {
                raqote_path.winding = Winding::EvenOdd;
            }

            if projected.fill {
                if let Some(source) = &fill_source {
                    self.dt.fill(&raqote_path, source, &draw_options);
                }
            }
            if let Some(source) = &stroke_source {
                self.dt.stroke(
                    &raqote_path,
                    source,
                    &stroke(layer.spec.stroke_weight as f32),
                    &draw_options,
                );
            }
        }
        Ok(())
    }

    pub fn write_png(&self, path: &Path) -> Result<()> {
        self.dt
            .write_png(path)
            .map_err(|_| "Couldn't write png. (encoding error)".into())
    }
}
