use std::fs::{self, File};
use std::path::{Path, PathBuf};

use log::info;

use crate::data::osm::CachedMapData;
use crate::errors::Result;
use crate::etl::Etl;
use crate::geo::bbox::BBox;
use crate::layers::LayerStack;
use crate::render::canvas::CanvasMap;
use crate::render::{self, svg};
use crate::UserConfig;

pub const ETL_NAME: &str = "draw_map";

/// Read a cached map-data file, classify its elements into layers, project
/// everything into surface space, and write an SVG and a PNG rendering.
pub struct DrawMapEtl<'a> {
    config: &'a UserConfig,
    stack: LayerStack,
    input_path: PathBuf,
    slug: String,
}

impl<'a> DrawMapEtl<'a> {
    pub fn new(
        config: &'a UserConfig,
        stack: LayerStack,
        input_path: PathBuf,
        slug: &str,
    ) -> DrawMapEtl<'a> {
        DrawMapEtl {
            config,
            stack,
            input_path,
            slug: slug.to_string(),
        }
    }

    fn svg_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.svg", self.slug))
    }

    fn png_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.png", self.slug))
    }
}

impl Etl for DrawMapEtl<'_> {
    type Input = CachedMapData;
    type Output = (String, CanvasMap);

    fn etl_name(&self) -> &str {
        ETL_NAME
    }

    fn is_cached(&self, dir: &Path) -> Result<bool> {
        Ok(self.svg_path(dir).exists() && self.png_path(dir).exists())
    }

    fn clean(&self, dir: &Path) -> Result<()> {
        for path in [self.svg_path(dir), self.png_path(dir)] {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    fn extract(&mut self, _dir: &Path) -> Result<Self::Input> {
        let file = File::open(&self.input_path)?;
        let data: CachedMapData = serde_json::from_reader(file)?;
        Ok(data)
    }

    fn transform(&mut self, input: Self::Input) -> Result<Self::Output> {
        let width = self.config.width_px as f64;
        let height = self.config.height_px as f64;

        let mut bbox = BBox::from_array(input.bbox)?;
        bbox.crop_to_aspect(width, height)?;

        self.stack.clear();
        self.stack.dispatch(&input.response.elements);

        let (rendered, report) = render::project_layers(&self.stack, &bbox, width, height)?;
        info!(drawn = report.drawn, failed = report.failed.len(); "Projected elements");

        let document = svg::render_svg(&rendered, width, height, &self.config.background)?;

        let mut canvas = CanvasMap::new(
            self.config.width_px as i32,
            self.config.height_px as i32,
            &self.config.background,
        )?;
        canvas.draw_layers(&rendered)?;

        Ok((document, canvas))
    }

    fn load(&mut self, dir: &Path, output: Self::Output) -> Result<()> {
        let (document, canvas) = output;
        fs::write(self.svg_path(dir), document)?;
        canvas.write_png(&self.png_path(dir))?;
        Ok(())
    }
}
