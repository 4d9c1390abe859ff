use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::data::osm::CachedMapData;
use crate::errors::Result;
use crate::etl::Etl;
use crate::layers::LayerStack;
use crate::net::nominatim::{Nominatim, ResolvedPlace};
use crate::net::overpass::Overpass;
use crate::net::throttle::SlowClient;
use crate::UserConfig;

pub const ETL_NAME: &str = "fetch_map";

/// Resolve a place query to coordinates and fetch its map data from
/// Overpass, writing the response as a replayable cache file (the Overpass
/// JSON plus top-level `bbox` and `centroid`). When that file already
/// exists the stage is a no-op and the jump runs fully offline.
pub struct FetchMapEtl<'a> {
    config: &'a UserConfig,
    stack: &'a LayerStack,
    client: &'a mut SlowClient,
    query: String,
    zoom: u8,
    slug: String,
}

impl<'a> FetchMapEtl<'a> {
    pub fn new(
        config: &'a UserConfig,
        stack: &'a LayerStack,
        client: &'a mut SlowClient,
        query: &str,
        zoom: u8,
        slug: &str,
    ) -> FetchMapEtl<'a> {
        FetchMapEtl {
            config,
            stack,
            client,
            query: query.to_string(),
            zoom,
            slug: slug.to_string(),
        }
    }

    pub fn output_path(dir: &Path, slug: &str) -> PathBuf {
        dir.join(format!("{}.json", slug))
    }
}

impl Etl for FetchMapEtl<'_> {
    type Input = ResolvedPlace;
    type Output = CachedMapData;

    fn etl_name(&self) -> &str {
        ETL_NAME
    }

    fn is_cached(&self, dir: &Path) -> Result<bool> {
        Ok(Self::output_path(dir, &self.slug).exists())
    }

    fn clean(&self, dir: &Path) -> Result<()> {
        let path = Self::output_path(dir, &self.slug);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn extract(&mut self, _dir: &Path) -> Result<Self::Input> {
        let mut nominatim = Nominatim::new(
            self.client,
            &self.config.nominatim_url,
            &self.config.referer,
            Duration::from_millis(self.config.loc_timeout_ms),
        );
        nominatim.resolve_coordinates(&self.query, self.zoom)
    }

    fn transform(&mut self, input: Self::Input) -> Result<Self::Output> {
        let mut overpass = Overpass::new(
            self.client,
            &self.config.overpass_url,
            Duration::from_millis(self.config.map_timeout_ms),
        );
        let response = overpass.fetch(self.stack, &input.bbox)?;
        Ok(CachedMapData {
            response,
            bbox: input.bbox.to_array()?,
            centroid: [input.centroid.lat, input.centroid.lon],
        })
    }

    fn load(&mut self, dir: &Path, output: Self::Output) -> Result<()> {
        let file = File::create(Self::output_path(dir, &self.slug))?;
        serde_json::to_writer(file, &output)?;
        Ok(())
    }
}
