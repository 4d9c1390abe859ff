mod data;
mod errors;
mod etl;
mod geo;
mod layers;
mod net;
mod render;
mod util;

use std::fs::{create_dir_all, File};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use structured_logger::json::new_writer;
use structured_logger::Builder;

use crate::errors::{Error, Result};
use crate::etl::draw_map::DrawMapEtl;
use crate::etl::fetch_map::FetchMapEtl;
use crate::etl::Etl;
use crate::layers::{colors, LayerStack};
use crate::net::throttle::SlowClient;

/// Deployment-specific settings. Every field has a default, so the config
/// file is optional.
#[derive(Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub overpass_url: String,
    pub nominatim_url: String,
    /// Sent with geocoding requests, in case the API needs to throttle
    /// your usage.
    pub referer: String,
    /// Minimum spacing between outbound requests, to play nice with the
    /// shared OSM servers.
    pub request_delay_ms: u64,
    /// How long to wait for location data (from Nominatim).
    pub loc_timeout_ms: u64,
    /// How long to wait for map data (from Overpass).
    pub map_timeout_ms: u64,
    pub width_px: u32,
    pub height_px: u32,
    pub default_zoom: u8,
    pub background: String,
}

impl Default for UserConfig {
    fn default() -> UserConfig {
        UserConfig {
            overpass_url: "https://overpass-api.de/api/interpreter".to_string(),
            nominatim_url: "https://nominatim.openstreetmap.org/search".to_string(),
            referer: "https://github.com/turtlemap".to_string(),
            request_delay_ms: 3000,
            loc_timeout_ms: 4000,
            map_timeout_ms: 15_000,
            width_px: 800,
            height_px: 800,
            default_zoom: 15,
            background: colors::BG.to_string(),
        }
    }
}

fn load_user_config(path: Option<&PathBuf>) -> Result<UserConfig> {
    match path {
        Some(path) => {
            let file = File::open(path)?;
            Ok(serde_json::from_reader(file)?)
        }
        None => Ok(UserConfig::default()),
    }
}

#[derive(Parser)]
#[command(about = "Fetch OpenStreetMap data for a place and render a stylized map")]
struct Args {
    /// Place name or a literal "lat, lon" pair. Required unless --replay
    /// points at a previously saved map-data file.
    place: Option<String>,

    /// Slippy-map zoom level, 0 (whole world) to 20 (single building).
    #[arg(short, long)]
    zoom: Option<u8>,

    /// Path to a JSON config file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Re-render a previously fetched map-data file instead of querying
    /// the network.
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Where cached data and renderings are written.
    #[arg(short, long, default_value = "output")]
    out_dir: PathBuf,
}

fn setup_logging() {
    Builder::with_level("info")
        .with_target_writer("*", new_writer(io::stdout()))
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = load_user_config(args.config.as_ref())?;
    let zoom = args.zoom.unwrap_or(config.default_zoom);
    create_dir_all(&args.out_dir)?;

    let stack = LayerStack::with_default_layers();

    let input_path = match (&args.replay, &args.place) {
        (Some(replay), _) => replay.clone(),
        (None, Some(place)) => {
            let slug = util::slugify(place);
            let mut client = SlowClient::new(Duration::from_millis(config.request_delay_ms))?;
            let mut fetch = FetchMapEtl::new(&config, &stack, &mut client, place, zoom, &slug);
            fetch.process(&args.out_dir)?;
            FetchMapEtl::output_path(&args.out_dir, &slug)
        }
        (None, None) => {
            return Err(Error::validation(
                "either a place query or --replay is required",
            ))
        }
    };

    let slug = input_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| Error::validation("could not derive a name from the input file"))?
        .to_string();

    let mut draw = DrawMapEtl::new(&config, stack, input_path.clone(), &slug);
    draw.process(&args.out_dir)
}

fn main() -> Result<()> {
    setup_logging();
    run(Args::parse())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_complete() {
        let config = UserConfig::default();
        assert_eq!(config.default_zoom, 15);
        assert_eq!(config.request_delay_ms, 3000);
        assert!(config.overpass_url.contains("overpass"));
    }

    #[test]
    fn partial_config_files_fall_back_to_defaults() {
        let config: UserConfig =
            serde_json::from_str(r#"{"width_px": 400, "height_px": 300}"#).unwrap();
        assert_eq!(config.width_px, 400);
        assert_eq!(config.height_px, 300);
        assert_eq!(config.default_zoom, 15);
        assert_eq!(config.background, colors::BG);
    }
}
