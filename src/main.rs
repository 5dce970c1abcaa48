use std::path::PathBuf;

use clap::Parser;
use log::error;

use maplapse::{Config, Mapper};

/// Turn a folder of geotagged photos into an animated time-lapse map: one
/// frame per day that added a new place, nearby shots collapsed to a single
/// marker.
#[derive(Parser)]
struct Cli {
    /// Directory to scan for photos (env IMAGE_FOLDER)
    #[arg(short, long)]
    images: Option<PathBuf>,
    /// Directory for rendered frames and the gif (env EXPORT_PATH)
    #[arg(short, long)]
    export: Option<PathBuf>,
    /// Directory for the metadata cache (env CACHE_FOLDER)
    #[arg(long)]
    cache: Option<PathBuf>,
    /// Collapse photos closer together than this many km (env FILTER_DISTANCE)
    #[arg(short = 'd', long)]
    filter_distance: Option<f64>,
    /// Output width:height ratio (env IMAGE_RATIO)
    #[arg(short, long)]
    ratio: Option<f64>,
    /// Animation frames per second (env FRAMERATE)
    #[arg(short, long)]
    framerate: Option<u32>,
    #[arg(short, long, action)]
    verbose: bool,
}

fn main() {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // CLI flags beat environment variables beat defaults.
    let mut config = Config::from_env();
    if let Some(images) = args.images {
        config.image_folder = images;
    }
    if let Some(export) = args.export {
        config.export_path = export;
    }
    if let Some(cache) = args.cache {
        config.cache_folder = cache;
    }
    if let Some(distance) = args.filter_distance {
        config.filter_distance_km = distance;
    }
    if let Some(ratio) = args.ratio {
        config.image_ratio = ratio;
    }
    if let Some(framerate) = args.framerate {
        config.framerate = framerate;
    }

    let result = Mapper::new(config).and_then(|mut mapper| mapper.run());
    if let Err(err) = result {
        error!("{}", err);
        std::process::exit(1);
    }
}
