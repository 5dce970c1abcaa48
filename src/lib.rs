use std::path::Path;

use log::{debug, info, warn};

pub use cache::Cache;
pub use config::Config;
pub use error::MapError;
pub use extent::Extent;
pub use photo::Photo;

pub mod animate;
pub mod cache;
pub mod config;
pub mod dedup;
pub mod distance;
pub mod error;
pub mod extent;
pub mod metadata;
pub mod photo;
pub mod render;
pub mod slices;

/// The whole pipeline: discover photos, extract their metadata through the
/// cache, slice by day, thin each slice, render each frame, assemble the gif.
pub struct Mapper {
    config: Config,
    cache: Cache,
}

impl Mapper {
    pub fn new(config: Config) -> Result<Mapper, MapError> {
        let cache = Cache::open(&config.cache_folder)?;
        Ok(Mapper { config, cache })
    }

    pub fn run(&mut self) -> Result<(), MapError> {
        std::fs::create_dir_all(&self.config.export_path)?;

        let mut photos = self.collect_photos()?;
        if photos.is_empty() {
            return Err(MapError::EmptyInput);
        }
        info!("found {} geotagged photos", photos.len());

        // Stable sort on the capture-time-only order: photos taken in the
        // same second keep discovery order, which keeps the dedup
        // representative choice deterministic between runs.
        photos.sort();

        let mut rendered = Vec::new();
        for slice in slices::DaySlices::new(&photos)? {
            let thinned = dedup::filter_nearby_photos(&slice, self.config.filter_distance_km)?;
            let frame_extent = extent::compute_extent(&thinned, self.config.image_ratio)?;
            let path = render::render_frame(&thinned, &frame_extent, &self.config)?;
            debug!(
                "frame {}: {} photos, {} markers",
                path.display(),
                slice.len(),
                thinned.len()
            );
            rendered.push(path);
        }

        if rendered.is_empty() {
            info!("all photos fall on one day, nothing to animate");
            return Ok(());
        }

        info!("rendered {} frames, assembling gif", rendered.len());
        animate::create_gif(&rendered, &self.config)?;

        Ok(())
    }

    /// Walk the photo folder, reading metadata through the cache. Files
    /// without location data are remembered so later runs skip them.
    fn collect_photos(&mut self) -> Result<Vec<Photo>, MapError> {
        let paths = visit_paths(&self.config.image_folder);
        self.photos_from_paths(&paths)
    }

    fn photos_from_paths(&mut self, paths: &[String]) -> Result<Vec<Photo>, MapError> {
        let mut photos = Vec::new();
        for path_str in paths {
            let outcome = match self.cache.get(path_str).cloned() {
                Some(cached) => cached,
                None => {
                    debug!("exif cache miss for {}", path_str);
                    let outcome = match metadata::read_photo_metadata(Path::new(path_str)) {
                        Ok(outcome) => outcome,
                        Err(err) => {
                            // One unreadable file must not cost the
                            // extraction work already done: keep what we
                            // have before bailing.
                            if let Err(flush_err) = self.cache.flush() {
                                warn!("cache flush failed: {}", flush_err);
                            }
                            return Err(err);
                        }
                    };
                    self.cache.put(path_str, outcome.clone());
                    outcome
                }
            };
            match outcome {
                Some(meta) => photos.push(meta.into_photo(path_str)),
                None => debug!("no location data in {}", path_str),
            }
        }
        self.cache.flush()?;
        Ok(photos)
    }
}

/// All candidate photo paths under `src_root`, in walk order.
pub fn visit_paths(src_root: &Path) -> Vec<String> {
    let pattern = src_root.join("**/*.{jpg,jpeg,png}");
    let walker = match globwalk::glob(pattern.to_string_lossy()) {
        Ok(walker) => walker,
        Err(err) => {
            warn!("bad photo glob {}: {}", pattern.display(), err);
            return Vec::new();
        }
    };
    walker
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.into_path().to_string_lossy().into_owned()),
            Err(err) => {
                warn!("skipping unreadable path: {}", err);
                None
            }
        })
        .collect()
}
