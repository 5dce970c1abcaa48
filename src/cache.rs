use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::MapError;
use crate::metadata::PhotoMetadata;

pub const CACHE_FILE: &str = "coordinates.json";

/// File-backed metadata cache: one JSON map of photo path to its extracted
/// metadata. A `null` entry records a file known to carry no location data,
/// so repeated runs never re-read it.
pub struct Cache {
    path: PathBuf,
    entries: HashMap<String, Option<PhotoMetadata>>,
    dirty: bool,
}

impl Cache {
    /// Open (or start) the cache under `folder`. A missing or unreadable
    /// cache file begins empty; it is never an error.
    pub fn open(folder: &Path) -> Result<Cache, MapError> {
        fs::create_dir_all(folder)?;
        let path = folder.join(CACHE_FILE);
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!("ignoring unreadable cache {}: {}", path.display(), err);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Ok(Cache {
            path,
            entries,
            dirty: false,
        })
    }

    /// `Some(None)` is a hit on a file known to have no location data.
    pub fn get(&self, key: &str) -> Option<&Option<PhotoMetadata>> {
        self.entries.get(key)
    }

    pub fn put(&mut self, key: &str, outcome: Option<PhotoMetadata>) {
        self.entries.insert(key.to_string(), outcome);
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the map back if anything changed since open.
    pub fn flush(&mut self) -> Result<(), MapError> {
        if !self.dirty {
            return Ok(());
        }
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &self.entries)?;
        self.dirty = false;
        Ok(())
    }
}
