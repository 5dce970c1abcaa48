use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Everything the pipeline is allowed to know about its surroundings.
///
/// Built once in `main` (environment, then CLI overrides) and passed down by
/// reference; the reduction algorithms never read the environment themselves.
#[derive(Debug, Clone)]
pub struct Config {
    /// Output width:height ratio, shared by the extent and the raster frames.
    pub image_ratio: f64,
    /// Photos closer together than this collapse to one marker.
    pub filter_distance_km: f64,
    pub image_folder: PathBuf,
    pub export_path: PathBuf,
    pub cache_folder: PathBuf,
    pub bg_color: [u8; 3],
    /// Reserved for map furniture (coastlines, borders); parsed and carried
    /// so the documented environment surface stays stable.
    pub fg_color: [u8; 3],
    pub marker_color: [u8; 3],
    /// Marker radius in pixels.
    pub marker_width: u32,
    /// Animation frames per second.
    pub framerate: u32,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            image_ratio: 16.0 / 9.0,
            filter_distance_km: 10.0,
            image_folder: PathBuf::from("/images"),
            export_path: PathBuf::from("/export"),
            cache_folder: PathBuf::from("/cache"),
            bg_color: [0x00, 0x00, 0x00],
            fg_color: [0xff, 0xff, 0xff],
            marker_color: [0xff, 0x00, 0x00],
            marker_width: 12,
            framerate: 5,
        }
    }
}

impl Config {
    pub fn from_env() -> Config {
        let mut config = Config::default();

        if let Some(ratio) = env_parse("IMAGE_RATIO") {
            config.image_ratio = ratio;
        }
        if let Some(distance) = env_parse("FILTER_DISTANCE") {
            config.filter_distance_km = distance;
        }
        if let Ok(folder) = env::var("IMAGE_FOLDER") {
            config.image_folder = PathBuf::from(folder);
        }
        if let Ok(path) = env::var("EXPORT_PATH") {
            config.export_path = PathBuf::from(path);
        }
        if let Ok(folder) = env::var("CACHE_FOLDER") {
            config.cache_folder = PathBuf::from(folder);
        }
        if let Some(color) = env::var("BG_COLOR").ok().and_then(|v| hex_to_rgb(&v)) {
            config.bg_color = color;
        }
        if let Some(color) = env::var("FG_COLOR").ok().and_then(|v| hex_to_rgb(&v)) {
            config.fg_color = color;
        }
        if let Some(color) = env::var("MARKER_COLOR").ok().and_then(|v| hex_to_rgb(&v)) {
            config.marker_color = color;
        }
        if let Some(width) = env_parse("MARKER_WIDTH") {
            config.marker_width = width;
        }
        if let Some(framerate) = env_parse("FRAMERATE") {
            config.framerate = framerate;
        }

        config
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Parse a `#RRGGBB` or shorthand `#RGB` color. Returns None on anything
/// else.
pub fn hex_to_rgb(value: &str) -> Option<[u8; 3]> {
    let value = value.trim().trim_start_matches('#');
    let mut rgb = [0u8; 3];
    match value.len() {
        6 => {
            for (i, channel) in rgb.iter_mut().enumerate() {
                *channel = u8::from_str_radix(&value[i * 2..i * 2 + 2], 16).ok()?;
            }
        }
        3 => {
            // Each shorthand nibble doubles: #F00 is #FF0000.
            for (i, channel) in rgb.iter_mut().enumerate() {
                *channel = u8::from_str_radix(&value[i..i + 1], 16).ok()? * 0x11;
            }
        }
        _ => return None,
    }
    Some(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_to_rgb_parses_full_form() {
        assert_eq!(hex_to_rgb("#FF0000"), Some([255, 0, 0]));
        assert_eq!(hex_to_rgb("00ff7f"), Some([0, 255, 127]));
    }

    #[test]
    fn hex_to_rgb_parses_shorthand_form() {
        assert_eq!(hex_to_rgb("#F00"), Some([255, 0, 0]));
        assert_eq!(hex_to_rgb("#abc"), Some([0xaa, 0xbb, 0xcc]));
    }

    #[test]
    fn hex_to_rgb_rejects_garbage() {
        assert_eq!(hex_to_rgb("#GGGGGG"), None);
        assert_eq!(hex_to_rgb("#F0"), None);
        assert_eq!(hex_to_rgb("#F0000"), None);
        assert_eq!(hex_to_rgb(""), None);
    }

    #[test]
    fn defaults_match_documented_surface() {
        let config = Config::default();

        assert!((config.image_ratio - 16.0 / 9.0).abs() < 1e-12);
        assert_eq!(config.filter_distance_km, 10.0);
        assert_eq!(config.framerate, 5);
        assert_eq!(config.marker_color, [255, 0, 0]);
    }
}
