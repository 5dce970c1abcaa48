use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};

use crate::config::Config;
use crate::error::MapError;

/// Write the ffmpeg concat-demuxer input listing the frames in pipeline
/// order. The explicit list is the contract: directory listing order is
/// never relied on. Left next to the output so a failed run can be
/// inspected.
fn write_concat_list(
    export: &Path,
    frames: &[PathBuf],
    framerate: u32,
) -> Result<PathBuf, MapError> {
    let list_path = export.join("frames.txt");
    let duration = 1.0 / framerate as f64;

    let mut contents = String::new();
    for frame in frames {
        contents.push_str(&format!("file '{}'\n", frame.display()));
        contents.push_str(&format!("duration {}\n", duration));
    }
    // The concat demuxer ignores the duration of the final entry unless the
    // file is listed once more.
    if let Some(last) = frames.last() {
        contents.push_str(&format!("file '{}'\n", last.display()));
    }
    fs::write(&list_path, contents)?;

    Ok(list_path)
}

/// Assemble the rendered frames into `map.gif` with ffmpeg.
///
/// Captures the subprocess output; a non-zero exit comes back as
/// `MapError::Encoder` with stderr attached instead of being printed and
/// forgotten.
pub fn create_gif(frames: &[PathBuf], config: &Config) -> Result<PathBuf, MapError> {
    if frames.is_empty() {
        return Err(MapError::EmptyInput);
    }

    let list_path = write_concat_list(&config.export_path, frames, config.framerate)?;
    let gif_path = config.export_path.join("map.gif");

    let mut command = Command::new("ffmpeg");
    command
        .arg("-y")
        .args(["-f", "concat", "-safe", "0"])
        .arg("-i")
        .arg(&list_path)
        .args(["-vf", "scale=2048:-1"])
        .arg(&gif_path);
    debug!("running {:?}", command);

    let output = command.output()?;
    if !output.status.success() {
        return Err(MapError::Encoder {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    info!("wrote {}", gif_path.display());
    Ok(gif_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn concat_list_keeps_frame_order_and_durations() {
        let dir = tempdir().unwrap();
        let frames = vec![
            PathBuf::from("/export/map_20230601120000.png"),
            PathBuf::from("/export/map_20230603080000.png"),
        ];

        let list_path = write_concat_list(dir.path(), &frames, 5).unwrap();
        let contents = fs::read_to_string(&list_path).unwrap();

        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines[0], "file '/export/map_20230601120000.png'");
        assert_eq!(lines[1], "duration 0.2");
        assert_eq!(lines[2], "file '/export/map_20230603080000.png'");
        assert_eq!(lines[3], "duration 0.2");
        // Final frame repeated so its duration is honored.
        assert_eq!(lines[4], "file '/export/map_20230603080000.png'");
    }

    #[test]
    fn empty_frame_list_is_an_error() {
        let config = Config::default();

        assert!(matches!(
            create_gif(&[], &config),
            Err(MapError::EmptyInput)
        ));
    }
}
