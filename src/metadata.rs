use std::io::BufReader;
use std::path::Path;
use std::process::Command;

use chrono::NaiveDateTime;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::photo::Photo;

/// Timestamp layout used by EXIF DateTime tags.
pub const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// What a successful metadata lookup produced. Serialized into the cache;
/// the cache stores `null` for files known to carry nothing usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    /// (latitude, longitude) in decimal degrees.
    pub coordinates: (f64, f64),
    pub date: NaiveDateTime,
}

impl PhotoMetadata {
    pub fn into_photo(self, path: &str) -> Photo {
        Photo::new(path, self.coordinates, self.date)
    }
}

/// Read location and capture time from a photo file.
///
/// The in-process EXIF parser runs first; containers it rejects go to an
/// exiftool subprocess. `Ok(None)` means the file carries no usable location
/// or timestamp and should be remembered as such, never retried as an error.
pub fn read_photo_metadata(path: &Path) -> Result<Option<PhotoMetadata>, MapError> {
    let file = std::fs::File::open(path)?;
    match read_exif_kamadak(&file) {
        Ok(found) => Ok(found),
        Err(err) => {
            debug!(
                "primary exif parser failed on {}, trying exiftool: {}",
                path.display(),
                err
            );
            Ok(read_exif_exiftool(path))
        }
    }
}

fn read_exif_kamadak(file: &std::fs::File) -> Result<Option<PhotoMetadata>, exif::Error> {
    let mut bufreader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut bufreader)?;

    let date = match ascii_field(&exif, exif::Tag::DateTimeOriginal)
        .or_else(|| ascii_field(&exif, exif::Tag::DateTime))
        .and_then(|raw| NaiveDateTime::parse_from_str(&raw, EXIF_DATE_FORMAT).ok())
    {
        Some(date) => date,
        None => return Ok(None),
    };

    let lat = gps_coordinate(&exif, exif::Tag::GPSLatitude, exif::Tag::GPSLatitudeRef);
    let lon = gps_coordinate(&exif, exif::Tag::GPSLongitude, exif::Tag::GPSLongitudeRef);
    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(Some(PhotoMetadata {
            coordinates: (lat, lon),
            date,
        })),
        _ => Ok(None),
    }
}

fn ascii_field(exif: &exif::Exif, tag: exif::Tag) -> Option<String> {
    match &exif.get_field(tag, exif::In::PRIMARY)?.value {
        exif::Value::Ascii(values) if !values.is_empty() => Some(
            String::from_utf8_lossy(&values[0])
                .trim_end_matches('\0')
                .trim()
                .to_string(),
        ),
        _ => None,
    }
}

fn gps_coordinate(exif: &exif::Exif, value_tag: exif::Tag, ref_tag: exif::Tag) -> Option<f64> {
    let reference = exif
        .get_field(ref_tag, exif::In::PRIMARY)?
        .display_value()
        .to_string();
    match &exif.get_field(value_tag, exif::In::PRIMARY)?.value {
        exif::Value::Rational(parts) if parts.len() >= 3 => Some(dms_to_decimal(
            parts[0].to_f64(),
            parts[1].to_f64(),
            parts[2].to_f64(),
            &reference,
        )),
        exif::Value::SRational(parts) if parts.len() >= 3 => Some(dms_to_decimal(
            parts[0].to_f64(),
            parts[1].to_f64(),
            parts[2].to_f64(),
            &reference,
        )),
        _ => None,
    }
}

/// Degrees/minutes/seconds to signed decimal degrees; south and west negate.
fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64, reference: &str) -> f64 {
    let sign = if reference.contains('S') || reference.contains('W') {
        -1.0
    } else {
        1.0
    };
    sign * (degrees + minutes / 60.0 + seconds / 3600.0)
}

// Much slower than the in-process parser, but reads containers it cannot.
fn read_exif_exiftool(path: &Path) -> Option<PhotoMetadata> {
    let output = Command::new("exiftool").arg("-json").arg(path).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let json = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value = serde_json::from_str(&json).ok()?;

    let lat = latlon::parse_lat(normalize_degrees(value[0]["GPSLatitude"].as_str()?)).ok()?;
    let lon = latlon::parse_lng(normalize_degrees(value[0]["GPSLongitude"].as_str()?)).ok()?;

    let raw_date = value[0]["DateTimeOriginal"]
        .as_str()
        .or_else(|| value[0]["DateTime"].as_str())
        .or_else(|| value[0]["ModifyDate"].as_str())?;
    let date = NaiveDateTime::parse_from_str(raw_date, EXIF_DATE_FORMAT).ok()?;

    Some(PhotoMetadata {
        coordinates: (lat, lon),
        date,
    })
}

// exiftool prints "48 deg 51' 29.6\"", latlon wants the degree sign.
fn normalize_degrees(raw: &str) -> String {
    str::replace(raw, " deg", "°")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dms_conversion_and_signs() {
        let north = dms_to_decimal(48.0, 51.0, 29.6, "N");
        assert!((north - 48.858222).abs() < 1e-5);

        let south = dms_to_decimal(33.0, 51.0, 35.9, "S");
        assert!((south + 33.859972).abs() < 1e-5);

        let west = dms_to_decimal(122.0, 25.0, 9.9, "W");
        assert!(west < 0.0);
    }

    #[test]
    fn exif_dates_parse() {
        let date = NaiveDateTime::parse_from_str("2023:06:01 15:04:05", EXIF_DATE_FORMAT).unwrap();

        assert_eq!(date.format("%Y-%m-%d %H:%M:%S").to_string(), "2023-06-01 15:04:05");
    }

    #[test]
    fn exiftool_degree_markers_normalize() {
        assert_eq!(
            normalize_degrees("48 deg 51' 29.61\" N"),
            "48° 51' 29.61\" N"
        );
    }

    #[test]
    fn metadata_serde_round_trip() {
        let metadata = PhotoMetadata {
            coordinates: (48.8582, 2.2945),
            date: NaiveDateTime::parse_from_str("2023:06:01 15:04:05", EXIF_DATE_FORMAT).unwrap(),
        };

        let json = serde_json::to_string(&metadata).unwrap();
        let back: PhotoMetadata = serde_json::from_str(&json).unwrap();

        assert_eq!(back, metadata);
    }
}
