use crate::error::MapError;
use crate::photo::Photo;

/// A rendering viewport in lat/long degree space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_long: f64,
    pub max_long: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl Extent {
    pub fn width(&self) -> f64 {
        self.max_long - self.min_long
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }
}

/// Compute the viewport around a set of photos at a given width:height ratio.
///
/// The box is centered on the data, padded by 10%, and grown (never shrunk)
/// along one axis until it meets the ratio. All photos on one point, or on a
/// single meridian or parallel, fall back to a +-0.5 degree box before the
/// ratio step. The result is not clamped to +-90/+-180: near the poles or
/// the antimeridian the box can leave the valid coordinate range, which
/// matches the historical behavior downstream consumers were built against.
pub fn compute_extent(photos: &[Photo], ratio: f64) -> Result<Extent, MapError> {
    if photos.is_empty() {
        return Err(MapError::EmptyInput);
    }

    let mut minlat = f64::INFINITY;
    let mut maxlat = f64::NEG_INFINITY;
    let mut minlong = f64::INFINITY;
    let mut maxlong = f64::NEG_INFINITY;
    for photo in photos {
        let (lat, lon) = photo.coords;
        if !lat.is_finite() || !lon.is_finite() {
            return Err(MapError::InvalidCoordinate { lat, lon });
        }
        minlat = minlat.min(lat);
        maxlat = maxlat.max(lat);
        minlong = minlong.min(lon);
        maxlong = maxlong.max(lon);
    }

    let center_lat = (minlat + maxlat) / 2.0;
    let center_long = (minlong + maxlong) / 2.0;

    let mut vlat = (maxlat - minlat).abs() / 2.0 * 1.1;
    let mut vlong = (maxlong - minlong).abs() / 2.0 * 1.1;

    // One degenerate axis resets both: a line of photos still gets a box.
    if vlat == 0.0 || vlong == 0.0 {
        vlat = 0.5;
        vlong = 0.5;
    }

    if vlat < vlong / ratio {
        vlat = vlong / ratio;
    } else if vlong < vlat * ratio {
        vlong = vlat * ratio;
    }

    Ok(Extent {
        min_long: center_long - vlong,
        max_long: center_long + vlong,
        min_lat: center_lat - vlat,
        max_lat: center_lat + vlat,
    })
}
