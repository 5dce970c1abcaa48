use std::cmp::Ordering;

use chrono::NaiveDateTime;

/// A geotagged photo: where it was taken and when.
///
/// Ordering and equality look at the capture time only; two photos taken in
/// the same second compare equal even when their coordinates differ. Frame
/// boundaries depend on this tie-break, so keep it a single-field comparison.
#[derive(Debug, Clone)]
pub struct Photo {
    pub path: String,
    /// (latitude, longitude) in decimal degrees.
    pub coords: (f64, f64),
    pub date: NaiveDateTime,
}

impl Photo {
    pub fn new(path: impl Into<String>, coords: (f64, f64), date: NaiveDateTime) -> Photo {
        Photo {
            path: path.into(),
            coords,
            date,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.coords.0
    }

    pub fn longitude(&self) -> f64 {
        self.coords.1
    }
}

impl PartialEq for Photo {
    fn eq(&self, other: &Photo) -> bool {
        self.date == other.date
    }
}

impl Eq for Photo {}

impl PartialOrd for Photo {
    fn partial_cmp(&self, other: &Photo) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Photo {
    fn cmp(&self, other: &Photo) -> Ordering {
        self.date.cmp(&other.date)
    }
}
