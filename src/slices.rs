use chrono::NaiveDate;

use crate::error::MapError;
use crate::photo::Photo;

/// Lazy iterator over growing prefixes of a time-sorted photo slice.
///
/// One candidate boundary per calendar day between the first and the last
/// photo; a prefix is yielded only when a new photo qualifies, so runs of
/// quiet days collapse into the next emission. Single forward pass, not
/// restartable. Photos all on one day produce no slices at all.
pub struct DaySlices<'a> {
    photos: &'a [Photo],
    next_day: Option<NaiveDate>,
    end_day: NaiveDate,
    last_count: usize,
}

impl<'a> DaySlices<'a> {
    /// `photos` must be non-empty and sorted ascending by capture time.
    pub fn new(photos: &'a [Photo]) -> Result<DaySlices<'a>, MapError> {
        if photos.is_empty() {
            return Err(MapError::EmptyInput);
        }
        if photos.windows(2).any(|pair| pair[0].date > pair[1].date) {
            return Err(MapError::UnsortedSequence);
        }

        let start_day = photos[0].date.date();
        let end_day = photos[photos.len() - 1].date.date();

        Ok(DaySlices {
            photos,
            next_day: start_day.succ_opt(),
            end_day,
            last_count: 0,
        })
    }
}

impl Iterator for DaySlices<'_> {
    type Item = Vec<Photo>;

    fn next(&mut self) -> Option<Vec<Photo>> {
        while let Some(day) = self.next_day {
            if day > self.end_day {
                self.next_day = None;
                break;
            }
            self.next_day = day.succ_opt();

            // Sorted input: the prefix ends at the first photo past the day.
            let count = self
                .photos
                .iter()
                .take_while(|photo| photo.date.date() <= day)
                .count();

            if count != self.last_count {
                self.last_count = count;
                return Some(self.photos[..count].to_vec());
            }
        }
        None
    }
}
