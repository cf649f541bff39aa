//! Venue (terrain) labels: `A`..`Z`, then `AA`..`ZZ`.

use crate::error::{Result, ScheduleError};

const LETTERS: usize = 26;

/// Number of addressable venues (26 single letters + 676 double letters).
pub const MAX_VENUES: usize = LETTERS + LETTERS * LETTERS;

fn letter(index: usize) -> char {
    // index < 26 is guaranteed by the callers
    char::from(b'A' + index as u8)
}

/// Label of the 0-based venue `index`.
///
/// # Errors
/// [`ScheduleError::VenueOutOfRange`] for `index >= 702`.
pub fn venue_label(index: usize) -> Result<String> {
    if index >= MAX_VENUES {
        return Err(ScheduleError::VenueOutOfRange(index));
    }
    if index < LETTERS {
        return Ok(letter(index).to_string());
    }
    let adjusted = index - LETTERS;
    Ok(format!(
        "{}{}",
        letter(adjusted / LETTERS),
        letter(adjusted % LETTERS)
    ))
}

/// The first `count` venue labels.
///
/// # Errors
/// [`ScheduleError::VenueOutOfRange`] if `count` is zero or greater than [`MAX_VENUES`].
pub fn venue_labels(count: usize) -> Result<Vec<String>> {
    if count == 0 || count > MAX_VENUES {
        return Err(ScheduleError::VenueOutOfRange(count));
    }
    (0..count).map(venue_label).collect()
}

#[cfg(test)]
mod venue_tests {
    use super::*;

    #[test]
    fn test_single_letters() {
        assert_eq!(venue_label(0).unwrap(), "A");
        assert_eq!(venue_label(25).unwrap(), "Z");
    }

    #[test]
    fn test_double_letters() {
        assert_eq!(venue_label(26).unwrap(), "AA");
        assert_eq!(venue_label(27).unwrap(), "AB");
        assert_eq!(venue_label(52).unwrap(), "BA");
        assert_eq!(venue_label(701).unwrap(), "ZZ");
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(venue_label(702), Err(ScheduleError::VenueOutOfRange(702)));
        assert!(venue_labels(0).is_err());
        assert!(venue_labels(703).is_err());
    }

    #[test]
    fn test_labels_are_unique() {
        let labels = venue_labels(MAX_VENUES).unwrap();
        let unique = labels.iter().collect::<std::collections::HashSet<_>>();
        assert_eq!(unique.len(), MAX_VENUES);
        assert_eq!(labels[28], "AC");
    }
}
