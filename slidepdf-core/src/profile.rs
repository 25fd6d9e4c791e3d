//! Pacing profiles: per-page expected arrival times recorded by a previous
//! timed run. The file format is the shutdown report itself, so a rehearsal
//! can be replayed as the pacing reference for the real talk.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile format not recognized")]
    BadHeader,
    #[error("invalid page number")]
    InvalidPage,
    #[error("invalid timing information")]
    InvalidTiming,
    #[error("unable to read profile: {0}")]
    Io(#[from] std::io::Error),
}

const HEADER: [&str; 4] = ["page", "duration", "enter", "leave"];

/// Expected elapsed seconds per page index, non-decreasing by construction.
/// Never mutated after loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationProfile {
    expected: Vec<u64>,
}

impl PresentationProfile {
    /// Builds a profile from raw per-page seconds, coercing the sequence to
    /// be non-decreasing. Pacing math requires monotonicity; a decrease is
    /// clamped up to the running maximum with a warning.
    pub fn from_seconds(mut expected: Vec<u64>) -> Self {
        let mut floor = 0;
        for (index, value) in expected.iter_mut().enumerate() {
            if *value >= floor {
                floor = *value;
            } else {
                if *value != 0 {
                    warn!(
                        page = index + 1,
                        "page reached too early in profile, clamping to keep it monotonic"
                    );
                }
                *value = floor;
            }
        }
        Self { expected }
    }

    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Parses the `page duration enter leave` table. Rejects the whole file
    /// on a bad header, a non-positive page number or a missing colon in the
    /// leave time; a non-numeric row ends the input (stream semantics).
    pub fn parse(input: &str) -> Result<Self, ProfileError> {
        let mut tokens = input.split_whitespace();

        let header: Vec<&str> = tokens.by_ref().take(4).collect();
        if header != HEADER {
            return Err(ProfileError::BadHeader);
        }

        let mut expected: Vec<u64> = Vec::new();
        loop {
            let Some(page_token) = tokens.next() else {
                break;
            };
            let (Some(_duration), Some(_enter), Some(leave)) =
                (tokens.next(), tokens.next(), tokens.next())
            else {
                break;
            };

            let Ok(page) = page_token.parse::<i64>() else {
                break;
            };
            if page < 1 {
                return Err(ProfileError::InvalidPage);
            }
            let page = page as usize;

            let Some((minutes_token, seconds_token)) = leave.split_once(':') else {
                return Err(ProfileError::InvalidTiming);
            };
            let (Ok(minutes), Ok(seconds)) =
                (minutes_token.parse::<u64>(), seconds_token.parse::<u64>())
            else {
                break;
            };

            if expected.len() < page {
                expected.resize(page, 0);
            }
            if expected[page - 1] != 0 {
                warn!(page, "page revisited in profile, ignoring later entry");
            } else {
                expected[page - 1] = 60 * minutes + seconds;
            }
        }

        Ok(Self::from_seconds(expected))
    }

    pub fn is_empty(&self) -> bool {
        self.expected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.expected.len()
    }

    /// Expected elapsed seconds when entering `page`, if the profile covers
    /// that index.
    pub fn expected(&self, page: usize) -> Option<u64> {
        self.expected.get(page).copied()
    }

    /// The profile's final (maximum) value.
    pub fn max_duration(&self) -> u64 {
        self.expected.last().copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_report_style_rows() {
        let input = "\
    page duration enter leave
       1     0:30  0:00  0:30
       2     0:20  0:30  0:50
       3     0:15  0:50  1:05
";
        let profile = PresentationProfile::parse(input).unwrap();
        assert_eq!(profile.len(), 3);
        assert_eq!(profile.expected(0), Some(30));
        assert_eq!(profile.expected(1), Some(50));
        assert_eq!(profile.expected(2), Some(65));
        assert_eq!(profile.max_duration(), 65);
    }

    #[test]
    fn row_for_a_later_page_leaves_earlier_pages_at_zero() {
        let input = "page duration enter leave\n3 x y 1:05\n";
        let profile = PresentationProfile::parse(input).unwrap();
        assert_eq!(profile.len(), 3);
        assert_eq!(profile.expected(0), Some(0));
        assert_eq!(profile.expected(1), Some(0));
        assert_eq!(profile.expected(2), Some(65));
    }

    #[test]
    fn rejects_unknown_header() {
        let err = PresentationProfile::parse("slide duration enter leave\n").unwrap_err();
        assert!(matches!(err, ProfileError::BadHeader));
    }

    #[test]
    fn rejects_non_positive_page_number() {
        let input = "page duration enter leave\n0 x y 0:10\n";
        assert!(matches!(
            PresentationProfile::parse(input),
            Err(ProfileError::InvalidPage)
        ));
        let input = "page duration enter leave\n-3 x y 0:10\n";
        assert!(matches!(
            PresentationProfile::parse(input),
            Err(ProfileError::InvalidPage)
        ));
    }

    #[test]
    fn rejects_leave_time_without_colon() {
        let input = "page duration enter leave\n1 x y 105\n";
        assert!(matches!(
            PresentationProfile::parse(input),
            Err(ProfileError::InvalidTiming)
        ));
    }

    #[test]
    fn repeated_page_keeps_first_occurrence() {
        let input = "page duration enter leave\n2 x y 0:40\n2 x y 0:55\n";
        let profile = PresentationProfile::parse(input).unwrap();
        assert_eq!(profile.expected(1), Some(40));
    }

    #[test]
    fn non_numeric_row_ends_the_input() {
        let input = "page duration enter leave\n1 x y 0:10\ntrailing garbage here now\n";
        let profile = PresentationProfile::parse(input).unwrap();
        assert_eq!(profile.len(), 1);
        assert_eq!(profile.expected(0), Some(10));
    }

    #[test]
    fn clamps_decreasing_values_to_previous_maximum() {
        let profile = PresentationProfile::from_seconds(vec![0, 50, 30, 80]);
        assert_eq!(profile.expected(0), Some(0));
        assert_eq!(profile.expected(1), Some(50));
        assert_eq!(profile.expected(2), Some(50));
        assert_eq!(profile.expected(3), Some(80));
    }

    #[test]
    fn loads_from_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page duration enter leave").unwrap();
        writeln!(file, "1 0:10 0:00 0:10").unwrap();
        writeln!(file, "2 0:05 0:10 0:15").unwrap();

        let profile = PresentationProfile::load(file.path()).unwrap();
        assert_eq!(profile.len(), 2);
        assert_eq!(profile.expected(1), Some(15));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = PresentationProfile::load(Path::new("/nonexistent/profile.txt")).unwrap_err();
        assert!(matches!(err, ProfileError::Io(_)));
    }
}
