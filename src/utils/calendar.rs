use crate::error::{ProcessingError, Result};
use chrono::{Datelike, NaiveDate};

/// Days elapsed before the first of each month, for common and leap years.
/// The final entry is the length of the year.
const CUMULATIVE_DAYS: [[u16; 13]; 2] = [
    [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365],
    [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335, 366],
];

pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 4 == 0 && year % 100 != 0)
}

pub fn year_length(year: i32) -> usize {
    cumulative_table(year)[12] as usize
}

fn cumulative_table(year: i32) -> &'static [u16; 13] {
    &CUMULATIVE_DAYS[is_leap_year(year) as usize]
}

/// Parse an 8-digit `YYYYMMDD` token into a calendar date.
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    let date = date.trim();
    if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProcessingError::Format(format!(
            "Invalid date format: '{}'. Expected format: 'YYYYMMDD'",
            date
        )));
    }

    NaiveDate::parse_from_str(date, "%Y%m%d")
        .map_err(|_| ProcessingError::Format(format!("Invalid calendar date: '{}'", date)))
}

/// 0-based day-of-year index of a calendar date.
pub fn day_index(date: NaiveDate) -> usize {
    let month_start = cumulative_table(date.year())[date.month0() as usize] as usize;
    month_start + date.day0() as usize
}

/// 0-based day-of-year index of a `YYYYMMDD` token, in `[0, year_length - 1]`.
pub fn day_of_year_index(date: &str) -> Result<usize> {
    parse_date(date).map(day_index)
}

/// Inverse of [`day_index`] for a given year.
pub fn date_from_index(year: i32, index: usize) -> Option<NaiveDate> {
    let table = cumulative_table(year);
    if index >= table[12] as usize {
        return None;
    }

    let month0 = table[1..].iter().position(|&end| index < end as usize)?;
    let day0 = index - table[month0] as usize;
    NaiveDate::from_ymd_opt(year, month0 as u32 + 1, day0 as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leap_year_rule() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(1996));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert!(is_leap_year(2400));
    }

    #[test]
    fn test_97_leap_years_per_400() {
        for start in [1600, 1753, 1901, 2001] {
            let leap = (start..start + 400).filter(|&y| is_leap_year(y)).count();
            assert_eq!(leap, 97, "window starting {}", start);
        }
    }

    #[test]
    fn test_year_length() {
        assert_eq!(year_length(1950), 365);
        assert_eq!(year_length(1952), 366);
        assert_eq!(year_length(2000), 366);
        assert_eq!(year_length(2100), 365);
    }

    #[test]
    fn test_day_of_year_index() {
        assert_eq!(day_of_year_index("19500101").unwrap(), 0);
        assert_eq!(day_of_year_index("19500301").unwrap(), 59);
        assert_eq!(day_of_year_index("19520301").unwrap(), 60);
        assert_eq!(day_of_year_index("19501231").unwrap(), 364);
        assert_eq!(day_of_year_index("20001231").unwrap(), 365);
    }

    #[test]
    fn test_index_round_trip_covers_every_day() {
        for year in [1900, 1950, 1952, 2000] {
            let mut date = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
            let mut expected = 0;
            while date.year() == year {
                let token = date.format("%Y%m%d").to_string();
                let index = day_of_year_index(&token).unwrap();
                assert_eq!(index, expected);
                assert_eq!(date_from_index(year, index), Some(date));
                expected += 1;
                date = date.succ_opt().unwrap();
            }
            assert_eq!(expected, year_length(year));
            assert_eq!(date_from_index(year, expected), None);
        }
    }

    #[test]
    fn test_malformed_dates() {
        assert!(day_of_year_index("1950011").is_err());
        assert!(day_of_year_index("1950-01-01").is_err());
        assert!(day_of_year_index("19500230").is_err());
        assert!(day_of_year_index("19501301").is_err());
        assert!(matches!(
            parse_date("abcdefgh"),
            Err(ProcessingError::Format(_))
        ));
    }
}
