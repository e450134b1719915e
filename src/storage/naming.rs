//! File and directory naming on the data volume.
//!
//! Timestamps are encoded directly in names so that a lexical sort is a
//! chronological sort and no index file is needed:
//!
//! | Unit                 | V1 format        | Example            |
//! |----------------------|------------------|--------------------|
//! | daily reading log    | `YYYYMMDD.txt`   | `20240131.txt`     |
//! | capture hour folder  | `YYYYMMDDHH`     | `2024013114`       |
//! | image                | `image_MMSS.jpg` | `image_0507.jpg`   |
//!
//! Parsing is strict: exact length, ASCII digits only, and a real
//! calendar date.  Anything else is a [`NameError`] and the janitor leaves
//! the unit alone.

use core::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const LOG_EXTENSION: &str = ".txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameError {
    BadLength,
    NotNumeric,
    InvalidDate,
    WrongExtension,
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadLength => write!(f, "unexpected name length"),
            Self::NotNumeric => write!(f, "timestamp is not numeric"),
            Self::InvalidDate => write!(f, "timestamp is not a calendar date"),
            Self::WrongExtension => write!(f, "unexpected extension"),
        }
    }
}

impl std::error::Error for NameError {}

/// Versioned naming scheme.  Only `V1` exists today; the enum keeps room
/// for a format change without breaking eviction of old units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingScheme {
    #[default]
    V1,
}

impl NamingScheme {
    pub fn log_file_name(self, day: NaiveDate) -> String {
        match self {
            Self::V1 => format!("{}{}", day.format("%Y%m%d"), LOG_EXTENSION),
        }
    }

    pub fn parse_log_file_name(self, name: &str) -> Result<NaiveDate, NameError> {
        match self {
            Self::V1 => {
                let stem = name
                    .strip_suffix(LOG_EXTENSION)
                    .ok_or(NameError::WrongExtension)?;
                parse_date(stem)
            }
        }
    }

    pub fn capture_dir_name(self, at: NaiveDateTime) -> String {
        match self {
            Self::V1 => at.format("%Y%m%d%H").to_string(),
        }
    }

    /// Returns the start of the hour the folder holds.
    pub fn parse_capture_dir_name(self, name: &str) -> Result<NaiveDateTime, NameError> {
        match self {
            Self::V1 => {
                if name.len() != 10 {
                    return Err(NameError::BadLength);
                }
                if !name.is_ascii() {
                    return Err(NameError::NotNumeric);
                }
                let (date, hour) = name.split_at(8);
                let date = parse_date(date)?;
                let hour = parse_digits(hour)?;
                let time = NaiveTime::from_hms_opt(hour, 0, 0).ok_or(NameError::InvalidDate)?;
                Ok(date.and_time(time))
            }
        }
    }

    pub fn image_file_name(self, at: NaiveDateTime) -> String {
        match self {
            Self::V1 => format!("image_{:02}{:02}.jpg", at.minute(), at.second()),
        }
    }

    /// Timestamp column of the reading log.
    pub fn log_timestamp(self, at: NaiveDateTime) -> String {
        match self {
            Self::V1 => at.format(LOG_TIMESTAMP_FORMAT).to_string(),
        }
    }

    pub fn parse_log_timestamp(self, text: &str) -> Result<NaiveDateTime, NameError> {
        match self {
            Self::V1 => {
                if text.len() != 19 {
                    return Err(NameError::BadLength);
                }
                let at = NaiveDateTime::parse_from_str(text, LOG_TIMESTAMP_FORMAT)
                    .map_err(|_| NameError::InvalidDate)?;
                // chrono accepts short fields; only the zero-padded form is ours.
                if self.log_timestamp(at) != text {
                    return Err(NameError::InvalidDate);
                }
                Ok(at)
            }
        }
    }
}

const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H:%M:%S";

fn parse_digits(text: &str) -> Result<u32, NameError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NameError::NotNumeric);
    }
    text.parse().map_err(|_| NameError::NotNumeric)
}

fn parse_date(text: &str) -> Result<NaiveDate, NameError> {
    if text.len() != 8 {
        return Err(NameError::BadLength);
    }
    if !text.is_ascii() {
        return Err(NameError::NotNumeric);
    }
    let year = parse_digits(&text[..4])?;
    let month = parse_digits(&text[4..6])?;
    let day = parse_digits(&text[6..])?;
    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or(NameError::InvalidDate)
}
