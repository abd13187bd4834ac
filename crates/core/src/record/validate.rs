//! Field validation for movie records.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest accepted rating.
pub const MIN_RATING: f64 = 0.0;
/// Highest accepted rating.
pub const MAX_RATING: f64 = 10.0;

/// A record field holds a value outside its domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Year is not an integer: {0:?}")]
    Year(String),

    #[error("Year {year} is after the current year {current}")]
    FutureYear { year: i32, current: i32 },

    #[error("Rating must be between 0 and 10, got {0}")]
    Rating(f64),
}

/// How strictly the catalog checks records before writing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Persist records as given.
    #[default]
    Lenient,
    /// Validate every record before it reaches storage.
    Strict,
}

impl ValidationMode {
    pub fn is_strict(self) -> bool {
        matches!(self, ValidationMode::Strict)
    }
}

/// The current calendar year (UTC).
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Parse a year from free text.
///
/// Only the leading run of digits is considered, so ranges such as
/// `"2010–2013"` yield their first year.
pub fn parse_year(input: &str) -> Result<i32, ValidationError> {
    let trimmed = input.trim();
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(ValidationError::Year(input.to_string()));
    }
    digits
        .parse()
        .map_err(|_| ValidationError::Year(input.to_string()))
}

pub(crate) fn check_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(())
}

pub(crate) fn check_year(year: i32) -> Result<(), ValidationError> {
    let current = current_year();
    if year > current {
        return Err(ValidationError::FutureYear { year, current });
    }
    Ok(())
}

pub(crate) fn check_rating(rating: f64) -> Result<(), ValidationError> {
    if !rating.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::Rating(rating));
    }
    Ok(())
}
