use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::MovieRecord;

/// Errors for aggregation over a catalog.
#[derive(Debug, Error, PartialEq)]
pub enum AggregateError {
    #[error("The catalog is empty")]
    EmptyCatalog,
}

impl AggregateError {
    pub fn kind(&self) -> &'static str {
        match self {
            AggregateError::EmptyCatalog => "empty_catalog",
        }
    }
}

/// Rating statistics for a non-empty catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingStats {
    pub average: f64,
    pub median: f64,
    /// Highest rating in the catalog.
    pub best_rating: f64,
    /// Every title holding the highest rating, in catalog order.
    pub best: Vec<String>,
    pub worst_rating: f64,
    /// Every title holding the lowest rating, in catalog order.
    pub worst: Vec<String>,
}

/// Title, year and rating of one movie, as listed by queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieSummary {
    pub title: String,
    pub year: i32,
    pub rating: f64,
}

impl From<&MovieRecord> for MovieSummary {
    fn from(record: &MovieRecord) -> Self {
        Self {
            title: record.title.clone(),
            year: record.year,
            rating: record.rating,
        }
    }
}

/// Optional, independent bounds for [`filter`](super::filter).
///
/// A record passes when it satisfies every bound that is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieFilter {
    /// Inclusive lower bound on rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    /// Inclusive lower bound on year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
    /// Inclusive upper bound on year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_year: Option<i32>,
}

impl MovieFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    pub fn with_start_year(mut self, start_year: i32) -> Self {
        self.start_year = Some(start_year);
        self
    }

    pub fn with_end_year(mut self, end_year: i32) -> Self {
        self.end_year = Some(end_year);
        self
    }

    /// True when no bound is set.
    pub fn is_empty(&self) -> bool {
        self.min_rating.is_none() && self.start_year.is_none() && self.end_year.is_none()
    }

    pub fn matches(&self, record: &MovieRecord) -> bool {
        self.min_rating.map_or(true, |min| record.rating >= min)
            && self.start_year.map_or(true, |start| record.year >= start)
            && self.end_year.map_or(true, |end| record.year <= end)
    }
}

/// Number of ratings in `[lower, upper)`; the last bin also holds `upper`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}
