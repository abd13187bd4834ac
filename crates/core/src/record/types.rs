use serde::{Deserialize, Serialize};

use super::validate::{check_rating, check_title, check_year, ValidationError};

/// A single catalogued movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Unique, case-sensitive key within a catalog.
    pub title: String,
    /// Release year.
    pub year: i32,
    /// Rating in [0, 10].
    pub rating: f64,
    /// Poster URI; empty when there is none.
    #[serde(default)]
    pub poster: String,
}

impl MovieRecord {
    /// Build a validated record.
    pub fn new(
        title: impl Into<String>,
        year: i32,
        rating: f64,
        poster: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let record = Self {
            title: title.into(),
            year,
            rating,
            poster: poster.into(),
        };
        record.validate()?;
        Ok(record)
    }

    /// Check every field against its domain.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_title(&self.title)?;
        check_year(self.year)?;
        check_rating(self.rating)?;
        Ok(())
    }

    pub fn has_poster(&self) -> bool {
        !self.poster.is_empty()
    }
}

/// An ordered collection of movies keyed by title.
///
/// Titles are unique. Iteration follows insertion order; replacing an
/// existing title keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<MovieRecord>", into = "Vec<MovieRecord>")]
pub struct Catalog {
    records: Vec<MovieRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from records, later duplicates replacing earlier ones.
    pub fn from_records(records: impl IntoIterator<Item = MovieRecord>) -> Self {
        let mut catalog = Self::new();
        for record in records {
            catalog.upsert(record);
        }
        catalog
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, title: &str) -> Option<&MovieRecord> {
        self.records.iter().find(|r| r.title == title)
    }

    pub fn get_mut(&mut self, title: &str) -> Option<&mut MovieRecord> {
        self.records.iter_mut().find(|r| r.title == title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.get(title).is_some()
    }

    /// Insert or replace by title. Returns the replaced record, if any.
    pub fn upsert(&mut self, record: MovieRecord) -> Option<MovieRecord> {
        match self.get_mut(&record.title) {
            Some(existing) => Some(std::mem::replace(existing, record)),
            None => {
                self.records.push(record);
                None
            }
        }
    }

    /// Remove by title, preserving the order of the remaining records.
    pub fn remove(&mut self, title: &str) -> Option<MovieRecord> {
        let index = self.records.iter().position(|r| r.title == title)?;
        Some(self.records.remove(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MovieRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn titles(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.title.as_str()).collect()
    }

    pub fn into_records(self) -> Vec<MovieRecord> {
        self.records
    }
}

impl From<Vec<MovieRecord>> for Catalog {
    fn from(records: Vec<MovieRecord>) -> Self {
        Self::from_records(records)
    }
}

impl From<Catalog> for Vec<MovieRecord> {
    fn from(catalog: Catalog) -> Self {
        catalog.records
    }
}

impl FromIterator<MovieRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = MovieRecord>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}

impl IntoIterator for Catalog {
    type Item = MovieRecord;
    type IntoIter = std::vec::IntoIter<MovieRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a MovieRecord;
    type IntoIter = std::slice::Iter<'a, MovieRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
