//! Movie records and the ordered catalog they live in.

mod types;
mod validate;

pub use types::{Catalog, MovieRecord};
pub use validate::{
    current_year, parse_year, ValidationError, ValidationMode, MAX_RATING, MIN_RATING,
};
pub(crate) use validate::{check_rating, check_title};
