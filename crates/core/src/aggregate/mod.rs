//! Pure queries over a loaded catalog.
//!
//! Nothing in here touches storage. Every function takes a materialized
//! [`Catalog`] and preserves catalog order wherever ties or matches leave
//! the order open.

mod types;

pub use types::{AggregateError, HistogramBin, MovieFilter, MovieSummary, RatingStats};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::record::{Catalog, MovieRecord, MAX_RATING, MIN_RATING};

/// Number of unit-width bins in [`rating_histogram`].
pub const HISTOGRAM_BINS: usize = 10;

/// Average, median, best and worst ratings.
pub fn stats(catalog: &Catalog) -> Result<RatingStats, AggregateError> {
    if catalog.is_empty() {
        return Err(AggregateError::EmptyCatalog);
    }

    let mut ratings: Vec<f64> = catalog.iter().map(|m| m.rating).collect();
    let average = ratings.iter().sum::<f64>() / ratings.len() as f64;

    ratings.sort_by(f64::total_cmp);
    let mid = ratings.len() / 2;
    let median = if ratings.len() % 2 == 0 {
        (ratings[mid - 1] + ratings[mid]) / 2.0
    } else {
        ratings[mid]
    };

    let best_rating = ratings[ratings.len() - 1];
    let worst_rating = ratings[0];

    Ok(RatingStats {
        average,
        median,
        best_rating,
        best: titles_rated(catalog, best_rating),
        worst_rating,
        worst: titles_rated(catalog, worst_rating),
    })
}

fn titles_rated(catalog: &Catalog, rating: f64) -> Vec<String> {
    catalog
        .iter()
        .filter(|m| m.rating == rating)
        .map(|m| m.title.clone())
        .collect()
}

/// Pick one movie uniformly at random.
pub fn random_pick<'a, R>(
    catalog: &'a Catalog,
    rng: &mut R,
) -> Result<&'a MovieRecord, AggregateError>
where
    R: Rng + ?Sized,
{
    catalog
        .records()
        .choose(rng)
        .ok_or(AggregateError::EmptyCatalog)
}

/// Case-insensitive substring search on titles.
pub fn search(catalog: &Catalog, query: &str) -> Vec<MovieSummary> {
    let needle = query.to_lowercase();
    catalog
        .iter()
        .filter(|m| m.title.to_lowercase().contains(&needle))
        .map(MovieSummary::from)
        .collect()
}

/// Highest rating first; equal ratings keep catalog order.
pub fn sort_by_rating(catalog: &Catalog) -> Vec<MovieSummary> {
    let mut sorted: Vec<MovieSummary> = catalog.iter().map(MovieSummary::from).collect();
    sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    sorted
}

/// Sort by year; equal years keep catalog order in either direction.
pub fn sort_by_year(catalog: &Catalog, descending: bool) -> Vec<MovieSummary> {
    let mut sorted: Vec<MovieSummary> = catalog.iter().map(MovieSummary::from).collect();
    if descending {
        sorted.sort_by(|a, b| b.year.cmp(&a.year));
    } else {
        sorted.sort_by_key(|m| m.year);
    }
    sorted
}

/// Keep the records that satisfy every bound of `filter`.
pub fn filter(catalog: &Catalog, filter: &MovieFilter) -> Catalog {
    catalog
        .iter()
        .filter(|m| filter.matches(m))
        .cloned()
        .collect()
}

/// Count ratings in ten unit-width bins over [0, 10].
///
/// A rating of exactly 10 lands in the last bin. Ratings outside the range
/// are not counted.
pub fn rating_histogram(catalog: &Catalog) -> Vec<HistogramBin> {
    let width = (MAX_RATING - MIN_RATING) / HISTOGRAM_BINS as f64;
    let mut bins: Vec<HistogramBin> = (0..HISTOGRAM_BINS)
        .map(|i| HistogramBin {
            lower: MIN_RATING + width * i as f64,
            upper: MIN_RATING + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for rating in catalog.iter().map(|m| m.rating) {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            continue;
        }
        let index = (((rating - MIN_RATING) / width) as usize).min(HISTOGRAM_BINS - 1);
        bins[index].count += 1;
    }
    bins
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn titles(summaries: &[MovieSummary]) -> Vec<&str> {
        summaries.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_stats_ties_at_best() {
        let catalog = fixtures::catalog(&[("A", 2000, 9.0), ("B", 2001, 9.0), ("C", 2002, 5.0)]);
        let stats = stats(&catalog).unwrap();

        assert_eq!(stats.best, vec!["A", "B"]);
        assert_eq!(stats.worst, vec!["C"]);
        assert_eq!((stats.average * 100.0).round() / 100.0, 7.67);
        assert_eq!(stats.median, 9.0);
        assert_eq!(stats.best_rating, 9.0);
        assert_eq!(stats.worst_rating, 5.0);
    }

    #[test]
    fn test_stats_even_count_median() {
        let catalog = fixtures::catalog(&[
            ("A", 2000, 8.0),
            ("B", 2000, 2.0),
            ("C", 2000, 6.0),
            ("D", 2000, 4.0),
        ]);
        let stats = stats(&catalog).unwrap();
        assert_eq!(stats.median, 5.0);
        assert_eq!(stats.average, 5.0);
    }

    #[test]
    fn test_stats_single_movie_is_best_and_worst() {
        let catalog = fixtures::catalog(&[("Solo", 2018, 6.9)]);
        let stats = stats(&catalog).unwrap();
        assert_eq!(stats.best, vec!["Solo"]);
        assert_eq!(stats.worst, vec!["Solo"]);
    }

    #[test]
    fn test_stats_ties_at_worst_keep_catalog_order() {
        let catalog = fixtures::catalog(&[("Z", 2000, 1.0), ("M", 2000, 7.0), ("A", 2000, 1.0)]);
        assert_eq!(stats(&catalog).unwrap().worst, vec!["Z", "A"]);
    }

    #[test]
    fn test_stats_empty_catalog() {
        assert_eq!(stats(&Catalog::new()), Err(AggregateError::EmptyCatalog));
    }

    #[test]
    fn test_random_pick_single_element() {
        let catalog = fixtures::catalog(&[("Only", 2000, 5.0)]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(random_pick(&catalog, &mut rng).unwrap().title, "Only");
        }
    }

    #[test]
    fn test_random_pick_empty_catalog() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            random_pick(&Catalog::new(), &mut rng),
            Err(AggregateError::EmptyCatalog)
        );
    }

    #[test]
    fn test_random_pick_is_deterministic_with_seed() {
        let catalog = fixtures::sample_catalog();
        let first: Vec<String> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..10)
                .map(|_| random_pick(&catalog, &mut rng).unwrap().title.clone())
                .collect()
        };
        let second: Vec<String> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..10)
                .map(|_| random_pick(&catalog, &mut rng).unwrap().title.clone())
                .collect()
        };
        assert_eq!(first, second);
    }

    #[test]
    fn test_random_pick_reaches_every_title() {
        let catalog = fixtures::catalog(&[("A", 2000, 1.0), ("B", 2000, 2.0), ("C", 2000, 3.0)]);
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(random_pick(&catalog, &mut rng).unwrap().title.clone());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_search_case_insensitive_in_catalog_order() {
        let catalog = fixtures::sample_catalog();
        let found = search(&catalog, "THE");
        assert_eq!(
            titles(&found),
            vec!["The Shawshank Redemption", "The Godfather", "The Dark Knight"]
        );
        assert_eq!(found[1].year, 1972);
        assert_eq!(found[1].rating, 9.2);
    }

    #[test]
    fn test_search_no_match_is_empty() {
        assert!(search(&fixtures::sample_catalog(), "zzz").is_empty());
    }

    #[test]
    fn test_sort_by_rating_is_stable() {
        let catalog = fixtures::catalog(&[
            ("Low", 2000, 3.0),
            ("First Tie", 2000, 8.0),
            ("Top", 2000, 9.5),
            ("Second Tie", 2000, 8.0),
        ]);
        assert_eq!(
            titles(&sort_by_rating(&catalog)),
            vec!["Top", "First Tie", "Second Tie", "Low"]
        );
    }

    #[test]
    fn test_sort_by_year_both_directions() {
        let catalog = fixtures::sample_catalog();

        let oldest_first = sort_by_year(&catalog, false);
        assert_eq!(oldest_first[0].title, "The Godfather");
        assert_eq!(oldest_first[1].title, "The Shawshank Redemption");
        assert_eq!(oldest_first[2].title, "Pulp Fiction");

        let latest_first = sort_by_year(&catalog, true);
        assert_eq!(latest_first[0].title, "Cats");
        // 1994 tie keeps catalog order when descending too.
        assert_eq!(latest_first[4].title, "The Shawshank Redemption");
        assert_eq!(latest_first[5].title, "Pulp Fiction");
        assert_eq!(latest_first[6].title, "The Godfather");
    }

    #[test]
    fn test_filter_min_rating_and_start_year() {
        let catalog = fixtures::sample_catalog();
        let result = filter(
            &catalog,
            &MovieFilter::new().with_min_rating(8.0).with_start_year(2000),
        );
        assert_eq!(result.titles(), vec!["The Dark Knight", "Inception"]);
    }

    #[test]
    fn test_filter_without_bounds_is_identity() {
        let catalog = fixtures::sample_catalog();
        let unbounded = MovieFilter::new();
        assert!(unbounded.is_empty());
        assert_eq!(filter(&catalog, &unbounded), catalog);
    }

    #[test]
    fn test_filter_bounds_are_inclusive() {
        let catalog = fixtures::sample_catalog();
        let result = filter(
            &catalog,
            &MovieFilter::new().with_start_year(1994).with_end_year(1994),
        );
        assert_eq!(
            result.titles(),
            vec!["The Shawshank Redemption", "Pulp Fiction"]
        );
    }

    #[test]
    fn test_filter_nothing_matches() {
        let result = filter(
            &fixtures::sample_catalog(),
            &MovieFilter::new().with_end_year(1900),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_rating_histogram_bins() {
        let catalog = fixtures::catalog(&[
            ("A", 2000, 0.0),
            ("B", 2000, 0.99),
            ("C", 2000, 7.0),
            ("D", 2000, 7.5),
            ("E", 2000, 9.99),
            ("F", 2000, 10.0),
            ("Out", 2000, 11.0),
        ]);
        let bins = rating_histogram(&catalog);

        assert_eq!(bins.len(), HISTOGRAM_BINS);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[7].count, 2);
        assert_eq!(bins[9].count, 2);
        assert_eq!(bins[9].lower, 9.0);
        assert_eq!(bins[9].upper, 10.0);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 6);
    }

    #[test]
    fn test_rating_histogram_empty_catalog() {
        let bins = rating_histogram(&Catalog::new());
        assert!(bins.iter().all(|b| b.count == 0));
    }
}
