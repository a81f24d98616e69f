//! Genre combinations analysed as atomic categories.
//!
//! A combination is the full pipe-joined genre string of a multi-genre
//! movie, so `"Action|Drama"` and `"Drama|Action"` are different rows.

use crate::risk::Confidence;
use data_loader::numeric::{mean, round2};
use data_loader::{DataIndex, MovieRecord};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

const HEADLINE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinationStat {
    pub combination: String,
    pub total_movies: usize,
    pub success_rate: f64,
    pub avg_roi: f64,
    pub total_revenue: i64,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinationReport {
    pub top_10: Vec<CombinationStat>,
    pub bottom_10: Vec<CombinationStat>,
    /// Every combination, best average ROI first
    pub all_combinations: Vec<CombinationStat>,
}

fn summarise(combination: &str, movies: &[&MovieRecord]) -> CombinationStat {
    let n = movies.len();
    let hits = movies.iter().filter(|m| m.is_hit()).count();
    let rois: Vec<f64> = movies.iter().map(|m| m.roi).collect();
    let revenue: f64 = movies.iter().filter_map(|m| m.box_office).sum();

    CombinationStat {
        combination: combination.to_string(),
        total_movies: n,
        success_rate: round2(hits as f64 / n as f64 * 100.0),
        avg_roi: round2(mean(&rois).unwrap_or(0.0)),
        total_revenue: revenue as i64,
        confidence: Confidence::from_sample_size(n as u32),
    }
}

/// Statistics for every multi-genre string, sorted by average ROI.
///
/// Ties keep the order in which combinations first appear in the movie table.
#[instrument(skip(index))]
pub fn genre_combinations(index: &DataIndex) -> CombinationReport {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&MovieRecord>> = HashMap::new();
    for movie in index.movies().iter().filter(|m| m.is_combination()) {
        let members = groups.entry(movie.genre.as_str()).or_insert_with(|| {
            order.push(movie.genre.as_str());
            Vec::new()
        });
        members.push(movie);
    }

    let mut all: Vec<CombinationStat> = order
        .iter()
        .filter_map(|combo| groups.get(combo).map(|movies| summarise(combo, movies)))
        .collect();
    all.sort_by(|a, b| b.avg_roi.total_cmp(&a.avg_roi));
    debug!("Analysed {} genre combinations", all.len());

    let top_10 = all.iter().take(HEADLINE_SIZE).cloned().collect();
    let bottom_10 = all[all.len().saturating_sub(HEADLINE_SIZE)..].to_vec();

    CombinationReport {
        top_10,
        bottom_10,
        all_combinations: all,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(genre: &str, roi: f64, hit: bool) -> MovieRecord {
        let mut m = MovieRecord::new("M", genre);
        m.roi = roi;
        m.box_office = Some(100.0);
        m.success_label = Some(if hit { "Hit" } else { "Flop" }.to_string());
        m
    }

    #[test]
    fn test_combinations_are_grouped_and_ranked() {
        let mut index = DataIndex::new();
        index.insert_movie(movie("Action|Drama", 1.0, true));
        index.insert_movie(movie("Drama", 9.0, true));
        index.insert_movie(movie("Comedy|Romance", 3.0, false));
        index.insert_movie(movie("Action|Drama", 2.0, false));
        index.insert_movie(movie("Drama|Action", 1.5, true));

        let report = genre_combinations(&index);
        let names: Vec<&str> = report
            .all_combinations
            .iter()
            .map(|c| c.combination.as_str())
            .collect();
        // Equal averages keep first-appearance order
        assert_eq!(names, vec!["Comedy|Romance", "Action|Drama", "Drama|Action"]);

        let action_drama = &report.all_combinations[1];
        assert_eq!(action_drama.total_movies, 2);
        assert_eq!(action_drama.success_rate, 50.0);
        assert_eq!(action_drama.avg_roi, 1.5);
        assert_eq!(action_drama.total_revenue, 200);
        assert_eq!(action_drama.confidence, Confidence::Low);
    }

    #[test]
    fn test_headline_lists_are_consistent() {
        let mut index = DataIndex::new();
        for i in 0..25 {
            index.insert_movie(movie(&format!("Action|G{}", i), i as f64, true));
        }
        let report = genre_combinations(&index);

        assert_eq!(report.all_combinations.len(), 25);
        assert_eq!(report.top_10.as_slice(), &report.all_combinations[..10]);
        assert_eq!(report.bottom_10.as_slice(), &report.all_combinations[15..]);
        assert!(report
            .all_combinations
            .windows(2)
            .all(|w| w[0].avg_roi >= w[1].avg_roi));
    }

    #[test]
    fn test_short_list_shares_rows() {
        let mut index = DataIndex::new();
        index.insert_movie(movie("Action|Drama", 1.0, true));
        index.insert_movie(movie("Drama", 1.0, true));
        let report = genre_combinations(&index);
        assert_eq!(report.top_10, report.bottom_10);
        assert_eq!(report.top_10.len(), 1);
    }
}
