//! Best release months for a genre.

use crate::outcome::Outcome;
use chrono::Datelike;
use data_loader::numeric::round2;
use data_loader::{split_genres, DataIndex};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::instrument;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const BEST_MONTHS: usize = 3;

pub fn month_name(month: u32) -> String {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .map_or_else(|| month.to_string(), |name| name.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRoi {
    pub month: String,
    pub avg_roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseTiming {
    /// The genre as queried
    pub genre: String,
    pub best_months: Vec<String>,
    pub message: String,
    pub monthly_data: Vec<MonthlyRoi>,
}

/// Months with the highest mean ROI for the first token of `genre`.
///
/// Movies match when their genre string contains the token, ignoring case.
/// Only movies with a release date count.
#[instrument(skip(index))]
pub fn release_timing(index: &DataIndex, genre: &str) -> Outcome<ReleaseTiming> {
    let primary = split_genres(genre).next().unwrap_or(genre.trim());
    let needle = primary.to_lowercase();

    let dated: Vec<(u32, f64)> = index
        .movies()
        .iter()
        .filter(|m| m.genre.to_lowercase().contains(&needle))
        .filter_map(|m| m.release_date.map(|d| (d.month(), m.roi)))
        .collect();

    if dated.len() < 2 {
        return Outcome::unavailable(format!(
            "Insufficient data for '{}' ({} movies)",
            primary,
            dated.len()
        ));
    }

    let mut by_month: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for (month, roi) in dated {
        let entry = by_month.entry(month).or_insert((0.0, 0));
        entry.0 += roi;
        entry.1 += 1;
    }

    let mut monthly: Vec<(u32, f64)> = by_month
        .into_iter()
        .map(|(month, (sum, n))| (month, sum / n as f64))
        .collect();
    monthly.sort_by(|a, b| b.1.total_cmp(&a.1));
    monthly.truncate(BEST_MONTHS);

    let best_months: Vec<String> = monthly.iter().map(|(m, _)| month_name(*m)).collect();
    let lead: Vec<&str> = best_months.iter().take(2).map(String::as_str).collect();
    let message = format!(
        "{} films historically perform best in {} window.",
        primary,
        lead.join(", ")
    );

    Outcome::Ready(ReleaseTiming {
        genre: genre.to_string(),
        monthly_data: monthly
            .iter()
            .map(|(m, roi)| MonthlyRoi {
                month: month_name(*m),
                avg_roi: round2(*roi),
            })
            .collect(),
        best_months,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use data_loader::MovieRecord;

    fn released(genre: &str, date: (i32, u32, u32), roi: f64) -> MovieRecord {
        let mut m = MovieRecord::new("M", genre);
        m.release_date = NaiveDate::from_ymd_opt(date.0, date.1, date.2);
        m.roi = roi;
        m
    }

    fn fixture() -> DataIndex {
        let mut index = DataIndex::new();
        index.insert_movie(released("Action|Thriller", (2015, 3, 1), 2.0));
        index.insert_movie(released("action", (2016, 3, 20), 4.0));
        index.insert_movie(released("Drama|Action", (2017, 11, 5), 5.0));
        index.insert_movie(released("Action", (2018, 1, 9), 1.0));
        index.insert_movie(released("Action", (2018, 6, 9), 0.5));
        index.insert_movie(MovieRecord::new("Undated", "Action"));
        index.insert_movie(released("Comedy", (2019, 5, 1), 2.0));
        index
    }

    #[test]
    fn test_best_months() {
        let timing = release_timing(&fixture(), "Action|Drama").ready().unwrap();
        assert_eq!(timing.genre, "Action|Drama");
        assert_eq!(timing.best_months, vec!["November", "March", "January"]);
        assert_eq!(
            timing.message,
            "Action films historically perform best in November, March window."
        );
        assert_eq!(
            timing.monthly_data[1],
            MonthlyRoi {
                month: "March".to_string(),
                avg_roi: 3.0
            }
        );
    }

    #[test]
    fn test_insufficient_data() {
        let outcome = release_timing(&fixture(), "Comedy");
        assert_eq!(outcome.error(), Some("Insufficient data for 'Comedy' (1 movies)"));

        let outcome = release_timing(&fixture(), "Western");
        assert_eq!(outcome.error(), Some("Insufficient data for 'Western' (0 movies)"));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(13), "13");
    }
}
