//! DataIndex building and indexing logic.
//!
//! Loading happens in three steps:
//! - parse the three tables (in parallel)
//! - build secondary indices (genre token -> movies, year -> movies)
//! - recompute per-genre ROI volatility and reconcile the overall stats table

use crate::error::{DataLoadError, Result};
use crate::numeric;
use crate::parser;
use crate::types::*;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{info, instrument, warn};

/// Preferred movie table.
pub const MASTER_MOVIES_FILE: &str = "master_movies_dataset.csv";
/// Movie table used when the master dataset is absent.
pub const FALLBACK_MOVIES_FILE: &str = "merged_bollywood_movies.csv";
pub const GENRE_YEAR_STATS_FILE: &str = "genre_year_statistics.csv";
pub const GENRE_OVERALL_STATS_FILE: &str = "genre_overall_statistics.csv";

impl DataIndex {
    /// Load all three tables from a directory.
    ///
    /// This is the main entry point for loading data. Any error here is
    /// fatal for the service.
    #[instrument]
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        info!("Loading movie analytics tables from {:?}", data_dir);

        // 1. Pick the movie table
        let mut movies_path = data_dir.join(MASTER_MOVIES_FILE);
        if !movies_path.exists() {
            warn!(
                "{} not found, falling back to {}",
                MASTER_MOVIES_FILE, FALLBACK_MOVIES_FILE
            );
            movies_path = data_dir.join(FALLBACK_MOVIES_FILE);
        }
        let year_stats_path = data_dir.join(GENRE_YEAR_STATS_FILE);
        let overall_stats_path = data_dir.join(GENRE_OVERALL_STATS_FILE);

        // 2. Parse all three files in parallel
        let ((movies, year_stats), overall_stats) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_movies(&movies_path),
                    || parser::parse_genre_year_stats(&year_stats_path),
                )
            },
            || parser::parse_genre_overall_stats(&overall_stats_path),
        );

        let movies = movies?;
        let year_stats = year_stats?;
        let overall_stats = overall_stats?;

        let mut index = DataIndex::from_parts(movies, year_stats, overall_stats)?;
        index.movie_source = movies_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());

        let (movies, year_rows, overall_rows) = index.counts();
        info!(
            "Loaded {} movies from {}, {} genre-year statistics, {} genre overall statistics",
            movies,
            index.movie_source().unwrap_or("<memory>"),
            year_rows,
            overall_rows
        );
        Ok(index)
    }

    /// Build a finalized index from already parsed tables.
    pub fn from_parts(
        movies: Vec<MovieRecord>,
        year_stats: Vec<GenreYearStat>,
        overall_stats: Vec<GenreOverallStat>,
    ) -> Result<Self> {
        let mut index = DataIndex::new();
        for movie in movies {
            index.insert_movie(movie);
        }
        for stat in year_stats {
            index.insert_year_stat(stat);
        }
        for stat in overall_stats {
            index.insert_overall_stat(stat);
        }
        index.finalize()?;
        Ok(index)
    }

    /// Build indices and derived columns once all rows have been inserted.
    pub fn finalize(&mut self) -> Result<()> {
        self.drop_unnamed_stats();
        self.validate()?;
        self.build_secondary_indices();
        self.reconcile_overall_stats();
        self.recompute_genre_volatility();
        Ok(())
    }

    /// Build the genre and year indices.
    ///
    /// Every statistic that needs per-genre grouping reads from these
    /// instead of re-splitting genre strings.
    pub fn build_secondary_indices(&mut self) {
        self.genre_index.clear();
        self.year_index.clear();

        for (idx, movie) in self.movies.iter().enumerate() {
            // A movie is listed once under each distinct token
            let mut seen = HashSet::new();
            for genre in movie.genre_tokens() {
                if seen.insert(genre) {
                    self.genre_index
                        .entry(genre.to_string())
                        .or_insert_with(Vec::new)
                        .push(idx);
                }
            }

            if let Some(year) = movie.year {
                self.year_index
                    .entry(year)
                    .or_insert_with(Vec::new)
                    .push(idx);
            }
        }
    }

    /// Drop statistics rows with a blank genre instead of failing the load.
    fn drop_unnamed_stats(&mut self) {
        let years_before = self.genre_year_stats.len();
        self.genre_year_stats.retain(|s| !s.genre.trim().is_empty());
        let overall_before = self.genre_overall_stats.len();
        self.genre_overall_stats.retain(|s| !s.genre.trim().is_empty());

        let dropped = (
            years_before - self.genre_year_stats.len(),
            overall_before - self.genre_overall_stats.len(),
        );
        if dropped != (0, 0) {
            warn!(
                "Skipped statistics rows without a genre ({} genre-year, {} overall)",
                dropped.0, dropped.1
            );
        }
    }

    /// Make the overall table hold exactly one row per genre.
    ///
    /// Duplicate rows keep their first occurrence. Genre tokens that occur
    /// in the movie table but not in the overall table get a row computed
    /// from the movies themselves.
    pub fn reconcile_overall_stats(&mut self) {
        let mut seen = HashSet::new();
        let before = self.genre_overall_stats.len();
        self.genre_overall_stats
            .retain(|s| seen.insert(s.genre.clone()));
        if self.genre_overall_stats.len() != before {
            warn!(
                "Dropped {} duplicate genre rows from overall statistics",
                before - self.genre_overall_stats.len()
            );
        }

        let mut missing: Vec<&String> = self
            .genre_index
            .keys()
            .filter(|g| !seen.contains(*g))
            .collect();
        missing.sort();

        let synthesized: Vec<GenreOverallStat> = missing
            .into_iter()
            .map(|genre| self.aggregate_genre(genre))
            .collect();
        if !synthesized.is_empty() {
            warn!(
                "Synthesized overall statistics for {} genres missing from the table",
                synthesized.len()
            );
        }
        self.genre_overall_stats.extend(synthesized);
    }

    /// Recompute `roi_volatility` of every overall row from the movie table.
    ///
    /// Volatility is the sample standard deviation (ddof = 1) of ROI over the
    /// movies carrying the genre token; 0.0 for one movie or none.
    pub fn recompute_genre_volatility(&mut self) {
        let volatility: HashMap<&str, f64> = self
            .genre_index
            .iter()
            .map(|(genre, indices)| {
                let rois: Vec<f64> = indices.iter().map(|&i| self.movies[i].roi).collect();
                (genre.as_str(), numeric::sample_std(&rois))
            })
            .collect();

        let mut updated = 0;
        for stat in &mut self.genre_overall_stats {
            stat.roi_volatility = volatility.get(stat.genre.as_str()).copied().unwrap_or(0.0);
            updated += 1;
        }
        info!("Recalculated ROI volatility for {} genres", updated);
    }

    /// Aggregate a genre row directly from the movies carrying the token.
    fn aggregate_genre(&self, genre: &str) -> GenreOverallStat {
        let movies: Vec<&MovieRecord> = self
            .get_movies_by_genre(genre)
            .iter()
            .map(|&i| &self.movies[i])
            .collect();
        if movies.is_empty() {
            return GenreOverallStat::empty(genre);
        }

        let ratings: Vec<f64> = movies.iter().filter_map(|m| m.imdb_rating).collect();
        let budgets: Vec<f64> = movies.iter().filter_map(|m| m.budget).collect();
        let rois: Vec<f64> = movies.iter().map(|m| m.roi).collect();
        let hits = movies.iter().filter(|m| m.is_hit()).count();

        GenreOverallStat {
            genre: genre.to_string(),
            total_movies: movies.len() as u32,
            avg_rating: numeric::mean(&ratings).unwrap_or(0.0),
            avg_budget: numeric::mean(&budgets).unwrap_or(0.0),
            total_box_office: movies.iter().filter_map(|m| m.box_office).sum(),
            success_rate: hits as f64 / movies.len() as f64 * 100.0,
            avg_roi: numeric::mean(&rois).unwrap_or(0.0),
            roi_volatility: numeric::sample_std(&rois),
        }
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - the movie table is not empty
    /// - release months are calendar months
    pub fn validate(&self) -> Result<()> {
        if self.movies.is_empty() {
            return Err(DataLoadError::ValidationError(
                "movie table contains no rows".to_string(),
            ));
        }
        for movie in &self.movies {
            if let Some(month) = movie.release_month {
                if !(1..=12).contains(&month) {
                    return Err(DataLoadError::InvalidValue {
                        field: "release_month".to_string(),
                        value: month.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
