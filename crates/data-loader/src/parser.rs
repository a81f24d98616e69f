//! Parsers for the three CSV tables.
//!
//! - movie table: title, year, genre/genres, budget, box_office, roi, imdb_rating,
//!   runtime, release_date, release_month, success_label, poster_url
//! - genre_year_statistics.csv: genre, year, total_movies, avg_rating, avg_budget,
//!   total_box_office, success_rate, avg_roi, roi_volatility
//! - genre_overall_statistics.csv: the same without year
//!
//! Numeric cells that do not parse are treated as missing, mirroring how the
//! upstream pipeline coerces them. Missing *columns* are hard errors.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Date layouts seen in the upstream exports, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d %B %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%d-%m-%Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
];

#[derive(Debug, Deserialize)]
struct RawMovieRow {
    title: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    year: Option<f64>,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default)]
    genres: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    budget: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    box_office: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    roi: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    imdb_rating: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    runtime: Option<f64>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    release_month: Option<f64>,
    #[serde(default)]
    success_label: Option<String>,
    #[serde(default)]
    poster_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawGenreStatRow {
    genre: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    year: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    total_movies: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    avg_rating: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    avg_budget: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    total_box_office: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    success_rate: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    avg_roi: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    roi_volatility: Option<f64>,
}

/// Drop NaN and infinite cells; they count as missing like unparsable ones.
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Open a CSV file, turning a missing path into `FileNotFound`.
fn open_csv(path: &Path) -> Result<csv::Reader<File>> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DataLoadError::from_csv(&file_label(path), e))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Fail unless every column in `required` is present in the header row.
fn require_columns(headers: &csv::StringRecord, file: &str, required: &[&str]) -> Result<()> {
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(DataLoadError::MissingColumn {
                file: file.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Parse the movie table from disk.
pub fn parse_movies(path: &Path) -> Result<Vec<MovieRecord>> {
    let reader = open_csv(path)?;
    read_movies(reader, &file_label(path))
}

/// Parse a movie table from any CSV reader.
pub fn read_movies<R: Read>(mut reader: csv::Reader<R>, file: &str) -> Result<Vec<MovieRecord>> {
    let headers = reader
        .headers()
        .map_err(|e| DataLoadError::from_csv(file, e))?
        .clone();
    require_columns(&headers, file, &["title", "year"])?;
    if !headers.iter().any(|h| h == "genre" || h == "genres") {
        return Err(DataLoadError::MissingColumn {
            file: file.to_string(),
            column: "genre".to_string(),
        });
    }

    let mut movies = Vec::new();
    for result in reader.deserialize::<RawMovieRow>() {
        let row = result.map_err(|e| DataLoadError::from_csv(file, e))?;
        movies.push(movie_from_row(row));
    }
    debug!("Parsed {} movie rows from {}", movies.len(), file);
    Ok(movies)
}

fn movie_from_row(row: RawMovieRow) -> MovieRecord {
    // Use `genre` when present, otherwise `genres`
    let raw_genre = row.genre.or(row.genres).unwrap_or_default();
    let release_date = row.release_date.as_deref().and_then(parse_release_date);
    let release_month = finite(row.release_month)
        .filter(|m| (1.0..=12.0).contains(m))
        .map(|m| m as u32)
        .or_else(|| release_date.map(|d| d.month()));

    MovieRecord {
        title: row.title,
        year: finite(row.year).map(|y| y as i32),
        genre: normalize_genre_separators(&raw_genre),
        budget: finite(row.budget),
        box_office: finite(row.box_office),
        roi: finite(row.roi).unwrap_or(0.0),
        imdb_rating: finite(row.imdb_rating),
        runtime: finite(row.runtime),
        release_date,
        release_month,
        success_label: row.success_label.filter(|s| !s.is_empty()),
        poster_url: row.poster_url.filter(|s| !s.is_empty()),
    }
}

/// Parse genre_year_statistics.csv.
pub fn parse_genre_year_stats(path: &Path) -> Result<Vec<GenreYearStat>> {
    let file = file_label(path);
    let mut reader = open_csv(path)?;
    let headers = reader
        .headers()
        .map_err(|e| DataLoadError::from_csv(&file, e))?
        .clone();
    require_columns(&headers, &file, &["genre", "year"])?;

    let mut stats = Vec::new();
    for result in reader.deserialize::<RawGenreStatRow>() {
        let row = result.map_err(|e| DataLoadError::from_csv(&file, e))?;
        let Some(year) = finite(row.year) else {
            warn!("Skipping {} row for '{}' without a year", file, row.genre);
            continue;
        };
        stats.push(GenreYearStat {
            genre: row.genre,
            year: year as i32,
            total_movies: finite(row.total_movies).unwrap_or(0.0) as u32,
            avg_rating: finite(row.avg_rating).unwrap_or(0.0),
            avg_budget: finite(row.avg_budget).unwrap_or(0.0),
            total_box_office: finite(row.total_box_office).unwrap_or(0.0),
            success_rate: finite(row.success_rate).unwrap_or(0.0),
            avg_roi: finite(row.avg_roi).unwrap_or(0.0),
            roi_volatility: finite(row.roi_volatility).unwrap_or(0.0),
        });
    }
    Ok(stats)
}

/// Parse genre_overall_statistics.csv.
pub fn parse_genre_overall_stats(path: &Path) -> Result<Vec<GenreOverallStat>> {
    let file = file_label(path);
    let mut reader = open_csv(path)?;
    let headers = reader
        .headers()
        .map_err(|e| DataLoadError::from_csv(&file, e))?
        .clone();
    require_columns(&headers, &file, &["genre"])?;

    let mut stats = Vec::new();
    for result in reader.deserialize::<RawGenreStatRow>() {
        let row = result.map_err(|e| DataLoadError::from_csv(&file, e))?;
        stats.push(GenreOverallStat {
            genre: row.genre,
            total_movies: finite(row.total_movies).unwrap_or(0.0) as u32,
            avg_rating: finite(row.avg_rating).unwrap_or(0.0),
            avg_budget: finite(row.avg_budget).unwrap_or(0.0),
            total_box_office: finite(row.total_box_office).unwrap_or(0.0),
            success_rate: finite(row.success_rate).unwrap_or(0.0),
            avg_roi: finite(row.avg_roi).unwrap_or(0.0),
            // Overwritten by the volatility recomputation
            roi_volatility: finite(row.roi_volatility).unwrap_or(0.0),
        });
    }
    Ok(stats)
}

/// Replace comma separators with pipes.
///
/// Example: "Action, Drama" -> "Action|Drama", "Action,Drama" -> "Action|Drama"
pub fn normalize_genre_separators(genre: &str) -> String {
    genre.replace(", ", "|").replace(',', "|")
}

/// Parse a release date, ignoring a trailing country annotation.
///
/// Example: "15 March 2019 (India)" -> Some(2019-03-15)
///          "not a date" -> None
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.split('(').next().unwrap_or("").trim();
    if cleaned.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cleaned, format) {
            return Some(date);
        }
    }

    // "2019-03-15 00:00:00" and similar timestamp exports
    if cleaned.len() > 10 && cleaned.is_char_boundary(10) {
        if let Ok(date) = NaiveDate::parse_from_str(&cleaned[..10], "%Y-%m-%d") {
            return Some(date);
        }
    }

    // A bare year means January 1st of that year
    if cleaned.len() == 4 {
        if let Ok(year) = cleaned.parse::<i32>() {
            return NaiveDate::from_ymd_opt(year, 1, 1);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(content: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes())
    }

    #[test]
    fn test_normalize_genre_separators() {
        assert_eq!(normalize_genre_separators("Action, Drama"), "Action|Drama");
        assert_eq!(normalize_genre_separators("Action,Drama,Comedy"), "Action|Drama|Comedy");
        assert_eq!(normalize_genre_separators("Drama"), "Drama");
    }

    #[test]
    fn test_parse_release_date_strips_country() {
        let date = parse_release_date("15 March 2019 (India)").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2019, 3, 15).unwrap());
    }

    #[test]
    fn test_parse_release_date_formats() {
        assert_eq!(
            parse_release_date("2018-11-02"),
            NaiveDate::from_ymd_opt(2018, 11, 2)
        );
        assert_eq!(
            parse_release_date("June 7, 2017"),
            NaiveDate::from_ymd_opt(2017, 6, 7)
        );
        assert_eq!(
            parse_release_date("2016-01-05 00:00:00"),
            NaiveDate::from_ymd_opt(2016, 1, 5)
        );
        assert_eq!(parse_release_date("unknown"), None);
        assert_eq!(parse_release_date(""), None);
    }

    #[test]
    fn test_read_movies_unifies_genres_column() {
        let csv = "title,year,genres,budget,roi,release_date\n\
                   Alpha,2019,\"Action, Drama\",100,1.5,12 April 2019 (USA)\n\
                   Beta,2018,Comedy,50,,\n";
        let movies = read_movies(reader(csv), "movies.csv").unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].genre, "Action|Drama");
        assert_eq!(movies[0].release_month, Some(4));
        // Missing ROI becomes zero
        assert_eq!(movies[1].roi, 0.0);
        assert_eq!(movies[1].release_date, None);
    }

    #[test]
    fn test_read_movies_coerces_bad_numbers() {
        let csv = "title,year,genre,budget,imdb_rating\nAlpha,2019,Drama,N/A,7.1\n";
        let movies = read_movies(reader(csv), "movies.csv").unwrap();
        assert_eq!(movies[0].budget, None);
        assert_eq!(movies[0].imdb_rating, Some(7.1));
    }

    #[test]
    fn test_read_movies_non_finite_cells_are_missing() {
        let csv = "title,year,genre,budget,box_office,roi,imdb_rating,runtime,release_month\n\
                   Junk,NaN,Horror,NaN,inf,NaN,-inf,NaN,NaN\n\
                   Blank,2001,Drama,,,,,,\n\
                   Exact,2019,Drama,100,250,1.5,7.2,140,3\n";
        let movies = read_movies(reader(csv), "movies.csv").unwrap();

        for movie in &movies[..2] {
            assert_eq!(movie.budget, None, "{}", movie.title);
            assert_eq!(movie.box_office, None, "{}", movie.title);
            assert_eq!(movie.imdb_rating, None, "{}", movie.title);
            assert_eq!(movie.runtime, None, "{}", movie.title);
            assert_eq!(movie.release_month, None, "{}", movie.title);
            assert_eq!(movie.roi, 0.0);
        }
        assert_eq!(movies[0].year, None);
        assert_eq!(movies[2].budget, Some(100.0));
        assert_eq!(movies[2].runtime, Some(140.0));
        assert_eq!(movies[2].release_month, Some(3));
    }

    #[test]
    fn test_read_movies_missing_column() {
        let csv = "title,year,budget\nAlpha,2019,10\n";
        let err = read_movies(reader(csv), "movies.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn { .. }));
    }
}
