//! Movie explorer: filter, sort and paginate the movie table.

use crate::filter_pipeline::FilterPipeline;
use crate::filters::{GenreContainsFilter, SuccessLabelFilter, TitleSearchFilter, YearRangeFilter};
use anyhow::{bail, Result};
use data_loader::numeric::{round1, round2};
use data_loader::{DataIndex, MovieIdx, MovieRecord, NumericField};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, instrument};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Anything other than `"asc"` (any case) sorts descending.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }
}

/// Column the explorer can sort on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Numeric(NumericField),
    Title,
    Genre,
    ReleaseDate,
    SuccessLabel,
    PosterUrl,
}

impl SortKey {
    /// Parse a column name; unknown columns leave the table unsorted.
    pub fn parse(column: &str) -> Option<Self> {
        let key = match column.trim() {
            "title" => SortKey::Title,
            "genre" | "genres" => SortKey::Genre,
            "release_date" => SortKey::ReleaseDate,
            "success_label" => SortKey::SuccessLabel,
            "poster_url" => SortKey::PosterUrl,
            "budget" => SortKey::Numeric(NumericField::Budget),
            "box_office" => SortKey::Numeric(NumericField::BoxOffice),
            "roi" => SortKey::Numeric(NumericField::Roi),
            "imdb_rating" => SortKey::Numeric(NumericField::ImdbRating),
            "runtime" => SortKey::Numeric(NumericField::Runtime),
            "year" => SortKey::Numeric(NumericField::Year),
            "release_month" => SortKey::Numeric(NumericField::ReleaseMonth),
            _ => return None,
        };
        Some(key)
    }

    /// Compare two present values; `None` when either side is missing.
    fn compare(self, a: &MovieRecord, b: &MovieRecord) -> Option<Ordering> {
        match self {
            SortKey::Numeric(field) => Some(field.value(a)?.total_cmp(&field.value(b)?)),
            SortKey::Title => Some(a.title.cmp(&b.title)),
            SortKey::Genre => Some(a.genre.cmp(&b.genre)),
            SortKey::ReleaseDate => Some(a.release_date?.cmp(&b.release_date?)),
            SortKey::SuccessLabel => Some(a.success_label.as_ref()?.cmp(b.success_label.as_ref()?)),
            SortKey::PosterUrl => Some(a.poster_url.as_ref()?.cmp(b.poster_url.as_ref()?)),
        }
    }

    fn is_missing(self, movie: &MovieRecord) -> bool {
        match self {
            SortKey::Numeric(field) => field.value(movie).is_none(),
            SortKey::Title | SortKey::Genre => false,
            SortKey::ReleaseDate => movie.release_date.is_none(),
            SortKey::SuccessLabel => movie.success_label.is_none(),
            SortKey::PosterUrl => movie.poster_url.is_none(),
        }
    }
}

/// Explorer request.
#[derive(Debug, Clone, PartialEq)]
pub struct ExploreQuery {
    /// 1-based page number
    pub page: usize,
    pub limit: usize,
    pub search: Option<String>,
    pub genre: Option<String>,
    pub success_label: Option<String>,
    pub sort_by: String,
    pub sort_order: SortOrder,
    pub year_start: Option<i32>,
    pub year_end: Option<i32>,
}

impl Default for ExploreQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: None,
            genre: None,
            success_label: None,
            sort_by: "roi".to_string(),
            sort_order: SortOrder::Desc,
            year_start: None,
            year_end: None,
        }
    }
}

impl ExploreQuery {
    pub fn validate(&self) -> Result<()> {
        if self.page < 1 {
            bail!("page must be at least 1");
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.limit) {
            bail!("limit must be between 1 and {}", MAX_PAGE_SIZE);
        }
        Ok(())
    }

    fn pipeline(&self) -> Result<FilterPipeline> {
        Ok(FilterPipeline::new()
            .add_optional(TitleSearchFilter::from_param(self.search.as_deref()))
            .add_optional(GenreContainsFilter::from_param(self.genre.as_deref()))
            .add_optional(SuccessLabelFilter::from_param(self.success_label.as_deref()))
            .add_optional(YearRangeFilter::from_bounds(self.year_start, self.year_end)?))
    }
}

/// One movie as shown by the explorer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExploreRow {
    pub title: String,
    /// 0 when unknown
    pub year: i32,
    pub genres: String,
    pub roi: f64,
    pub box_office: i64,
    pub poster_url: String,
    pub imdb_rating: f64,
    pub success_label: String,
}

impl From<&MovieRecord> for ExploreRow {
    fn from(movie: &MovieRecord) -> Self {
        Self {
            title: movie.title.clone(),
            year: movie.year.unwrap_or(0),
            genres: movie.genre.clone(),
            roi: round2(movie.roi),
            box_office: movie.box_office.map(|b| b as i64).unwrap_or(0),
            poster_url: movie.poster_url.clone().unwrap_or_default(),
            imdb_rating: movie.imdb_rating.map(round1).unwrap_or(0.0),
            success_label: movie
                .success_label
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplorePage {
    pub movies: Vec<ExploreRow>,
    pub total_count: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

/// Sort positions in place. Missing values go last in either direction;
/// equal values keep their order.
pub fn sort_movies(movies: &mut [MovieIdx], index: &DataIndex, key: SortKey, order: SortOrder) {
    let all = index.movies();
    movies.sort_by(|&a, &b| {
        let (ma, mb) = (&all[a], &all[b]);
        match (key.is_missing(ma), key.is_missing(mb)) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ord = key.compare(ma, mb).unwrap_or(Ordering::Equal);
                match order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            }
        }
    });
}

/// Filter, sort and paginate the movie table.
#[instrument(skip(index))]
pub fn explore(index: &DataIndex, query: &ExploreQuery) -> Result<ExplorePage> {
    query.validate()?;

    let mut matched = query.pipeline()?.apply_all(index)?;
    if let Some(key) = SortKey::parse(&query.sort_by) {
        sort_movies(&mut matched, index, key, query.sort_order);
    }

    let total_count = matched.len();
    let total_pages = total_count.div_ceil(query.limit);
    let start = (query.page - 1).saturating_mul(query.limit);

    let movies: Vec<ExploreRow> = matched
        .iter()
        .skip(start)
        .take(query.limit)
        .filter_map(|&idx| index.get_movie(idx))
        .map(ExploreRow::from)
        .collect();

    debug!(
        "Explorer matched {} movies, page {} has {}",
        total_count,
        query.page,
        movies.len()
    );

    Ok(ExplorePage {
        movies,
        total_count,
        page: query.page,
        limit: query.limit,
        total_pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_index() -> DataIndex {
        let rois = [Some(1.0), None, Some(3.0), Some(2.0)];
        let movies = rois
            .into_iter()
            .enumerate()
            .map(|(i, roi)| {
                let mut m = MovieRecord::new(format!("Movie {}", i), "Drama");
                m.imdb_rating = roi.map(|r| r + 5.0);
                m.roi = roi.unwrap_or(0.0);
                m
            })
            .collect();
        DataIndex::from_parts(movies, vec![], vec![]).unwrap()
    }

    #[test]
    fn test_sort_puts_missing_last() {
        let index = create_test_index();
        let key = SortKey::parse("imdb_rating").unwrap();

        let mut desc = vec![0, 1, 2, 3];
        sort_movies(&mut desc, &index, key, SortOrder::Desc);
        assert_eq!(desc, vec![2, 3, 0, 1]);

        let mut asc = vec![0, 1, 2, 3];
        sort_movies(&mut asc, &index, key, SortOrder::Asc);
        assert_eq!(asc, vec![0, 3, 2, 1]);
    }

    #[test]
    fn test_unknown_sort_key_keeps_order() {
        let index = create_test_index();
        let query = ExploreQuery {
            sort_by: "popularity".to_string(),
            ..Default::default()
        };
        let page = explore(&index, &query).unwrap();
        let titles: Vec<&str> = page.movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Movie 0", "Movie 1", "Movie 2", "Movie 3"]);
    }

    #[test]
    fn test_rejects_bad_paging() {
        let index = create_test_index();
        let query = ExploreQuery {
            limit: 101,
            ..Default::default()
        };
        assert!(explore(&index, &query).is_err());

        let query = ExploreQuery {
            page: 0,
            ..Default::default()
        };
        assert!(explore(&index, &query).is_err());
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse("ASC"), SortOrder::Asc);
        assert_eq!(SortOrder::parse("sideways"), SortOrder::Desc);
    }
}
