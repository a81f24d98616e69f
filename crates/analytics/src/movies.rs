//! Movie-level rankings.

use data_loader::numeric::round2;
use data_loader::DataIndex;
use serde::Serialize;

pub const DEFAULT_TOP_PERFORMERS: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPerformer {
    pub title: String,
    pub year: i32,
    pub genre: String,
    pub roi: f64,
    pub box_office: i64,
    pub poster_url: String,
}

/// Highest-ROI movies among those with a known positive budget.
pub fn top_performers(index: &DataIndex, limit: usize) -> Vec<TopPerformer> {
    let mut funded: Vec<_> = index
        .movies()
        .iter()
        .filter(|m| m.budget.is_some_and(|b| b > 0.0))
        .collect();
    funded.sort_by(|a, b| b.roi.total_cmp(&a.roi));

    funded
        .into_iter()
        .take(limit)
        .map(|m| TopPerformer {
            title: m.title.clone(),
            year: m.year.unwrap_or(0),
            genre: m.genre.clone(),
            roi: round2(m.roi),
            box_office: m.box_office.unwrap_or(0.0) as i64,
            poster_url: m.poster_url.clone().unwrap_or_default(),
        })
        .collect()
}
