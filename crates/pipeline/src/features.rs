//! Feature encoding for the Hit/Flop classifier.
//!
//! The encoder is fitted once on the training rows. Fitting fixes three
//! things that never change afterwards:
//! - the genre universe (one-hot columns, sorted lexicographically)
//! - the ordered feature schema
//! - the median of every numeric field, used to impute missing values
//!
//! Encoding a row always projects it onto that frozen schema: genres
//! unseen at fit time contribute nothing, missing numerics take the
//! frozen median.

use anyhow::{bail, Result};
use data_loader::{split_genres, MovieRecord, NumericField};
use data_loader::parser::normalize_genre_separators;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// Numeric columns, in schema order, that always follow the genre columns.
pub const BASE_NUMERIC_FEATURES: [NumericField; 4] = [
    NumericField::Budget,
    NumericField::Year,
    NumericField::ImdbRating,
    NumericField::Runtime,
];

/// Model input for one movie, before encoding.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovieFeatures {
    /// Raw genre string, `|` or `,` separated
    pub genre: String,
    pub budget: Option<f64>,
    pub year: Option<f64>,
    pub imdb_rating: Option<f64>,
    pub runtime: Option<f64>,
    pub release_month: Option<f64>,
}

impl MovieFeatures {
    pub fn from_record(movie: &MovieRecord) -> Self {
        Self {
            genre: movie.genre.clone(),
            budget: movie.budget,
            year: movie.year.map(f64::from),
            imdb_rating: movie.imdb_rating,
            runtime: movie.runtime,
            release_month: movie.release_month.map(f64::from),
        }
    }

    pub fn get(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::Budget => self.budget,
            NumericField::Year => self.year,
            NumericField::ImdbRating => self.imdb_rating,
            NumericField::Runtime => self.runtime,
            NumericField::ReleaseMonth => self.release_month,
            NumericField::BoxOffice | NumericField::Roi => None,
        }
    }

    /// De-duplicated genre tokens of this row
    pub fn genre_tokens(&self) -> HashSet<String> {
        split_genres(&normalize_genre_separators(&self.genre))
            .map(str::to_string)
            .collect()
    }
}

/// One column of the encoded vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Feature {
    Genre(String),
    Numeric(NumericField),
}

impl Feature {
    /// Name shown to users: the bare genre, or the column name.
    pub fn display_name(&self) -> &str {
        match self {
            Feature::Genre(genre) => genre,
            Feature::Numeric(field) => field.name(),
        }
    }

    /// Column name in the encoded matrix (`genre_Action`, `budget`, ...)
    pub fn column_name(&self) -> String {
        match self {
            Feature::Genre(genre) => format!("genre_{}", genre),
            Feature::Numeric(field) => field.name().to_string(),
        }
    }
}

/// Ordered feature list fixed at fit time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSchema {
    features: Vec<Feature>,
    genre_count: usize,
}

impl FeatureSchema {
    fn new(genres: BTreeSet<String>, include_release_month: bool) -> Self {
        let genre_count = genres.len();
        let mut features: Vec<Feature> = genres.into_iter().map(Feature::Genre).collect();
        features.extend(BASE_NUMERIC_FEATURES.iter().copied().map(Feature::Numeric));
        if include_release_month {
            features.push(Feature::Numeric(NumericField::ReleaseMonth));
        }
        Self {
            features,
            genre_count,
        }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn genre_columns(&self) -> &[Feature] {
        &self.features[..self.genre_count]
    }

    pub fn numeric_fields(&self) -> impl Iterator<Item = NumericField> + '_ {
        self.features[self.genre_count..].iter().filter_map(|f| match f {
            Feature::Numeric(field) => Some(*field),
            Feature::Genre(_) => None,
        })
    }

    pub fn column_names(&self) -> Vec<String> {
        self.features.iter().map(Feature::column_name).collect()
    }
}

/// Encodes movie descriptions against a frozen schema.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    schema: FeatureSchema,
    /// Imputation value per numeric field, aligned with `schema.numeric_fields()`
    medians: Vec<(NumericField, f64)>,
}

impl FeatureEncoder {
    /// Fit the genre universe, schema and medians on the training rows.
    pub fn fit(rows: &[MovieFeatures], include_release_month: bool) -> Result<Self> {
        if rows.is_empty() {
            bail!("cannot fit a feature encoder on zero rows");
        }

        let genres: BTreeSet<String> = rows.iter().flat_map(|r| r.genre_tokens()).collect();
        let schema = FeatureSchema::new(genres, include_release_month);

        let medians = schema
            .numeric_fields()
            .map(|field| {
                let values: Vec<f64> = rows.iter().filter_map(|r| r.get(field)).collect();
                (field, data_loader::numeric::median(&values).unwrap_or(0.0))
            })
            .collect();

        Ok(Self { schema, medians })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Frozen imputation value for a field
    pub fn median(&self, field: NumericField) -> Option<f64> {
        self.medians
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| *m)
    }

    /// Encode one row onto the frozen schema.
    pub fn encode(&self, row: &MovieFeatures) -> Vec<f64> {
        let tokens = row.genre_tokens();
        let mut vector = Vec::with_capacity(self.schema.len());

        for feature in self.schema.genre_columns() {
            let active = matches!(feature, Feature::Genre(g) if tokens.contains(g));
            vector.push(if active { 1.0 } else { 0.0 });
        }
        for (field, median) in &self.medians {
            let value = row.get(*field).filter(|v| v.is_finite()).unwrap_or(*median);
            vector.push(value);
        }
        vector
    }

    /// Encode many rows in parallel, preserving order.
    pub fn encode_batch(&self, rows: &[MovieFeatures]) -> Vec<Vec<f64>> {
        rows.par_iter().map(|row| self.encode(row)).collect()
    }

    /// True if the row switches on the given genre column.
    pub fn activates(&self, row: &MovieFeatures, genre: &str) -> bool {
        self.schema.genre_columns().iter().any(|f| f == &Feature::Genre(genre.to_string()))
            && row.genre_tokens().contains(genre)
    }
}
