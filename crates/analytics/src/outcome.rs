//! Tagged result for lookups that may legitimately find nothing.

use serde::Serialize;

/// Either a computed value or the reason it could not be computed.
///
/// Serialises as the bare value, or as `{"error": "..."}`, which is the
/// shape clients check for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome<T> {
    Ready(T),
    Unavailable { error: String },
}

impl<T> Outcome<T> {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Outcome::Unavailable {
            error: reason.into(),
        }
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Outcome::Ready(value) => Some(value),
            Outcome::Unavailable { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Ready(_) => None,
            Outcome::Unavailable { error } => Some(error),
        }
    }
}

impl<T> From<Option<T>> for Outcome<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Outcome::Ready(value),
            None => Outcome::unavailable("Not found"),
        }
    }
}
