//! Server configuration from flags, with environment fallbacks.

use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use clap::Parser;
use classifier::{ForestConfig, TrainingConfig};
use tower_http::cors::{AllowOrigin, CorsLayer};

#[derive(Debug, Clone, Parser)]
#[command(name = "cineintel-server", version, about = "CineIntel analytics and prediction API")]
pub struct ServerConfig {
    /// Directory holding the movie and genre statistics CSV files
    #[arg(long, env = "CINEINTEL_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    #[arg(long, env = "CINEINTEL_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "CINEINTEL_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Origins allowed to call the API, comma separated
    #[arg(
        long,
        env = "CINEINTEL_CORS_ORIGINS",
        value_delimiter = ',',
        default_values_t = [
            "http://localhost:3000".to_string(),
            "http://127.0.0.1:3000".to_string(),
        ]
    )]
    pub cors_origins: Vec<String>,

    /// Trees in the success classifier
    #[arg(long, default_value_t = 100)]
    pub trees: usize,

    /// Seed for the hold-out split and the forest
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            seed: self.seed,
            forest: ForestConfig {
                n_trees: self.trees,
                seed: self.seed,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Credentialed CORS for the configured origins.
    pub fn cors_layer(&self) -> Result<CorsLayer> {
        let origins = self
            .cors_origins
            .iter()
            .map(|o| {
                o.trim()
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin {:?}", o))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .allow_credentials(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::parse_from(["cineintel-server"]);
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );
        assert_eq!(config.training_config().forest.n_trees, 100);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::parse_from([
            "cineintel-server",
            "--port",
            "9000",
            "--cors-origins",
            "https://a.example,https://b.example",
            "--trees",
            "20",
            "--seed",
            "7",
        ]);
        assert_eq!(config.port, 9000);
        assert_eq!(config.cors_origins.len(), 2);
        let training = config.training_config();
        assert_eq!(training.forest.n_trees, 20);
        assert_eq!(training.seed, 7);
        assert!(config.cors_layer().is_ok());
    }

    #[test]
    fn test_invalid_origin_rejected() {
        let config = ServerConfig::parse_from(["cineintel-server", "--cors-origins", "bad\norigin"]);
        assert!(config.cors_layer().is_err());
    }
}
