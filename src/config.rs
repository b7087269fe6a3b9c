use std::env;
use std::time::Duration;

use crate::debounce::DEFAULT_DELAY;
use crate::fotmob_provider::FotmobProvider;
use crate::mock_provider::MockProvider;
use crate::provider::PlayerProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Mock,
    Fotmob,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: DataSource,
    pub debounce: Duration,
    pub suggestion_limit: usize,
    pub recommendation_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Mock,
            debounce: DEFAULT_DELAY,
            suggestion_limit: 8,
            recommendation_limit: 10,
        }
    }
}

impl DataSource {
    pub fn provider(self) -> Box<dyn PlayerProvider> {
        match self {
            DataSource::Mock => Box::new(MockProvider::new()),
            DataSource::Fotmob => Box::new(FotmobProvider::new()),
        }
    }
}

impl AppConfig {
    /// Reads `.env.local` / `.env` first, then the process environment.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let source = match lookup("PLAYER_SOURCE")
            .map(|val| val.trim().to_lowercase())
            .as_deref()
        {
            Some("fotmob") => DataSource::Fotmob,
            _ => DataSource::Mock,
        };
        let debounce_ms = parse_or(
            &lookup,
            "SUGGEST_DEBOUNCE_MS",
            defaults.debounce.as_millis() as u64,
        )
        .clamp(50, 2000);
        Self {
            source,
            debounce: Duration::from_millis(debounce_ms),
            suggestion_limit: parse_or(&lookup, "SUGGEST_LIMIT", defaults.suggestion_limit)
                .clamp(1, 20),
            recommendation_limit: parse_or(
                &lookup,
                "RECOMMENDATION_LIMIT",
                defaults.recommendation_limit,
            )
            .clamp(1, 30),
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|val| val.trim().parse::<T>().ok())
        .unwrap_or(default)
}
