//! Place search backed by an in-memory catalog
//!
//! Stands in for a platform place-search service. Matching is a case-insensitive
//! substring test on the name and subtitle, limited to the requested region, and
//! results are ranked by distance to the region center. Like the platform search it
//! imitates, an empty match set is reported as an error rather than an empty list.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use step4park_lib::{PlaceResult, PlaceSearchProvider, Region, SearchError};

/// Built-in sample places around central Paris
const SAMPLE_CATALOG: &str = include_str!("../../data/paris.json");

/// Longest query the catalog accepts, in characters
const MAX_QUERY_CHARS: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct CatalogSearchProvider {
    places: Vec<PlaceResult>,
    latency: Duration,
}

impl CatalogSearchProvider {
    pub fn new(places: Vec<PlaceResult>) -> Self {
        Self {
            places,
            latency: Duration::ZERO,
        }
    }

    /// Parse a JSON array of places
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let places: Vec<PlaceResult> = serde_json::from_str(json)?;
        Ok(Self::new(places))
    }

    /// Load a JSON catalog file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        tracing::info!("Loaded {} places from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn sample() -> Result<Self, CatalogError> {
        Self::from_json_str(SAMPLE_CATALOG)
    }

    /// Delay every answer, to simulate a network round trip
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    fn matches(place: &PlaceResult, needle: &str) -> bool {
        [place.name.as_deref(), place.subtitle.as_deref()]
            .into_iter()
            .flatten()
            .any(|text| text.to_lowercase().contains(needle))
    }
}

#[async_trait]
impl PlaceSearchProvider for CatalogSearchProvider {
    async fn search(&self, query: &str, region: Region) -> Result<Vec<PlaceResult>, SearchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(SearchError::InvalidQuery("empty query".into()));
        }
        if needle.chars().count() > MAX_QUERY_CHARS {
            return Err(SearchError::InvalidQuery(format!(
                "query longer than {MAX_QUERY_CHARS} characters"
            )));
        }

        profiling::scope!("CatalogSearchProvider::search");
        let mut hits: Vec<(f64, &PlaceResult)> = self
            .places
            .iter()
            .filter(|place| region.contains(&place.coordinate))
            .filter(|place| Self::matches(place, &needle))
            .map(|place| (place.coordinate.distance_to(&region.center), place))
            .collect();

        if hits.is_empty() {
            tracing::debug!("No catalog match for {query:?} around {}", region.center);
            return Err(SearchError::NotFound(query.to_string()));
        }

        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(hits.into_iter().map(|(_, place)| place.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use step4park_lib::{Coordinate, Span, ViewModelConfig};

    fn paris_region() -> Region {
        let config = ViewModelConfig::default();
        Region::new(config.fallback_anchor, config.search_span)
    }

    #[test]
    fn test_sample_catalog_parses() {
        let catalog = CatalogSearchProvider::sample().unwrap();
        assert_eq!(catalog.len(), 12);
        assert!(catalog.places.iter().any(|p| p.name.is_none()));
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(matches!(
            CatalogSearchProvider::from_json_str("{not json"),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("step4park-does-not-exist.json");
        assert!(matches!(
            CatalogSearchProvider::load(&path),
            Err(CatalogError::Io { .. })
        ));
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("step4park-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[{"name": "Parking A", "coordinate": {"latitude": 1.0, "longitude": 2.0}}]"#,
        )
        .unwrap();
        let catalog = CatalogSearchProvider::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.places[0].subtitle, None);
    }

    #[tokio::test]
    async fn test_search_filters_and_ranks_by_distance() {
        let catalog = CatalogSearchProvider::sample().unwrap();
        let results = catalog.search("parking", paris_region()).await.unwrap();

        let names: Vec<&str> = results.iter().map(|p| p.display_name()).collect();
        assert_eq!(names[0], "Parking Indigo Hôtel de Ville");
        assert!(!names.contains(&"Parking Aéroport CDG P1"));
        assert_eq!(names.len(), 4);

        let center = paris_region().center;
        let distances: Vec<f64> = results
            .iter()
            .map(|p| p.coordinate.distance_to(&center))
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_search_matches_subtitle_case_insensitively() {
        let catalog = CatalogSearchProvider::sample().unwrap();
        let results = catalog.search("TOURNELLE", paris_region()).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, None);
    }

    #[tokio::test]
    async fn test_search_respects_region() {
        let catalog = CatalogSearchProvider::sample().unwrap();
        let roissy = Region::new(Coordinate::new(49.0097, 2.5479), Span::square(0.08));
        let results = catalog.search("parking", roissy).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].display_name(), "Parking Aéroport CDG P1");
    }

    #[tokio::test]
    async fn test_search_without_match_is_not_found() {
        let catalog = CatalogSearchProvider::sample().unwrap();
        let err = catalog.search("boulangerie", paris_region()).await.unwrap_err();
        assert_eq!(err, SearchError::NotFound("boulangerie".into()));
    }

    #[tokio::test]
    async fn test_search_rejects_oversized_query() {
        let catalog = CatalogSearchProvider::new(Vec::new());
        let query = "p".repeat(MAX_QUERY_CHARS + 1);
        assert!(matches!(
            catalog.search(&query, paris_region()).await,
            Err(SearchError::InvalidQuery(_))
        ));
    }
}
