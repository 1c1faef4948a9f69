//! step4park Library - Search-and-Selection View-Model
//!
//! This library holds the state machine behind a single-screen map search UI:
//! query text, asynchronous place search, result selection, camera placement,
//! map mode flags and error surfacing. Rendering, gestures and permission
//! prompts belong to the host platform; they observe the view-model's fields
//! and call its operations.
//!
//! # Architecture
//!
//! - **[`SearchViewModel`]**: Owns all observable state and applies every mutation
//! - **[`PlaceSearchProvider`]**: Resolves a query plus a search region into places
//! - **[`LocationProvider`]**: Pushes location fixes and failures into a [`LocationSink`]
//! - **[`SheetState`]**: Presentation-side bottom sheet state machine, driven by view-model events
//!
//! # Concurrency
//!
//! Searches run on spawned tokio tasks. Their completions, like location events, are
//! posted to a channel owned by the view-model and applied by its owner through
//! [`SearchViewModel::process_pending`] or [`SearchViewModel::next_update`], so all
//! state is mutated from a single context.

mod camera;
mod config;
pub mod coords;
mod place;
mod provider;
pub mod runtime;
mod sheet;
mod suggestion;
mod view_model;

// Public API exports
pub use camera::{CameraTarget, MapStyle};
pub use config::ViewModelConfig;
pub use coords::{Coordinate, Region, Span};
pub use place::PlaceResult;
pub use provider::{
    LocationError, LocationEvent, LocationProvider, LocationSink, PlaceSearchProvider,
    SearchError,
};
pub use sheet::{COLLAPSED_FRACTION, MEDIUM_FRACTION, SheetContent, SheetLevel, SheetState};
pub use suggestion::{Suggestion, default_suggestions};
pub use view_model::{SearchViewModel, ViewModelEvent};

/// Error types for the view-model
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Search failed: {0}")]
    Search(#[from] SearchError),

    #[error("Location failed: {0}")]
    Location(#[from] LocationError),

    #[error("Selected place is not part of the current results")]
    SelectionNotInResults,

    #[error("No async runtime available to run the search")]
    NoRuntime,

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        let _: fn() -> ViewModelConfig = ViewModelConfig::default;
        let _: fn() -> SheetState = SheetState::default;
        let _: fn(f64, f64) -> Coordinate = Coordinate::new;
    }

    #[test]
    fn test_error_messages() {
        let err: Error = SearchError::Network("network down".into()).into();
        assert_eq!(err.to_string(), "Search failed: network down");

        let err: Error = LocationError::PermissionDenied.into();
        assert!(err.to_string().starts_with("Location failed"));
    }
}
