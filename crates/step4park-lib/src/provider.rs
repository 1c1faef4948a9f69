//! Collaborator interfaces the view-model consumes
//!
//! - [`PlaceSearchProvider`] answers a free-text query around a region, asynchronously.
//! - [`LocationProvider`] pushes location fixes and failures into a [`LocationSink`]
//!   for as long as it is started.
//!
//! Providers never touch view-model state directly. Everything they produce travels
//! through the view-model's message channel and is applied by its owner.

use crate::view_model::Message;
use crate::{Coordinate, PlaceResult, Region};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Why a place search could not be resolved
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error("{0}")]
    Network(String),

    #[error("No places found for \"{0}\"")]
    NotFound(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Search timed out after {} ms", .0.as_millis())]
    TimedOut(Duration),

    #[error("{0}")]
    Provider(String),
}

/// Why location fixes are not available
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// One push from a location provider
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    Update(Coordinate),
    Failure(LocationError),
}

/// Resolves place queries
#[async_trait::async_trait]
pub trait PlaceSearchProvider: Send + Sync {
    /// Search for `query` around `region`, results ranked best first
    async fn search(&self, query: &str, region: Region) -> Result<Vec<PlaceResult>, SearchError>;
}

/// Source of location fixes
///
/// `start` must be idempotent: starting an already started provider must not
/// duplicate delivery. Permission negotiation is the provider's business.
pub trait LocationProvider: Send + Sync {
    /// Begin delivering events into `sink`
    fn start(&self, sink: LocationSink) -> Result<(), LocationError>;

    /// Stop delivering events and drop the sink
    fn stop(&self) {}
}

/// Handle a location provider pushes events through
///
/// Cheap to clone and usable from any thread. Events are queued on the owning
/// view-model's channel and applied in order.
#[derive(Clone, Debug)]
pub struct LocationSink {
    tx: UnboundedSender<Message>,
}

impl LocationSink {
    pub(crate) fn new(tx: UnboundedSender<Message>) -> Self {
        Self { tx }
    }

    /// Report a new fix. Returns `false` once the view-model is gone.
    pub fn update(&self, coordinate: Coordinate) -> bool {
        self.send(LocationEvent::Update(coordinate))
    }

    /// Report a failure. Returns `false` once the view-model is gone.
    pub fn failure(&self, error: LocationError) -> bool {
        self.send(LocationEvent::Failure(error))
    }

    pub fn send(&self, event: LocationEvent) -> bool {
        self.tx.send(Message::Location(event)).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_search_error_messages() {
        assert_eq!(
            SearchError::Network("network down".into()).to_string(),
            "network down"
        );
        assert_eq!(
            SearchError::TimedOut(Duration::from_millis(1500)).to_string(),
            "Search timed out after 1500 ms"
        );
        assert_eq!(
            SearchError::NotFound("Parking".into()).to_string(),
            "No places found for \"Parking\""
        );
    }

    #[test]
    fn test_sink_forwards_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = LocationSink::new(tx);
        assert!(sink.update(Coordinate::new(10.0, 20.0)));
        assert!(sink.failure(LocationError::PermissionDenied));

        match rx.try_recv() {
            Ok(Message::Location(LocationEvent::Update(c))) => {
                assert_eq!(c, Coordinate::new(10.0, 20.0))
            }
            other => panic!("unexpected message: {other:?}"),
        }
        match rx.try_recv() {
            Ok(Message::Location(LocationEvent::Failure(e))) => {
                assert_eq!(e, LocationError::PermissionDenied)
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_sink_reports_closed_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = LocationSink::new(tx);
        drop(rx);
        assert!(sink.is_closed());
        assert!(!sink.update(Coordinate::new(0.0, 0.0)));
    }
}
