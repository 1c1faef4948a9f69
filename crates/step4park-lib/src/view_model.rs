//! SearchViewModel - state owner for the map search screen
//!
//! The view-model holds every field the presentation layer observes and is the only
//! place they change. Provider work (place searches, location fixes) happens
//! elsewhere and comes back as messages on a channel the view-model owns;
//! the owner applies them with [`SearchViewModel::process_pending`] (per frame) or
//! [`SearchViewModel::next_update`] (async loop).
//!
//! Searches are sequenced: each one gets a new generation number, starting a search
//! aborts the superseded task, and completions from older generations are dropped.

use crate::runtime::{self, with_optional_timeout};
use crate::{
    CameraTarget, Coordinate, Error, LocationEvent, LocationProvider, LocationSink, MapStyle,
    PlaceResult, PlaceSearchProvider, Region, Result, SearchError, ViewModelConfig,
};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::{AbortHandle, JoinHandle};

/// Capacity of the notification channel handed out by [`SearchViewModel::subscribe`]
const EVENT_CAPACITY: usize = 64;

/// Error text shown when a search provider panics mid-call
const PROVIDER_CRASHED: &str = "The search service stopped unexpectedly";

/// Work posted back to the view-model from other tasks
#[derive(Debug)]
pub(crate) enum Message {
    SearchCompleted {
        generation: u64,
        query: String,
        outcome: std::result::Result<Vec<PlaceResult>, SearchError>,
    },
    Location(LocationEvent),
}

/// Change notifications for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum ViewModelEvent {
    QueryChanged(String),
    SearchStarted { query: String, anchor: Coordinate },
    SearchFinished { query: String, result_count: usize },
    ResultsChanged(usize),
    SelectionChanged(Option<PlaceResult>),
    CameraChanged(CameraTarget),
    UserLocationChanged(Coordinate),
    ErrorRaised(String),
    ErrorDismissed,
    SatelliteChanged(bool),
    SheetPresentationChanged(bool),
}

struct InFlightSearch {
    generation: u64,
    handle: JoinHandle<()>,
    provider_call: AbortHandle,
}

/// View-model for the single-screen map search UI
pub struct SearchViewModel {
    config: ViewModelConfig,
    search_provider: Arc<dyn PlaceSearchProvider>,
    location_provider: Arc<dyn LocationProvider>,

    query: String,
    results: Vec<PlaceResult>,
    selected: Option<PlaceResult>,
    camera: CameraTarget,
    user_location: Option<Coordinate>,
    error: Option<String>,
    is_satellite: bool,
    is_sheet_presented: bool,

    location_started: bool,
    generation: u64,
    in_flight: Option<InFlightSearch>,

    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
    events: broadcast::Sender<ViewModelEvent>,
}

impl SearchViewModel {
    pub fn new(
        config: ViewModelConfig,
        search_provider: Arc<dyn PlaceSearchProvider>,
        location_provider: Arc<dyn LocationProvider>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            config,
            search_provider,
            location_provider,
            query: String::new(),
            results: Vec::new(),
            selected: None,
            camera: CameraTarget::Automatic,
            user_location: None,
            error: None,
            is_satellite: false,
            is_sheet_presented: false,
            location_started: false,
            generation: 0,
            in_flight: None,
            tx,
            rx,
            events,
        }
    }

    // ------------------------------------------------------------------
    // Observable state
    // ------------------------------------------------------------------

    pub fn config(&self) -> &ViewModelConfig {
        &self.config
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[PlaceResult] {
        &self.results
    }

    pub fn selected(&self) -> Option<&PlaceResult> {
        self.selected.as_ref()
    }

    pub fn camera(&self) -> CameraTarget {
        self.camera
    }

    pub fn user_location(&self) -> Option<Coordinate> {
        self.user_location
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn show_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_satellite(&self) -> bool {
        self.is_satellite
    }

    pub fn map_style(&self) -> MapStyle {
        MapStyle::from_satellite(self.is_satellite)
    }

    pub fn is_sheet_presented(&self) -> bool {
        self.is_sheet_presented
    }

    pub fn is_searching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_location_started(&self) -> bool {
        self.location_started
    }

    /// Anchor the next search will use
    pub fn search_anchor(&self) -> Coordinate {
        self.user_location.unwrap_or(self.config.fallback_anchor)
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<ViewModelEvent> {
        self.events.subscribe()
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Ask the location provider to start delivering fixes. Safe to call repeatedly.
    pub fn request_location(&mut self) {
        if self.location_started {
            tracing::debug!("Location updates already requested");
            return;
        }

        match self
            .location_provider
            .start(LocationSink::new(self.tx.clone()))
        {
            Ok(()) => {
                tracing::info!("Location updates requested");
                self.location_started = true;
            }
            Err(e) => {
                tracing::warn!("Location provider refused to start: {e}");
                self.raise_error(e.to_string());
            }
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.query {
            self.query = query;
            self.emit(ViewModelEvent::QueryChanged(self.query.clone()));
        }
    }

    /// Replace the query and search for it
    pub fn search_for(&mut self, query: impl Into<String>) {
        self.set_query(query);
        self.search();
    }

    /// Search for the current query around the user (or the fallback anchor).
    ///
    /// Does nothing when the trimmed query is empty. The provider call runs on a
    /// spawned task; its outcome is applied when the owner drains pending messages.
    pub fn search(&mut self) {
        profiling::scope!("SearchViewModel::search");

        let trimmed = self.query.trim();
        if trimmed.is_empty() {
            tracing::debug!("Ignoring search for empty query");
            return;
        }
        let query = trimmed.to_string();

        if !runtime::in_runtime_context() {
            tracing::error!("Cannot search for {query:?}: {}", Error::NoRuntime);
            self.raise_error(Error::NoRuntime.to_string());
            return;
        }

        self.cancel_in_flight();
        self.generation += 1;
        let generation = self.generation;

        let anchor = self.search_anchor();
        let region = Region::new(anchor, self.config.search_span);
        tracing::info!("Searching for {query:?} around {anchor} (generation {generation})");

        let provider = Arc::clone(&self.search_provider);
        let timeout = self.config.search_timeout;
        let tx = self.tx.clone();
        let task_query = query.clone();
        let call_query = query.clone();
        let call = runtime::spawn(async move {
            with_optional_timeout(timeout, provider.search(&call_query, region))
                .await
                .unwrap_or_else(|| Err(SearchError::TimedOut(timeout.unwrap_or_default())))
        });
        let provider_call = call.abort_handle();

        // Every search posts a completion, even when the provider panics.
        let handle = runtime::spawn(async move {
            let outcome = match call.await {
                Ok(outcome) => outcome,
                Err(e) if e.is_panic() => {
                    tracing::error!("Search provider panicked while searching for {task_query:?}");
                    Err(SearchError::Provider(PROVIDER_CRASHED.to_string()))
                }
                Err(_) => return,
            };
            // The receiver only goes away with the view-model itself.
            let _ = tx.send(Message::SearchCompleted {
                generation,
                query: task_query,
                outcome,
            });
        });

        self.in_flight = Some(InFlightSearch {
            generation,
            handle,
            provider_call,
        });
        self.emit(ViewModelEvent::SearchStarted { query, anchor });
    }

    /// Select one of the current results and frame the camera on it
    pub fn select(&mut self, result: &PlaceResult) -> Result<()> {
        if !self.results.contains(result) {
            tracing::warn!(
                "Refusing to select {:?}: not in the current results",
                result.display_name()
            );
            return Err(Error::SelectionNotInResults);
        }
        self.apply_selection(result.clone());
        Ok(())
    }

    /// Select the result at `index`
    pub fn select_index(&mut self, index: usize) -> Result<()> {
        let result = self
            .results
            .get(index)
            .cloned()
            .ok_or(Error::SelectionNotInResults)?;
        self.apply_selection(result);
        Ok(())
    }

    /// Frame the camera on the last known user location, if any
    pub fn center_on_user(&mut self) {
        match self.user_location {
            Some(location) => {
                self.set_camera(CameraTarget::region(location, self.config.user_span));
            }
            None => tracing::debug!("Cannot center on user: no location yet"),
        }
    }

    /// Reset query, results and selection. Any search still running is abandoned.
    pub fn clear_query(&mut self) {
        self.cancel_in_flight();
        self.set_query(String::new());
        if !self.results.is_empty() {
            self.results.clear();
            self.emit(ViewModelEvent::ResultsChanged(0));
        }
        self.set_selection(None);
    }

    pub fn toggle_satellite(&mut self) {
        self.set_satellite(!self.is_satellite);
    }

    pub fn set_satellite(&mut self, enabled: bool) {
        if self.is_satellite != enabled {
            self.is_satellite = enabled;
            self.emit(ViewModelEvent::SatelliteChanged(enabled));
        }
    }

    pub fn set_sheet_presented(&mut self, presented: bool) {
        if self.is_sheet_presented != presented {
            self.is_sheet_presented = presented;
            self.emit(ViewModelEvent::SheetPresentationChanged(presented));
        }
    }

    /// Acknowledge the current error
    pub fn dismiss_error(&mut self) {
        if self.error.take().is_some() {
            self.emit(ViewModelEvent::ErrorDismissed);
        }
    }

    // ------------------------------------------------------------------
    // Message handling
    // ------------------------------------------------------------------

    /// Apply every message already queued without waiting. Returns how many were applied.
    pub fn process_pending(&mut self) -> usize {
        profiling::scope!("SearchViewModel::process_pending");

        let mut applied = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.apply(message);
            applied += 1;
        }
        applied
    }

    /// Wait for the next message and apply it.
    ///
    /// Returns `false` if the channel is closed, which cannot happen while the
    /// view-model holds its own sender.
    pub async fn next_update(&mut self) -> bool {
        match self.rx.recv().await {
            Some(message) => {
                self.apply(message);
                true
            }
            None => false,
        }
    }

    /// Apply messages until no search is in flight
    pub async fn wait_for_search(&mut self) {
        while self.is_searching() {
            if !self.next_update().await {
                break;
            }
        }
    }

    fn apply(&mut self, message: Message) {
        match message {
            Message::SearchCompleted {
                generation,
                query,
                outcome,
            } => self.on_search_completed(generation, query, outcome),
            Message::Location(LocationEvent::Update(coordinate)) => {
                self.on_location_update(coordinate)
            }
            Message::Location(LocationEvent::Failure(error)) => {
                tracing::warn!("Location failure: {error}");
                self.raise_error(error.to_string());
            }
        }
    }

    fn on_search_completed(
        &mut self,
        generation: u64,
        query: String,
        outcome: std::result::Result<Vec<PlaceResult>, SearchError>,
    ) {
        let current = self
            .in_flight
            .as_ref()
            .is_some_and(|search| search.generation == generation);
        if !current {
            tracing::debug!(
                "Dropping stale results for {query:?} (generation {generation}, latest {})",
                self.generation
            );
            return;
        }
        self.in_flight = None;

        match outcome {
            Ok(results) => {
                tracing::info!("Search for {query:?} returned {} result(s)", results.len());
                let result_count = results.len();
                self.results = results;
                self.emit(ViewModelEvent::ResultsChanged(result_count));

                if let Some(first) = self.results.first().cloned() {
                    if self.config.auto_select_first {
                        self.apply_selection(first);
                    } else if self
                        .selected
                        .as_ref()
                        .is_some_and(|s| !self.results.contains(s))
                    {
                        self.set_selection(None);
                    }
                }
                self.emit(ViewModelEvent::SearchFinished {
                    query,
                    result_count,
                });
            }
            Err(e) => {
                tracing::warn!("Search for {query:?} failed: {e}");
                self.raise_error(e.to_string());
                self.emit(ViewModelEvent::SearchFinished {
                    query,
                    result_count: 0,
                });
            }
        }
    }

    fn on_location_update(&mut self, coordinate: Coordinate) {
        tracing::debug!("Location fix at {coordinate}");
        self.user_location = Some(coordinate);
        self.emit(ViewModelEvent::UserLocationChanged(coordinate));

        // Snap the camera once; afterwards the user or explicit actions own it.
        if self.camera.is_automatic() {
            tracing::info!("Initial camera snap to {coordinate}");
            self.set_camera(CameraTarget::region(coordinate, self.config.initial_span));
        }
    }

    // ------------------------------------------------------------------
    // Internal state updates
    // ------------------------------------------------------------------

    fn apply_selection(&mut self, result: PlaceResult) {
        let camera = CameraTarget::region(result.coordinate, self.config.selection_span);
        self.set_selection(Some(result));
        self.set_camera(camera);
    }

    fn set_selection(&mut self, selection: Option<PlaceResult>) {
        if self.selected != selection {
            self.selected = selection;
            self.emit(ViewModelEvent::SelectionChanged(self.selected.clone()));
        }
    }

    fn set_camera(&mut self, camera: CameraTarget) {
        self.camera = camera;
        self.emit(ViewModelEvent::CameraChanged(camera));
    }

    fn raise_error(&mut self, message: String) {
        self.error = Some(message.clone());
        self.emit(ViewModelEvent::ErrorRaised(message));
    }

    fn cancel_in_flight(&mut self) {
        if let Some(search) = self.in_flight.take() {
            tracing::debug!("Cancelling search generation {}", search.generation);
            search.provider_call.abort();
            search.handle.abort();
        }
    }

    fn emit(&self, event: ViewModelEvent) {
        // No subscribers is fine; nobody is watching yet.
        let _ = self.events.send(event);
    }
}

impl Drop for SearchViewModel {
    fn drop(&mut self) {
        self.cancel_in_flight();
        if self.location_started {
            self.location_provider.stop();
        }
    }
}
