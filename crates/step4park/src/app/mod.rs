//! Application module
//!
//! Headless driver for the map search screen:
//! - Place search over a JSON catalog (or the built-in Paris sample)
//! - Simulated location fixes or a declined permission
//! - Bottom sheet state tracked from view-model notifications
//! - A text or JSON report of every search

mod catalog;
mod location;
pub(crate) mod logging;
pub(crate) mod settings;

pub use catalog::{CatalogError, CatalogSearchProvider};
pub use location::SimulatedLocationProvider;

use crate::app::settings::Settings;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use step4park_lib::{
    CameraTarget, Coordinate, LocationProvider, MapStyle, PlaceResult, SearchViewModel,
    SheetLevel, SheetState, ViewModelEvent,
};
use tokio::sync::broadcast;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Failed to encode report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Outcome of one query
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub anchor: Coordinate,
    pub results: Vec<PlaceResult>,
    pub selected: Option<PlaceResult>,
    pub camera: CameraTarget,
    pub error: Option<String>,
    pub sheet: SheetLevel,
}

/// Everything observed during a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub user_location: Option<Coordinate>,
    pub location_error: Option<String>,
    pub map_style: MapStyle,
    pub searches: Vec<SearchReport>,
    pub final_camera: CameraTarget,
}

/// Main application structure
pub struct App {
    settings: Settings,
    vm: SearchViewModel,
    sheet: SheetState,
    events: broadcast::Receiver<ViewModelEvent>,
}

impl App {
    pub fn new(settings: Settings) -> Result<Self, AppError> {
        let catalog = match &settings.catalog {
            Some(path) => CatalogSearchProvider::load(path)?,
            None => CatalogSearchProvider::sample()?,
        }
        .with_latency(Duration::from_millis(settings.latency_ms));

        let location: Arc<dyn LocationProvider> = if settings.deny_location {
            Arc::new(SimulatedLocationProvider::denied())
        } else {
            Arc::new(SimulatedLocationProvider::new(
                settings.location.clone(),
                Duration::from_millis(settings.location_interval_ms),
            ))
        };

        let vm = SearchViewModel::new(settings.view_model_config(), Arc::new(catalog), location);
        let events = vm.subscribe();

        Ok(Self {
            settings,
            vm,
            sheet: SheetState::default(),
            events,
        })
    }

    pub async fn run(mut self) -> SessionReport {
        self.vm.set_sheet_presented(true);
        self.vm.set_satellite(self.settings.satellite);
        self.vm.request_location();

        let location_error = self.wait_for_location().await;

        let mut searches = Vec::new();
        for query in self.settings.effective_queries() {
            searches.push(self.run_query(&query).await);
        }

        if self.vm.user_location().is_some() {
            self.vm.center_on_user();
            self.sheet.on_center_on_user();
        }
        self.vm.process_pending();
        self.sync_sheet();

        SessionReport {
            user_location: self.vm.user_location(),
            location_error,
            map_style: self.vm.map_style(),
            searches,
            final_camera: self.vm.camera(),
        }
    }

    /// Wait (bounded) for the first fix or failure. Returns the failure, if any.
    async fn wait_for_location(&mut self) -> Option<String> {
        if !self.settings.wants_location() {
            tracing::info!("No location source configured, searching around the fallback anchor");
            return None;
        }

        let vm = &mut self.vm;
        let limit = Duration::from_millis(self.settings.location_wait_ms);
        let waited = tokio::time::timeout(limit, async {
            while vm.user_location().is_none() && !vm.show_error() {
                if !vm.next_update().await {
                    break;
                }
            }
        })
        .await;
        if waited.is_err() {
            tracing::warn!("No location fix after {} ms", limit.as_millis());
        }

        // Keep location failures out of the per-search reports.
        let error = self.vm.error_message().map(str::to_string);
        self.vm.dismiss_error();
        self.sync_sheet();
        error
    }

    async fn run_query(&mut self, query: &str) -> SearchReport {
        let anchor = self.vm.search_anchor();
        self.vm.search_for(query);
        // Blank queries never start a search and leave the sheet where it is.
        if self.vm.is_searching() {
            self.sheet.on_search_action();
        }
        self.vm.wait_for_search().await;
        self.sync_sheet();

        let report = SearchReport {
            query: query.to_string(),
            anchor,
            results: self.vm.results().to_vec(),
            selected: self.vm.selected().cloned(),
            camera: self.vm.camera(),
            error: self.vm.error_message().map(str::to_string),
            sheet: self.sheet.level(),
        };
        self.vm.dismiss_error();
        report
    }

    fn sync_sheet(&mut self) {
        profiling::scope!("App::sync_sheet");

        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    let before = self.sheet.level();
                    self.sheet.apply(&event);
                    if self.sheet.level() != before {
                        tracing::debug!("Sheet {before:?} -> {:?} on {event:?}", self.sheet.level());
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("Sheet missed {skipped} view-model events");
                }
                Err(_) => break,
            }
        }
    }
}

/// Run a session and print its report
pub async fn run(settings: Settings) -> Result<(), AppError> {
    let json = settings.json;
    let report = App::new(settings)?.run().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn describe_camera(camera: &CameraTarget) -> String {
    match camera {
        CameraTarget::Automatic => "automatic".to_string(),
        CameraTarget::Region(region) => format!(
            "{} (span {:.3} x {:.3})",
            region.center, region.span.latitude_delta, region.span.longitude_delta
        ),
    }
}

fn print_report(report: &SessionReport) {
    match (&report.user_location, &report.location_error) {
        (Some(location), _) => println!("You are at {location}"),
        (None, Some(error)) => println!("Location: {error}"),
        (None, None) => println!("Location unknown"),
    }
    println!("Map style: {}", report.map_style.name());

    for search in &report.searches {
        println!();
        println!("Search {:?} around {}", search.query, search.anchor);
        if let Some(error) = &search.error {
            println!("  error: {error}");
        }
        for (i, place) in search.results.iter().enumerate() {
            let marker = if search.selected.as_ref() == Some(place) {
                '*'
            } else {
                ' '
            };
            print!("  {marker} {}. {} ({})", i + 1, place.display_name(), place.coordinate);
            match &place.subtitle {
                Some(subtitle) => println!(" - {subtitle}"),
                None => println!(),
            }
        }
        println!("  camera: {}", describe_camera(&search.camera));
        println!(
            "  sheet: {:?} ({:.0}% of the screen)",
            search.sheet,
            search.sheet.fraction() * 100.0
        );
    }

    println!();
    println!("Final camera: {}", describe_camera(&report.final_camera));
}
