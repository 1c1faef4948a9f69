//! step4park - Application Library
//!
//! Wires the search view-model from `step4park-lib` to a place catalog and a
//! simulated location source, and reports what the screen would show.

mod app;

pub use app::logging::{log_version_info, setup_logging, short_version_info};
pub use app::settings::Settings;
pub use app::{
    App, AppError, CatalogError, CatalogSearchProvider, SearchReport, SessionReport,
    SimulatedLocationProvider, run,
};
