use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use step4park_lib::{Coordinate, Span, ViewModelConfig, default_suggestions};

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// step4park - search for parking and other places around you, headless
pub struct Settings {
    /// Queries to run in order (defaults to the suggestion shortcuts)
    #[clap(value_name = "QUERY")]
    pub queries: Vec<String>,

    /// JSON place catalog to search (a built-in Paris sample when omitted)
    #[clap(short, long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Simulated location fix as LAT,LON (repeat for a moving user)
    #[clap(short, long, value_name = "LAT,LON")]
    pub location: Vec<Coordinate>,

    /// Simulate a declined location permission
    #[clap(long, default_value = "false")]
    pub deny_location: bool,

    /// Delay before each simulated location fix, in milliseconds
    #[clap(long, default_value = "50")]
    pub location_interval_ms: u64,

    /// How long to wait for the first location fix before searching, in milliseconds
    #[clap(long, default_value = "1000")]
    pub location_wait_ms: u64,

    /// Search anchor used while no location is known, as LAT,LON
    #[clap(long, value_name = "LAT,LON")]
    pub fallback: Option<Coordinate>,

    /// Extent of the search area in degrees
    #[clap(long, default_value = "0.08", value_parser = parse_span)]
    pub search_span: f64,

    /// Give up on a search after this many milliseconds
    #[clap(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Simulated search latency in milliseconds
    #[clap(long, default_value = "0")]
    pub latency_ms: u64,

    /// Do not select the first result of each search
    #[clap(long, default_value = "false")]
    pub no_auto_select: bool,

    /// Start with satellite imagery
    #[clap(long, default_value = "false")]
    pub satellite: bool,

    /// Print the report as JSON
    #[clap(long, default_value = "false")]
    pub json: bool,
}

/// A span must be a finite, positive number of degrees
fn parse_span(s: &str) -> Result<f64, String> {
    let span: f64 = s.parse().map_err(|e| format!("{s:?} is not a number: {e}"))?;
    if span.is_finite() && span > 0.0 && span <= 180.0 {
        Ok(span)
    } else {
        Err(format!("span must be in (0, 180] degrees, got {s}"))
    }
}

impl Settings {
    /// Parse settings from the command line, exiting with usage on error
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    pub fn view_model_config(&self) -> ViewModelConfig {
        let defaults = ViewModelConfig::default();
        ViewModelConfig {
            fallback_anchor: self.fallback.unwrap_or(defaults.fallback_anchor),
            search_span: Span::square(self.search_span),
            auto_select_first: !self.no_auto_select,
            search_timeout: self.timeout_ms.map(Duration::from_millis),
            ..defaults
        }
    }

    /// Queries given on the command line, or the suggestion shortcuts
    pub fn effective_queries(&self) -> Vec<String> {
        if self.queries.is_empty() {
            default_suggestions()
                .iter()
                .map(|s| s.query.to_string())
                .collect()
        } else {
            self.queries.clone()
        }
    }

    pub fn wants_location(&self) -> bool {
        self.deny_location || !self.location.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::parse_from(["step4park"]);
        assert!(settings.queries.is_empty());
        assert!(!settings.wants_location());
        assert_eq!(
            settings.effective_queries(),
            vec!["Parking", "Borne de recharge", "Restaurant"]
        );
        assert_eq!(settings.view_model_config(), ViewModelConfig::default());
    }

    #[test]
    fn test_parse_locations_and_config() {
        let settings = Settings::parse_from([
            "step4park",
            "--location",
            "10,20",
            "-l",
            "11.5,21.5",
            "--fallback",
            "45.76,4.83",
            "--no-auto-select",
            "--timeout-ms",
            "250",
            "parking",
        ]);
        assert_eq!(
            settings.location,
            vec![Coordinate::new(10.0, 20.0), Coordinate::new(11.5, 21.5)]
        );
        assert_eq!(settings.effective_queries(), vec!["parking"]);

        let config = settings.view_model_config();
        assert_eq!(config.fallback_anchor, Coordinate::new(45.76, 4.83));
        assert!(!config.auto_select_first);
        assert_eq!(config.search_timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_search_span_is_validated() {
        for bad in ["0", "-0.5", "NaN", "inf", "200", "wide"] {
            assert!(
                Settings::try_parse_from(["step4park", "--search-span", bad]).is_err(),
                "accepted search span {bad}"
            );
        }
        let settings = Settings::parse_from(["step4park", "--search-span", "0.2"]);
        assert_eq!(settings.view_model_config().search_span, Span::square(0.2));
    }

    #[test]
    fn test_invalid_location_is_rejected() {
        assert!(Settings::try_parse_from(["step4park", "--location", "north"]).is_err());
        assert!(Settings::try_parse_from(["step4park", "--location", "95,0"]).is_err());
    }
}
