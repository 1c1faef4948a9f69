//! View-model configuration
//!
//! Searches cover roughly a city district around the anchor. A picked place is
//! framed tightest, "center on me" a little looser, and the first location fix
//! looser still.

use crate::{Coordinate, Span};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Search anchor used until the first location fix arrives (Paris)
pub const FALLBACK_ANCHOR: Coordinate = Coordinate::new(48.8566, 2.3522);

/// Configuration for [`crate::SearchViewModel`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ViewModelConfig {
    /// Anchor for searches issued before any location fix.
    pub fallback_anchor: Coordinate,
    /// Extent of the region handed to the search provider.
    pub search_span: Span,
    /// Camera span when a result is selected.
    pub selection_span: Span,
    /// Camera span for "center on me". Looser than the selection span.
    pub user_span: Span,
    /// Camera span of the one-time snap on the first location fix.
    pub initial_span: Span,
    /// Select the first result of every non-empty search (recenters the camera).
    pub auto_select_first: bool,
    /// Give up on a provider call after this long. `None` waits forever.
    #[cfg_attr(feature = "serde", serde(default))]
    pub search_timeout: Option<Duration>,
}

impl Default for ViewModelConfig {
    fn default() -> Self {
        Self {
            fallback_anchor: FALLBACK_ANCHOR,
            search_span: Span::square(0.08),
            selection_span: Span::square(0.01),
            user_span: Span::square(0.015),
            initial_span: Span::square(0.02),
            auto_select_first: true,
            search_timeout: None,
        }
    }
}
