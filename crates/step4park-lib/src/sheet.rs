//! Bottom sheet state machine
//!
//! The sheet level is presentation state: the view-model never reads it. The
//! presentation layer feeds it user actions and view-model notifications, and reads
//! back what the sheet should show.

use crate::ViewModelEvent;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Share of the screen height the collapsed sheet keeps visible
pub const COLLAPSED_FRACTION: f32 = 0.18;

/// Share of the screen height at the medium detent
pub const MEDIUM_FRACTION: f32 = 0.5;

/// Typing this many characters into a collapsed sheet opens it
pub const OPEN_ON_QUERY_LENGTH: usize = 2;

/// Detent the sheet rests at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SheetLevel {
    #[default]
    Collapsed,
    Medium,
    Large,
}

impl SheetLevel {
    /// Share of the screen height the sheet covers at this detent
    pub fn fraction(&self) -> f32 {
        match self {
            Self::Collapsed => COLLAPSED_FRACTION,
            Self::Medium => MEDIUM_FRACTION,
            Self::Large => 1.0,
        }
    }
}

/// What the sheet body displays below the search bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetContent {
    SearchBarOnly,
    Suggestions,
    Results,
}

/// Presentation-side sheet controller
#[derive(Debug, Clone, Default)]
pub struct SheetState {
    level: SheetLevel,
}

impl SheetState {
    pub fn level(&self) -> SheetLevel {
        self.level
    }

    /// Drag to a detent
    pub fn set_level(&mut self, level: SheetLevel) {
        if self.level != level {
            tracing::debug!("Sheet {:?} -> {:?}", self.level, level);
            self.level = level;
        }
    }

    pub fn fraction(&self) -> f32 {
        self.level.fraction()
    }

    pub fn is_collapsed(&self) -> bool {
        self.level == SheetLevel::Collapsed
    }

    /// Chevron button: open a collapsed sheet, collapse anything else
    pub fn toggle(&mut self) {
        let next = if self.is_collapsed() {
            SheetLevel::Medium
        } else {
            SheetLevel::Collapsed
        };
        self.set_level(next);
    }

    pub fn on_selection_changed(&mut self, has_selection: bool) {
        if has_selection {
            self.set_level(SheetLevel::Medium);
        }
    }

    pub fn on_query_edited(&mut self, query: &str) {
        if self.is_collapsed() && query.chars().count() >= OPEN_ON_QUERY_LENGTH {
            self.set_level(SheetLevel::Medium);
        }
    }

    /// Query submitted, suggestion picked or result tapped in the list
    pub fn on_search_action(&mut self) {
        self.set_level(SheetLevel::Medium);
    }

    pub fn on_query_cleared(&mut self) {
        self.set_level(SheetLevel::Collapsed);
    }

    pub fn on_center_on_user(&mut self) {
        self.set_level(SheetLevel::Collapsed);
    }

    /// Tap on the map. Taps on a marker select it and leave the sheet alone.
    pub fn on_map_tap(&mut self, has_selection: bool) {
        if !has_selection {
            self.set_level(SheetLevel::Collapsed);
        }
    }

    /// Follow view-model notifications
    pub fn apply(&mut self, event: &ViewModelEvent) {
        match event {
            ViewModelEvent::SelectionChanged(selection) => {
                self.on_selection_changed(selection.is_some())
            }
            ViewModelEvent::QueryChanged(query) if query.is_empty() => self.on_query_cleared(),
            ViewModelEvent::QueryChanged(query) => self.on_query_edited(query),
            _ => {}
        }
    }

    pub fn content(&self, results_empty: bool) -> SheetContent {
        if self.is_collapsed() {
            SheetContent::SearchBarOnly
        } else if results_empty {
            SheetContent::Suggestions
        } else {
            SheetContent::Results
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Coordinate, PlaceResult};

    #[test]
    fn test_starts_collapsed() {
        let sheet = SheetState::default();
        assert_eq!(sheet.level(), SheetLevel::Collapsed);
        assert_eq!(sheet.content(true), SheetContent::SearchBarOnly);
        assert_eq!(sheet.content(false), SheetContent::SearchBarOnly);
    }

    #[test]
    fn test_fraction_follows_level() {
        let mut sheet = SheetState::default();
        assert_eq!(sheet.fraction(), COLLAPSED_FRACTION);
        sheet.set_level(SheetLevel::Medium);
        assert_eq!(sheet.fraction(), MEDIUM_FRACTION);
        sheet.set_level(SheetLevel::Large);
        assert_eq!(sheet.fraction(), 1.0);
        assert!(SheetLevel::Collapsed.fraction() < SheetLevel::Medium.fraction());
    }

    #[test]
    fn test_typing_opens_collapsed_sheet() {
        let mut sheet = SheetState::default();
        sheet.on_query_edited("p");
        assert!(sheet.is_collapsed());
        sheet.on_query_edited("pa");
        assert_eq!(sheet.level(), SheetLevel::Medium);

        sheet.set_level(SheetLevel::Large);
        sheet.on_query_edited("par");
        assert_eq!(sheet.level(), SheetLevel::Large);
    }

    #[test]
    fn test_map_tap_collapses_only_without_selection() {
        let mut sheet = SheetState::default();
        sheet.set_level(SheetLevel::Medium);
        sheet.on_map_tap(true);
        assert_eq!(sheet.level(), SheetLevel::Medium);
        sheet.on_map_tap(false);
        assert_eq!(sheet.level(), SheetLevel::Collapsed);
    }

    #[test]
    fn test_toggle() {
        let mut sheet = SheetState::default();
        sheet.toggle();
        assert_eq!(sheet.level(), SheetLevel::Medium);
        sheet.toggle();
        assert_eq!(sheet.level(), SheetLevel::Collapsed);
        sheet.set_level(SheetLevel::Large);
        sheet.toggle();
        assert_eq!(sheet.level(), SheetLevel::Collapsed);
    }

    #[test]
    fn test_actions() {
        let mut sheet = SheetState::default();
        sheet.on_search_action();
        assert_eq!(sheet.level(), SheetLevel::Medium);
        sheet.on_center_on_user();
        assert!(sheet.is_collapsed());
        sheet.set_level(SheetLevel::Large);
        sheet.on_query_cleared();
        assert!(sheet.is_collapsed());
    }

    #[test]
    fn test_follows_view_model_events() {
        let mut sheet = SheetState::default();
        let place = PlaceResult::new("A", Coordinate::new(1.0, 2.0));

        sheet.apply(&ViewModelEvent::SelectionChanged(Some(place)));
        assert_eq!(sheet.level(), SheetLevel::Medium);
        sheet.apply(&ViewModelEvent::SelectionChanged(None));
        assert_eq!(sheet.level(), SheetLevel::Medium);
        sheet.apply(&ViewModelEvent::QueryChanged(String::new()));
        assert!(sheet.is_collapsed());
        sheet.apply(&ViewModelEvent::QueryChanged("resto".into()));
        assert_eq!(sheet.level(), SheetLevel::Medium);
        sheet.apply(&ViewModelEvent::SatelliteChanged(true));
        assert_eq!(sheet.level(), SheetLevel::Medium);
    }

    #[test]
    fn test_content_when_open() {
        let mut sheet = SheetState::default();
        sheet.set_level(SheetLevel::Medium);
        assert_eq!(sheet.content(true), SheetContent::Suggestions);
        assert_eq!(sheet.content(false), SheetContent::Results);
    }
}
