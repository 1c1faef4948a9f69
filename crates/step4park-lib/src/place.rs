use crate::Coordinate;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Placeholder shown for places the provider returned without a name
pub const UNNAMED_PLACE: &str = "Unnamed place";

/// A single place returned by a search provider
///
/// Places carry no server-assigned id; two results are the same place when all
/// their fields are equal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlaceResult {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    pub coordinate: Coordinate,
    #[cfg_attr(feature = "serde", serde(default))]
    pub subtitle: Option<String>,
}

impl PlaceResult {
    pub fn new(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: Some(name.into()),
            coordinate,
            subtitle: None,
        }
    }

    pub fn unnamed(coordinate: Coordinate) -> Self {
        Self {
            name: None,
            coordinate,
            subtitle: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED_PLACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback() {
        let c = Coordinate::new(1.0, 2.0);
        assert_eq!(PlaceResult::new("Parking Indigo", c).display_name(), "Parking Indigo");
        assert_eq!(PlaceResult::unnamed(c).display_name(), UNNAMED_PLACE);
    }

    #[test]
    fn test_identity_is_by_value() {
        let c = Coordinate::new(1.0, 2.0);
        let a = PlaceResult::new("A", c).with_subtitle("1 rue de Rivoli");
        let b = PlaceResult::new("A", c).with_subtitle("1 rue de Rivoli");
        assert_eq!(a, b);
        assert_ne!(a, PlaceResult::new("A", c));
    }
}
