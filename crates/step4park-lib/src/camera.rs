use crate::{Coordinate, Region, Span};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where the map camera should look
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CameraTarget {
    /// No explicit center yet; the map frames itself
    #[default]
    Automatic,
    /// Explicit center and zoom span
    Region(Region),
}

impl CameraTarget {
    pub fn region(center: Coordinate, span: Span) -> Self {
        Self::Region(Region::new(center, span))
    }

    pub fn is_automatic(&self) -> bool {
        matches!(self, Self::Automatic)
    }

    pub fn center(&self) -> Option<Coordinate> {
        match self {
            Self::Automatic => None,
            Self::Region(region) => Some(region.center),
        }
    }
}

/// Base map imagery, derived from the satellite flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MapStyle {
    #[default]
    Standard,
    Imagery,
}

impl MapStyle {
    pub fn from_satellite(is_satellite: bool) -> Self {
        if is_satellite {
            Self::Imagery
        } else {
            Self::Standard
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Imagery => "imagery",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_default_is_automatic() {
        let camera = CameraTarget::default();
        assert!(camera.is_automatic());
        assert_eq!(camera.center(), None);
    }

    #[test]
    fn test_camera_region_center() {
        let c = Coordinate::new(10.0, 20.0);
        let camera = CameraTarget::region(c, Span::square(0.01));
        assert!(!camera.is_automatic());
        assert_eq!(camera.center(), Some(c));
    }

    #[test]
    fn test_map_style_from_flag() {
        assert_eq!(MapStyle::from_satellite(false), MapStyle::Standard);
        assert_eq!(MapStyle::from_satellite(true), MapStyle::Imagery);
    }
}
