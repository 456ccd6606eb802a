//! Placement tuning shared by every front end

use serde::{Deserialize, Serialize};

/// Extra slack subtracted from the min-side drag bounds only; see `Surface::bounds_for`
pub const MIN_BOUND_OFFSET: f64 = 0.1;

/// Desk slab thickness in meters. The slab is centred on the surface origin.
pub const SLAB_THICKNESS: f64 = 0.02;

/// Geometry and interaction constants for the desk and the objects on it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementSettings {
    /// Margin added to the desk half-extents when clamping drags (meters)
    pub margin: f64,
    /// World-space height of the desk slab's centre (meters)
    pub desk_origin_y: f64,
    /// Desk created on start-up and by "new desk" when no size is given
    pub default_desk_width: f64,
    pub default_desk_depth: f64,
    /// Longest desk edge accepted when creating a desk (meters)
    pub max_desk_size: f64,
    /// Catalog item placed on a freshly created desk, if any
    pub starter_template: Option<String>,
    /// Radians of yaw per pixel of horizontal pointer motion in a rotate gesture
    pub rotate_speed: f64,
    /// Radians applied by one rotate key press / handle click
    pub rotate_step: f64,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            margin: 0.05,
            desk_origin_y: 0.7,
            default_desk_width: 1.2,
            default_desk_depth: 0.6,
            max_desk_size: shared::MAX_DESK_EDGE,
            starter_template: Some("default-cube".to_string()),
            rotate_speed: 0.01,
            rotate_step: std::f64::consts::PI / 12.0,
        }
    }
}
