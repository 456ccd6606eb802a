//! The desk: a bounded horizontal slab objects are placed on and clamped to.

use glam::DVec3;
use shared::DeskParams;

use crate::error::EditorError;
use crate::settings::{MIN_BOUND_OFFSET, SLAB_THICKNESS};

/// Height of the grid above the slab centre, so it sits on the top face
const GRID_LIFT: f64 = SLAB_THICKNESS / 2.0;

/// One grid line in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub start: DVec3,
    pub end: DVec3,
    /// Every 10 cm from the centre
    pub major: bool,
}

/// Allowed range for an object's centre while dragging
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Bounds {
    /// Clamp a candidate centre into the bounds
    pub fn clamp(&self, x: f64, z: f64) -> (f64, f64) {
        (clamp(x, self.min_x, self.max_x), clamp(z, self.min_z, self.max_z))
    }
}

/// `max(min, min(max, v))`. Unlike `f64::clamp` this never panics when the
/// range is inverted (an object wider than the desk), it just yields `min`.
fn clamp(value: f64, min: f64, max: f64) -> f64 {
    min.max(max.min(value))
}

/// The active desk
#[derive(Debug, Clone)]
pub struct Surface {
    pub width: f64,
    pub depth: f64,
    /// World-space y of the slab centre
    pub origin_y: f64,
    pub grid_visible: bool,
    /// The slab is hidden while the grid is shown
    pub slab_visible: bool,
    grid: Vec<GridLine>,
}

impl Surface {
    /// y of the slab's top face
    pub fn top_y(&self) -> f64 {
        self.origin_y + SLAB_THICKNESS / 2.0
    }

    pub fn grid_lines(&self) -> &[GridLine] {
        &self.grid
    }

    pub fn params(&self) -> DeskParams {
        DeskParams {
            width: self.width,
            depth: self.depth,
        }
    }

    /// Centre range for an object with the given world half-extents.
    ///
    /// The `- MIN_BOUND_OFFSET` on the min side only is long-standing behaviour
    /// that saved layouts depend on; keep it.
    pub fn bounds_for(&self, half_width: f64, half_depth: f64, margin: f64) -> Bounds {
        Bounds {
            min_x: -(self.width / 2.0) + margin + half_width - MIN_BOUND_OFFSET,
            max_x: (self.width / 2.0) + margin - half_width,
            min_z: -(self.depth / 2.0) + margin + half_depth - MIN_BOUND_OFFSET,
            max_z: (self.depth / 2.0) + margin - half_depth,
        }
    }

    /// Slab corners on the top face, counter-clockwise seen from above
    pub fn top_corners(&self) -> [DVec3; 4] {
        let (hw, hd, y) = (self.width / 2.0, self.depth / 2.0, self.top_y());
        [
            DVec3::new(-hw, y, -hd),
            DVec3::new(-hw, y, hd),
            DVec3::new(hw, y, hd),
            DVec3::new(hw, y, -hd),
        ]
    }
}

/// Whole centimetres in `meters`, if that fits a grid we are willing to build
fn grid_steps(meters: f64) -> Option<usize> {
    let cm = (meters * 100.0).round();
    (cm.is_finite() && cm >= 0.0 && cm <= u32::MAX as f64).then_some(cm as usize)
}

/// 1 cm grid across the desk; line count is `round(w*100) + round(d*100) + 2`.
fn build_grid(width: f64, depth: f64, origin_y: f64) -> Result<Vec<GridLine>, EditorError> {
    let (half_w, half_d) = (width / 2.0, depth / 2.0);
    let w_steps = grid_steps(width).ok_or(EditorError::InvalidDimension { what: "desk width", value: width })?;
    let d_steps = grid_steps(depth).ok_or(EditorError::InvalidDimension { what: "desk depth", value: depth })?;
    let capacity = w_steps
        .checked_add(d_steps)
        .and_then(|n| n.checked_add(2))
        .ok_or(EditorError::InvalidDimension { what: "desk width", value: width })?;
    let (w_cm, d_cm) = (w_steps as f64, d_steps as f64);
    let y = origin_y + GRID_LIFT;
    let mut lines = Vec::with_capacity(capacity);

    // Lines along x, stepping in z
    for k in 0..=d_steps {
        let i = k as f64 - d_cm / 2.0;
        let z = i / 100.0;
        lines.push(GridLine {
            start: DVec3::new(-half_w, y, z),
            end: DVec3::new(half_w, y, z),
            major: is_major(i),
        });
    }
    // Lines along z, stepping in x
    for k in 0..=w_steps {
        let i = k as f64 - w_cm / 2.0;
        let x = i / 100.0;
        lines.push(GridLine {
            start: DVec3::new(x, y, -half_d),
            end: DVec3::new(x, y, half_d),
            major: is_major(i),
        });
    }
    Ok(lines)
}

/// Half-centimetre offsets (odd cm counts) are never major
fn is_major(i_cm: f64) -> bool {
    i_cm.fract() == 0.0 && (i_cm as i64) % 10 == 0
}

/// Holder for the (at most one) active desk
#[derive(Debug, Clone)]
pub struct SurfaceModel {
    origin_y: f64,
    /// Longest accepted desk edge (meters)
    max_size: f64,
    current: Option<Surface>,
}

impl SurfaceModel {
    pub fn new(origin_y: f64) -> Self {
        Self {
            origin_y,
            max_size: shared::MAX_DESK_EDGE,
            current: None,
        }
    }

    pub fn with_max_size(mut self, max_size: f64) -> Self {
        self.max_size = max_size;
        self
    }

    /// Check a desk size without creating anything
    pub fn validate(&self, width: f64, depth: f64) -> Result<(), EditorError> {
        EditorError::check_dimension_at_most("desk width", width, self.max_size)?;
        EditorError::check_dimension_at_most("desk depth", depth, self.max_size)?;
        Ok(())
    }

    /// Replace the desk. Objects already placed are not re-clamped.
    pub fn create(&mut self, width: f64, depth: f64) -> Result<&Surface, EditorError> {
        self.validate(width, depth)?;

        let surface = Surface {
            width,
            depth,
            origin_y: self.origin_y,
            grid_visible: false,
            slab_visible: true,
            grid: build_grid(width, depth, self.origin_y)?,
        };
        tracing::info!(
            "Desk created: {:.0}x{:.0} cm, {} grid lines",
            width * 100.0,
            depth * 100.0,
            surface.grid.len()
        );
        Ok(self.current.insert(surface))
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Swap slab and grid visibility; nothing happens without a desk
    pub fn toggle_grid_visibility(&mut self) {
        if let Some(surface) = &mut self.current {
            surface.grid_visible = !surface.grid_visible;
            surface.slab_visible = !surface.slab_visible;
        }
    }

    pub fn current(&self) -> Option<&Surface> {
        self.current.as_ref()
    }

    pub fn exists(&self) -> bool {
        self.current.is_some()
    }

    pub fn top_y(&self) -> Option<f64> {
        self.current.as_ref().map(Surface::top_y)
    }

    /// Drag bounds for an object with the given half-extents, or `None` without a desk
    pub fn bounds(&self, half_width: f64, half_depth: f64, margin: f64) -> Option<Bounds> {
        self.current
            .as_ref()
            .map(|s| s.bounds_for(half_width, half_depth, margin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_create_rejects_bad_size() {
        let mut m = SurfaceModel::new(0.7);
        assert!(matches!(
            m.create(0.0, 0.6),
            Err(EditorError::InvalidDimension { .. })
        ));
        assert!(m.create(1.2, -0.1).is_err());
        assert!(!m.exists());
    }

    #[test]
    fn test_create_rejects_oversized_desk() {
        let mut m = SurfaceModel::new(0.7).with_max_size(3.0);
        m.create(1.2, 0.6).unwrap();
        assert!(matches!(
            m.create(1e20, 0.6),
            Err(EditorError::InvalidDimension { what: "desk width", .. })
        ));
        assert!(m.create(1.2, 3.5).is_err());
        // The old desk survives a rejected resize
        assert_eq!(m.current().unwrap().width, 1.2);
        assert!(m.create(3.0, 3.0).is_ok());
    }

    #[test]
    fn test_grid_steps_are_checked() {
        assert_eq!(grid_steps(1.2), Some(120));
        assert_eq!(grid_steps(1e20), None);
        assert_eq!(grid_steps(f64::INFINITY), None);
    }

    #[test]
    fn test_grid_line_count() {
        let mut m = SurfaceModel::new(0.7);
        let s = m.create(1.2, 0.6).unwrap();
        assert_eq!(s.grid_lines().len(), 120 + 60 + 2);

        let s = m.create(0.61, 0.6).unwrap();
        assert_eq!(s.grid_lines().len(), 61 + 60 + 2);
    }

    #[test]
    fn test_major_lines() {
        let mut m = SurfaceModel::new(0.7);
        let s = m.create(1.2, 0.6).unwrap();
        let majors = s.grid_lines().iter().filter(|l| l.major).count();
        // z: -30..=30 step 10 -> 7; x: -60..=60 step 10 -> 13
        assert_eq!(majors, 7 + 13);
        assert!(s.grid_lines().iter().all(|l| (l.start.y - 0.71).abs() < EPS));
    }

    #[test]
    fn test_odd_width_has_no_centre_major() {
        let mut m = SurfaceModel::new(0.7);
        let s = m.create(0.61, 0.6).unwrap();
        let x_lines: Vec<_> = s.grid_lines()[61..].to_vec();
        assert_eq!(x_lines.len(), 62);
        assert!(x_lines.iter().all(|l| !l.major));
    }

    #[test]
    fn test_clear_and_bounds() {
        let mut m = SurfaceModel::new(0.7);
        m.create(1.2, 0.6).unwrap();
        assert!(m.bounds(0.025, 0.025, 0.05).is_some());
        m.clear();
        assert!(m.bounds(0.025, 0.025, 0.05).is_none());
        assert!(m.top_y().is_none());
    }

    #[test]
    fn test_bounds_formula() {
        let mut m = SurfaceModel::new(0.7);
        m.create(1.2, 0.6).unwrap();
        let b = m.bounds(0.025, 0.05, 0.05).unwrap();
        assert!((b.min_x - (-0.6 + 0.05 + 0.025 - 0.1)).abs() < EPS);
        assert!((b.max_x - (0.6 + 0.05 - 0.025)).abs() < EPS);
        assert!((b.min_z - (-0.3 + 0.05 + 0.05 - 0.1)).abs() < EPS);
        assert!((b.max_z - (0.3 + 0.05 - 0.05)).abs() < EPS);
        // Span = size - 2*half + 0.1
        assert!(((b.max_x - b.min_x) - (1.2 - 0.05 + 0.1)).abs() < EPS);
        assert!(((b.max_z - b.min_z) - (0.6 - 0.1 + 0.1)).abs() < EPS);
    }

    #[test]
    fn test_clamp_inverted_range() {
        let b = Bounds { min_x: 0.5, max_x: -0.5, min_z: 0.0, max_z: 1.0 };
        assert_eq!(b.clamp(0.0, 2.0), (0.5, 1.0));
    }

    #[test]
    fn test_toggle_grid() {
        let mut m = SurfaceModel::new(0.7);
        m.toggle_grid_visibility();
        m.create(1.2, 0.6).unwrap();
        assert!(!m.current().unwrap().grid_visible);
        m.toggle_grid_visibility();
        let s = m.current().unwrap();
        assert!(s.grid_visible);
        assert!(!s.slab_visible);
    }

    #[test]
    fn test_top_y() {
        let mut m = SurfaceModel::new(0.7);
        m.create(1.2, 0.6).unwrap();
        assert!((m.top_y().unwrap() - 0.71).abs() < EPS);
    }
}
