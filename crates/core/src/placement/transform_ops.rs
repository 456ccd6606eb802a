//! Discrete transforms: rotate, rescale

use glam::DVec3;

use super::{ObjectId, PlacementEngine};
use crate::error::EditorError;
use crate::surface::SurfaceModel;

impl PlacementEngine {
    /// Add `delta` radians to the object's yaw. Returns false for stale handles.
    pub fn rotate(&mut self, id: ObjectId, delta: f64) -> bool {
        let Some(obj) = self.get_mut(id) else {
            return false;
        };
        obj.rotation_y += delta;
        self.bump();
        true
    }

    /// Resize the object to `width` x `height` x `depth` meters by scaling its
    /// base size, then rest it on the desk top again.
    ///
    /// Dimensions are checked before the desk; a stale handle is `Ok(false)`.
    pub fn rescale(
        &mut self,
        id: ObjectId,
        width: f64,
        height: f64,
        depth: f64,
        surface: &SurfaceModel,
    ) -> Result<bool, EditorError> {
        EditorError::check_dimension("width", width)?;
        EditorError::check_dimension("height", height)?;
        EditorError::check_dimension("depth", depth)?;
        let top_y = surface.top_y().ok_or(EditorError::NoSurface)?;

        let Some(obj) = self.get_mut(id) else {
            return Ok(false);
        };
        let base = obj.base_size.as_dvec3();
        obj.scale = DVec3::new(width, height, depth) / base;
        obj.position.y = top_y + height / 2.0;
        tracing::debug!(
            "Rescaled {id} to {:.3}x{:.3}x{:.3} (scale {:?})",
            width,
            height,
            depth,
            obj.scale
        );
        self.bump();
        Ok(true)
    }
}
