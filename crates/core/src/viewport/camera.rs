use glam::{DMat4, DVec3, DVec4};

use super::picking::Ray;

/// Pointer position in host pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Area of the host the scene is drawn into, in the same pixels as `ScreenPoint`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewportRect {
    /// Viewport anchored at the host origin (a full-window canvas)
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }

    pub fn aspect(&self) -> f64 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// Orbit camera looking at the desk
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f64,
    /// Vertical rotation angle (radians)
    pub pitch: f64,
    /// Distance from target
    pub distance: f64,
    /// Camera target point
    pub target: DVec3,
    /// Vertical field of view (radians)
    pub fov: f64,
    /// Cleared while an object is being dragged
    pub orbit_enabled: bool,
}

impl OrbitCamera {
    /// Camera placed at `eye` looking at `target`
    pub fn looking_at(eye: DVec3, target: DVec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(1e-6);
        Self {
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            target,
            fov: 75.0_f64.to_radians(),
            orbit_enabled: true,
        }
    }

    /// Default view: up and to the front-right of a desk whose top is near `desk_y`
    pub fn for_desk(desk_y: f64) -> Self {
        Self::looking_at(DVec3::new(0.8, desk_y + 0.3, 0.8), DVec3::new(0.0, desk_y, 0.0))
    }

    /// Orbit by a pointer delta in pixels. Ignored while orbit is disabled.
    pub fn rotate(&mut self, dx: f64, dy: f64) {
        if !self.orbit_enabled {
            return;
        }
        self.yaw -= dx * 0.01;
        self.pitch = (self.pitch + dy * 0.01).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, delta: f64) {
        if !self.orbit_enabled {
            return;
        }
        self.distance = (self.distance * (1.0 - delta)).clamp(0.2, 20.0);
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        if !self.orbit_enabled {
            return;
        }
        let right = self.right_vector();
        let up = self.up_vector();
        self.target += right * dx + up * dy;
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> DVec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();

        self.target
            + DVec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.eye_position(), self.target, DVec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f64) -> DMat4 {
        DMat4::perspective_rh_gl(self.fov, aspect, 0.1, 1000.0)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f64) -> DMat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    fn right_vector(&self) -> DVec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        fwd.cross(DVec3::Y).normalize_or_zero()
    }

    fn up_vector(&self) -> DVec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        let right = self.right_vector();
        right.cross(fwd).normalize_or_zero()
    }

    /// Project a world point to screen coordinates; `None` behind the camera
    pub fn project(&self, point: DVec3, rect: ViewportRect) -> Option<ScreenPoint> {
        let vp = self.view_projection(rect.aspect());
        let p = vp * DVec4::new(point.x, point.y, point.z, 1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        let center = rect.center();
        Some(ScreenPoint::new(
            center.x + ndc.x * rect.width * 0.5,
            center.y - ndc.y * rect.height * 0.5,
        ))
    }

    /// Cast a ray from a screen position into the scene
    pub fn screen_ray(&self, screen: ScreenPoint, rect: ViewportRect) -> Ray {
        let center = rect.center();

        // Screen → NDC
        let ndc_x = (screen.x - center.x) / (rect.width * 0.5);
        let ndc_y = -(screen.y - center.y) / (rect.height * 0.5);

        let vp_inv = self.view_projection(rect.aspect()).inverse();

        let near_world = vp_inv * DVec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far_world = vp_inv * DVec4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        Ray::new(self.eye_position(), far - near)
    }
}
