use glam::DVec3;

/// A ray in world space
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Box of the given half-extents around `center`
    pub fn from_center_half(center: DVec3, half: DVec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Center of the bounding box
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }
}

/// Infinite plane `normal · p + constant = 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: DVec3,
    pub constant: f64,
}

impl Plane {
    /// Plane with `normal` passing through `point`
    pub fn from_normal_and_point(normal: DVec3, point: DVec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            constant: -normal.dot(point),
        }
    }

    /// Horizontal plane through `point`
    pub fn horizontal_through(point: DVec3) -> Self {
        Self::from_normal_and_point(DVec3::Y, point)
    }
}

/// Ray-plane intersection. `None` when the ray is parallel to the plane or the
/// plane is behind the origin.
pub fn ray_plane(ray: &Ray, plane: &Plane) -> Option<DVec3> {
    let denom = plane.normal.dot(ray.direction);
    if denom.abs() < 1e-12 {
        // Parallel; only a hit if the origin lies on the plane
        let dist = plane.normal.dot(ray.origin) + plane.constant;
        return (dist.abs() < 1e-12).then_some(ray.origin);
    }
    let t = -(ray.origin.dot(plane.normal) + plane.constant) / denom;
    (t >= 0.0).then(|| ray.at(t))
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f64> {
    let inv_dir = DVec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Ray against a box yawed by `yaw` radians about its centre's vertical axis.
/// The ray is moved into the box's frame, where the box is axis aligned.
pub fn ray_yawed_box(ray: &Ray, center: DVec3, half: DVec3, yaw: f64) -> Option<f64> {
    let (sin, cos) = (-yaw).sin_cos();
    let to_local = |v: DVec3| DVec3::new(cos * v.x + sin * v.z, v.y, -sin * v.x + cos * v.z);

    let local = Ray {
        origin: to_local(ray.origin - center),
        direction: to_local(ray.direction),
    };
    ray_aabb(&local, &Aabb::from_center_half(DVec3::ZERO, half))
}

/// World-space half extents of a box of `half` local half-extents yawed by `yaw`
pub fn yawed_half_extents(half: DVec3, yaw: f64) -> DVec3 {
    let (sin, cos) = yaw.sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    DVec3::new(
        cos * half.x + sin * half.z,
        half.y,
        sin * half.x + cos * half.z,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn down_at(x: f64, z: f64) -> Ray {
        Ray::new(DVec3::new(x, 5.0, z), DVec3::NEG_Y)
    }

    #[test]
    fn test_ray_aabb_hit_and_miss() {
        let b = Aabb::from_center_half(DVec3::new(0.0, 1.0, 0.0), DVec3::splat(0.5));
        assert!((ray_aabb(&down_at(0.0, 0.0), &b).unwrap() - 3.5).abs() < EPS);
        assert!(ray_aabb(&down_at(0.6, 0.0), &b).is_none());
    }

    #[test]
    fn test_ray_aabb_origin_inside() {
        let b = Aabb::from_center_half(DVec3::ZERO, DVec3::ONE);
        let ray = Ray::new(DVec3::ZERO, DVec3::X);
        assert!((ray_aabb(&ray, &b).unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_ray_plane() {
        let plane = Plane::horizontal_through(DVec3::new(3.0, 0.7, -1.0));
        let ray = Ray::new(DVec3::new(1.0, 1.7, 1.0), DVec3::new(1.0, -1.0, 0.0));
        let p = ray_plane(&ray, &plane).unwrap();
        assert!((p - DVec3::new(2.0, 0.7, 1.0)).length() < EPS);
    }

    #[test]
    fn test_ray_plane_parallel_and_behind() {
        let plane = Plane::horizontal_through(DVec3::new(0.0, 0.7, 0.0));
        let flat = Ray::new(DVec3::new(0.0, 1.0, 0.0), DVec3::X);
        assert!(ray_plane(&flat, &plane).is_none());
        let up = Ray::new(DVec3::new(0.0, 1.0, 0.0), DVec3::Y);
        assert!(ray_plane(&up, &plane).is_none());
    }

    #[test]
    fn test_yawed_box_rotation_matters() {
        // Long thin box along x; rotated 90 degrees it is long along z
        let half = DVec3::new(0.5, 0.1, 0.05);
        let c = DVec3::new(0.0, 1.0, 0.0);
        assert!(ray_yawed_box(&down_at(0.4, 0.0), c, half, 0.0).is_some());
        assert!(ray_yawed_box(&down_at(0.0, 0.4), c, half, 0.0).is_none());
        let q = std::f64::consts::FRAC_PI_2;
        assert!(ray_yawed_box(&down_at(0.4, 0.0), c, half, q).is_none());
        assert!(ray_yawed_box(&down_at(0.0, 0.4), c, half, q).is_some());
    }

    #[test]
    fn test_yawed_half_extents() {
        let half = DVec3::new(0.3, 0.1, 0.1);
        let e = yawed_half_extents(half, std::f64::consts::FRAC_PI_2);
        assert!((e.x - 0.1).abs() < EPS);
        assert!((e.z - 0.3).abs() < EPS);
        let e = yawed_half_extents(DVec3::new(0.5, 0.5, 0.5), std::f64::consts::FRAC_PI_4);
        assert!((e.x - 0.5 * std::f64::consts::SQRT_2).abs() < EPS);
    }
}
