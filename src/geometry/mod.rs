//! Ray, box and sphere intersection primitives.
//!
//! Everything here is stateless and works in whatever frame the caller
//! supplies. Grid queries expect rays already moved into grid-local space
//! with [`Ray::to_local`].

use glam::{Mat4, Vec3};

/// A half-line `origin + t * direction`, `t >= 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Direction; not required to be unit length.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray from an origin and a direction.
    #[must_use]
    pub const fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Point at parameter `t` along the ray.
    #[inline]
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// A ray can be traced only if both vectors are finite and the
    /// direction is not the zero vector.
    #[must_use]
    pub fn is_traceable(&self) -> bool {
        self.origin.is_finite()
            && self.direction.is_finite()
            && self.direction != Vec3::ZERO
    }

    /// Move the ray into the local frame of `transform` (a model matrix).
    ///
    /// The full matrix is inverted, so non-uniform scale is handled too.
    /// The origin is treated as a point and the direction as a vector.
    #[must_use]
    pub fn to_local(&self, transform: &Mat4) -> Self {
        let inverse = transform.inverse();
        Self {
            origin: inverse.transform_point3(self.origin),
            direction: inverse.transform_vector3(self.direction),
        }
    }
}

/// Axis-aligned box given by its two extreme corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from its corners.
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Per-axis size of the box.
    #[must_use]
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Grow the box so it contains the sphere `(center, radius)`.
    #[must_use]
    pub fn union_sphere(self, center: Vec3, radius: f32) -> Self {
        Self {
            min: self.min.min(center - Vec3::splat(radius)),
            max: self.max.max(center + Vec3::splat(radius)),
        }
    }
}

/// Parametric entry/exit interval of a ray through a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlabInterval {
    /// Entry distance (largest per-axis near plane).
    pub t0: f32,
    /// Exit distance (smallest per-axis far plane).
    pub t1: f32,
}

impl SlabInterval {
    /// The slabs overlap, i.e. the infinite line crosses the box.
    #[inline]
    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.t0 <= self.t1
    }
}

/// Three-way sign: `-1`, `0` or `+1`. Zero (of either sign) and NaN map to 0.
#[inline]
#[must_use]
pub fn sign(value: f32) -> i32 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Slab test of a ray against a box.
///
/// Zero direction components divide to ±infinity, which IEEE-754 min/max
/// handle without special cases.
#[must_use]
pub fn intersect_ray_aabb(ray: &Ray, aabb: &Aabb) -> SlabInterval {
    let t_bottom = (aabb.min - ray.origin) / ray.direction;
    let t_top = (aabb.max - ray.origin) / ray.direction;

    let t_near = t_bottom.min(t_top);
    let t_far = t_bottom.max(t_top);

    SlabInterval {
        t0: t_near.max_element(),
        t1: t_far.min_element(),
    }
}

/// Distance along `ray` to the nearer intersection with a sphere.
///
/// Returns `None` when the ray misses, when the nearer root lies at or
/// behind the origin, or when the direction is degenerate.
#[must_use]
pub fn intersect_ray_sphere(
    ray: &Ray,
    center: Vec3,
    radius: f32,
) -> Option<f32> {
    let to_sphere = ray.origin - center;
    let a = ray.direction.dot(ray.direction);
    if a <= 0.0 || !a.is_finite() {
        return None;
    }
    let b = 2.0 * to_sphere.dot(ray.direction);
    let c = to_sphere.dot(to_sphere) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    (t > 0.0).then_some(t)
}

/// Squared distance from a point to the closest point of a box.
/// Zero when the point is inside or on the boundary.
#[must_use]
pub fn sq_dist_point_aabb(point: Vec3, aabb: &Aabb) -> f32 {
    let below = (aabb.min - point).max(Vec3::ZERO);
    let above = (point - aabb.max).max(Vec3::ZERO);
    below.length_squared() + above.length_squared()
}

/// Whether a sphere touches or overlaps a box.
#[must_use]
pub fn intersect_sphere_aabb(center: Vec3, radius: f32, aabb: &Aabb) -> bool {
    sq_dist_point_aabb(center, aabb) <= radius * radius
}

/// Map a world-space point into the local frame of `transform`.
#[must_use]
pub fn to_local_space(point: Vec3, transform: &Mat4) -> Vec3 {
    transform.inverse().transform_point3(point)
}
