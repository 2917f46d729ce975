//! Click hit testing
//!
//! A click becomes a world-space ray. Every clickable entity is tested and the
//! nearest hit wins; only that entity sees the click. A nugget sitting in front
//! of a cell therefore shields the cell.

use glam::Vec3;

use super::state::Scene;
use crate::consts::NUGGET_RADIUS;

/// A ray in world space (`dir` is normalized)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// What a click landed on
#[derive(Debug, Clone, PartialEq)]
pub enum Hit {
    Cell(String),
    Nugget(u32),
}

/// Slab test against an axis-aligned box. Returns the entry distance.
pub fn ray_aabb(ray: &Ray, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = ray.dir.recip();
    let t1 = (min - ray.origin) * inv;
    let t2 = (max - ray.origin) * inv;

    let t_near = t1.min(t2).max_element();
    let t_far = t1.max(t2).min_element();

    if t_far < 0.0 || t_near > t_far || t_near.is_nan() || t_far.is_nan() {
        return None;
    }
    Some(t_near.max(0.0))
}

/// Ray/sphere intersection. Returns the nearest non-negative distance.
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t = -b - sq;
    if t >= 0.0 {
        Some(t)
    } else if -b + sq >= 0.0 {
        // Origin inside the sphere
        Some(0.0)
    } else {
        None
    }
}

/// Find the entity a click ray lands on first
///
/// Nuggets are tested with a sphere at their drawn position (collected ones
/// still swallow clicks while they fly away). Cells are tested with their
/// current scaled box. Ties go to nuggets.
pub fn pick(scene: &Scene, ray: &Ray) -> Option<Hit> {
    let mut best: Option<(f32, Hit)> = None;

    for nugget in &scene.nuggets {
        let radius = NUGGET_RADIUS * nugget.scale.max(0.2);
        if let Some(t) = ray_sphere(ray, nugget.render_pos(), radius) {
            if best.as_ref().is_none_or(|(bt, _)| t < *bt) {
                best = Some((t, Hit::Nugget(nugget.id)));
            }
        }
    }

    for cell in scene.cells.iter().filter(|c| c.is_clickable()) {
        let half = Vec3::splat(cell.half_extent());
        let center = cell.center();
        if let Some(t) = ray_aabb(ray, center - half, center + half) {
            if best.as_ref().is_none_or(|(bt, _)| t < *bt) {
                best = Some((t, Hit::Cell(cell.id.clone())));
            }
        }
    }

    best.map(|(_, hit)| hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{GridCell, Nugget};
    use glam::IVec3;

    fn down_at(x: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, 10.0, z), Vec3::NEG_Y)
    }

    #[test]
    fn test_ray_aabb_hit_and_miss() {
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        let t = ray_aabb(&ray, Vec3::splat(-1.0), Vec3::splat(1.0)).unwrap();
        assert!((t - 4.0).abs() < 1e-5);

        let miss = Ray::new(Vec3::new(-5.0, 3.0, 0.0), Vec3::X);
        assert!(ray_aabb(&miss, Vec3::splat(-1.0), Vec3::splat(1.0)).is_none());

        let behind = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::X);
        assert!(ray_aabb(&behind, Vec3::splat(-1.0), Vec3::splat(1.0)).is_none());
    }

    #[test]
    fn test_ray_sphere() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z);
        let t = ray_sphere(&ray, Vec3::ZERO, 1.0).unwrap();
        assert!((t - 9.0).abs() < 1e-5);

        let miss = Ray::new(Vec3::new(2.0, 0.0, -10.0), Vec3::Z);
        assert!(ray_sphere(&miss, Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn test_pick_topmost_cell() {
        let mut scene = Scene::new(1);
        scene.cells.push(GridCell::new(IVec3::new(0, -2, 0), false));
        scene.cells.push(GridCell::new(IVec3::new(0, 0, 0), false));
        scene.cells.push(GridCell::new(IVec3::new(0, -1, 0), false));

        assert_eq!(pick(&scene, &down_at(0.0, 0.0)), Some(Hit::Cell("0-0-0".into())));
        assert_eq!(pick(&scene, &down_at(3.0, 0.0)), None);
    }

    #[test]
    fn test_nugget_shields_cell_behind_it() {
        let mut scene = Scene::new(1);
        scene.cells.push(GridCell::new(IVec3::new(0, -1, 0), false));
        let mut nugget = Nugget::new(9, Vec3::new(0.0, -0.5, 0.0));
        nugget.scale = 1.0;
        scene.nuggets.push(nugget);

        assert_eq!(pick(&scene, &down_at(0.0, 0.0)), Some(Hit::Nugget(9)));
    }
}
