//! Meshes and per-frame instance lists
//!
//! Meshes are unit-sized and centred on the origin; instances place them.

use super::vertex::{Instance, Vertex, colors};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::Scene;

/// Unit cube (edge 1.0) as a flat-shaded triangle list
pub fn cube() -> Vec<Vertex> {
    // (normal, u axis, v axis) per face; u × v = normal keeps CCW winding
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];

    let mut vertices = Vec::with_capacity(36);
    for (n, u, v) in faces {
        let corner = |su: f32, sv: f32| {
            [
                0.5 * n[0] + 0.5 * su * u[0] + 0.5 * sv * v[0],
                0.5 * n[1] + 0.5 * su * u[1] + 0.5 * sv * v[1],
                0.5 * n[2] + 0.5 * su * u[2] + 0.5 * sv * v[2],
            ]
        };
        let (a, b, c, d) = (
            corner(-1.0, -1.0),
            corner(1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, 1.0),
        );
        for p in [a, b, c, a, c, d] {
            vertices.push(Vertex::new(p, n));
        }
    }
    vertices
}

/// Unit octahedron (vertex radius 1.0), used for nuggets
pub fn octahedron() -> Vec<Vertex> {
    let top = [0.0, 1.0, 0.0];
    let bottom = [0.0, -1.0, 0.0];
    let ring = [
        [1.0, 0.0, 0.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0],
    ];

    let mut vertices = Vec::with_capacity(24);
    for i in 0..4 {
        let a = ring[i];
        let b = ring[(i + 1) % 4];
        for (apex, tri) in [(top, [a, b, top]), (bottom, [b, a, bottom])] {
            let n = face_normal(tri[0], tri[1], apex);
            for p in tri {
                vertices.push(Vertex::new(p, n));
            }
        }
    }
    vertices
}

fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let a = glam::Vec3::from(a);
    let n = (glam::Vec3::from(b) - a).cross(glam::Vec3::from(c) - a);
    n.normalize_or_zero().to_array()
}

/// Soil colour fades darker with depth
fn soil_color(depth: u32, high_contrast: bool) -> [f32; 4] {
    let (top, deep) = if high_contrast {
        (colors::SOIL_TOP_CONTRAST, colors::SOIL_DEEP_CONTRAST)
    } else {
        (colors::SOIL_TOP, colors::SOIL_DEEP)
    };
    let max_depth = (GRID_Y_MAX - GRID_Y_MIN).max(1) as f32;
    let t = (depth as f32 / max_depth).clamp(0.0, 1.0);
    [
        crate::lerp(top[0], deep[0], t),
        crate::lerp(top[1], deep[1], t),
        crate::lerp(top[2], deep[2], t),
        1.0,
    ]
}

/// One cube instance per clickable cell
pub fn cell_instances(scene: &Scene, settings: &Settings) -> Vec<Instance> {
    scene
        .cells
        .iter()
        .filter(|c| c.is_clickable())
        .map(|c| Instance {
            offset: c.center().to_array(),
            scale: CELL_SIZE * c.scale,
            color: soil_color(c.depth, settings.high_contrast),
            rotation: 0.0,
        })
        .collect()
}

/// One octahedron instance per nugget
pub fn nugget_instances(scene: &Scene, settings: &Settings) -> Vec<Instance> {
    scene
        .nuggets
        .iter()
        .filter(|n| n.scale > 0.0)
        .map(|n| {
            let (pos, rotation) = if settings.reduced_motion {
                (n.pos + glam::Vec3::new(0.0, n.rise, 0.0), 0.0)
            } else {
                (n.render_pos(), n.spin)
            };
            Instance {
                offset: pos.to_array(),
                scale: NUGGET_RADIUS * n.scale,
                color: colors::GOLD,
                rotation,
            }
        })
        .collect()
}

/// Small translucent cubes for dirt, capped by the quality setting
pub fn particle_instances(scene: &Scene, settings: &Settings) -> Vec<Instance> {
    scene
        .particles
        .iter()
        .filter(|p| p.is_alive())
        .take(settings.max_particles())
        .map(|p| Instance {
            offset: p.pos.to_array(),
            scale: PARTICLE_SIZE,
            color: [colors::DIRT[0], colors::DIRT[1], colors::DIRT[2], p.opacity],
            rotation: 0.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{IVec3, Vec3};

    fn winding_matches_normal(mesh: &[Vertex]) -> bool {
        mesh.chunks(3).all(|tri| {
            let a = Vec3::from(tri[0].position);
            let b = Vec3::from(tri[1].position);
            let c = Vec3::from(tri[2].position);
            (b - a).cross(c - a).dot(Vec3::from(tri[0].normal)) > 0.0
        })
    }

    #[test]
    fn test_cube_mesh() {
        let mesh = cube();
        assert_eq!(mesh.len(), 36);
        assert!(mesh.iter().all(|v| v.position.iter().all(|c| c.abs() <= 0.5 + 1e-6)));
        assert!(winding_matches_normal(&mesh));
    }

    #[test]
    fn test_octahedron_mesh() {
        let mesh = octahedron();
        assert_eq!(mesh.len(), 24);
        assert!(winding_matches_normal(&mesh));
    }

    #[test]
    fn test_instances_follow_scene() {
        let mut scene = Scene::new(5);
        scene.init_grid();
        scene.on_cell_excavated(IVec3::new(0, 0, 0), true);
        for n in &mut scene.nuggets {
            n.scale = 1.0;
        }
        let settings = Settings::default();

        assert_eq!(cell_instances(&scene, &settings).len(), 485);
        assert_eq!(nugget_instances(&scene, &settings).len(), 1);
        let dirt = particle_instances(&scene, &settings);
        assert_eq!(dirt.len(), PARTICLES_PER_DIG);
        assert!(dirt.iter().all(|d| d.color[3] == 1.0));
    }

    #[test]
    fn test_particles_respect_settings() {
        let mut scene = Scene::new(5);
        scene.on_cell_excavated(IVec3::ZERO, false);
        let off = Settings {
            particles: false,
            ..Settings::default()
        };
        assert!(particle_instances(&scene, &off).is_empty());
    }

    #[test]
    fn test_deeper_soil_is_darker() {
        let top = soil_color(0, false);
        let deep = soil_color(5, false);
        assert!(deep[0] < top[0]);
        for (got, want) in deep.iter().zip(colors::SOIL_DEEP) {
            assert!((got - want).abs() < 1e-6, "{} vs {}", got, want);
        }
    }
}
