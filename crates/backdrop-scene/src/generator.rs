//! Initial geometry for each visual mode.
//!
//! Runs once per mount. The caller owns the returned set and is responsible
//! for handing it to the viewport host and releasing it on unmount.

use std::collections::{HashMap, HashSet};
use std::f32::consts::PI;

use glam::Vec3;
use rand::Rng;

use crate::config::{Rgb, Variant, VisualMode, VisualizerConfig};
use crate::primitive::{Material, PrimitiveSet, Transform};

/// Half-width of the cube scattered points are drawn from.
pub const POINT_CUBE_HALF_WIDTH: f32 = 5.0;

/// Wave plane edge length and subdivisions per side.
pub const WAVE_PLANE_SIZE: f32 = 10.0;
pub const WAVE_SEGMENTS: u32 = 50;

/// Wave plane tilt around X.
pub const WAVE_TILT: f32 = -PI / 3.0;

pub const FLOATING_RADIUS: f32 = 1.0;

/// Background field parameters.
pub const BACKGROUND_COUNT: usize = 200;
pub const BACKGROUND_HALF_WIDTH: f32 = 15.0;
pub const BACKGROUND_SPRITE_SCALE: f32 = 300.0;

/// Generates the primitive for `variant`.
pub fn generate<R: Rng + ?Sized>(variant: &Variant, rng: &mut R) -> (PrimitiveSet, Material) {
    match variant {
        Variant::Scene(cfg) => generate_scene(cfg, rng),
        Variant::Background => background_field(rng),
    }
}

/// Generates the primitive for an embedded visualizer.
pub fn generate_scene<R: Rng + ?Sized>(
    cfg: &VisualizerConfig,
    rng: &mut R,
) -> (PrimitiveSet, Material) {
    match cfg.mode {
        VisualMode::Points => {
            let set = scattered_points(cfg.count as usize, POINT_CUBE_HALF_WIDTH, rng);
            let material = Material { color: cfg.color, ..Material::default() };
            (set, material)
        }
        VisualMode::Wave => {
            let set = wave_grid(WAVE_PLANE_SIZE, WAVE_SEGMENTS).with_transform(Transform {
                rotation: Vec3::new(WAVE_TILT, 0.0, 0.0),
                ..Transform::default()
            });
            (set, wire_material(cfg.color))
        }
        VisualMode::Floating => (icosphere(FLOATING_RADIUS), wire_material(cfg.color)),
    }
}

fn wire_material(color: Rgb) -> Material {
    Material { color, lit: true, ..Material::default() }
}

/// `count` points drawn uniformly from the cube `[-half_width, half_width]³`.
pub fn scattered_points<R: Rng + ?Sized>(count: usize, half_width: f32, rng: &mut R) -> PrimitiveSet {
    let mut positions = Vec::with_capacity(count * 3);
    for _ in 0..count * 3 {
        positions.push((rng.random::<f32>() - 0.5) * 2.0 * half_width);
    }
    PrimitiveSet::points(positions)
}

/// Full-page field: white round sprites with per-point sizes in `[0.1, 0.3)`.
pub fn background_field<R: Rng + ?Sized>(rng: &mut R) -> (PrimitiveSet, Material) {
    let set = scattered_points(BACKGROUND_COUNT, BACKGROUND_HALF_WIDTH, rng);
    let colors = vec![1.0; BACKGROUND_COUNT * 3];
    let sizes = (0..BACKGROUND_COUNT)
        .map(|_| rng.random::<f32>() * 0.2 + 0.1)
        .collect();

    let material = Material {
        vertex_colors: true,
        round_sprites: true,
        sprite_scale: Some(BACKGROUND_SPRITE_SCALE),
        ..Material::default()
    };
    (set.with_colors(colors).with_sizes(sizes), material)
}

/// Planar XY grid centred on the origin, `segments × segments` cells.
///
/// Rows run top (+y) to bottom. Every cell contributes its top and left edge
/// plus one diagonal, and the last row/column close the border.
pub fn wave_grid(size: f32, segments: u32) -> PrimitiveSet {
    let side = segments + 1;
    let step = size / segments as f32;
    let half = size * 0.5;

    let mut positions = Vec::with_capacity((side * side * 3) as usize);
    for row in 0..side {
        let y = half - row as f32 * step;
        for col in 0..side {
            let x = -half + col as f32 * step;
            positions.extend_from_slice(&[x, y, 0.0]);
        }
    }

    let normals = (0..side * side).flat_map(|_| [0.0, 0.0, 1.0]).collect();

    let idx = |row: u32, col: u32| row * side + col;
    let mut edges = Vec::new();
    for row in 0..side {
        for col in 0..side {
            if col + 1 < side {
                edges.extend_from_slice(&[idx(row, col), idx(row, col + 1)]);
            }
            if row + 1 < side {
                edges.extend_from_slice(&[idx(row, col), idx(row + 1, col)]);
            }
            if row + 1 < side && col + 1 < side {
                edges.extend_from_slice(&[idx(row + 1, col), idx(row, col + 1)]);
            }
        }
    }

    PrimitiveSet::wireframe(positions, normals, edges)
}

/// Icosahedron with every face split once into four, projected onto a sphere.
pub fn icosphere(radius: f32) -> PrimitiveSet {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;

    #[rustfmt::skip]
    let mut verts: Vec<Vec3> = [
        (-1.0, t, 0.0), (1.0, t, 0.0), (-1.0, -t, 0.0), (1.0, -t, 0.0),
        (0.0, -1.0, t), (0.0, 1.0, t), (0.0, -1.0, -t), (0.0, 1.0, -t),
        (t, 0.0, -1.0), (t, 0.0, 1.0), (-t, 0.0, -1.0), (-t, 0.0, 1.0),
    ]
    .into_iter()
    .map(|(x, y, z)| Vec3::new(x, y, z).normalize())
    .collect();

    #[rustfmt::skip]
    const FACES: [[u32; 3]; 20] = [
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
    let mut midpoint = |a: u32, b: u32, verts: &mut Vec<Vec3>| -> u32 {
        let key = (a.min(b), a.max(b));
        *midpoints.entry(key).or_insert_with(|| {
            let m = ((verts[a as usize] + verts[b as usize]) * 0.5).normalize();
            verts.push(m);
            (verts.len() - 1) as u32
        })
    };

    let mut faces = Vec::with_capacity(FACES.len() * 4);
    for [a, b, c] in FACES {
        let ab = midpoint(a, b, &mut verts);
        let bc = midpoint(b, c, &mut verts);
        let ca = midpoint(c, a, &mut verts);
        faces.extend_from_slice(&[[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]);
    }

    // Each undirected edge once.
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for [a, b, c] in faces {
        for (p, q) in [(a, b), (b, c), (c, a)] {
            let key = (p.min(q), p.max(q));
            if seen.insert(key) {
                edges.extend_from_slice(&[key.0, key.1]);
            }
        }
    }

    let positions = verts.iter().flat_map(|v| (*v * radius).to_array()).collect();
    let normals = verts.iter().flat_map(|v| v.to_array()).collect();

    PrimitiveSet::wireframe(positions, normals, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::Topology;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn points_buffer_has_three_floats_per_point() {
        let cfg = VisualizerConfig { count: 50, ..Default::default() };
        let (set, _) = generate_scene(&cfg, &mut rng());
        assert_eq!(set.topology(), Topology::Points);
        assert_eq!(set.positions().len(), 150);
        assert_eq!(set.count(), 50);
    }

    #[test]
    fn points_stay_inside_cube() {
        let set = scattered_points(1000, POINT_CUBE_HALF_WIDTH, &mut rng());
        assert!(set.positions().iter().all(|v| v.abs() <= POINT_CUBE_HALF_WIDTH));
    }

    #[test]
    fn points_material_carries_configured_color() {
        let cfg = VisualizerConfig { color: "#ff0000".parse().unwrap(), ..Default::default() };
        let (_, material) = generate_scene(&cfg, &mut rng());
        assert_eq!(material.color, Rgb::new(1.0, 0.0, 0.0));
        assert!(!material.lit);
    }

    #[test]
    fn wave_grid_ignores_count() {
        let a = VisualizerConfig { mode: VisualMode::Wave, count: 3, ..Default::default() };
        let b = VisualizerConfig { mode: VisualMode::Wave, count: 3000, ..Default::default() };
        let (sa, _) = generate_scene(&a, &mut rng());
        let (sb, _) = generate_scene(&b, &mut rng());
        assert_eq!(sa.count(), 51 * 51);
        assert_eq!(sa.count(), sb.count());
        assert_eq!(sa.transform.rotation.x, WAVE_TILT);
    }

    #[test]
    fn wave_grid_edge_count() {
        let set = wave_grid(10.0, 50);
        // rows + columns + one diagonal per cell
        assert_eq!(set.edges().len() / 2, 50 * 51 * 2 + 50 * 50);
        assert!(set.edges().iter().all(|&i| (i as usize) < set.count()));
    }

    #[test]
    fn wave_grid_spans_plane() {
        let set = wave_grid(10.0, 50);
        let first = set.position(0);
        let last = set.position(set.count() - 1);
        assert_eq!(first, Vec3::new(-5.0, 5.0, 0.0));
        assert!((last - Vec3::new(5.0, -5.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn icosphere_topology() {
        let set = icosphere(1.0);
        assert_eq!(set.count(), 42);
        assert_eq!(set.edges().len() / 2, 120);
        for i in 0..set.count() {
            assert!((set.position(i).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn background_field_has_colors_and_sizes() {
        let (set, material) = background_field(&mut rng());
        assert_eq!(set.count(), BACKGROUND_COUNT);
        assert_eq!(set.colors().map(<[f32]>::len), Some(BACKGROUND_COUNT * 3));
        let sizes = set.sizes().unwrap();
        assert_eq!(sizes.len(), BACKGROUND_COUNT);
        assert!(sizes.iter().all(|s| (0.1..0.3).contains(s)));
        assert!(set.positions().iter().all(|v| v.abs() <= BACKGROUND_HALF_WIDTH));
        assert!(material.vertex_colors && material.round_sprites);
    }

    #[test]
    fn same_seed_same_points() {
        let a = scattered_points(20, 5.0, &mut rng());
        let b = scattered_points(20, 5.0, &mut rng());
        assert_eq!(a, b);
    }
}
