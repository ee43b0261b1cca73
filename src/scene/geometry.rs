use std::collections::HashSet;
use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::types::{LineVertex, Vertex};

/// Indexed triangle list with normals and UVs
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    /// Donut lying in the XY plane, tube sweeping around the Z axis
    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        let mut vertices = Vec::with_capacity(((radial_segments + 1) * (tubular_segments + 1)) as usize);

        for j in 0..=radial_segments {
            for i in 0..=tubular_segments {
                let u = i as f32 / tubular_segments as f32 * TAU;
                let v = j as f32 / radial_segments as f32 * TAU;

                let position = Vec3::new(
                    (radius + tube * v.cos()) * u.cos(),
                    (radius + tube * v.cos()) * u.sin(),
                    tube * v.sin(),
                );
                let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
                let normal = (position - center).normalize_or_zero();

                vertices.push(Vertex::new(
                    position.to_array(),
                    normal.to_array(),
                    [
                        i as f32 / tubular_segments as f32,
                        j as f32 / radial_segments as f32,
                    ],
                ));
            }
        }

        let row = tubular_segments + 1;
        let mut indices = Vec::with_capacity((radial_segments * tubular_segments * 6) as usize);
        for j in 1..=radial_segments {
            for i in 1..=tubular_segments {
                let a = row * j + i - 1;
                let b = row * (j - 1) + i - 1;
                let c = row * (j - 1) + i;
                let d = row * j + i;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self { vertices, indices }
    }

    /// UV sphere centred on the origin; pole rows collapse to single triangles
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let mut vertices = Vec::new();
        let mut grid = Vec::with_capacity((height_segments + 1) as usize);

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;

            // Pole UVs point at the middle of their segment
            let u_offset = if iy == 0 {
                0.5 / width_segments as f32
            } else if iy == height_segments {
                -0.5 / width_segments as f32
            } else {
                0.0
            };

            let mut row = Vec::with_capacity((width_segments + 1) as usize);
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let phi = u * TAU;
                let theta = v * PI;

                let position = Vec3::new(
                    -radius * phi.cos() * theta.sin(),
                    radius * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                );
                let normal = position.normalize_or_zero();

                row.push(vertices.len() as u32);
                vertices.push(Vertex::new(
                    position.to_array(),
                    normal.to_array(),
                    [u + u_offset, 1.0 - v],
                ));
            }
            grid.push(row);
        }

        let mut indices = Vec::new();
        for iy in 0..height_segments as usize {
            for ix in 0..width_segments as usize {
                let a = grid[iy][ix + 1];
                let b = grid[iy][ix];
                let c = grid[iy + 1][ix];
                let d = grid[iy + 1][ix + 1];

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments as usize - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self { vertices, indices }
    }

    /// Axis-aligned box centred on the origin, one quad per face
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let mut geometry = Self::default();

        // (u axis, v axis, w axis, u dir, v dir, extent u, extent v, extent w)
        let faces: [(usize, usize, usize, f32, f32, f32, f32, f32); 6] = [
            (2, 1, 0, -1.0, -1.0, depth, height, width),
            (2, 1, 0, 1.0, -1.0, depth, height, -width),
            (0, 2, 1, 1.0, 1.0, width, depth, height),
            (0, 2, 1, 1.0, -1.0, width, depth, -height),
            (0, 1, 2, 1.0, -1.0, width, height, depth),
            (0, 1, 2, -1.0, -1.0, width, height, -depth),
        ];

        for (u, v, w, u_dir, v_dir, extent_u, extent_v, extent_w) in faces {
            geometry.push_plane(u, v, w, u_dir, v_dir, extent_u, extent_v, extent_w);
        }

        geometry
    }

    fn push_plane(
        &mut self,
        u: usize,
        v: usize,
        w: usize,
        u_dir: f32,
        v_dir: f32,
        extent_u: f32,
        extent_v: f32,
        extent_w: f32,
    ) {
        let base = self.vertices.len() as u32;

        for iy in 0..=1u32 {
            let y = iy as f32 * extent_v - extent_v / 2.0;
            for ix in 0..=1u32 {
                let x = ix as f32 * extent_u - extent_u / 2.0;

                let mut position = [0.0; 3];
                position[u] = x * u_dir;
                position[v] = y * v_dir;
                position[w] = extent_w / 2.0;

                let mut normal = [0.0; 3];
                normal[w] = if extent_w > 0.0 { 1.0 } else { -1.0 };

                self.vertices.push(Vertex::new(
                    position,
                    normal,
                    [ix as f32, 1.0 - iy as f32],
                ));
            }
        }

        let a = base;
        let b = base + 2;
        let c = base + 3;
        let d = base + 1;
        self.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    /// Unique triangle edges, as used for wireframe display
    pub fn edges(&self) -> Vec<(u32, u32)> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();

        for triangle in self.indices.chunks_exact(3) {
            for (start, end) in [
                (triangle[0], triangle[1]),
                (triangle[1], triangle[2]),
                (triangle[2], triangle[0]),
            ] {
                let key = (start.min(end), start.max(end));
                if seen.insert(key) {
                    edges.push(key);
                }
            }
        }

        edges
    }
}

/// World-space line list drawn without lighting
#[derive(Debug, Clone, Default)]
pub struct LineSegments {
    pub vertices: Vec<LineVertex>,
}

impl LineSegments {
    /// Grid on the XZ plane; the centre lines use `center_color`
    pub fn grid(size: f32, divisions: u32, center_color: Vec3, grid_color: Vec3) -> Self {
        let step = size / divisions as f32;
        let half = size / 2.0;
        let center = divisions / 2;

        let vertices = (0..=divisions)
            .flat_map(|i| {
                let k = -half + i as f32 * step;
                let color = if i == center { center_color } else { grid_color }.to_array();
                [
                    LineVertex::new([-half, 0.0, k], color),
                    LineVertex::new([half, 0.0, k], color),
                    LineVertex::new([k, 0.0, -half], color),
                    LineVertex::new([k, 0.0, half], color),
                ]
            })
            .collect();

        Self { vertices }
    }

    /// Wireframe of a geometry translated to `origin`
    pub fn wireframe(geometry: &Geometry, origin: Vec3, color: Vec3) -> Self {
        let color = color.to_array();
        let at = |index: u32| {
            let position = Vec3::from_array(geometry.vertices[index as usize].position) + origin;
            LineVertex::new(position.to_array(), color)
        };

        let vertices = geometry
            .edges()
            .into_iter()
            .flat_map(|(start, end)| [at(start), at(end)])
            .collect();

        Self { vertices }
    }

    pub fn segment_count(&self) -> usize {
        self.vertices.len() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_in_range(geometry: &Geometry) {
        let count = geometry.vertices.len() as u32;
        assert!(geometry.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn torus_layout() {
        let torus = Geometry::torus(10.0, 3.0, 16, 100);
        assert_eq!(torus.vertices.len(), 17 * 101);
        assert_eq!(torus.indices.len() / 3, 16 * 100 * 2);
        assert_indices_in_range(&torus);
    }

    #[test]
    fn torus_vertices_sit_on_the_tube() {
        let torus = Geometry::torus(10.0, 3.0, 16, 100);
        for vertex in &torus.vertices {
            let p = Vec3::from_array(vertex.position);
            let ring = Vec3::new(p.x, p.y, 0.0).normalize() * 10.0;
            assert!(((p - ring).length() - 3.0).abs() < 1e-3);
        }
    }

    #[test]
    fn sphere_layout() {
        let sphere = Geometry::sphere(5.0, 24, 24);
        assert_eq!(sphere.vertices.len(), 25 * 25);
        // Pole rows contribute one triangle per segment instead of two
        assert_eq!(sphere.indices.len() / 3, 24 * (24 * 2 - 2));
        assert_indices_in_range(&sphere);
    }

    #[test]
    fn sphere_vertices_on_radius() {
        let sphere = Geometry::sphere(0.25, 24, 24);
        for vertex in &sphere.vertices {
            let length = Vec3::from_array(vertex.position).length();
            assert!((length - 0.25).abs() < 1e-5);
        }
    }

    #[test]
    fn cuboid_layout() {
        let cube = Geometry::cuboid(3.0, 3.0, 3.0);
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert_indices_in_range(&cube);

        for vertex in &cube.vertices {
            let p = Vec3::from_array(vertex.position);
            assert_eq!(p.abs(), Vec3::splat(1.5));
        }
    }

    #[test]
    fn cuboid_normals_point_outwards() {
        let cube = Geometry::cuboid(2.0, 4.0, 6.0);
        for vertex in &cube.vertices {
            let p = Vec3::from_array(vertex.position);
            let n = Vec3::from_array(vertex.normal);
            assert!(p.dot(n) > 0.0);
        }
    }

    #[test]
    fn cuboid_winding_faces_outwards() {
        let cube = Geometry::cuboid(3.0, 3.0, 3.0);
        for triangle in cube.indices.chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]]
                .map(|i| Vec3::from_array(cube.vertices[i as usize].position));
            let face_normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(face_normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn grid_has_two_lines_per_division_step() {
        let grid = LineSegments::grid(200.0, 10, Vec3::ZERO, Vec3::ONE);
        assert_eq!(grid.segment_count(), 22);
        assert!(grid
            .vertices
            .iter()
            .all(|v| v.position[0].abs() <= 100.0 && v.position[2].abs() <= 100.0));
    }

    #[test]
    fn wireframe_is_translated() {
        let sphere = Geometry::sphere(1.0, 4, 2);
        let origin = Vec3::new(15.0, 5.0, 5.0);
        let lines = LineSegments::wireframe(&sphere, origin, Vec3::ONE);
        assert!(lines.segment_count() > 0);
        for vertex in &lines.vertices {
            let distance = (Vec3::from_array(vertex.position) - origin).length();
            assert!((distance - 1.0).abs() < 1e-4);
        }
    }
}
