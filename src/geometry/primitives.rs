//! Parametric shapes. Vertex order, uv layout and counter-clockwise winding
//! follow the conventional torus, sphere and box generators.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::geometry::{Geometry, Vertex};

pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Geometry {
    let mut geometry = Geometry::new("Torus");

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

            geometry.vertices.push(Vertex::new(
                position,
                (position - center).normalize(),
                Vec2::new(
                    i as f32 / tubular_segments as f32,
                    j as f32 / radial_segments as f32,
                ),
            ));
        }
    }

    let row = tubular_segments + 1;
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;

            geometry.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    geometry
}

pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Geometry {
    let mut geometry = Geometry::new("Sphere");
    let mut grid = Vec::with_capacity(height_segments as usize + 1);
    let mut index = 0;

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;

        // Poles get a half-segment uv shift so the seam triangles aren't stretched.
        let u_offset = if iy == 0 {
            0.5 / width_segments as f32
        } else if iy == height_segments {
            -0.5 / width_segments as f32
        } else {
            0.0
        };

        let mut row = Vec::with_capacity(width_segments as usize + 1);
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;

            let position = Vec3::new(
                -radius * (u * TAU).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * TAU).sin() * (v * PI).sin(),
            );

            geometry.vertices.push(Vertex::new(
                position,
                position.normalize_or_zero(),
                Vec2::new(u + u_offset, 1.0 - v),
            ));

            row.push(index);
            index += 1;
        }
        grid.push(row);
    }

    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];

            if iy != 0 {
                geometry.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments as usize - 1 {
                geometry.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    geometry
}

pub fn cuboid(width: f32, height: f32, depth: f32) -> Geometry {
    let mut geometry = Geometry::new("Cube");

    // (u axis, v axis, w axis, u direction, v direction, plane width, plane height, plane depth)
    let planes = [
        (2, 1, 0, -1.0, -1.0, depth, height, width),
        (2, 1, 0, 1.0, -1.0, depth, height, -width),
        (0, 2, 1, 1.0, 1.0, width, depth, height),
        (0, 2, 1, 1.0, -1.0, width, depth, -height),
        (0, 1, 2, 1.0, -1.0, width, height, depth),
        (0, 1, 2, -1.0, -1.0, width, height, -depth),
    ];

    for (u, v, w, u_dir, v_dir, plane_width, plane_height, plane_depth) in planes {
        let start = geometry.vertices.len() as u32;

        for iy in 0..=1u32 {
            let y = iy as f32 * plane_height - plane_height / 2.0;
            for ix in 0..=1u32 {
                let x = ix as f32 * plane_width - plane_width / 2.0;

                let mut position = [0.0; 3];
                position[u] = x * u_dir;
                position[v] = y * v_dir;
                position[w] = plane_depth / 2.0;

                let mut normal = [0.0; 3];
                normal[w] = plane_depth.signum();

                geometry.vertices.push(Vertex::new(
                    Vec3::from_array(position),
                    Vec3::from_array(normal),
                    Vec2::new(ix as f32, 1.0 - iy as f32),
                ));
            }
        }

        let (a, b, c, d) = (start, start + 2, start + 3, start + 1);
        geometry.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    geometry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward_winding(geometry: &Geometry) {
        for triangle in geometry.indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|k| geometry.vertices[triangle[k] as usize]);
            let face_normal = (b.position - a.position).cross(c.position - a.position);
            if face_normal.length_squared() < 1e-12 {
                continue;
            }

            let vertex_normal = a.normal + b.normal + c.normal;
            assert!(
                face_normal.dot(vertex_normal) > 0.0,
                "{} has an inward facing triangle {:?}",
                geometry.name,
                triangle
            );
        }
    }

    #[test]
    fn torus_layout() {
        let geometry = torus(0.3, 0.2, 32, 64);

        assert_eq!(geometry.vertices.len(), 33 * 65);
        assert_eq!(geometry.triangle_count(), 32 * 64 * 2);
        assert_outward_winding(&geometry);

        let bounds = geometry.bounding_box().unwrap();
        assert!((bounds.max.x - 0.5).abs() < 1e-5);
        assert!((bounds.max.z - 0.2).abs() < 1e-5);
    }

    #[test]
    fn sphere_layout() {
        let geometry = sphere(0.3, 30, 20);

        assert_eq!(geometry.vertices.len(), 31 * 21);
        // The pole rows contribute one triangle per segment instead of two.
        assert_eq!(geometry.triangle_count(), 30 * 20 * 2 - 2 * 30);
        assert_outward_winding(&geometry);

        for vertex in &geometry.vertices {
            assert!((vertex.position.length() - 0.3).abs() < 1e-5);
        }
    }

    #[test]
    fn cuboid_layout() {
        let geometry = cuboid(0.3, 0.3, 0.3);

        assert_eq!(geometry.vertices.len(), 24);
        assert_eq!(geometry.triangle_count(), 12);
        assert_outward_winding(&geometry);

        let bounds = geometry.bounding_box().unwrap();
        assert!((bounds.size() - Vec3::splat(0.3)).length() < 1e-6);
        assert!(bounds.center().length() < 1e-6);
    }
}
