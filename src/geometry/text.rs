use std::f32::consts::FRAC_PI_2;

use glam::{Vec2, Vec3};

use crate::assets::font::Font;
use crate::geometry::shape::Shape;
use crate::geometry::triangulate::triangulate_shape;
use crate::geometry::{Geometry, Vertex};

#[derive(Debug, Clone, PartialEq)]
pub struct TextGeometryOptions {
    pub size: f32,
    pub depth: f32,
    pub curve_segments: u32,
    pub bevel_enabled: bool,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_offset: f32,
    pub bevel_segments: u32,
}

impl Default for TextGeometryOptions {
    fn default() -> Self {
        Self {
            size: 0.3,
            depth: 0.2,
            curve_segments: 25,
            bevel_enabled: true,
            bevel_thickness: 0.03,
            bevel_size: 0.02,
            bevel_offset: 0.0,
            bevel_segments: 20,
        }
    }
}

pub fn text(font: &Font, text: &str, options: &TextGeometryOptions) -> Geometry {
    let shapes = font.generate_shapes(text, options.size, options.curve_segments);

    let mut builder = FlatTriangles::default();
    for shape in &shapes {
        extrude_shape(&mut builder, &shape.normalized(), options);
    }

    builder.into_geometry(format!("Text ({})", text))
}

/// One ring of the extrusion: the contour pushed out by `offset` at depth `z`.
#[derive(Debug, Clone, Copy)]
struct Layer {
    z: f32,
    offset: f32,
}

fn layers(options: &TextGeometryOptions) -> Vec<Layer> {
    if !options.bevel_enabled || options.bevel_segments == 0 {
        return vec![
            Layer {
                z: 0.0,
                offset: 0.0,
            },
            Layer {
                z: options.depth,
                offset: 0.0,
            },
        ];
    }

    let bevel = |segment: u32| {
        let t = segment as f32 / options.bevel_segments as f32;
        (
            options.bevel_thickness * (t * FRAC_PI_2).cos(),
            options.bevel_size * (t * FRAC_PI_2).sin() + options.bevel_offset,
        )
    };

    let front = (0..options.bevel_segments).map(|segment| {
        let (z, offset) = bevel(segment);
        Layer { z: -z, offset }
    });
    let body = [0.0, options.depth].map(|z| Layer {
        z,
        offset: options.bevel_size + options.bevel_offset,
    });
    let back = (0..options.bevel_segments).rev().map(|segment| {
        let (z, offset) = bevel(segment);
        Layer {
            z: options.depth + z,
            offset,
        }
    });

    front.chain(body).chain(back).collect()
}

fn extrude_shape(builder: &mut FlatTriangles, shape: &Shape, options: &TextGeometryOptions) {
    let layers = layers(options);
    let (Some(first), Some(last)) = (layers.first(), layers.last()) else {
        return;
    };

    let contours: Vec<&[Vec2]> = std::iter::once(shape.contour.as_slice())
        .chain(shape.holes.iter().map(Vec::as_slice))
        .collect();
    let bevel_directions: Vec<Vec<Vec2>> = contours
        .iter()
        .map(|contour| bevel_directions(contour))
        .collect();

    let ring_at = |contour: usize, layer: Layer| -> Vec<Vec3> {
        contours[contour]
            .iter()
            .zip(&bevel_directions[contour])
            .map(|(point, direction)| (*point + *direction * layer.offset).extend(layer.z))
            .collect()
    };

    // Caps share one triangulation, flattened into contour + holes order.
    let cap_triangles = triangulate_shape(&shape.contour, &shape.holes);
    let cap_points = |layer: Layer| -> Vec<Vec3> {
        (0..contours.len())
            .flat_map(|contour| ring_at(contour, layer))
            .collect()
    };

    let front = cap_points(*first);
    let back = cap_points(*last);
    for &[a, b, c] in &cap_triangles {
        let [a, b, c] = [a as usize, b as usize, c as usize];
        builder.push_facing(front[a], front[b], front[c], Vec3::NEG_Z);
        builder.push_facing(back[a], back[b], back[c], Vec3::Z);
    }

    for contour in 0..contours.len() {
        let rings: Vec<Vec<Vec3>> = layers.iter().map(|layer| ring_at(contour, *layer)).collect();
        let points = contours[contour];

        for pair in rings.windows(2) {
            let (near, far) = (&pair[0], &pair[1]);
            let len = near.len();

            for i in 0..len {
                let j = (i + 1) % len;
                let edge = points[j] - points[i];
                // Solids run clockwise and holes counter-clockwise, so the left
                // normal always points away from the filled region.
                let outward = Vec2::new(-edge.y, edge.x).normalize_or_zero().extend(0.0);

                builder.push_facing(near[i], near[j], far[j], outward);
                builder.push_facing(near[i], far[j], far[i], outward);
            }
        }
    }
}

/// Per-vertex miter directions for growing a contour outwards, scaled so a
/// unit offset moves both adjacent edges by one unit.
fn bevel_directions(contour: &[Vec2]) -> Vec<Vec2> {
    let len = contour.len();

    (0..len)
        .map(|i| {
            let prev = contour[(i + len - 1) % len];
            let point = contour[i];
            let next = contour[(i + 1) % len];

            let normal_in = left_normal(point - prev);
            let normal_out = left_normal(next - point);
            let miter = (normal_in + normal_out).normalize_or_zero();
            let cos_half = miter.dot(normal_out);

            if miter == Vec2::ZERO || cos_half.abs() < 0.5 {
                // Near-reversing corner, a full miter would shoot far out.
                normal_out * std::f32::consts::SQRT_2
            } else {
                miter / cos_half
            }
        })
        .collect()
}

fn left_normal(direction: Vec2) -> Vec2 {
    Vec2::new(-direction.y, direction.x).normalize_or_zero()
}

/// Non-indexed triangle soup with flat face normals.
#[derive(Default)]
struct FlatTriangles {
    vertices: Vec<Vertex>,
}

impl FlatTriangles {
    /// Adds the triangle wound so that its face normal points along `facing`.
    fn push_facing(&mut self, a: Vec3, b: Vec3, c: Vec3, facing: Vec3) {
        let normal = (b - a).cross(c - a);
        if normal.length_squared() <= f32::EPSILON * f32::EPSILON {
            return;
        }

        let (b, c, normal) = if normal.dot(facing) < 0.0 {
            (c, b, -normal)
        } else {
            (b, c, normal)
        };
        let normal = normal.normalize();

        for position in [a, b, c] {
            self.vertices
                .push(Vertex::new(position, normal, position.truncate()));
        }
    }

    fn into_geometry(self, name: String) -> Geometry {
        let mut geometry = Geometry::new(name);
        geometry.indices = (0..self.vertices.len() as u32).collect();
        geometry.vertices = self.vertices;
        geometry
    }
}
