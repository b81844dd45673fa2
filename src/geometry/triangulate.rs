use glam::Vec2;

use crate::geometry::shape::signed_area;

/// Triangulates a polygon with holes by ear clipping.
///
/// Indices refer to the contour points followed by each hole's points, in
/// order. Triangles come out counter-clockwise regardless of input winding.
pub fn triangulate_shape(contour: &[Vec2], holes: &[Vec<Vec2>]) -> Vec<[u32; 3]> {
    let points: Vec<Vec2> = contour
        .iter()
        .chain(holes.iter().flatten())
        .copied()
        .collect();

    let mut ring: Vec<usize> = (0..contour.len()).collect();
    if signed_area(contour) < 0.0 {
        ring.reverse();
    }

    let mut offset = contour.len();
    let mut hole_rings: Vec<Vec<usize>> = holes
        .iter()
        .map(|hole| {
            let mut hole_ring: Vec<usize> = (offset..offset + hole.len()).collect();
            offset += hole.len();
            if signed_area(hole) > 0.0 {
                hole_ring.reverse();
            }
            hole_ring
        })
        .filter(|hole_ring| hole_ring.len() >= 3)
        .collect();

    // Rightmost holes first so their bridges can't be blocked by holes merged later.
    hole_rings.sort_by(|a, b| max_x(&points, b).total_cmp(&max_x(&points, a)));

    for index in 0..hole_rings.len() {
        let (merged, pending) = hole_rings.split_at(index + 1);
        ring = bridge_hole(&points, &ring, &merged[index], pending);
    }

    ear_clip(&points, ring)
}

fn max_x(points: &[Vec2], ring: &[usize]) -> f32 {
    ring.iter()
        .map(|&index| points[index].x)
        .fold(f32::NEG_INFINITY, f32::max)
}

/// Cuts a zero-width channel from the hole's rightmost vertex to the nearest
/// visible outer vertex, turning outer ring and hole into a single ring.
fn bridge_hole(
    points: &[Vec2],
    ring: &[usize],
    hole: &[usize],
    pending_holes: &[Vec<usize>],
) -> Vec<usize> {
    let hole_start = (0..hole.len())
        .max_by(|&a, &b| points[hole[a]].x.total_cmp(&points[hole[b]].x))
        .unwrap_or(0);
    let hole_point = points[hole[hole_start]];

    let mut candidates: Vec<usize> = (0..ring.len()).collect();
    candidates.sort_by(|&a, &b| {
        let da = points[ring[a]].distance_squared(hole_point);
        let db = points[ring[b]].distance_squared(hole_point);
        da.total_cmp(&db)
    });

    let blockers = std::iter::once(ring)
        .chain(std::iter::once(hole))
        .chain(pending_holes.iter().map(Vec::as_slice));

    let edges: Vec<(Vec2, Vec2)> = blockers
        .flat_map(|ring| {
            (0..ring.len()).map(move |i| (ring[i], ring[(i + 1) % ring.len()]))
        })
        .map(|(a, b)| (points[a], points[b]))
        .collect();

    let target = candidates
        .iter()
        .copied()
        .find(|&candidate| {
            let outer_point = points[ring[candidate]];
            edges
                .iter()
                .all(|&(a, b)| !segments_cross(hole_point, outer_point, a, b))
        })
        .unwrap_or(candidates[0]);

    let mut bridged = Vec::with_capacity(ring.len() + hole.len() + 2);
    bridged.extend_from_slice(&ring[..=target]);
    bridged.extend((0..=hole.len()).map(|k| hole[(hole_start + k) % hole.len()]));
    bridged.extend_from_slice(&ring[target..]);
    bridged
}

fn ear_clip(points: &[Vec2], mut ring: Vec<usize>) -> Vec<[u32; 3]> {
    let mut triangles = Vec::with_capacity(ring.len().saturating_sub(2));
    let mut cursor = 0;

    while ring.len() > 3 {
        let len = ring.len();
        let mut clipped = false;

        for step in 0..len {
            let i = (cursor + step) % len;
            let (prev, current, next) = (ring[(i + len - 1) % len], ring[i], ring[(i + 1) % len]);
            let (a, b, c) = (points[prev], points[current], points[next]);
            let area = (b - a).perp_dot(c - b);

            if area.abs() <= f32::EPSILON * 1e-3 {
                // Collinear vertex or bridge spike, it encloses nothing.
                ring.remove(i);
                cursor = i;
                clipped = true;
                break;
            }

            if area < 0.0 {
                continue;
            }

            let blocked = ring.iter().any(|&other| {
                let p = points[other];
                p != a && p != b && p != c && point_in_triangle(p, a, b, c)
            });

            if !blocked {
                triangles.push([prev as u32, current as u32, next as u32]);
                ring.remove(i);
                cursor = i;
                clipped = true;
                break;
            }
        }

        if !clipped {
            // Self-intersecting input. Clip anyway so every vertex still gets covered.
            log::debug!("Triangulation found no ear among {} vertices", len);
            let i = cursor % len;
            triangles.push([
                ring[(i + len - 1) % len] as u32,
                ring[i] as u32,
                ring[(i + 1) % len] as u32,
            ]);
            ring.remove(i);
        }
    }

    if let [a, b, c] = ring[..] {
        if (points[b] - points[a]).perp_dot(points[c] - points[b]).abs() > f32::EPSILON * 1e-3 {
            triangles.push([a as u32, b as u32, c as u32]);
        }
    }

    triangles
}

fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    (b - a).perp_dot(p - a) >= 0.0 && (c - b).perp_dot(p - b) >= 0.0 && (a - c).perp_dot(p - c) >= 0.0
}

/// True when the open segments intersect at a single interior point.
fn segments_cross(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    let d1 = (q2 - q1).perp_dot(p1 - q1);
    let d2 = (q2 - q1).perp_dot(p2 - q1);
    let d3 = (p2 - p1).perp_dot(q1 - p1);
    let d4 = (p2 - p1).perp_dot(q2 - p1);

    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_area_sum(points: &[Vec2], triangles: &[[u32; 3]]) -> f32 {
        triangles
            .iter()
            .map(|&[a, b, c]| {
                let (a, b, c) = (points[a as usize], points[b as usize], points[c as usize]);
                (b - a).perp_dot(c - a) * 0.5
            })
            .sum()
    }

    fn square(min: f32, max: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(min, min),
            Vec2::new(max, min),
            Vec2::new(max, max),
            Vec2::new(min, max),
        ]
    }

    #[test]
    fn convex_polygon() {
        let contour = square(0.0, 2.0);
        let triangles = triangulate_shape(&contour, &[]);

        assert_eq!(triangles.len(), 2);
        assert!((triangle_area_sum(&contour, &triangles) - 4.0).abs() < 1e-5);
    }

    #[test]
    fn clockwise_input_still_yields_counter_clockwise_triangles() {
        let mut contour = square(0.0, 1.0);
        contour.reverse();
        let triangles = triangulate_shape(&contour, &[]);

        assert!((triangle_area_sum(&contour, &triangles) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn concave_polygon() {
        // An "L" shape, area 3.
        let contour = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let triangles = triangulate_shape(&contour, &[]);

        assert_eq!(triangles.len(), 4);
        assert!((triangle_area_sum(&contour, &triangles) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn polygon_with_hole() {
        let contour = square(0.0, 3.0);
        let holes = vec![square(1.0, 2.0)];
        let triangles = triangulate_shape(&contour, &holes);

        let points: Vec<Vec2> = contour.iter().chain(&holes[0]).copied().collect();
        assert!((triangle_area_sum(&points, &triangles) - 8.0).abs() < 1e-4);
        assert!(triangles.iter().flatten().all(|&index| (index as usize) < points.len()));
    }

    #[test]
    fn polygon_with_two_holes() {
        let contour = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(5.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let holes = vec![
            square(0.5, 1.5),
            vec![
                Vec2::new(3.0, 0.5),
                Vec2::new(4.0, 0.5),
                Vec2::new(4.0, 1.5),
                Vec2::new(3.0, 1.5),
            ],
        ];
        let triangles = triangulate_shape(&contour, &holes);

        let points: Vec<Vec2> = contour.iter().chain(holes.iter().flatten()).copied().collect();
        assert!((triangle_area_sum(&points, &triangles) - 8.0).abs() < 1e-4);
    }
}
