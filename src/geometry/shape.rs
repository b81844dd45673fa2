use glam::Vec2;
use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    Line(Vec2),
    Quadratic { control: Vec2, to: Vec2 },
    Cubic { control1: Vec2, control2: Vec2, to: Vec2 },
}

/// One closed outline: a start point followed by segments.
#[derive(Debug, Clone, PartialEq)]
pub struct SubPath {
    pub start: Vec2,
    pub segments: Vec<PathSegment>,
}

impl SubPath {
    pub fn new(start: Vec2) -> Self {
        Self {
            start,
            segments: Vec::new(),
        }
    }

    /// Flattens the outline into a closed polygon. Lines contribute their end
    /// point, curves `divisions` evenly spaced samples. Consecutive and closing
    /// duplicates are dropped.
    pub fn points(&self, divisions: u32) -> Vec<Vec2> {
        let divisions = divisions.max(1);
        let mut points = vec![self.start];
        let mut current = self.start;

        for segment in &self.segments {
            match *segment {
                PathSegment::Line(to) => {
                    push_distinct(&mut points, to);
                    current = to;
                }
                PathSegment::Quadratic { control, to } => {
                    for step in 1..=divisions {
                        let t = step as f32 / divisions as f32;
                        push_distinct(&mut points, quadratic_bezier(t, current, control, to));
                    }
                    current = to;
                }
                PathSegment::Cubic {
                    control1,
                    control2,
                    to,
                } => {
                    for step in 1..=divisions {
                        let t = step as f32 / divisions as f32;
                        push_distinct(
                            &mut points,
                            cubic_bezier(t, current, control1, control2, to),
                        );
                    }
                    current = to;
                }
            }
        }

        while points.len() > 1 && points_equal(points[0], points[points.len() - 1]) {
            points.pop();
        }

        points
    }
}

/// Planar region: one outer contour and any number of holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub contour: Vec<Vec2>,
    pub holes: Vec<Vec<Vec2>>,
}

impl Shape {
    /// Returns the outline with contour clockwise and holes counter-clockwise,
    /// the orientation the extruder expects.
    pub fn normalized(&self) -> Shape {
        let mut contour = self.contour.clone();
        if !is_clockwise(&contour) {
            contour.reverse();
        }

        let holes = self
            .holes
            .iter()
            .map(|hole| {
                let mut hole = hole.clone();
                if is_clockwise(&hole) {
                    hole.reverse();
                }
                hole
            })
            .collect();

        Shape { contour, holes }
    }
}

/// Groups glyph outlines into shapes. Outlines wound like the first one are
/// solid; the others are holes and attach to whichever solid contains them.
pub fn shapes_from_subpaths(subpaths: &[SubPath], divisions: u32) -> Vec<Shape> {
    let polygons: Vec<Vec<Vec2>> = subpaths
        .iter()
        .map(|subpath| subpath.points(divisions))
        .filter(|points| points.len() >= 3 && signed_area(points).abs() > f32::EPSILON)
        .collect();

    let Some(first) = polygons.first() else {
        return Vec::new();
    };

    if polygons.len() == 1 {
        return vec![Shape {
            contour: first.clone(),
            holes: Vec::new(),
        }];
    }

    let solid_winding = is_clockwise(first);
    let (solids, holes): (Vec<_>, Vec<_>) = polygons
        .into_iter()
        .partition(|polygon| is_clockwise(polygon) == solid_winding);

    let mut shapes: Vec<Shape> = solids
        .into_iter()
        .map(|contour| Shape {
            contour,
            holes: Vec::new(),
        })
        .collect();

    for hole in holes {
        let owner = shapes
            .iter()
            .rposition(|shape| contains_point(&shape.contour, hole[0]))
            .unwrap_or(shapes.len() - 1);
        shapes[owner].holes.push(hole);
    }

    shapes
}

/// Shoelace area; negative for clockwise polygons in a y-up frame.
pub fn signed_area(points: &[Vec2]) -> f32 {
    points
        .iter()
        .circular_tuple_windows()
        .map(|(a, b)| a.perp_dot(*b))
        .sum::<f32>()
        * 0.5
}

pub fn is_clockwise(points: &[Vec2]) -> bool {
    signed_area(points) < 0.0
}

/// Even-odd point in polygon test.
pub fn contains_point(polygon: &[Vec2], point: Vec2) -> bool {
    let mut inside = false;

    for (a, b) in polygon.iter().circular_tuple_windows() {
        if (a.y > point.y) != (b.y > point.y) {
            let x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if point.x < x {
                inside = !inside;
            }
        }
    }

    inside
}

fn push_distinct(points: &mut Vec<Vec2>, point: Vec2) {
    if points.last().map_or(true, |last| !points_equal(*last, point)) {
        points.push(point);
    }
}

fn points_equal(a: Vec2, b: Vec2) -> bool {
    (a - b).length_squared() <= f32::EPSILON * f32::EPSILON
}

fn quadratic_bezier(t: f32, p0: Vec2, p1: Vec2, p2: Vec2) -> Vec2 {
    let k = 1.0 - t;
    p0 * (k * k) + p1 * (2.0 * k * t) + p2 * (t * t)
}

fn cubic_bezier(t: f32, p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Vec2 {
    let k = 1.0 - t;
    p0 * (k * k * k) + p1 * (3.0 * k * k * t) + p2 * (3.0 * k * t * t) + p3 * (t * t * t)
}
