use std::collections::HashMap;

use anyhow::Context;
use glam::Vec2;
use serde::Deserialize;

use crate::geometry::shape::{shapes_from_subpaths, PathSegment, Shape, SubPath};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypefaceFile {
    glyphs: HashMap<String, TypefaceGlyph>,
    #[serde(default)]
    family_name: String,
    resolution: f32,
    bounding_box: TypefaceBoundingBox,
    #[serde(default)]
    underline_thickness: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypefaceBoundingBox {
    y_min: f32,
    y_max: f32,
}

#[derive(Debug, Deserialize)]
struct TypefaceGlyph {
    ha: f32,
    #[serde(default)]
    o: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum OutlineCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadraticTo { control: Vec2, to: Vec2 },
    CubicTo { control1: Vec2, control2: Vec2, to: Vec2 },
}

#[derive(Debug, Clone)]
pub struct Glyph {
    pub advance: f32,
    outline: Vec<OutlineCommand>,
}

impl Glyph {
    fn subpaths(&self, scale: f32, offset: Vec2) -> Vec<SubPath> {
        let place = |point: Vec2| point * scale + offset;
        let mut subpaths: Vec<SubPath> = Vec::new();

        for command in &self.outline {
            let segment = match *command {
                OutlineCommand::MoveTo(point) => {
                    subpaths.push(SubPath::new(place(point)));
                    continue;
                }
                OutlineCommand::LineTo(to) => PathSegment::Line(place(to)),
                OutlineCommand::QuadraticTo { control, to } => PathSegment::Quadratic {
                    control: place(control),
                    to: place(to),
                },
                OutlineCommand::CubicTo {
                    control1,
                    control2,
                    to,
                } => PathSegment::Cubic {
                    control1: place(control1),
                    control2: place(control2),
                    to: place(to),
                },
            };

            match subpaths.last_mut() {
                Some(subpath) => subpath.segments.push(segment),
                None => log::warn!("Glyph outline draws before its first move"),
            }
        }

        subpaths
    }
}

/// Outline font in the typeface JSON format, in font units.
#[derive(Debug, Clone)]
pub struct Font {
    pub family_name: String,
    pub resolution: f32,
    pub y_min: f32,
    pub y_max: f32,
    pub underline_thickness: f32,
    glyphs: HashMap<char, Glyph>,
}

impl Font {
    pub fn from_typeface_json(source: &str) -> anyhow::Result<Font> {
        let file: TypefaceFile =
            serde_json::from_str(source).context("Failed to parse typeface JSON")?;

        if file.resolution <= 0.0 {
            anyhow::bail!("Invalid font resolution: {}", file.resolution);
        }

        let mut glyphs = HashMap::with_capacity(file.glyphs.len());
        for (key, glyph) in file.glyphs {
            let mut chars = key.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                log::debug!("Skipping multi-character glyph key {:?}", key);
                continue;
            };

            let outline = match &glyph.o {
                Some(outline) => parse_outline(outline)
                    .with_context(|| format!("Failed to parse outline of glyph {:?}", ch))?,
                None => Vec::new(),
            };

            glyphs.insert(
                ch,
                Glyph {
                    advance: glyph.ha,
                    outline,
                },
            );
        }

        Ok(Font {
            family_name: file.family_name,
            resolution: file.resolution,
            y_min: file.bounding_box.y_min,
            y_max: file.bounding_box.y_max,
            underline_thickness: file.underline_thickness,
            glyphs,
        })
    }

    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn line_height(&self, size: f32) -> f32 {
        (self.y_max - self.y_min + self.underline_thickness) * size / self.resolution
    }

    /// Lays out `text` at `size` world units per em and returns one shape per
    /// filled glyph region. Unknown characters fall back to `?`.
    pub fn generate_shapes(&self, text: &str, size: f32, curve_segments: u32) -> Vec<Shape> {
        let scale = size / self.resolution;
        let line_height = self.line_height(size);
        let mut offset = Vec2::ZERO;
        let mut shapes = Vec::new();

        for ch in text.chars() {
            if ch == '\n' {
                offset = Vec2::new(0.0, offset.y - line_height);
                continue;
            }

            let Some(glyph) = self.glyph(ch).or_else(|| self.glyph('?')) else {
                log::error!(
                    "Character {:?} does not exist in font family {}",
                    ch,
                    self.family_name
                );
                continue;
            };

            shapes.extend(shapes_from_subpaths(
                &glyph.subpaths(scale, offset),
                curve_segments,
            ));
            offset.x += glyph.advance * scale;
        }

        shapes
    }
}

fn parse_outline(outline: &str) -> anyhow::Result<Vec<OutlineCommand>> {
    let mut tokens = outline.split_whitespace();
    let mut commands = Vec::new();

    while let Some(command) = tokens.next() {
        let command = match command {
            "m" => OutlineCommand::MoveTo(read_point(&mut tokens)?),
            "l" => OutlineCommand::LineTo(read_point(&mut tokens)?),
            "q" => {
                let to = read_point(&mut tokens)?;
                let control = read_point(&mut tokens)?;
                OutlineCommand::QuadraticTo { control, to }
            }
            "b" => {
                let to = read_point(&mut tokens)?;
                let control1 = read_point(&mut tokens)?;
                let control2 = read_point(&mut tokens)?;
                OutlineCommand::CubicTo {
                    control1,
                    control2,
                    to,
                }
            }
            "z" => continue,
            other => anyhow::bail!("Unknown outline command {:?}", other),
        };
        commands.push(command);
    }

    Ok(commands)
}

fn read_point(tokens: &mut std::str::SplitWhitespace<'_>) -> anyhow::Result<Vec2> {
    let mut coordinate = || -> anyhow::Result<f32> {
        let token = tokens.next().context("Outline ended mid-command")?;
        token
            .parse()
            .with_context(|| format!("Invalid outline coordinate {:?}", token))
    };

    let x = coordinate()?;
    let y = coordinate()?;
    Ok(Vec2::new(x, y))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const RING_FONT: &str = r#"{
        "familyName": "Ring",
        "resolution": 1000,
        "boundingBox": { "yMin": -200, "yMax": 800, "xMin": 0, "xMax": 700 },
        "underlineThickness": 50,
        "glyphs": {
            "o": {
                "ha": 700, "x_min": 0, "x_max": 600,
                "o": "m 0 0 l 0 600 l 600 600 l 600 0 l 0 0 z m 200 200 l 400 200 l 400 400 l 200 400 l 200 200 z"
            },
            "i": { "ha": 300, "x_min": 0, "x_max": 200, "o": "m 0 0 l 0 600 l 200 600 l 200 0 z" },
            "c": { "ha": 500, "o": "m 0 0 q 0 400 200 200 l 400 0 z" },
            " ": { "ha": 250 }
        }
    }"#;

    pub(crate) fn ring_font() -> Font {
        Font::from_typeface_json(RING_FONT).unwrap()
    }

    #[test]
    fn parses_typeface_metadata() {
        let font = ring_font();

        assert_eq!(font.family_name, "Ring");
        assert_eq!(font.glyph_count(), 4);
        assert!((font.line_height(1.0) - 1.05).abs() < 1e-6);
        assert_eq!(font.glyph('i').unwrap().advance, 300.0);
    }

    #[test]
    fn quadratic_command_reads_end_point_before_control() {
        let commands = parse_outline("m 0 0 q 10 0 5 5").unwrap();

        assert_eq!(
            commands[1],
            OutlineCommand::QuadraticTo {
                control: Vec2::new(5.0, 5.0),
                to: Vec2::new(10.0, 0.0),
            }
        );
    }

    #[test]
    fn rejects_unknown_commands() {
        assert!(parse_outline("m 0 0 x 1 1").is_err());
        assert!(parse_outline("m 0").is_err());
    }

    #[test]
    fn glyphs_are_advanced_and_scaled() {
        let font = ring_font();
        let shapes = font.generate_shapes("io", 1.0, 4);

        assert_eq!(shapes.len(), 2);
        assert!(shapes[0].holes.is_empty());
        assert_eq!(shapes[1].holes.len(), 1);

        let min_x = shapes[1]
            .contour
            .iter()
            .map(|point| point.x)
            .fold(f32::INFINITY, f32::min);
        assert!((min_x - 0.3).abs() < 1e-6);
    }

    #[test]
    fn newline_moves_to_the_next_line() {
        let font = ring_font();
        let shapes = font.generate_shapes("i\ni", 1.0, 4);

        let min_y = shapes[1]
            .contour
            .iter()
            .map(|point| point.y)
            .fold(f32::INFINITY, f32::min);
        assert!((min_y + 1.05).abs() < 1e-6);
    }

    #[test]
    fn unknown_characters_without_fallback_are_skipped() {
        let font = ring_font();
        assert_eq!(font.generate_shapes("x i", 1.0, 4).len(), 1);
    }

    #[test]
    fn bundled_font_covers_the_greeting() {
        let font = Font::from_typeface_json(include_str!("../../assets/fonts/poly.json")).unwrap();

        assert!("Happy New Year?".chars().all(|ch| font.glyph(ch).is_some()));
        // 'a', 'e' and 'p' have one counter each
        let shapes = font.generate_shapes("ape", 1.0, 4);
        assert_eq!(shapes.len(), 3);
        assert!(shapes.iter().all(|shape| shape.holes.len() == 1));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(Font::from_typeface_json("{ \"glyphs\": {} }").is_err());
    }
}
