use crate::viz::kind::VizKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `0.0..=1.0`.
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Canvas-style drawing operation. Coordinates are in pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Reset the whole surface to the background colour.
    Clear,
    FillCircle {
        center: Point,
        radius: f32,
        color: Rgba,
    },
    StrokeEllipse {
        center: Point,
        rx: f32,
        ry: f32,
        /// Rotation in radians.
        rotation: f32,
        color: Rgba,
        width: f32,
    },
    Polyline {
        points: Vec<Point>,
        color: Rgba,
        width: f32,
    },
    /// `origin.y` is the text baseline.
    Text {
        origin: Point,
        text: String,
        size: f32,
        color: Rgba,
    },
}

/// One complete frame: always starts with `Clear`.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub kind: VizKind,
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new(width: u32, height: u32, kind: VizKind) -> Self {
        Self {
            width,
            height,
            kind,
            commands: vec![DrawCommand::Clear],
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
