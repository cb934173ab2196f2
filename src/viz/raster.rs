//! Software rasterizer for [`Scene`] display lists.
//!
//! Pixels are kept as BGRA so a frame can be handed to an X11 `ZPixmap`
//! unchanged; PNG export swizzles to RGBA.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use fontdue::Font;
use image::{ImageBuffer, Rgba as ImageRgba};
use thiserror::Error;
use tracing::debug;

use crate::viz::scene::{DrawCommand, Point, Rgba, Scene};

/// Deep-space backdrop painted by `Clear`.
pub const BACKGROUND: (u8, u8, u8) = (5, 8, 20);
pub const MAX_DIMENSION: u32 = 4096;

const ELLIPSE_STEP_DEG: f32 = 2.0;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("canvas size {width}x{height} is out of range (1..=4096)")]
    InvalidSize { width: u32, height: u32 },

    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(RenderError::InvalidSize { width, height });
        }
        let (width, height) = (width as usize, height as usize);
        let mut canvas = Self {
            width,
            height,
            pixels: vec![0u8; width * height * 4],
        };
        canvas.clear();
        Ok(canvas)
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    /// Raw BGRA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGB at `(x, y)`; panics outside the canvas.
    #[cfg(test)]
    pub(crate) fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let idx = (y as usize * self.width + x as usize) * 4;
        (self.pixels[idx + 2], self.pixels[idx + 1], self.pixels[idx])
    }

    pub fn clear(&mut self) {
        for px in self.pixels.chunks_exact_mut(4) {
            px[0] = BACKGROUND.2;
            px[1] = BACKGROUND.1;
            px[2] = BACKGROUND.0;
            px[3] = 255;
        }
    }

    pub fn to_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut rgba = vec![0u8; self.width * self.height * 4];
        for (dst, src) in rgba.chunks_exact_mut(4).zip(self.pixels.chunks_exact(4)) {
            dst[0] = src[2];
            dst[1] = src[1];
            dst[2] = src[0];
            dst[3] = 255;
        }
        let img: ImageBuffer<ImageRgba<u8>, Vec<u8>> =
            ImageBuffer::from_raw(self.width as u32, self.height as u32, rgba)
                .ok_or(RenderError::InvalidSize {
                    width: self.width as u32,
                    height: self.height as u32,
                })?;
        let mut cursor = Cursor::new(Vec::new());
        img.write_to(&mut cursor, image::ImageFormat::Png)?;
        Ok(cursor.into_inner())
    }

    pub fn save_png(&self, path: &Path) -> Result<(), RenderError> {
        let bytes = self.to_png()?;
        std::fs::write(path, bytes).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn blend(&mut self, x: i32, y: i32, color: Rgba, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let alpha = (color.a * coverage).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let mix = |src: u8, dst: u8| (src as f32 * alpha + dst as f32 * (1.0 - alpha)).round() as u8;
        self.pixels[idx] = mix(color.b, self.pixels[idx]);
        self.pixels[idx + 1] = mix(color.g, self.pixels[idx + 1]);
        self.pixels[idx + 2] = mix(color.r, self.pixels[idx + 2]);
    }
}

/// Renders `scene` into a fresh canvas.
pub fn rasterize(scene: &Scene, font: Option<&Font>) -> Result<Canvas, RenderError> {
    let mut canvas = Canvas::new(scene.width, scene.height)?;
    paint(&mut canvas, scene, font);
    Ok(canvas)
}

/// Renders `scene` over an existing canvas; `Clear` repaints everything, so
/// reusing a canvas between frames never accumulates.
pub fn paint(canvas: &mut Canvas, scene: &Scene, font: Option<&Font>) {
    for command in &scene.commands {
        match command {
            DrawCommand::Clear => canvas.clear(),
            DrawCommand::FillCircle { center, radius, color } => {
                fill_circle(canvas, *center, *radius, *color);
            }
            DrawCommand::StrokeEllipse { center, rx, ry, rotation, color, width } => {
                let mut mask = StrokeMask::new(canvas);
                mask.ellipse(*center, *rx, *ry, *rotation, *width);
                mask.apply(canvas, *color);
            }
            DrawCommand::Polyline { points, color, width } => {
                let mut mask = StrokeMask::new(canvas);
                mask.polyline(points, *width);
                mask.apply(canvas, *color);
            }
            DrawCommand::Text { origin, text, size, color } => match font {
                Some(font) => draw_text(canvas, *origin, text, *size, *color, font),
                None => debug!(text = %text, "no font loaded, skipping label"),
            },
        }
    }
}

fn fill_circle(canvas: &mut Canvas, center: Point, radius: f32, color: Rgba) {
    let r2 = radius * radius;
    let x0 = (center.x - radius).floor() as i32;
    let x1 = (center.x + radius).ceil() as i32;
    let y0 = (center.y - radius).floor() as i32;
    let y1 = (center.y + radius).ceil() as i32;

    let mut covered = false;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 + 0.5 - center.x;
            let dy = y as f32 + 0.5 - center.y;
            if dx * dx + dy * dy <= r2 {
                canvas.blend(x, y, color, 1.0);
                covered = true;
            }
        }
    }
    // Sub-pixel dots still show up, scaled by their area.
    if !covered {
        let area = (std::f32::consts::PI * r2).min(1.0);
        canvas.blend(center.x.floor() as i32, center.y.floor() as i32, color, area);
    }
}

/// Collects the pixels of one stroke so overlapping segments are blended
/// exactly once.
struct StrokeMask {
    width: usize,
    height: usize,
    hit: Vec<bool>,
    touched: Vec<usize>,
}

impl StrokeMask {
    fn new(canvas: &Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            hit: vec![false; canvas.width * canvas.height],
            touched: Vec::new(),
        }
    }

    fn stamp(&mut self, x: i32, y: i32, thickness: i32) {
        let half = thickness / 2;
        for iy in (y - half)..(y - half + thickness) {
            for ix in (x - half)..(x - half + thickness) {
                if ix >= 0 && ix < self.width as i32 && iy >= 0 && iy < self.height as i32 {
                    let idx = iy as usize * self.width + ix as usize;
                    if !self.hit[idx] {
                        self.hit[idx] = true;
                        self.touched.push(idx);
                    }
                }
            }
        }
    }

    fn line(&mut self, from: Point, to: Point, width: f32) {
        let thickness = (width.round() as i32).max(1);
        let (x1, y1) = (from.x.round() as i32, from.y.round() as i32);
        let (x2, y2) = (to.x.round() as i32, to.y.round() as i32);
        let mut x = x1;
        let mut y = y1;
        let dx = (x2 - x1).abs();
        let dy = -(y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.stamp(x, y, thickness);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn polyline(&mut self, points: &[Point], width: f32) {
        match points {
            [] => {}
            [only] => self.line(*only, *only, width),
            _ => {
                for pair in points.windows(2) {
                    self.line(pair[0], pair[1], width);
                }
            }
        }
    }

    fn ellipse(&mut self, center: Point, rx: f32, ry: f32, rotation: f32, width: f32) {
        let (sin_r, cos_r) = rotation.sin_cos();
        let steps = (360.0 / ELLIPSE_STEP_DEG) as usize;
        let points: Vec<Point> = (0..=steps)
            .map(|i| {
                let (sin_t, cos_t) = (i as f32 * ELLIPSE_STEP_DEG).to_radians().sin_cos();
                let (ex, ey) = (rx * cos_t, ry * sin_t);
                Point::new(
                    center.x + ex * cos_r - ey * sin_r,
                    center.y + ex * sin_r + ey * cos_r,
                )
            })
            .collect();
        self.polyline(&points, width);
    }

    fn apply(self, canvas: &mut Canvas, color: Rgba) {
        for idx in self.touched {
            let x = (idx % self.width) as i32;
            let y = (idx / self.width) as i32;
            canvas.blend(x, y, color, 1.0);
        }
    }
}

fn draw_text(canvas: &mut Canvas, origin: Point, text: &str, size: f32, color: Rgba, font: &Font) {
    let mut cursor_x = origin.x;
    let baseline_y = origin.y;

    for ch in text.chars() {
        let (metrics, bitmap) = font.rasterize(ch, size);

        let gx = cursor_x as i32 + metrics.xmin;
        let gy = baseline_y as i32 - (metrics.ymin + metrics.height as i32);

        for by in 0..metrics.height {
            for bx in 0..metrics.width {
                let coverage = bitmap[by * metrics.width + bx];
                if coverage == 0 {
                    continue;
                }
                canvas.blend(gx + bx as i32, gy + by as i32, color, coverage as f32 / 255.0);
            }
        }
        cursor_x += metrics.advance_width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::kind::VizKind;

    fn empty_scene(width: u32, height: u32) -> Scene {
        Scene::new(width, height, VizKind::Generic)
    }

    #[test]
    fn test_rejects_degenerate_sizes() {
        assert!(matches!(Canvas::new(0, 10), Err(RenderError::InvalidSize { .. })));
        assert!(Canvas::new(MAX_DIMENSION + 1, 10).is_err());
    }

    #[test]
    fn test_clear_paints_background() {
        let canvas = rasterize(&empty_scene(8, 4), None).unwrap();
        assert_eq!(canvas.pixel(0, 0), BACKGROUND);
        assert_eq!(canvas.pixel(7, 3), BACKGROUND);
        assert_eq!(canvas.pixels().len(), 8 * 4 * 4);
    }

    #[test]
    fn test_opaque_circle_covers_center() {
        let mut scene = empty_scene(32, 32);
        scene.push(DrawCommand::FillCircle {
            center: Point::new(16.0, 16.0),
            radius: 5.0,
            color: Rgba::new(255, 200, 80, 1.0),
        });
        let canvas = rasterize(&scene, None).unwrap();
        assert_eq!(canvas.pixel(16, 16), (255, 200, 80));
        assert_eq!(canvas.pixel(0, 0), BACKGROUND);
    }

    #[test]
    fn test_translucent_fill_blends() {
        let mut scene = empty_scene(4, 4);
        scene.push(DrawCommand::FillCircle {
            center: Point::new(2.0, 2.0),
            radius: 2.0,
            color: Rgba::new(255, 255, 255, 0.5),
        });
        let (r, _, _) = rasterize(&scene, None).unwrap().pixel(2, 2);
        assert!(r > BACKGROUND.0 && r < 255);
    }

    #[test]
    fn test_stroke_overlaps_blend_once() {
        let mut scene = empty_scene(16, 16);
        scene.push(DrawCommand::Polyline {
            points: vec![Point::new(2.0, 8.0), Point::new(12.0, 8.0), Point::new(2.0, 8.0)],
            color: Rgba::new(255, 255, 255, 0.5),
            width: 1.0,
        });
        let mut single = empty_scene(16, 16);
        single.push(DrawCommand::Polyline {
            points: vec![Point::new(2.0, 8.0), Point::new(12.0, 8.0)],
            color: Rgba::new(255, 255, 255, 0.5),
            width: 1.0,
        });
        let doubled = rasterize(&scene, None).unwrap();
        let once = rasterize(&single, None).unwrap();
        assert_eq!(doubled.pixel(6, 8), once.pixel(6, 8));
    }

    #[test]
    fn test_ellipse_outline_leaves_center_empty() {
        let mut scene = empty_scene(100, 60);
        scene.push(DrawCommand::StrokeEllipse {
            center: Point::new(50.0, 30.0),
            rx: 40.0,
            ry: 20.0,
            rotation: 0.0,
            color: Rgba::new(180, 220, 255, 1.0),
            width: 2.0,
        });
        let canvas = rasterize(&scene, None).unwrap();
        assert_eq!(canvas.pixel(50, 30), BACKGROUND);
        assert_eq!(canvas.pixel(90, 30), (180, 220, 255));
    }

    #[test]
    fn test_paint_does_not_accumulate() {
        let mut scene = empty_scene(8, 8);
        scene.push(DrawCommand::FillCircle {
            center: Point::new(4.0, 4.0),
            radius: 3.0,
            color: Rgba::new(255, 255, 255, 0.3),
        });
        let mut canvas = Canvas::new(8, 8).unwrap();
        paint(&mut canvas, &scene, None);
        let first = canvas.pixel(4, 4);
        paint(&mut canvas, &scene, None);
        assert_eq!(canvas.pixel(4, 4), first);
    }

    #[test]
    fn test_png_has_signature() {
        let png = rasterize(&empty_scene(4, 4), None).unwrap().to_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_save_png_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        rasterize(&empty_scene(4, 4), None).unwrap().save_png(&path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 8);
    }
}
