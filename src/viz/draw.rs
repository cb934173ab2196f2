//! The four visualization routines. Each call builds a complete frame from
//! scratch; `time` is wall-clock seconds and the only source of motion.

use std::f32::consts::PI;

use rand::Rng;

use crate::viz::kind::VizKind;
use crate::viz::scene::{DrawCommand, Point, Rgba, Scene};

const STAR_COUNT: usize = 80;
const STAR_MAX_RADIUS: f32 = 1.2;
const STAR_MAX_ALPHA: f32 = 0.6;

const ORBIT_RX: f32 = 180.0;
const ORBIT_RY: f32 = 90.0;
const ORBIT_ANGULAR_SPEED: f64 = 0.6;

const WAVE_CYCLES: f32 = 8.0;
const WAVE_AMPLITUDE: f32 = 40.0;

const LIFECYCLE_STAGES: [&str; 3] = ["Protostar", "Main sequence", "Red giant / remnant"];

const SWIRL_PARTICLES: usize = 200;

/// Resolves the tag (with the concept-text fallback) and draws one frame.
pub fn dispatch<R: Rng + ?Sized>(
    tag: Option<&str>,
    concept: &str,
    time: f64,
    width: u32,
    height: u32,
    rng: &mut R,
) -> Scene {
    draw_visualization(VizKind::resolve(tag, concept), time, width, height, rng)
}

pub fn draw_visualization<R: Rng + ?Sized>(
    kind: VizKind,
    time: f64,
    width: u32,
    height: u32,
    rng: &mut R,
) -> Scene {
    let mut scene = Scene::new(width, height, kind);
    draw_starfield(&mut scene, rng);
    match kind {
        VizKind::Orbit => draw_orbit(&mut scene, time),
        VizKind::Wave => draw_wave(&mut scene, time),
        VizKind::Lifecycle => draw_lifecycle(&mut scene),
        VizKind::Generic => draw_swirl(&mut scene, time),
    }
    scene
}

fn draw_starfield<R: Rng + ?Sized>(scene: &mut Scene, rng: &mut R) {
    let (w, h) = (scene.width as f32, scene.height as f32);
    for _ in 0..STAR_COUNT {
        let center = Point::new(rng.gen::<f32>() * w, rng.gen::<f32>() * h);
        let radius = rng.gen::<f32>() * STAR_MAX_RADIUS;
        let alpha = rng.gen::<f32>() * STAR_MAX_ALPHA;
        scene.push(DrawCommand::FillCircle {
            center,
            radius,
            color: Rgba::new(255, 255, 255, alpha),
        });
    }
}

/// Central body, tilted elliptical path and one body moving along it.
fn draw_orbit(scene: &mut Scene, time: f64) {
    let (w, h) = (scene.width as f32, scene.height as f32);
    let center = Point::new(w * 0.45, h * 0.45);

    scene.push(DrawCommand::FillCircle {
        center,
        radius: 14.0,
        color: Rgba::new(255, 200, 80, 1.0),
    });
    scene.push(DrawCommand::StrokeEllipse {
        center,
        rx: ORBIT_RX,
        ry: ORBIT_RY,
        rotation: PI / 6.0,
        color: Rgba::new(180, 220, 255, 0.9),
        width: 2.0,
    });

    let angle = phase(time * ORBIT_ANGULAR_SPEED);
    scene.push(DrawCommand::FillCircle {
        center: Point::new(
            center.x + ORBIT_RX * angle.cos(),
            center.y + ORBIT_RY * angle.sin(),
        ),
        radius: 8.0,
        color: Rgba::new(130, 200, 255, 1.0),
    });
}

/// Strain-style sine trace with a faint axis through the middle.
fn draw_wave(scene: &mut Scene, time: f64) {
    let (w, h) = (scene.width as f32, scene.height as f32);
    let shift = phase(time / 2.0);

    let points = (0..scene.width)
        .map(|x| {
            let x = x as f32;
            Point::new(x, h / 2.0 + ((x / w) * WAVE_CYCLES + shift).sin() * WAVE_AMPLITUDE)
        })
        .collect();
    scene.push(DrawCommand::Polyline {
        points,
        color: Rgba::new(160, 220, 255, 0.95),
        width: 2.0,
    });

    scene.push(DrawCommand::Polyline {
        points: vec![Point::new(0.0, h / 2.0), Point::new(w, h / 2.0)],
        color: Rgba::new(255, 255, 255, 0.06),
        width: 1.0,
    });
}

/// Three stages left to right, the main sequence emphasized.
fn draw_lifecycle(scene: &mut Scene) {
    let (w, h) = (scene.width as f32, scene.height as f32);
    let (sx, sy) = (40.0, h * 0.6);

    for (i, stage) in LIFECYCLE_STAGES.iter().enumerate() {
        let x = sx + i as f32 * (w - 160.0) / 2.0;
        let color = if i == 1 {
            Rgba::new(255, 220, 120, 0.95)
        } else {
            Rgba::new(200, 160, 240, 0.85)
        };
        scene.push(DrawCommand::FillCircle {
            center: Point::new(x + 40.0, sy - 20.0),
            radius: 36.0 - i as f32 * 4.0,
            color,
        });
        scene.push(DrawCommand::Text {
            origin: Point::new(x, sy + 20.0),
            text: stage.to_string(),
            size: 14.0,
            color: Rgba::new(220, 230, 255, 0.9),
        });
    }
}

/// Fallback galaxy: a flattened particle spiral fading towards the rim.
fn draw_swirl(scene: &mut Scene, time: f64) {
    let center = Point::new(scene.width as f32 / 2.0, scene.height as f32 / 2.0);
    let rotation = phase(time / 2.0);

    for j in 0..SWIRL_PARTICLES {
        let r = j as f32 * 0.8;
        let a = j as f32 * 0.25 + rotation;
        scene.push(DrawCommand::FillCircle {
            center: Point::new(center.x + a.cos() * r, center.y + a.sin() * r * 0.4),
            radius: 1.2,
            color: Rgba::new(160, 200, 255, 0.012 * (SWIRL_PARTICLES - j) as f32),
        });
    }
}

/// Reduces an angle to one turn before narrowing, so epoch-sized times keep
/// sub-degree precision.
fn phase(angle: f64) -> f32 {
    angle.rem_euclid(std::f64::consts::TAU) as f32
}
