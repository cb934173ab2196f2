use std::thread;
use std::time::Duration;

use anyhow::Result;
use fontdue::Font;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConnectionExt, ImageFormat};

use crate::viz::{self, Canvas, VizKind};
use crate::x11::backend::X11Backend;
use crate::x11::events;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Keeps each PutImage request well under the core protocol limit.
const MAX_STRIP_BYTES: usize = 200_000;

/// Copies a finished frame into the window.
pub fn present(backend: &X11Backend, canvas: &Canvas) -> Result<()> {
    let conn = backend.connection();
    let row_bytes = canvas.width() as usize * 4;
    let rows_per_strip = (MAX_STRIP_BYTES / row_bytes).max(1);

    for (strip, pixels) in canvas.pixels().chunks(rows_per_strip * row_bytes).enumerate() {
        let rows = pixels.len() / row_bytes;
        conn.put_image(
            ImageFormat::Z_PIXMAP,
            backend.window(),
            backend.gc(),
            canvas.width() as u16,
            rows as u16,
            0,
            (strip * rows_per_strip) as i16,
            0,
            backend.depth(),
            pixels,
        )?;
    }

    Connection::flush(conn)?;
    Ok(())
}

/// Opens a window and redraws `kind` from wall-clock time until the user
/// clicks it or closes it. The starfield stays fixed via `star_seed`.
pub fn animate(
    kind: VizKind,
    width: u32,
    height: u32,
    star_seed: u64,
    font: Option<&Font>,
    title: &str,
) -> Result<()> {
    let backend = X11Backend::connect(width as u16, height as u16, title)?;
    let mut canvas = Canvas::new(width, height)?;
    info!(%kind, "presenting visualization; click the window to close");

    loop {
        let mut rng = StdRng::seed_from_u64(star_seed);
        let scene = viz::draw_visualization(kind, viz::wall_clock_secs(), width, height, &mut rng);
        viz::raster::paint(&mut canvas, &scene, font);
        present(&backend, &canvas)?;

        if events::poll_for_close(&backend)? {
            return Ok(());
        }
        thread::sleep(FRAME_INTERVAL);
    }
}
