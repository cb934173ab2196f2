use anyhow::Result;
use x11rb::connection::Connection;
use x11rb::protocol::Event;

use crate::x11::backend::X11Backend;

/// Drains pending events; true once the user clicked the window or the
/// window manager asked it to close.
pub fn poll_for_close(backend: &X11Backend) -> Result<bool> {
    let conn = backend.connection();
    while let Some(event) = conn.poll_for_event()? {
        match event {
            Event::ButtonRelease(_) => return Ok(true),
            Event::ClientMessage(ev)
                if ev.format == 32
                    && ev.type_ == backend.wm_protocols()
                    && ev.data.as_data32()[0] == backend.wm_delete_window() =>
            {
                return Ok(true)
            }
            _ => {}
        }
    }
    Ok(false)
}
