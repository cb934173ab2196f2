use anyhow::{bail, Result};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    AtomEnum, ConnectionExt, CreateGCAux, CreateWindowAux, EventMask, PropMode, WindowClass,
};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as WrapperConnectionExt;

/// Window the visualization is presented in.
pub struct X11Backend {
    conn: RustConnection,
    window: u32,
    gc: u32,
    depth: u8,
    wm_protocols: u32,
    wm_delete_window: u32,
}

impl X11Backend {
    pub fn connect(width: u16, height: u16, title: &str) -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None)?;
        let screen = &conn.setup().roots[screen_num];
        let root = screen.root;
        let root_depth = screen.root_depth;
        let black = screen.black_pixel;

        let bits_per_pixel = query_bits_per_pixel(&conn, root_depth);
        if bits_per_pixel != 32 {
            bail!("unsupported X11 visual: {bits_per_pixel} bits per pixel (need 32)");
        }

        let window = conn.generate_id()?;
        let gc = conn.generate_id()?;

        let aux = CreateWindowAux::new()
            .background_pixel(black)
            .event_mask(EventMask::EXPOSURE | EventMask::BUTTON_RELEASE);

        conn.create_window(
            root_depth,
            window,
            root,
            0,
            0,
            width,
            height,
            0,
            WindowClass::INPUT_OUTPUT,
            0,
            &aux,
        )?;
        conn.create_gc(gc, window, &CreateGCAux::new())?;
        conn.change_property8(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_NAME,
            AtomEnum::STRING,
            title.as_bytes(),
        )?;

        let wm_protocols = conn.intern_atom(false, b"WM_PROTOCOLS")?.reply()?.atom;
        let wm_delete_window = conn.intern_atom(false, b"WM_DELETE_WINDOW")?.reply()?.atom;
        conn.change_property32(
            PropMode::REPLACE,
            window,
            wm_protocols,
            AtomEnum::ATOM,
            &[wm_delete_window],
        )?;

        conn.map_window(window)?;
        conn.flush()?;

        Ok(Self {
            conn,
            window,
            gc,
            depth: root_depth,
            wm_protocols,
            wm_delete_window,
        })
    }

    pub fn connection(&self) -> &RustConnection {
        &self.conn
    }

    pub fn window(&self) -> u32 {
        self.window
    }

    pub fn gc(&self) -> u32 {
        self.gc
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn wm_protocols(&self) -> u32 {
        self.wm_protocols
    }

    pub fn wm_delete_window(&self) -> u32 {
        self.wm_delete_window
    }
}

fn query_bits_per_pixel(conn: &RustConnection, depth: u8) -> u8 {
    conn.setup()
        .pixmap_formats
        .iter()
        .find(|fmt| fmt.depth == depth)
        .map(|fmt| fmt.bits_per_pixel)
        .unwrap_or(32)
}
