//! X11 platform implementation
//!
//! A 32-bit ARGB override-redirect window hinted as a dock, with global key
//! grabs on the root window and frames uploaded through `PutImage`.

mod keyboard;

use super::{Monitor, PanelGeometry, Surface};
use crate::config::Config;
use crate::constants::PROGRAM_NAME;
use crate::input::{Hotkeys, InputEvent, Modifiers};
use crate::renderer::FrameBuffer;
use anyhow::{Context, Result};
use keyboard::KeyboardMap;
use tracing::{debug, info, warn};
use x11rb::connection::{Connection, RequestConnection};
use x11rb::properties::{WmSizeHints, WmSizeHintsSpecification};
use x11rb::protocol::randr::ConnectionExt as _;
use x11rb::protocol::xkb::{self, BoolCtrl, ConnectionExt as _, PerClientFlag};
use x11rb::protocol::xproto::{
    AtomEnum, ColormapAlloc, ConnectionExt as _, CreateGCAux, CreateWindowAux, EventMask,
    GrabMode, ImageFormat, ImageOrder, MapState, ModMask, PropMode, Screen, VisualClass,
    Visualid, Window, WindowClass,
};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

/// Fixed size of a PutImage request before its pixel data
const PUT_IMAGE_HEADER_BYTES: usize = 24;

/// XKB device spec for the core keyboard
const XKB_USE_CORE_KBD: xkb::DeviceSpec = 0x0100;

x11rb::atom_manager! {
    pub Atoms: AtomsCookie {
        _NET_WM_WINDOW_TYPE,
        _NET_WM_WINDOW_TYPE_DOCK,
        _NET_WM_STATE,
        _NET_WM_STATE_ABOVE,
    }
}

/// X11 platform state
pub struct X11Surface {
    conn: RustConnection,
    window: Window,
    colormap: u32,
    gc: u32,
    geometry: PanelGeometry,
    keyboard: KeyboardMap,
    little_endian: bool,
}

impl X11Surface {
    /// Connect, create the (unmapped) panel window and grab the hotkeys
    pub fn new(config: &Config, hotkeys: &Hotkeys) -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None).context("Failed to open X display")?;
        let screen = conn.setup().roots[screen_num].clone();
        let little_endian = conn.setup().image_byte_order == ImageOrder::LSB_FIRST;

        let monitor = first_monitor(&conn, &screen);
        let geometry = PanelGeometry::bottom_of(monitor, config.appearance.height_fraction);
        info!(?monitor, ?geometry, "Placing panel");

        let visual = find_argb_visual(&screen).context("No 32-bit TrueColor visual found")?;

        let colormap = conn.generate_id()?;
        conn.create_colormap(ColormapAlloc::NONE, colormap, screen.root, visual)?;

        let window = conn.generate_id()?;
        let window_aux = CreateWindowAux::new()
            .background_pixel(0)
            .border_pixel(0)
            .colormap(colormap)
            .event_mask(EventMask::NO_EVENT)
            .override_redirect(1);
        conn.create_window(
            32,
            window,
            screen.root,
            geometry.x,
            geometry.y,
            geometry.width,
            geometry.height,
            0,
            WindowClass::INPUT_OUTPUT,
            visual,
            &window_aux,
        )?
        .check()
        .context("Failed to create panel window")?;

        set_window_hints(&conn, window, geometry)?;

        let gc = conn.generate_id()?;
        conn.create_gc(gc, window, &CreateGCAux::new())?;

        let keyboard = keyboard_map(&conn)?;
        enable_detectable_autorepeat(&conn);
        grab_hotkeys(&conn, screen.root, &keyboard, hotkeys)?;

        conn.flush()?;

        Ok(Self {
            conn,
            window,
            colormap,
            gc,
            geometry,
            keyboard,
            little_endian,
        })
    }

    fn translate(&self, event: Event) -> InputEvent {
        match event {
            Event::KeyPress(ev) => InputEvent::KeyPress {
                keysym: self.keyboard.keysym(ev.detail),
                modifiers: Modifiers::from_state(u16::from(ev.state)),
            },
            Event::KeyRelease(ev) => InputEvent::KeyRelease {
                keysym: self.keyboard.keysym(ev.detail),
                modifiers: Modifiers::from_state(u16::from(ev.state)),
            },
            _ => InputEvent::Other,
        }
    }
}

impl Surface for X11Surface {
    fn poll_events(&mut self) -> Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        while let Some(event) = self.conn.poll_for_event()? {
            events.push(self.translate(event));
        }
        Ok(events)
    }

    fn is_mapped(&mut self) -> Result<bool> {
        let attributes = self.conn.get_window_attributes(self.window)?.reply()?;
        Ok(attributes.map_state != MapState::UNMAPPED)
    }

    fn map_window(&mut self) -> Result<()> {
        self.conn.map_window(self.window)?;
        self.conn.flush()?;
        Ok(())
    }

    fn unmap_window(&mut self) -> Result<()> {
        self.conn.unmap_window(self.window)?;
        self.conn.flush()?;
        Ok(())
    }

    fn present(&mut self, frame: &FrameBuffer) -> Result<()> {
        let rows = rows_per_request(self.conn.maximum_request_bytes(), frame.width());

        let mut y = 0;
        while y < frame.height() {
            let end = y.saturating_add(rows).min(frame.height());
            let data = frame.row_bytes(y, end, self.little_endian);
            self.conn.put_image(
                ImageFormat::Z_PIXMAP,
                self.window,
                self.gc,
                frame.width(),
                end - y,
                0,
                y as i16,
                0,
                32,
                &data,
            )?;
            y = end;
        }

        self.conn.flush()?;
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        (self.geometry.width, self.geometry.height)
    }
}

impl Drop for X11Surface {
    fn drop(&mut self) {
        let _ = self.conn.free_gc(self.gc);
        let _ = self.conn.destroy_window(self.window);
        let _ = self.conn.free_colormap(self.colormap);
        let _ = self.conn.flush();
    }
}

/// Whole rows of a `width`-pixel image that fit in one PutImage request
fn rows_per_request(maximum_request_bytes: usize, width: u16) -> u16 {
    let row_bytes = (width as usize * 4).max(1);
    let budget = maximum_request_bytes.saturating_sub(PUT_IMAGE_HEADER_BYTES);
    (budget / row_bytes).clamp(1, u16::MAX as usize) as u16
}

/// First RandR monitor, or the whole default screen without RandR
fn first_monitor(conn: &RustConnection, screen: &Screen) -> Monitor {
    let monitors = conn
        .randr_get_monitors(screen.root, true)
        .ok()
        .and_then(|cookie| cookie.reply().ok())
        .map(|reply| reply.monitors)
        .unwrap_or_default();

    match monitors.first() {
        Some(info) => Monitor {
            x: info.x,
            y: info.y,
            width: info.width,
            height: info.height,
        },
        None => {
            debug!("RandR monitors unavailable, assuming a single screen");
            Monitor {
                x: 0,
                y: 0,
                width: screen.width_in_pixels,
                height: screen.height_in_pixels,
            }
        }
    }
}

fn find_argb_visual(screen: &Screen) -> Option<Visualid> {
    screen
        .allowed_depths
        .iter()
        .filter(|depth| depth.depth == 32)
        .flat_map(|depth| depth.visuals.iter())
        .find(|visual| visual.class == VisualClass::TRUE_COLOR)
        .map(|visual| visual.visual_id)
}

/// Title, class, fixed size, dock type and keep-above state
fn set_window_hints(conn: &RustConnection, window: Window, geometry: PanelGeometry) -> Result<()> {
    conn.change_property8(
        PropMode::REPLACE,
        window,
        AtomEnum::WM_NAME,
        AtomEnum::STRING,
        PROGRAM_NAME.as_bytes(),
    )?;

    let class = format!("{0}\0{0}\0", PROGRAM_NAME);
    conn.change_property8(
        PropMode::REPLACE,
        window,
        AtomEnum::WM_CLASS,
        AtomEnum::STRING,
        class.as_bytes(),
    )?;

    let (width, height) = (geometry.width as i32, geometry.height as i32);
    let mut size_hints = WmSizeHints::default();
    size_hints.size = Some((WmSizeHintsSpecification::ProgramSpecified, width, height));
    size_hints.base_size = Some((width, height));
    size_hints.min_size = Some((width, height));
    size_hints.max_size = Some((width, height));
    size_hints.set_normal_hints(conn, window)?;

    let atoms = Atoms::new(conn)?.reply()?;
    conn.change_property32(
        PropMode::REPLACE,
        window,
        atoms._NET_WM_WINDOW_TYPE,
        AtomEnum::ATOM,
        &[atoms._NET_WM_WINDOW_TYPE_DOCK],
    )?;
    conn.change_property32(
        PropMode::REPLACE,
        window,
        atoms._NET_WM_STATE,
        AtomEnum::ATOM,
        &[atoms._NET_WM_STATE_ABOVE],
    )?;

    Ok(())
}

fn keyboard_map(conn: &RustConnection) -> Result<KeyboardMap> {
    let (min_keycode, max_keycode) = (conn.setup().min_keycode, conn.setup().max_keycode);
    let mapping = conn
        .get_keyboard_mapping(min_keycode, max_keycode - min_keycode + 1)?
        .reply()
        .context("Failed to read keyboard mapping")?;

    Ok(KeyboardMap::new(
        min_keycode,
        mapping.keysyms_per_keycode,
        mapping.keysyms,
    ))
}

/// Ask XKB to report a held key as repeated presses with a single release.
///
/// Without it, autorepeat sends a release before every repeated press and a
/// held chord would toggle the panel over and over.
fn enable_detectable_autorepeat(conn: &RustConnection) {
    let supported = conn
        .xkb_use_extension(1, 0)
        .ok()
        .and_then(|cookie| cookie.reply().ok())
        .is_some_and(|reply| reply.supported);
    if !supported {
        warn!("XKB unavailable, held hotkeys may repeat");
        return;
    }

    let flag = PerClientFlag::DETECTABLE_AUTO_REPEAT;
    let none = BoolCtrl::from(0u32);
    let reply = conn
        .xkb_per_client_flags(XKB_USE_CORE_KBD, flag, flag, none, none, none)
        .ok()
        .and_then(|cookie| cookie.reply().ok());
    match reply {
        Some(reply) if u32::from(reply.value) & u32::from(flag) != 0 => {
            debug!("Detectable autorepeat enabled");
        }
        _ => warn!("Detectable autorepeat not supported, held hotkeys may repeat"),
    }
}

/// Grab both chords on every keycode bound to the hotkey, including lock variants.
///
/// A chord already grabbed by another client is logged and skipped.
fn grab_hotkeys(
    conn: &RustConnection,
    root: Window,
    keyboard: &KeyboardMap,
    hotkeys: &Hotkeys,
) -> Result<()> {
    let keycodes = keyboard.keycodes_for(hotkeys.keysym);
    if keycodes.is_empty() {
        warn!(keysym = hotkeys.keysym, "Hotkey is not bound to any keycode");
    }

    for keycode in keycodes {
        for mask in hotkeys.grab_masks() {
            let grab = conn.grab_key(
                true,
                root,
                ModMask::from(mask.bits()),
                keycode,
                GrabMode::ASYNC,
                GrabMode::ASYNC,
            )?;
            if let Err(e) = grab.check() {
                warn!(keycode, modifiers = mask.bits(), "Failed to grab hotkey: {:?}", e);
            }
        }
    }

    debug!(keysym = hotkeys.keysym, "Hotkeys grabbed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_fit_request_limit() {
        // 256 KiB limit, 1920 px rows of 7680 bytes
        let rows = rows_per_request(262_144, 1920);
        assert_eq!(rows, 34);
        assert!(PUT_IMAGE_HEADER_BYTES + rows as usize * 1920 * 4 <= 262_144);
    }

    #[test]
    fn test_rows_at_least_one() {
        assert_eq!(rows_per_request(16, 1920), 1);
        assert_eq!(rows_per_request(0, 0), 1);
    }

    #[test]
    fn test_rows_capped_at_u16() {
        assert_eq!(rows_per_request(usize::MAX, 1), u16::MAX);
    }
}
