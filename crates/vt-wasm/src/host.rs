//! Browser-side collaborators: page navigation, the overlay modal, and
//! the console logger.

use vt_core::InteractionError;
use vt_interact::NavigationHost;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlElement, HtmlIFrameElement, Window};

fn host_err(context: &str, err: JsValue) -> InteractionError {
    InteractionError::Host(format!("{context}: {err:?}"))
}

fn window() -> Result<Window, InteractionError> {
    web_sys::window().ok_or_else(|| InteractionError::Host("no global window".into()))
}

/// Carries out actions against the live page.
///
/// The overlay is an element (hidden by default) holding an `<iframe>`;
/// opening it loads the resource into the frame, closing it blanks the
/// frame so playback stops.
pub struct BrowserHost {
    overlay_id: String,
}

impl BrowserHost {
    pub fn new(overlay_id: impl Into<String>) -> Self {
        Self {
            overlay_id: overlay_id.into(),
        }
    }

    fn overlay(&self) -> Result<(HtmlElement, HtmlIFrameElement), InteractionError> {
        let document = window()?
            .document()
            .ok_or_else(|| InteractionError::Host("no document".into()))?;
        let overlay = document
            .get_element_by_id(&self.overlay_id)
            .ok_or_else(|| InteractionError::Host(format!("no element #{}", self.overlay_id)))?;
        let frame = overlay
            .query_selector("iframe")
            .map_err(|e| host_err("query overlay frame", e))?
            .ok_or_else(|| InteractionError::Host(format!("#{} has no iframe", self.overlay_id)))?
            .dyn_into::<HtmlIFrameElement>()
            .map_err(|_| InteractionError::Host("overlay frame is not an iframe".into()))?;
        let overlay = overlay
            .dyn_into::<HtmlElement>()
            .map_err(|_| InteractionError::Host("overlay is not an HTML element".into()))?;
        Ok((overlay, frame))
    }

    fn set_overlay_display(overlay: &HtmlElement, display: &str) -> Result<(), InteractionError> {
        overlay
            .style()
            .set_property("display", display)
            .map_err(|e| host_err("overlay display", e))
    }
}

impl NavigationHost for BrowserHost {
    fn navigate(&mut self, address: &str) -> Result<(), InteractionError> {
        window()?
            .location()
            .set_href(address)
            .map_err(|e| host_err("navigate", e))
    }

    fn open_in_new_context(&mut self, address: &str) -> Result<(), InteractionError> {
        window()?
            .open_with_url_and_target(address, "_blank")
            .map_err(|e| host_err("open", e))?
            .ok_or_else(|| InteractionError::Host(format!("popup blocked for {address}")))?;
        Ok(())
    }

    fn open_overlay(&mut self, resource_path: &str) -> Result<(), InteractionError> {
        let (overlay, frame) = self.overlay()?;
        frame.set_src(resource_path);
        Self::set_overlay_display(&overlay, "flex")
    }

    fn clear_overlay(&mut self, resource_path: &str) -> Result<(), InteractionError> {
        let (overlay, frame) = self.overlay()?;
        log::debug!("unloading overlay resource {resource_path}");
        frame.set_src("about:blank");
        Self::set_overlay_display(&overlay, "none")
    }

    fn compose_mail(&mut self, mailto: &str) -> Result<(), InteractionError> {
        window()?
            .location()
            .set_href(mailto)
            .map_err(|e| host_err("mailto", e))
    }
}

// ─── Console logger ──────────────────────────────────────────────────────

/// Routes `log` records to the browser console.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
struct ConsoleLogger;

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
static LOGGER: ConsoleLogger = ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from(format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            log::Level::Info => web_sys::console::info_1(&msg),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger and panic hook once.
pub fn install_console_hooks() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            if log::set_logger(&LOGGER).is_ok() {
                log::set_max_level(log::LevelFilter::Info);
            }
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Vitrine WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
