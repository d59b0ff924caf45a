// The renderer under test.
//
// The harness does not parse Markdown itself: anything implementing
// `Renderer` can be judged. `PulldownRenderer` is the bundled default.

pub(crate) mod autolink;
mod pulldown;
pub(crate) mod tagfilter;

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

pub use pulldown::PulldownRenderer;

use crate::extension::RendererConfig;

/// A Markdown-to-HTML renderer.
pub trait Renderer {
    /// Render `markdown` with the given extensions enabled.
    fn render(&self, markdown: &str, config: &RendererConfig) -> Result<String, RenderFault>;
}

impl<F> Renderer for F
where
    F: Fn(&str, &RendererConfig) -> Result<String, RenderFault>,
{
    fn render(&self, markdown: &str, config: &RendererConfig) -> Result<String, RenderFault> {
        self(markdown, config)
    }
}

/// A failure raised by the renderer while rendering one input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RenderFault {
    /// What went wrong.
    pub message: String,
    /// Where it went wrong, if the renderer can tell.
    pub origin: Option<String>,
}

impl RenderFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Convert a caught panic payload. `location` is the `file:line:col` the
    /// panic was raised at, when known.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>, location: Option<String>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "renderer panicked".to_string()
        };
        let origin = match location {
            Some(location) => format!("panic at {location}"),
            None => "panic".to_string(),
        };
        Self::new(message).with_origin(origin)
    }

    /// Message followed by the origin trace, for diagnostics.
    pub fn detailed(&self) -> Detailed<'_> {
        Detailed(self)
    }
}

/// Display adapter returned by [`RenderFault::detailed`].
pub struct Detailed<'a>(&'a RenderFault);

impl fmt::Display for Detailed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.message)?;
        if let Some(origin) = &self.0.origin {
            write!(f, "\n{origin}")?;
        }
        Ok(())
    }
}

thread_local! {
    static GUARDED: Cell<bool> = const { Cell::new(false) };
    static PANIC_LOCATION: RefCell<Option<String>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

// Installed once per process. Panics raised inside `render_guarded` on this
// thread are recorded instead of printed; all others go to the previous hook.
fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if GUARDED.with(Cell::get) {
                let location = info.location().map(ToString::to_string);
                PANIC_LOCATION.with(|slot| *slot.borrow_mut() = location);
            } else {
                previous(info);
            }
        }));
    });
}

/// Call the renderer, turning a panic into a [`RenderFault`] that carries
/// the panic message and location.
pub(crate) fn render_guarded<R>(
    renderer: &R,
    markdown: &str,
    config: &RendererConfig,
) -> Result<String, RenderFault>
where
    R: Renderer + ?Sized,
{
    install_panic_hook();
    let was_guarded = GUARDED.with(|g| g.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(|| renderer.render(markdown, config)));
    GUARDED.with(|g| g.set(was_guarded));

    result.unwrap_or_else(|payload| {
        let location = PANIC_LOCATION.with(|slot| slot.borrow_mut().take());
        Err(RenderFault::from_panic(payload, location))
    })
}
