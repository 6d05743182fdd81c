//! Event listener attachment with owned closures

use sitemotion_core::{Error, Result};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Event, EventTarget};

/// Handle for an attached listener.
///
/// Dropping the handle detaches the listener; keep it for the page lifetime.
pub struct EventListener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
    removed: bool,
}

impl EventListener {
    /// Attach `handler` for `event` on `target`.
    ///
    /// # Errors
    ///
    /// Returns `ListenerFailed` if the browser rejects the listener.
    pub fn attach<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|e| Error::listener_failed(event, format!("{e:?}")))?;

        Ok(Self {
            target: target.clone(),
            event,
            closure,
            removed: false,
        })
    }

    #[must_use]
    pub const fn event(&self) -> &'static str {
        self.event
    }

    /// Detach the listener.
    ///
    /// # Errors
    ///
    /// Returns `ListenerFailed` if the browser rejects the removal.
    pub fn remove(mut self) -> Result<()> {
        self.detach()
    }

    fn detach(&mut self) -> Result<()> {
        self.target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref())
            .map_err(|e| Error::listener_failed(self.event, format!("{e:?}")))?;
        self.removed = true;
        Ok(())
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        if self.removed {
            return;
        }

        if let Err(error) = self.detach() {
            tracing::warn!(event = self.event, error = %error, "failed to detach listener on drop");
        }
    }
}
