// ABOUTME: OutputSync renders the current item and delivers it to the named external sink.
// ABOUTME: Keeps the latest overlay fragment in a shared slot for the HTTP server; sink loss is never fatal.

use std::sync::{Arc, RwLock};

use crate::item::Item;
use crate::render;
use crate::sink::SinkDirectory;

/// Pushes the current item's rendering outward: the HTML document into a
/// shared slot read by the overlay endpoint, and the plain text into the
/// named external sink. A missing sink is logged and skipped; the next
/// liveness check picks it back up if it reappears.
pub struct OutputSync {
    directory: Box<dyn SinkDirectory>,
    sink_name: Option<String>,
    sink_present: bool,
    latest: Arc<RwLock<String>>,
}

impl OutputSync {
    pub fn new(directory: Box<dyn SinkDirectory>, sink_name: Option<String>) -> Self {
        let sink_present = sink_name
            .as_deref()
            .map(|name| directory.exists(name))
            .unwrap_or(false);
        Self {
            directory,
            sink_name,
            sink_present,
            latest: Arc::new(RwLock::new(render::placeholder_document())),
        }
    }

    /// Shared handle to the latest overlay document, for the HTTP server.
    pub fn latest_handle(&self) -> Arc<RwLock<String>> {
        Arc::clone(&self.latest)
    }

    pub fn sink_name(&self) -> Option<&str> {
        self.sink_name.as_deref()
    }

    pub fn sink_present(&self) -> bool {
        self.sink_present
    }

    /// Retarget the synchronizer at a different sink name (or none).
    pub fn set_sink_name(&mut self, name: Option<String>) {
        self.sink_name = name;
        self.sink_present = match self.sink_name.as_deref() {
            Some(name) => {
                let present = self.directory.exists(name);
                if present {
                    tracing::info!("output sink set to '{}'", name);
                } else {
                    tracing::warn!("output sink '{}' not found", name);
                }
                present
            }
            None => {
                tracing::info!("output sink cleared");
                false
            }
        };
    }

    /// Re-render and deliver. Always updates the shared overlay document;
    /// pushes to the sink by a fresh name lookup, logging and continuing
    /// when the sink cannot be resolved.
    pub fn refresh(&mut self, item: Option<&Item>) {
        let html = render::html_document(item);
        match self.latest.write() {
            Ok(mut slot) => *slot = html,
            Err(e) => tracing::error!("overlay slot poisoned: {}", e),
        }

        let Some(name) = self.sink_name.clone() else {
            return;
        };
        let text = render::sink_text(item);
        if self.directory.push(&name, &text) {
            self.sink_present = true;
        } else {
            if self.sink_present {
                tracing::warn!("output sink '{}' is unavailable, continuing without it", name);
            }
            self.sink_present = false;
        }
    }

    /// Liveness poll. Returns Some(present) when the sink's presence
    /// changed since the last look, None otherwise.
    pub fn check_sink(&mut self) -> Option<bool> {
        let name = self.sink_name.as_deref()?;
        let present = self.directory.exists(name);
        if present == self.sink_present {
            return None;
        }
        if present {
            tracing::info!("output sink '{}' is available again", name);
        } else {
            tracing::warn!("output sink '{}' disappeared", name);
        }
        self.sink_present = present;
        Some(present)
    }

    /// Host notification that a sink was renamed. Follows the target if it
    /// was ours. Returns true when the name changed.
    pub fn on_sink_renamed(&mut self, old_name: &str, new_name: &str) -> bool {
        if self.sink_name.as_deref() == Some(old_name) {
            tracing::info!("output sink renamed '{}' -> '{}'", old_name, new_name);
            self.sink_name = Some(new_name.to_string());
            true
        } else {
            false
        }
    }

    /// Host notification that a sink was removed. Clears the target if it
    /// was ours. Returns true when the name was cleared.
    pub fn on_sink_removed(&mut self, name: &str) -> bool {
        if self.sink_name.as_deref() == Some(name) {
            tracing::warn!("output sink '{}' was removed", name);
            self.sink_name = None;
            self.sink_present = false;
            true
        } else {
            false
        }
    }
}
