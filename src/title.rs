//! Window title derived from load and link-hover events.

use serde::Serialize;

/// Load phase reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadEvent {
    Started,
    Redirected,
    Committed,
    Finished,
}

/// Per-window title state. Remembers the title shown before a link hover.
#[derive(Debug, Clone, Default)]
pub struct TitleTracker {
    /// `Some` while hovering; holds the title shown before the hover, if any.
    saved: Option<Option<String>>,
}

impl TitleTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Title for a load phase.
    #[must_use]
    pub fn on_load_changed(
        &self,
        app_name: &str,
        event: LoadEvent,
        progress: f64,
        page_title: Option<&str>,
    ) -> String {
        match event {
            LoadEvent::Started | LoadEvent::Redirected | LoadEvent::Committed => {
                format!("{app_name} | Loading {:.0}% ...", progress * 100.0)
            }
            LoadEvent::Finished => format!("{app_name} | {}", page_title.unwrap_or_default()),
        }
    }

    /// Title change for a mouse-target update.
    ///
    /// Hovering a link saves `current_title` (once) and shows the link.
    /// Leaving links restores the saved title. `None` means leave the title
    /// as is, which is also the result of leaving when no title was set
    /// before the hover.
    pub fn on_mouse_target_changed(
        &mut self,
        app_name: &str,
        link_uri: Option<&str>,
        current_title: Option<&str>,
    ) -> Option<String> {
        match link_uri {
            Some(link) => {
                if self.saved.is_none() {
                    self.saved = Some(current_title.map(ToString::to_string));
                }
                Some(format!("{app_name} | {link}"))
            }
            None => self.saved.take().flatten(),
        }
    }

    /// True while a link hover is showing in place of the real title.
    #[must_use]
    pub fn is_hovering(&self) -> bool {
        self.saved.is_some()
    }
}
