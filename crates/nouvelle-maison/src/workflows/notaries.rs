use crate::catalog::Notary;
use serde::Serialize;
use tracing::debug;

/// Which notary's properties are unfolded on the directory page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NotaryDirectory {
    selected: Option<u32>,
}

impl NotaryDirectory {
    pub fn showing(selected: Option<u32>) -> Self {
        Self { selected }
    }

    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    /// Show `notary`'s properties, or hide them if already shown.
    /// A notary without properties has nothing to show and leaves the selection alone.
    pub fn toggle(&mut self, notary: &Notary) -> Option<u32> {
        if notary.properties.is_empty() {
            return self.selected;
        }

        self.selected = if self.selected == Some(notary.id) {
            None
        } else {
            Some(notary.id)
        };
        debug!(notary = notary.id, selected = ?self.selected, "notary selection toggled");
        self.selected
    }

    /// Label on the toggle button.
    pub fn toggle_label(&self, notary: &Notary) -> Option<String> {
        if notary.properties.is_empty() {
            return None;
        }
        if self.selected == Some(notary.id) {
            Some("Masquer les biens".to_string())
        } else {
            Some(format!("Voir les {} biens disponibles", notary.properties.len()))
        }
    }
}
