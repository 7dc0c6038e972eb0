use serde::{Deserialize, Serialize};
use tracing::debug;

/// Top-level page. Exactly one is shown at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    #[default]
    Home,
    Results {
        location: String,
    },
    About,
    Notaries,
    Sell,
    Rent,
}

impl View {
    /// Translation key for the page heading.
    pub fn title_key(&self) -> &'static str {
        match self {
            View::Home => "findDreamHome",
            View::Results { .. } => "searchResults",
            View::About => "about",
            View::Notaries => "notaries",
            View::Sell => "sell",
            View::Rent => "rent",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    current: View,
}

impl Navigator {
    pub fn current(&self) -> &View {
        &self.current
    }

    pub fn show(&mut self, view: View) {
        debug!(from = ?self.current, to = ?view, "navigating");
        self.current = view;
    }

    pub fn show_results(&mut self, location: impl Into<String>) {
        self.show(View::Results {
            location: location.into(),
        });
    }

    pub fn back_to_search(&mut self) {
        self.show(View::Home);
    }
}
