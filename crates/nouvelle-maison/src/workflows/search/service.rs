use super::{run_search, SearchQuery, SearchResults};
use crate::catalog::Catalog;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Runs searches behind the simulated lookup latency.
#[derive(Debug, Clone)]
pub struct SearchService {
    catalog: Arc<Catalog>,
    delay: Duration,
}

impl SearchService {
    pub fn new(catalog: Arc<Catalog>, delay: Duration) -> Self {
        Self { catalog, delay }
    }

    /// `None` for a blank term, returned at once without waiting.
    pub async fn search(&self, query: &SearchQuery) -> Option<SearchResults> {
        if query.is_blank() {
            debug!("ignoring blank search");
            return None;
        }

        tokio::time::sleep(self.delay).await;
        let results = run_search(&self.catalog, query)?;
        info!(
            location = %results.location,
            sort = ?results.sort,
            count = results.properties.len(),
            "search completed"
        );
        Some(results)
    }
}
