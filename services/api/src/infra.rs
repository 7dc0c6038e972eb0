use metrics_exporter_prometheus::PrometheusHandle;
use nouvelle_maison::catalog::Catalog;
use nouvelle_maison::config::DelayConfig;
use nouvelle_maison::error::AppError;
use nouvelle_maison::i18n::Language;
use nouvelle_maison::workflows::interaction::FrontDesk;
use nouvelle_maison::workflows::search::SortOrder;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the embedded fixtures and open a desk over them.
pub(crate) fn build_front_desk(delays: &DelayConfig) -> Result<Arc<FrontDesk>, AppError> {
    let catalog = Arc::new(Catalog::embedded()?);
    Ok(Arc::new(FrontDesk::new(catalog, delays)))
}

pub(crate) fn parse_sort(raw: &str) -> Result<SortOrder, String> {
    SortOrder::parse(raw).ok_or_else(|| {
        format!("unknown sort order '{raw}' (newest, price-low-to-high, price-high-to-low)")
    })
}

pub(crate) fn parse_language(raw: &str) -> Result<Language, String> {
    Language::from_code(raw).ok_or_else(|| format!("unsupported language '{raw}' (fr, en)"))
}
