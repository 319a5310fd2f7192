use std::sync::Arc;

use crate::core::config::Settings;
use crate::llm::{GeminiProvider, GenerationProvider};
use crate::metrics::PricingTable;

/// Application state shared across all routes.
///
/// Everything here is read-only after startup; requests share no
/// mutable state.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub pricing: PricingTable,
    pub provider: Arc<dyn GenerationProvider>,
}

impl AppState {
    pub fn new(settings: Settings) -> Arc<Self> {
        let provider = Arc::new(GeminiProvider::new(
            settings.model.base_url.clone(),
            settings.model.name.clone(),
            settings.model.api_key.clone(),
        ));
        Self::with_provider(settings, provider)
    }

    /// Builds state around an explicit provider. Tests use this to
    /// inject a scripted provider.
    pub fn with_provider(
        settings: Settings,
        provider: Arc<dyn GenerationProvider>,
    ) -> Arc<Self> {
        let pricing = settings.pricing;
        Arc::new(Self {
            settings,
            pricing,
            provider,
        })
    }
}
