use crate::config::AppConfig;
use std::sync::Arc;

/// Serves the `components` section of an [`AppConfig`] to the component manager.
pub struct AppConfigProvider(Arc<AppConfig>);

impl AppConfigProvider {
    pub fn new(config: AppConfig) -> Self {
        Self(Arc::new(config))
    }

    pub fn from_arc(config: Arc<AppConfig>) -> Self {
        Self(config)
    }
}

impl compkit::ConfigProvider for AppConfigProvider {
    fn component_config(&self, category: &str) -> Option<&serde_json::Value> {
        self.0.components.get(category)
    }
}
