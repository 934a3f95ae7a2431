use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::HelpdeskService;

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub helpdesk: Arc<dyn HelpdeskService>,
}

impl AppContext {
    pub fn new(config: AppConfig, helpdesk: Arc<dyn HelpdeskService>) -> Self {
        Self { config, helpdesk }
    }
}
