use crate::api::ApiClient;
use crate::config::ConsoleConfig;
use crate::controller::Controller;
use crate::page::{PageRenderer, PageState};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<Controller<PageRenderer>>,
}

impl AppState {
    pub fn new(config: &ConsoleConfig) -> Self {
        let renderer = PageRenderer::new(Arc::new(Mutex::new(PageState::default())));
        Self {
            controller: Arc::new(Controller::new(ApiClient::new(config), renderer)),
        }
    }

    pub fn page(&self) -> &Arc<Mutex<PageState>> {
        self.controller.renderer().page()
    }
}
