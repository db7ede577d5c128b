use crate::models::{ListItem, Region};
use crate::render::{ChartHandle, Renderer};
use crate::stats::{ChartData, StatsView};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::Value;
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Serialize)]
pub struct ResultPanel {
    pub payload: Value,
    pub is_error: bool,
    pub updated_at: DateTime<Local>,
}

impl ResultPanel {
    /// Pretty-printed JSON, as shown in the region.
    pub fn text(&self) -> String {
        serde_json::to_string_pretty(&self.payload).unwrap_or_else(|_| self.payload.to_string())
    }
}

/// Everything the console page shows. Only the controller writes it.
#[derive(Debug, Default, Serialize)]
pub struct PageState {
    pub results: BTreeMap<Region, ResultPanel>,
    pub lists: BTreeMap<Region, Vec<ListItem>>,
    pub stats: Option<StatsView>,
    pub live_charts: BTreeMap<u64, ChartData>,
    pub charts_disposed: u64,
    next_chart_id: u64,
}

impl PageState {
    pub fn result(&self, region: Region) -> Option<&ResultPanel> {
        self.results.get(&region)
    }

    pub fn list(&self, region: Region) -> &[ListItem] {
        self.lists.get(&region).map(Vec::as_slice).unwrap_or_default()
    }

    /// The chart currently attached to the page, if any.
    pub fn chart(&self) -> Option<&ChartData> {
        self.live_charts.values().next_back()
    }
}

/// Renders into a shared [`PageState`].
#[derive(Clone, Default)]
pub struct PageRenderer {
    page: Arc<Mutex<PageState>>,
}

impl PageRenderer {
    pub fn new(page: Arc<Mutex<PageState>>) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &Arc<Mutex<PageState>> {
        &self.page
    }
}

#[async_trait]
impl Renderer for PageRenderer {
    async fn render_result(&self, region: Region, payload: &Value, is_error: bool) {
        let mut page = self.page.lock().await;
        page.results.insert(
            region,
            ResultPanel {
                payload: payload.clone(),
                is_error,
                updated_at: Local::now(),
            },
        );
    }

    async fn render_list(&self, region: Region, items: Vec<ListItem>) {
        let mut page = self.page.lock().await;
        // a list that loads successfully clears an earlier load error
        page.results.remove(&region);
        page.lists.insert(region, items);
    }

    async fn render_stats(&self, view: &StatsView) {
        let mut page = self.page.lock().await;
        page.results.remove(&Region::Stats);
        page.stats = Some(view.clone());
    }

    async fn mount_chart(&self, data: &ChartData) -> ChartHandle {
        let mut page = self.page.lock().await;
        page.next_chart_id += 1;
        let id = page.next_chart_id;
        page.live_charts.insert(id, data.clone());
        ChartHandle::new(id)
    }

    async fn dispose_chart(&self, handle: ChartHandle) {
        let mut page = self.page.lock().await;
        if page.live_charts.remove(&handle.id()).is_some() {
            page.charts_disposed += 1;
        }
    }
}
