use crate::models::{ListItem, Region};
use crate::stats::{ChartData, StatsView};
use async_trait::async_trait;
use serde_json::Value;

/// A mounted chart. Not `Clone`: disposing consumes the only handle.
#[derive(Debug, PartialEq, Eq)]
pub struct ChartHandle(u64);

impl ChartHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Where the controller writes what it learned from the backend.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Replaces the content of a result region.
    async fn render_result(&self, region: Region, payload: &Value, is_error: bool);

    /// Replaces every entry of a list or dropdown region.
    async fn render_list(&self, region: Region, items: Vec<ListItem>);

    async fn render_stats(&self, view: &StatsView);

    async fn mount_chart(&self, data: &ChartData) -> ChartHandle;

    async fn dispose_chart(&self, handle: ChartHandle);
}
